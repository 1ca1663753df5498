//! Admin HTTP Routes
//!
//! Generic collection endpoints behind the admin bearer token.
//!
//! - `GET    /collections`  - list collection names
//! - `GET    /:collection`  - all documents (`?limit=&skip=`)
//! - `POST   /:collection`  - insert the body
//! - `PUT    /:collection`  - `{filter, data}` update
//! - `DELETE /:collection`  - `{filter}` delete

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    routing::get,
    Json, Router,
};
use bson::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ApiError, ApiResult};
use crate::auth::AdminGate;
use crate::crud::{RequestRouter, Verb};
use crate::document::json_to_document;
use crate::store::FindOptions;

/// Shared admin state
pub struct AdminState {
    pub router: RequestRouter,
    pub gate: AdminGate,
}

impl AdminState {
    pub fn new(router: RequestRouter, gate: AdminGate) -> Self {
        Self { router, gate }
    }

    fn authorize(&self, headers: &HeaderMap) -> ApiResult<()> {
        let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        Ok(self.gate.verify_bearer(header)?)
    }
}

/// Admin routes with shared state
pub fn admin_routes(state: Arc<AdminState>) -> Router {
    Router::new()
        .route(
            "/collections",
            get(list_collections_handler).fallback(unsupported_method_handler),
        )
        .route(
            "/:collection",
            get(find_handler)
                .post(insert_handler)
                .put(update_handler)
                .delete(delete_handler)
                .fallback(unsupported_method_handler),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct CollectionsResponse {
    pub collections: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub skip: Option<u64>,
}

impl From<ListParams> for FindOptions {
    fn from(params: ListParams) -> Self {
        FindOptions {
            limit: params.limit,
            skip: params.skip,
            sort: None,
        }
    }
}

/// `PUT` / `DELETE` body
#[derive(Debug, Default, Deserialize)]
pub struct MutationBody {
    #[serde(default)]
    pub filter: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Parse a raw body; an empty body is `None`
fn parse_body(bytes: &Bytes) -> ApiResult<Option<Value>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(bytes)
        .map(Some)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))
}

/// Objects become documents; absent and `null` are `None`
fn to_document(field: &str, value: Option<Value>) -> ApiResult<Option<Document>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Object(_)) => json_to_document(value)
            .map(Some)
            .map_err(|e| ApiError::BadRequest(e.to_string())),
        Some(_) => Err(ApiError::BadRequest(format!("{} must be a JSON object", field))),
    }
}

fn mutation_body(bytes: &Bytes) -> ApiResult<MutationBody> {
    match parse_body(bytes)? {
        None | Some(Value::Null) => Ok(MutationBody::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e))),
    }
}

/// Unknown methods still need the bearer; without it the answer is 401
async fn unsupported_method_handler(
    State(state): State<Arc<AdminState>>,
    headers: HeaderMap,
) -> ApiError {
    match state.authorize(&headers) {
        Ok(()) => ApiError::MethodNotAllowed,
        Err(e) => e,
    }
}

async fn list_collections_handler(
    State(state): State<Arc<AdminState>>,
    headers: HeaderMap,
) -> ApiResult<Json<CollectionsResponse>> {
    state.authorize(&headers)?;
    let collections = state.router.crud().collection_names().await?;
    Ok(Json(CollectionsResponse { collections }))
}

async fn find_handler(
    State(state): State<Arc<AdminState>>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    state.authorize(&headers)?;
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let output = state
        .router
        .handle_with_options(&collection, Verb::Get, None, None, params.into())
        .await?;
    Ok(Json(output.to_json()))
}

async fn insert_handler(
    State(state): State<Arc<AdminState>>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    state.authorize(&headers)?;
    let data = to_document("body", parse_body(&body)?)?;

    let output = state
        .router
        .handle(&collection, Verb::Post, data, None)
        .await?;
    Ok(Json(output.to_json()))
}

async fn update_handler(
    State(state): State<Arc<AdminState>>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    state.authorize(&headers)?;
    let body = mutation_body(&body)?;
    let filter = to_document("filter", body.filter)?;
    let data = to_document("data", body.data)?;

    let output = state
        .router
        .handle(&collection, Verb::Put, data, filter)
        .await?;
    Ok(Json(output.to_json()))
}

async fn delete_handler(
    State(state): State<Arc<AdminState>>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    state.authorize(&headers)?;
    let body = mutation_body(&body)?;
    let filter = to_document("filter", body.filter)?;

    let output = state
        .router
        .handle(&collection, Verb::Delete, None, filter)
        .await?;
    Ok(Json(output.to_json()))
}
