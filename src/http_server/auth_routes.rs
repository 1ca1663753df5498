//! Auth HTTP Routes
//!
//! Admin login against the shared-secret gate.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::errors::method_not_allowed;
use crate::auth::{AdminGate, AuthError};

/// Shared auth state
pub struct AuthState {
    pub gate: AdminGate,
}

impl AuthState {
    pub fn new(gate: AdminGate) -> Self {
        Self { gate }
    }
}

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/login", post(login_handler).fallback(method_not_allowed))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl LoginResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            token: None,
        }
    }
}

impl From<AuthError> for LoginResponse {
    fn from(err: AuthError) -> Self {
        Self::failure(err.to_string())
    }
}

/// Login handler
async fn login_handler(
    State(state): State<Arc<AuthState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> (StatusCode, Json<LoginResponse>) {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(LoginResponse::failure(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                ))),
            )
        }
    };

    match state.gate.login(&request.password) {
        Ok(token) => {
            info!("admin login succeeded");
            let response = LoginResponse {
                success: true,
                message: "Authentication successful".to_string(),
                token: Some(token.to_string()),
            };
            (StatusCode::OK, Json(response))
        }
        Err(e) => {
            warn!(error = %e, "admin login rejected");
            let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
            (status, Json(LoginResponse::from(e)))
        }
    }
}
