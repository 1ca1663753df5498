//! Contact HTTP Routes
//!
//! `POST /api/sendEmail`: public contact form endpoint, no authentication.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use super::errors::{method_not_allowed, ApiError, ApiResult};
use crate::contact::{ContactMessage, EmailSender};

/// Shared contact state
pub struct ContactState {
    pub mailer: Arc<dyn EmailSender>,
}

impl ContactState {
    pub fn new(mailer: Arc<dyn EmailSender>) -> Self {
        Self { mailer }
    }
}

pub fn contact_routes(state: Arc<ContactState>) -> Router {
    Router::new()
        .route(
            "/api/sendEmail",
            post(send_email_handler).fallback(method_not_allowed),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
}

async fn send_email_handler(
    State(state): State<Arc<ContactState>>,
    body: Result<Json<ContactMessage>, JsonRejection>,
) -> ApiResult<Json<SendEmailResponse>> {
    let Json(message) = body?;
    message.validate()?;

    if let Err(e) = state.mailer.send(&message).await {
        error!(error = %e, "contact email failed");
        return Err(ApiError::from(e));
    }

    Ok(Json(SendEmailResponse { success: true }))
}
