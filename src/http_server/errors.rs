//! # HTTP Errors
//!
//! Maps module errors onto status codes and `{message, error?}` bodies.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use crate::contact::MailError;
use crate::crud::CrudError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body or query could not be read
    #[error("{0}")]
    BadRequest(String),

    /// Route exists but not for this HTTP method
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Crud(#[from] CrudError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Crud(err) => match err {
                CrudError::Validation(_) => StatusCode::BAD_REQUEST,
                CrudError::NotFound(_) => StatusCode::NOT_FOUND,
                CrudError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
                CrudError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Auth(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::UNAUTHORIZED)
            }
            ApiError::Mail(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: Some(error.into()),
        }
    }
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::Crud(CrudError::NotFound(missing)) => {
                ErrorResponse::with_error("Document not found", missing.to_string())
            }
            ApiError::Crud(CrudError::Store(store)) => {
                ErrorResponse::with_error("Database operation failed", store.to_string())
            }
            ApiError::Mail(MailError::MissingFields) => {
                ErrorResponse::with_error("Missing required fields", "Missing required fields")
            }
            // relay details stay in the log
            ApiError::Mail(_) => {
                ErrorResponse::with_error("Failed to send email", "Failed to send email")
            }
            other => ErrorResponse::new(other.to_string()),
        }
    }
}

/// Method fallback for routes without their own
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::{MissingDocument, Mutation};
    use crate::store::StoreError;
    use bson::doc;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CrudError::validation("No data provided")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CrudError::Store(StoreError::Operation("down".into()))).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(AuthError::Unauthorized).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(MailError::MissingFields).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_method_not_allowed_body() {
        let json = serde_json::to_value(ErrorResponse::from(&ApiError::MethodNotAllowed)).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Method not allowed" }));
    }

    #[test]
    fn test_not_found_body() {
        let err = ApiError::from(CrudError::NotFound(Box::new(MissingDocument {
            mutation: Mutation::Delete,
            collection: "projects".to_string(),
            filter: doc! { "title": "Z" },
            total_documents: 0,
            sample_fields: None,
        })));

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let body = ErrorResponse::from(&err);
        assert_eq!(body.message, "Document not found");
        assert!(body.error.unwrap().contains("Collection: projects"));
    }

    #[test]
    fn test_store_failure_body() {
        let err = ApiError::from(CrudError::Store(StoreError::Operation("timeout".into())));
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["message"], "Database operation failed");
        assert!(json["error"].as_str().unwrap().contains("timeout"));
    }

    #[test]
    fn test_mail_failure_hides_detail() {
        let err = ApiError::from(MailError::Send("535 auth failed".into()));
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["error"], "Failed to send email");
        assert!(!json.to_string().contains("535"));
    }
}
