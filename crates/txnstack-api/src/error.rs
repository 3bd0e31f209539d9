//! Error types for txnstack-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use txnstack_core::{CoreError, ErrorSeverity};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    InternalError { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        let code = error.code();
        match error.severity() {
            ErrorSeverity::Info => log::info!("[{}] {}", code, error),
            ErrorSeverity::Warning => log::warn!("[{}] {}", code, error),
            ErrorSeverity::Error | ErrorSeverity::Critical => log::error!("[{}] {}", code, error),
        }

        if !error.is_client_error() {
            return ApiError::InternalError {
                message: "Internal server error".to_string(),
            };
        }

        match error {
            CoreError::ValidationError { field, message } => ApiError::BadRequest {
                message: format!("Invalid {} format. {}", field, message),
            },
            _ => ApiError::NotFound {
                message: "Transaction not found".to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
