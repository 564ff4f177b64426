//! API 错误类型及其 HTTP 映射

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use giftchoice_catalog::CatalogError;
use giftchoice_session::SessionError;
use serde::Serialize;

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("catalog refresh failed: {0}")]
    Catalog(#[from] CatalogError),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Session(SessionError::SessionNotFound { .. }) => {
                (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND")
            }
            ApiError::Session(SessionError::MessageNotFound { .. }) => {
                (StatusCode::NOT_FOUND, "MESSAGE_NOT_FOUND")
            }
            ApiError::Session(SessionError::NoAction { .. }) => {
                (StatusCode::BAD_REQUEST, "NO_ACTION")
            }
            ApiError::Session(SessionError::UnknownSuggestion(_)) => {
                (StatusCode::BAD_REQUEST, "UNKNOWN_SUGGESTION")
            }
            ApiError::Session(SessionError::LimitReached { .. }) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SESSION_LIMIT")
            }
            ApiError::Catalog(_) => (StatusCode::BAD_GATEWAY, "CATALOG_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
