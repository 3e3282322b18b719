use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    #[error("paste not found")]
    NotFound,
    #[error("content is required and must be a non-empty string")]
    MissingContent,
    #[error("ttl_seconds must be an integer >= 1")]
    InvalidTtlSeconds,
    #[error("max_views must be an integer >= 1")]
    InvalidMaxViews,
    #[error("invalid request body")]
    InvalidBody {
        #[from]
        source: JsonRejection,
    },
    #[error("storage error")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MissingContent => StatusCode::BAD_REQUEST,
            ApiError::InvalidTtlSeconds => StatusCode::BAD_REQUEST,
            ApiError::InvalidMaxViews => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<std::io::Error> for ApiError {
    fn from(source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => ApiError::NotFound,
            _ => ApiError::Storage {
                source: Box::new(source),
            },
        }
    }
}
