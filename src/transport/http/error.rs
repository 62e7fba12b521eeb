use crate::app::ServiceError;
use crate::storage::FileStoreError;
use crate::transport::http::types::ErrorBody;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

/// Request failures, one variant per HTTP status class the API reports.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidBody(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("{0}")]
    StoreUnavailable(String),

    #[error("{0}")]
    Store(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing summary; the variant detail goes out separately.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "The requested record does not exist",
            ApiError::Validation(_) => "The request could not be accepted",
            ApiError::InvalidBody(_) => "The request body could not be read",
            ApiError::PayloadTooLarge(_) => "The uploaded file is too large",
            ApiError::UnsupportedMediaType(_) => "Only image uploads are accepted",
            ApiError::StoreUnavailable(_) => "The database is unavailable, try again shortly",
            ApiError::Store(_) | ApiError::Internal(_) => "Something has gone tragically wrong :(",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        let body = ErrorBody {
            message: self.message().to_string(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let detail = err.to_string();
        match err {
            ServiceError::NotFound(_) => ApiError::NotFound(detail),
            ServiceError::Field(_) | ServiceError::Invalid(_) => ApiError::Validation(detail),
            ServiceError::TooLarge { .. } => ApiError::PayloadTooLarge(detail),
            ServiceError::UnsupportedType { .. } => ApiError::UnsupportedMediaType(detail),
            ServiceError::Store(e) if e.is_unavailable() => ApiError::StoreUnavailable(detail),
            ServiceError::Store(_) => ApiError::Store(detail),
            ServiceError::Files(FileStoreError::InvalidName(_)) => ApiError::Validation(detail),
            ServiceError::Files(FileStoreError::NotFound(_)) => ApiError::NotFound(detail),
            ServiceError::Files(FileStoreError::Io(_)) => ApiError::Internal(detail),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::InvalidBody(format!("Invalid JSON body: {}", err.body_text()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        let detail = format!("Invalid multipart body: {}", err.body_text());
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(detail)
        } else {
            ApiError::InvalidBody(detail)
        }
    }
}
