use crate::domain::model::FieldError;
use crate::storage::{FileStoreError, StoreError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures of a portfolio operation, before they are mapped onto HTTP.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("{0}")]
    Invalid(String),

    #[error("upload '{name}' is {size} bytes (max {max})")]
    TooLarge { name: String, size: usize, max: usize },

    #[error("upload '{name}' has content type '{content_type}' (expected image/*)")]
    UnsupportedType { name: String, content_type: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Files(#[from] FileStoreError),
}
