use super::StoredModel;
use crate::storage::Collection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Metadata recorded for each uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Generated name the file is stored and served under.
    pub filename: String,
    pub original_name: String,
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
    #[schema(value_type = String)]
    pub uploaded_at: DateTime<Utc>,
}

impl Photo {
    /// Stored attribute holding the generated file name.
    pub const FILENAME_FIELD: &'static str = "filename";
}

impl StoredModel for Photo {
    const COLLECTION: Collection = Collection::Photos;

    fn keys() -> &'static [&'static str] {
        &[
            "id",
            Photo::FILENAME_FIELD,
            "originalName",
            "contentType",
            "size",
            "uploadedAt",
        ]
    }
}
