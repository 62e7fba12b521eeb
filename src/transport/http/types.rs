use crate::app::PortfolioService;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PortfolioService>,
    /// Root of the static tree; uploaded images are served from `<public_dir>/images`.
    pub public_dir: PathBuf,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct FeaturedRequest {
    /// New `featured` flag. Accepts `true`/`false` or their string forms.
    #[schema(value_type = bool)]
    pub text: JsonValue,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct AddPieceRequest {
    pub name: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct DeletePieceRequest {
    pub name: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct FieldValueRequest {
    /// New value; its type must match the field being set.
    #[schema(value_type = Object)]
    pub value: JsonValue,
}

/// Multipart form accepted by `/upload` (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// One or more image files, each under the `file` field.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub file: Vec<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of every non-2xx response.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorBody {
    /// Fixed human-readable text for the error class.
    pub message: String,
    /// Underlying error detail.
    #[serde(rename = "e")]
    pub detail: String,
}
