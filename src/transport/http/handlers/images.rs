use crate::app::UploadedFile;
use crate::domain::model::Photo;
use crate::transport::http::error::{ApiError, ApiResult};
use crate::transport::http::types::{AppState, ErrorBody, UploadForm};
use axum::extract::{Multipart, Path, State};
use axum::Json;
use tracing::debug;

/// Multipart field that carries the files.
pub const UPLOAD_FIELD: &str = "file";

#[utoipa::path(
    get,
    path = "/photos",
    responses(
        (status = 200, description = "Metadata of every uploaded image", body = [Photo]),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn list_photos_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Photo>>> {
    Ok(Json(state.service.list_photos().await?))
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Generated names of the stored files", body = [String]),
        (status = 400, description = "No file field in the form", body = ErrorBody),
        (status = 413, description = "A file exceeds the upload limit", body = ErrorBody),
        (status = 415, description = "A file is not an image", body = ErrorBody),
        (status = 422, description = "Malformed multipart body", body = ErrorBody)
    )
)]
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<Vec<String>>> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(field = ?field.name(), "Skipping unexpected multipart field");
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        // Reject by type before buffering the body.
        state
            .service
            .check_upload(&original_name, &content_type, 0)?;

        let bytes = field.bytes().await?;
        uploads.push(UploadedFile {
            original_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    if uploads.is_empty() {
        return Err(ApiError::Validation(format!(
            "no '{}' field in the upload form",
            UPLOAD_FIELD
        )));
    }

    let stored = state.service.store_uploads(&uploads).await?;
    Ok(Json(stored.into_iter().map(|photo| photo.filename).collect()))
}

#[utoipa::path(
    delete,
    path = "/images/{image}/delete-image",
    params(
        ("image" = String, Path, description = "Stored file name, as returned by /upload")
    ),
    responses(
        (status = 200, description = "Confirmation message", body = String),
        (status = 400, description = "Name is not a plain file name", body = ErrorBody),
        (status = 404, description = "No such image", body = ErrorBody)
    )
)]
pub async fn delete_image_handler(
    State(state): State<AppState>,
    Path(image): Path<String>,
) -> ApiResult<Json<String>> {
    state.service.delete_image(&image).await?;
    Ok(Json(format!("{} has been deleted", image)))
}
