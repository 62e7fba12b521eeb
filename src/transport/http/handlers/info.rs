use crate::domain::model::Info;
use crate::transport::http::error::ApiResult;
use crate::transport::http::types::{AppState, ErrorBody, FieldValueRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/info",
    responses(
        (status = 200, description = "All info records", body = [Info]),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn list_info_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Info>>> {
    Ok(Json(state.service.list_info().await?))
}

#[utoipa::path(
    post,
    path = "/info/{id}/{key}/update-piece",
    params(
        ("id" = String, Path, description = "Info record id"),
        ("key" = String, Path, description = "Attribute to set: heading, about, email, phone, location, instagram, linkedin or resume")
    ),
    request_body = FieldValueRequest,
    responses(
        (status = 200, description = "Updated info record", body = Info),
        (status = 400, description = "Malformed id, unknown key or non-text value", body = ErrorBody),
        (status = 404, description = "No info record with that id", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    )
)]
pub async fn update_info_field_handler(
    State(state): State<AppState>,
    Path((id, key)): Path<(String, String)>,
    request: Result<Json<FieldValueRequest>, JsonRejection>,
) -> ApiResult<Json<Info>> {
    let Json(request) = request?;
    Ok(Json(
        state
            .service
            .update_info_field(&id, &key, &request.value)
            .await?,
    ))
}
