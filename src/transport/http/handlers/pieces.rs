use crate::domain::model::{Piece, PieceReplacement};
use crate::transport::http::error::{ApiError, ApiResult};
use crate::transport::http::types::{
    AddPieceRequest, AppState, DeletePieceRequest, ErrorBody, FeaturedRequest, FieldValueRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

#[utoipa::path(
    get,
    path = "/piece/{name}",
    params(
        ("name" = String, Path, description = "Piece name, or a piece id when no name matches")
    ),
    responses(
        (status = 200, description = "The piece, or null when nothing matches", body = Piece),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn get_piece_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Option<Piece>>> {
    let piece = state.service.find_piece(&name).await?;
    debug!(key = %name, found = piece.is_some(), "Piece lookup");
    Ok(Json(piece))
}

#[utoipa::path(
    get,
    path = "/pieces",
    responses(
        (status = 200, description = "All pieces", body = [Piece]),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn list_pieces_handler(State(state): State<AppState>) -> ApiResult<Json<Vec<Piece>>> {
    Ok(Json(state.service.list_pieces().await?))
}

#[utoipa::path(
    get,
    path = "/pieces/category/{category}",
    params(
        ("category" = String, Path, description = "camelCase category slug, e.g. homeDecor")
    ),
    responses(
        (status = 200, description = "Pieces in the category", body = [Piece]),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn pieces_by_category_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<Vec<Piece>>> {
    Ok(Json(state.service.pieces_in_category(&category).await?))
}

/// Name of the static `/pieces/category/...` segment.
const CATEGORY_SEGMENT: &str = "category";

/// POSTs to `/pieces/category/<action>` address a piece named `category`: the static segment
/// shadows `/pieces/:piece/featured` and `/pieces/:piece/update-piece` for that name.
pub async fn category_piece_action_handler(
    State(state): State<AppState>,
    Path(action): Path<String>,
    body: Bytes,
) -> ApiResult<Json<Piece>> {
    let name = Path(CATEGORY_SEGMENT.to_string());
    match action.as_str() {
        "featured" => set_featured_handler(State(state), name, Json::from_bytes(&body)).await,
        "update-piece" => replace_piece_handler(State(state), name, Json::from_bytes(&body)).await,
        other => Err(ApiError::NotFound(format!(
            "no POST route for /pieces/{}/{}",
            CATEGORY_SEGMENT, other
        ))),
    }
}

#[utoipa::path(
    get,
    path = "/piece-keys",
    responses(
        (status = 200, description = "Attribute names a piece can carry", body = [String])
    )
)]
pub async fn piece_keys_handler(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.service.piece_keys())
}

#[utoipa::path(
    get,
    path = "/featured-pieces",
    responses(
        (status = 200, description = "Pieces flagged as featured", body = [Piece]),
        (status = 503, description = "Store unavailable", body = ErrorBody)
    )
)]
pub async fn featured_pieces_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Piece>>> {
    Ok(Json(state.service.featured_pieces().await?))
}

#[utoipa::path(
    post,
    path = "/pieces/{name}/featured",
    params(
        ("name" = String, Path, description = "Piece name")
    ),
    request_body = FeaturedRequest,
    responses(
        (status = 200, description = "Updated piece", body = Piece),
        (status = 400, description = "Value is not a bool", body = ErrorBody),
        (status = 404, description = "No piece with that name", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    )
)]
pub async fn set_featured_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Result<Json<FeaturedRequest>, JsonRejection>,
) -> ApiResult<Json<Piece>> {
    let Json(request) = request?;
    Ok(Json(state.service.set_featured(&name, &request.text).await?))
}

#[utoipa::path(
    post,
    path = "/pieces/add-piece",
    request_body = AddPieceRequest,
    responses(
        (status = 200, description = "Created piece", body = Piece),
        (status = 400, description = "Empty name", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    )
)]
pub async fn add_piece_handler(
    State(state): State<AppState>,
    request: Result<Json<AddPieceRequest>, JsonRejection>,
) -> ApiResult<Json<Piece>> {
    let Json(request) = request?;
    Ok(Json(state.service.add_piece(&request.name).await?))
}

#[utoipa::path(
    post,
    path = "/pieces/{title}/update-piece",
    params(
        ("title" = String, Path, description = "Current title of the piece to replace")
    ),
    request_body = PieceReplacement,
    responses(
        (status = 200, description = "Replaced piece", body = Piece),
        (status = 400, description = "Empty name", body = ErrorBody),
        (status = 404, description = "No piece with that title", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    )
)]
pub async fn replace_piece_handler(
    State(state): State<AppState>,
    Path(title): Path<String>,
    request: Result<Json<PieceReplacement>, JsonRejection>,
) -> ApiResult<Json<Piece>> {
    let Json(replacement) = request?;
    Ok(Json(
        state
            .service
            .replace_piece_by_title(&title, replacement)
            .await?,
    ))
}

#[utoipa::path(
    post,
    path = "/pieces/{id}/{key}/update-piece",
    params(
        ("id" = String, Path, description = "Piece id"),
        ("key" = String, Path, description = "Attribute to set (see /piece-keys; id is not updatable)")
    ),
    request_body = FieldValueRequest,
    responses(
        (status = 200, description = "Updated piece", body = Piece),
        (status = 400, description = "Malformed id, unknown key or wrongly typed value", body = ErrorBody),
        (status = 404, description = "No piece with that id", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    )
)]
pub async fn update_piece_field_handler(
    State(state): State<AppState>,
    Path((id, key)): Path<(String, String)>,
    request: Result<Json<FieldValueRequest>, JsonRejection>,
) -> ApiResult<Json<Piece>> {
    let Json(request) = request?;
    Ok(Json(
        state
            .service
            .update_piece_field(&id, &key, &request.value)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/pieces/delete-piece",
    request_body = DeletePieceRequest,
    responses(
        (status = 200, description = "Confirmation message", body = String),
        (status = 404, description = "No piece with that name", body = ErrorBody),
        (status = 422, description = "Invalid JSON body", body = ErrorBody)
    )
)]
pub async fn delete_piece_handler(
    State(state): State<AppState>,
    request: Result<Json<DeletePieceRequest>, JsonRejection>,
) -> ApiResult<Json<String>> {
    let Json(request) = request?;
    state.service.delete_pieces_by_name(&request.name).await?;
    Ok(Json(format!("{} has been deleted", request.name)))
}
