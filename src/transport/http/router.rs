use crate::domain::model::{Info, Photo, Piece, PieceReplacement};
use crate::transport::http::handlers::{health, images, info, pieces};
use crate::transport::http::types::{
    AddPieceRequest, AppState, DeletePieceRequest, ErrorBody, FeaturedRequest, FieldValueRequest,
    HealthResponse, UploadForm,
};
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, get_service, post};
use axum::Router;
use tower_http::services::ServeDir;
use utoipa::OpenApi;

/// Upper bound on files accepted by one `/upload` request when sizing the body limit.
pub const MAX_FILES_PER_UPLOAD: usize = 10;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        pieces::get_piece_handler,
        pieces::list_pieces_handler,
        pieces::pieces_by_category_handler,
        pieces::piece_keys_handler,
        pieces::featured_pieces_handler,
        pieces::set_featured_handler,
        pieces::add_piece_handler,
        pieces::replace_piece_handler,
        pieces::update_piece_field_handler,
        pieces::delete_piece_handler,
        info::list_info_handler,
        info::update_info_field_handler,
        images::list_photos_handler,
        images::upload_handler,
        images::delete_image_handler
    ),
    components(schemas(
        Piece,
        PieceReplacement,
        Info,
        Photo,
        AddPieceRequest,
        DeletePieceRequest,
        FeaturedRequest,
        FieldValueRequest,
        UploadForm,
        HealthResponse,
        ErrorBody
    ))
)]
pub struct ApiDoc;

/// Builds the API router.
///
/// Routes under `/pieces/` share one parameter name in the second segment because the router
/// requires a single name per position; extraction is positional, so handlers are unaffected.
pub fn create_router(app_state: AppState) -> Router {
    let upload_limit = app_state
        .service
        .max_upload_bytes()
        .saturating_mul(MAX_FILES_PER_UPLOAD)
        .saturating_add(64 * 1024);
    let static_files = ServeDir::new(&app_state.public_dir);

    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/piece/:name", get(pieces::get_piece_handler))
        .route("/pieces", get(pieces::list_pieces_handler))
        .route("/info", get(info::list_info_handler))
        .route(
            "/pieces/category/:category",
            get(pieces::pieces_by_category_handler).post(pieces::category_piece_action_handler),
        )
        .route("/piece-keys", get(pieces::piece_keys_handler))
        .route("/featured-pieces", get(pieces::featured_pieces_handler))
        .route("/photos", get(images::list_photos_handler))
        .route("/pieces/:piece/featured", post(pieces::set_featured_handler))
        .route("/pieces/add-piece", post(pieces::add_piece_handler))
        .route(
            "/pieces/:piece/update-piece",
            post(pieces::replace_piece_handler),
        )
        .route(
            "/pieces/:piece/:key/update-piece",
            post(pieces::update_piece_field_handler),
        )
        .route(
            "/info/:id/:key/update-piece",
            post(info::update_info_field_handler),
        )
        .route(
            "/upload",
            post(images::upload_handler).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/images/:image", get_service(static_files))
        .route(
            "/images/:image/delete-image",
            delete(images::delete_image_handler),
        )
        .route("/pieces/delete-piece", delete(pieces::delete_piece_handler))
        .with_state(app_state)
}
