use axum::extract::Path;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::render::assets;

/// GET /assets/{file} — embedded stylesheet and script.
pub async fn asset(Path(name): Path<String>) -> Response {
    match assets::get(&name) {
        Some((bytes, mime)) => ([(CONTENT_TYPE, mime)], bytes).into_response(),
        None => (StatusCode::NOT_FOUND, "Asset not found").into_response(),
    }
}
