use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

use crate::web::AppError;

const INDEX_HTML: &str = "index.html";

#[derive(RustEmbed, Clone)]
#[folder = "frontend/"]
pub struct Assets;

fn embedded_response(path: &str) -> Option<Response> {
    let asset = Assets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime.as_ref().to_string())],
            Body::from(asset.data.into_owned()),
        )
            .into_response(),
    )
}

/// Serves the dashboard bundle. Unknown non-API paths fall back to `index.html`.
pub async fn static_handler(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    if path == "api" || path.starts_with("api/") {
        return AppError::NotFound(format!("Rota não encontrada: {}", uri.path())).into_response();
    }

    let path = if path.is_empty() { INDEX_HTML } else { path };
    embedded_response(path)
        .or_else(|| embedded_response(INDEX_HTML))
        .unwrap_or_else(|| (StatusCode::NOT_FOUND, "Frontend not bundled").into_response())
}
