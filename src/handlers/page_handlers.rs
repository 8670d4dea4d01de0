//! Serves the SPA shell with per-page SEO tags for every non-API path.

use crate::{errors::AppError, seo::render_page, state::AppState};
use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
};

/// Router fallback: any path no API route claimed.
pub async fn serve_page(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let path = uri.path();

    if path == "/api" || path.starts_with("/api/") {
        return Err(AppError::not_found("API endpoint not found"));
    }
    if method != Method::GET && method != Method::HEAD {
        return Err(AppError::method_not_allowed());
    }
    if path.contains('.') {
        return Ok((StatusCode::NOT_FOUND, "Not found").into_response());
    }

    if !accepts_html(&headers) {
        return Ok(Html(state.shell.to_string()).into_response());
    }

    let html = render_page(state.store.as_ref(), &state.site, &state.shell, path).await;
    Ok(Html(html).into_response())
}

/// True for browsers and crawlers: `text/html`, `*/*`, or no Accept header.
fn accepts_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT) else {
        return true;
    };
    match accept.to_str() {
        Ok(value) => value.contains("text/html") || value.contains("*/*"),
        Err(_) => false,
    }
}
