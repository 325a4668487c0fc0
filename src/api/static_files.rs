//! Static file fallback for everything outside the API routes

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use super::routes::AppState;
use crate::error::Error;

/// Characters escaped in a single path segment of a listing link
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

/// Catch-all handler: `GET`/`HEAD` serve files from the static root, any
/// other method is an unknown API call.
pub async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    if matches!(*request.method(), Method::GET | Method::HEAD) {
        serve_static(&state.static_root, request).await
    } else {
        Error::NotFound("Unknown API endpoint".into()).into_response()
    }
}

async fn serve_static(root: &Path, request: Request) -> Response {
    let uri_path = request.uri().path().to_string();

    let response = match ServeDir::new(root).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    };

    if response.status() == StatusCode::NOT_FOUND {
        if let Some(listing) = directory_listing(root, &uri_path).await {
            return listing;
        }
    }

    response
}

/// HTML index of a directory without an `index.html`
async fn directory_listing(root: &Path, uri_path: &str) -> Option<Response> {
    let uri_path = percent_decode_str(uri_path).decode_utf8().ok()?;
    if !uri_path.ends_with('/') || uri_path.contains("..") {
        return None;
    }

    let dir = root.join(uri_path.trim_start_matches('/'));
    let mut entries = tokio::fs::read_dir(&dir).await.ok()?;

    let mut names = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().await.map(|t| t.is_dir()).unwrap_or(false);
        names.push((name, is_dir));
    }
    names.sort_by_key(|(name, _)| name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(&uri_path));
    let mut body = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for (name, is_dir) in &names {
        let suffix = if *is_dir { "/" } else { "" };
        let href = escape_html(&utf8_percent_encode(name, PATH_SEGMENT).to_string());
        let text = escape_html(name);
        body.push_str(&format!(
            "<li><a href=\"{href}{suffix}\">{text}{suffix}</a></li>\n"
        ));
    }
    body.push_str("</ul>\n<hr>\n</body>\n</html>\n");

    Some(
        (
            [(header::CACHE_CONTROL, "no-cache")],
            Html(body),
        )
            .into_response(),
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
