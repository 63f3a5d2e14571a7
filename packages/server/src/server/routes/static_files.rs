//! The single static asset: the site stylesheet.

use axum::http::header;
use axum::response::{IntoResponse, Response};

const SITE_CSS: &str = include_str!("site.css");

pub async fn site_css() -> Response {
    ([(header::CONTENT_TYPE, "text/css")], SITE_CSS).into_response()
}
