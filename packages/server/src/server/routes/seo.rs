//! Sitemap and robots metadata.
//!
//! The sitemap lists the static routes plus every approved listing and
//! published post; crawlers are pointed at it from robots.txt.

use axum::extract::Extension;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures::try_join;

use crate::domains::listings::models::{Listing, ListingKind};
use crate::domains::posts::models::Post;
use crate::server::app::AppState;
use crate::server::error::PageResult;

const STATIC_ROUTES: &[&str] = &["/", "/servers", "/clients", "/blog", "/submit", "/login"];

pub async fn sitemap(Extension(state): Extension<AppState>) -> PageResult<Response> {
    let (servers, clients, posts) = try_join!(
        Listing::find_all_approved(ListingKind::Server, &state.db_pool),
        Listing::find_all_approved(ListingKind::Client, &state.db_pool),
        Post::find_all_published(&state.db_pool),
    )?;

    let mut urls: Vec<String> = STATIC_ROUTES
        .iter()
        .map(|route| format!("{}{}", state.public_base_url, route))
        .collect();
    urls.extend(
        servers
            .iter()
            .chain(clients.iter())
            .map(|l| format!("{}{}", state.public_base_url, l.path())),
    );
    urls.extend(
        posts
            .iter()
            .map(|p| format!("{}/blog/{}", state.public_base_url, p.slug)),
    );

    let entries = urls
        .iter()
        .map(|url| format!("  <url><loc>{}</loc></url>", url))
        .collect::<Vec<_>>()
        .join("\n");
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}\n</urlset>\n",
        entries
    );

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

pub async fn robots(Extension(state): Extension<AppState>) -> Response {
    let body = format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\n\nSitemap: {}/sitemap.xml\n",
        state.public_base_url
    );
    ([(header::CONTENT_TYPE, "text/plain")], body).into_response()
}
