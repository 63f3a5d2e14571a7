//! Application setup and router configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::kernel::StorageClient;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{admin, auth_pages, blog, health_handler, listings, seo, static_files};

/// Shared application state
///
/// Per-request identity is NOT part of this state; it rides on request
/// extensions so nothing session-shaped is ever shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: Arc<JwtService>,
    pub storage: Arc<StorageClient>,
    pub login_url: String,
    pub public_base_url: String,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        AppState {
            db_pool: pool,
            jwt_service: Arc::new(JwtService::new(
                &config.auth_jwt_secret,
                config.auth_jwt_issuer.clone(),
            )),
            storage: Arc::new(StorageClient::new(
                config.storage_base_url.clone(),
                config.storage_bucket.clone(),
                config.storage_service_key.clone(),
            )),
            login_url: config.auth_login_url.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    let jwt_service = state.jwt_service.clone();

    Router::new()
        // Public pages
        .route("/", get(listings::home))
        .route("/servers", get(listings::browse_servers))
        .route("/servers/:segment", get(listings::server_detail))
        .route("/clients", get(listings::browse_clients))
        .route("/clients/:segment", get(listings::client_detail))
        .route("/submit", get(listings::submit_form).post(listings::submit))
        .route("/blog", get(blog::index))
        .route("/blog/:slug", get(blog::detail))
        // Auth
        .route("/login", get(auth_pages::login))
        .route("/auth/callback", get(auth_pages::callback))
        .route("/logout", post(auth_pages::logout))
        // Admin
        .route("/admin", get(admin::dashboard))
        .route("/admin/listings/:id/approve", post(admin::approve_listing))
        .route("/admin/listings/:id/reject", post(admin::reject_listing))
        .route("/admin/listings/:id/delete", post(admin::delete_listing))
        .route(
            "/admin/posts/new",
            get(admin::compose_form),
        )
        .route("/admin/posts", post(admin::compose))
        .route("/admin/posts/:id/publish", post(admin::publish_post))
        .route("/admin/uploads", post(admin::upload_image))
        // Metadata
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/robots.txt", get(seo::robots))
        .route("/static/site.css", get(static_files::site_css))
        .route("/health", get(health_handler))
        // Layers (outermost runs first)
        .layer(middleware::from_fn(
            move |request: axum::extract::Request, next: middleware::Next| {
                let jwt_service = jwt_service.clone();
                async move { jwt_auth_middleware(jwt_service, request, next).await }
            },
        ))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
