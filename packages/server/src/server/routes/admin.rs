//! Admin moderation dashboard, blog composition, and image upload.
//!
//! Every handler here requires the identity provider's admin role claim;
//! anonymous users bounce to login, signed-in non-admins get the
//! access-denied panel.

use axum::body::Bytes;
use axum::extract::{Extension, Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::common::normalize::normalize_list;
use crate::common::{ListingId, PostId};
use crate::domains::listings::models::{Listing, ListingKind, ModerationStatus};
use crate::domains::listings::moderation::{self, ModerationStats};
use crate::domains::member::models::Member;
use crate::domains::posts::models::{NewPost, Post, PostStatus};
use crate::server::app::AppState;
use crate::server::error::{PageError, PageResult};
use crate::server::middleware::AuthUser;
use crate::server::views;

fn require_admin(user: Option<Extension<AuthUser>>) -> Result<AuthUser, PageError> {
    match user {
        None => Err(PageError::Unauthenticated),
        Some(Extension(user)) if user.is_admin => Ok(user),
        Some(_) => Err(PageError::Forbidden),
    }
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub status: Option<String>,
    pub kind: Option<String>,
}

pub async fn dashboard(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Query(query): Query<DashboardQuery>,
) -> PageResult<Html<String>> {
    require_admin(user)?;

    let bucket = query
        .status
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(ModerationStatus::Pending);
    let kind = query
        .kind
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(ListingKind::Server);

    let stats = ModerationStats::load(&state.db_pool).await?;
    let listings = Listing::find_page(bucket, kind, 200, 0, &state.db_pool).await?;
    Ok(Html(views::admin_dashboard_page(
        &stats, bucket, kind, &listings,
    )))
}

// ============================================================================
// Moderation actions
// ============================================================================

pub async fn approve_listing(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<i64>,
) -> PageResult<Redirect> {
    require_admin(user)?;
    let listing = moderation::approve(ListingId::from_i64(id), &state.db_pool).await?;
    tracing::info!(listing_id = %listing.id, "listing approved");
    Ok(Redirect::to("/admin?status=pending"))
}

pub async fn reject_listing(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<i64>,
) -> PageResult<Redirect> {
    require_admin(user)?;
    let listing = moderation::reject(ListingId::from_i64(id), &state.db_pool).await?;
    tracing::info!(listing_id = %listing.id, "listing rejected");
    Ok(Redirect::to("/admin?status=pending"))
}

pub async fn delete_listing(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<i64>,
) -> PageResult<Redirect> {
    require_admin(user)?;
    moderation::delete(ListingId::from_i64(id), &state.db_pool).await?;
    tracing::info!(listing_id = id, "listing deleted");
    Ok(Redirect::to("/admin?status=approved"))
}

// ============================================================================
// Blog composition
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ComposeForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content_html: String,
    #[serde(default)]
    pub featured_image_url: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub publish: Option<String>,
}

pub async fn compose_form(user: Option<Extension<AuthUser>>) -> PageResult<Html<String>> {
    require_admin(user)?;
    Ok(Html(views::compose_form_page()))
}

pub async fn compose(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Form(form): Form<ComposeForm>,
) -> PageResult<Response> {
    let user = require_admin(user)?;

    if form.title.trim().is_empty() || form.content_html.trim().is_empty() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(views::compose_form_page()),
        )
            .into_response());
    }

    let author = Member::upsert_from_token(
        &user.subject,
        &user.display_name,
        user.email.as_deref(),
        user.is_admin,
        &state.db_pool,
    )
    .await?;

    let status = if form.publish.is_some() {
        PostStatus::Published
    } else {
        PostStatus::Draft
    };
    let post = Post::create(
        NewPost {
            title: form.title.trim().to_string(),
            content_html: form.content_html,
            excerpt: non_empty(form.excerpt),
            featured_image_url: non_empty(form.featured_image_url),
            author_id: Some(author.id),
            status,
            tags: normalize_list(&serde_json::Value::from(form.tags)),
        },
        &state.db_pool,
    )
    .await?;

    tracing::info!(post_id = %post.id, status = %post.status, "post composed");
    let destination = match post.status {
        PostStatus::Published => format!("/blog/{}", post.slug),
        PostStatus::Draft => "/admin".to_string(),
    };
    Ok(Redirect::to(&destination).into_response())
}

pub async fn publish_post(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Path(id): Path<i64>,
) -> PageResult<Redirect> {
    require_admin(user)?;
    match Post::publish(PostId::from_i64(id), &state.db_pool).await? {
        Some(post) => Ok(Redirect::to(&format!("/blog/{}", post.slug))),
        None => Err(PageError::NotFound),
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ============================================================================
// Image upload
// ============================================================================

#[derive(Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Upload an image to the platform's storage bucket and return its public
/// URL for use in listings and posts.
pub async fn upload_image(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    headers: HeaderMap,
    body: Bytes,
) -> PageResult<Json<UploadResponse>> {
    require_admin(user)?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let url = state.storage.upload(body.to_vec(), &content_type).await?;
    Ok(Json(UploadResponse { url }))
}
