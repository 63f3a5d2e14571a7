//! Listing browse, detail, and submission pages.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use serde_json::Value;

use crate::common::normalize::normalize_list;
use crate::common::pagination::{page_items, total_pages, PageParams};
use crate::domains::listings::models::{Listing, ListingKind, ModerationStatus, NewListing};
use crate::domains::listings::moderation::ModerationStats;
use crate::domains::listings::resolver::{resolve_listing, Resolved};
use crate::domains::member::models::Member;
use crate::server::app::AppState;
use crate::server::error::{PageError, PageResult};
use crate::server::middleware::AuthUser;
use crate::server::views;
use crate::server::views::SubmitFormState;

/// Raw pagination query parameters; anything unparseable falls back to
/// defaults rather than erroring.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub size: Option<String>,
}

// ============================================================================
// Home
// ============================================================================

pub async fn home(Extension(state): Extension<AppState>) -> PageResult<Html<String>> {
    let stats = ModerationStats::load(&state.db_pool).await?;
    let recent = Listing::find_recent_approved(6, &state.db_pool).await?;
    Ok(Html(views::home_page(
        stats.approved_servers,
        stats.approved_clients,
        &recent,
    )))
}

// ============================================================================
// Browse
// ============================================================================

pub async fn browse_servers(
    Extension(state): Extension<AppState>,
    Query(query): Query<PageQuery>,
) -> PageResult<Html<String>> {
    browse(ListingKind::Server, state, query).await
}

pub async fn browse_clients(
    Extension(state): Extension<AppState>,
    Query(query): Query<PageQuery>,
) -> PageResult<Html<String>> {
    browse(ListingKind::Client, state, query).await
}

async fn browse(kind: ListingKind, state: AppState, query: PageQuery) -> PageResult<Html<String>> {
    let params = PageParams::from_query(
        query.page.as_deref(),
        query.size.as_deref(),
        kind.default_page_size(),
    );
    let total = Listing::count(ModerationStatus::Approved, kind, &state.db_pool).await?;
    let listings = Listing::find_page(
        ModerationStatus::Approved,
        kind,
        params.limit(),
        params.offset(),
        &state.db_pool,
    )
    .await?;

    let pages = total_pages(total, params.size);
    let controls = views::pagination_controls(
        &page_items(params.page, pages),
        params.page,
        pages,
        &format!("/{}", kind.path_segment()),
    );
    Ok(Html(views::browse_page(kind, &listings, &controls, total)))
}

// ============================================================================
// Detail
// ============================================================================

pub async fn server_detail(
    Extension(state): Extension<AppState>,
    Path(segment): Path<String>,
) -> PageResult<Response> {
    detail(ListingKind::Server, state, segment).await
}

pub async fn client_detail(
    Extension(state): Extension<AppState>,
    Path(segment): Path<String>,
) -> PageResult<Response> {
    detail(ListingKind::Client, state, segment).await
}

async fn detail(kind: ListingKind, state: AppState, segment: String) -> PageResult<Response> {
    match resolve_listing(kind, &segment, &state.db_pool).await {
        Resolved::Found(listing) => Ok(Html(views::listing_detail_page(&listing)).into_response()),
        Resolved::Redirect { location, .. } => Ok(canonical_redirect(&location)),
        Resolved::NotFound => Err(PageError::NotFound),
    }
}

/// 301 to the canonical listing URL. `Redirect::permanent` would send 308,
/// which not all crawlers treat as a plain moved-permanently.
fn canonical_redirect(location: &str) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(axum::http::header::LOCATION, location.to_string())],
    )
        .into_response()
}

// ============================================================================
// Submission
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub twitter_url: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub capabilities: String,
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub compatibility: String,
}

pub async fn submit_form(user: Option<Extension<AuthUser>>) -> PageResult<Html<String>> {
    if user.is_none() {
        return Err(PageError::Unauthenticated);
    }
    Ok(Html(views::submit_form_page(&SubmitFormState::default())))
}

pub async fn submit(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Form(form): Form<SubmitForm>,
) -> PageResult<Response> {
    let Some(Extension(user)) = user else {
        return Err(PageError::Unauthenticated);
    };

    let errors = validate_submission(&form);
    if !errors.is_empty() {
        let form_state = SubmitFormState {
            kind: form.kind,
            name: form.name,
            description: form.description,
            url: form.url,
            tags: form.tags,
            errors,
        };
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(views::submit_form_page(&form_state)),
        )
            .into_response());
    }

    let owner = Member::upsert_from_token(
        &user.subject,
        &user.display_name,
        user.email.as_deref(),
        user.is_admin,
        &state.db_pool,
    )
    .await?;

    let listing = Listing::create(
        NewListing {
            kind: form.kind.parse().unwrap_or_default(),
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            url: form.url.trim().to_string(),
            logo_url: optional(form.logo_url),
            contact_email: optional(form.contact_email),
            github_url: optional(form.github_url),
            twitter_url: optional(form.twitter_url),
            tags: split_list(&form.tags),
            capabilities: split_list(&form.capabilities),
            features: split_list(&form.features),
            compatibility: split_list(&form.compatibility),
            owner_id: Some(owner.id),
        },
        &state.db_pool,
    )
    .await?;

    tracing::info!(listing_id = %listing.id, "new listing submitted for review");
    Ok(Html(views::submit_thanks_page(&listing)).into_response())
}

/// Field-level validation; a non-empty result blocks the submission.
fn validate_submission(form: &SubmitForm) -> Vec<(String, String)> {
    let mut errors = Vec::new();
    if form.name.trim().is_empty() {
        errors.push(("name".to_string(), "Name is required".to_string()));
    }
    if form.description.trim().is_empty() {
        errors.push((
            "description".to_string(),
            "Description is required".to_string(),
        ));
    }
    match url::Url::parse(form.url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => errors.push((
            "url".to_string(),
            "A valid http(s) URL is required".to_string(),
        )),
    }
    errors
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Comma-separated form input shares the normalizer's splitting rules.
fn split_list(value: &str) -> Vec<String> {
    normalize_list(&Value::from(value))
}
