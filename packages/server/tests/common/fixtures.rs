//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use directory_core::common::ListingId;
use directory_core::domains::listings::models::{Listing, ListingKind, NewListing};
use directory_core::domains::listings::moderation;
use sqlx::PgPool;

/// Create a pending listing submission
pub async fn create_pending_listing(
    pool: &PgPool,
    kind: ListingKind,
    name: &str,
) -> Result<ListingId> {
    let listing = Listing::create(
        NewListing {
            kind,
            name: name.to_string(),
            description: format!("{} description", name),
            url: "https://example.com".to_string(),
            tags: vec!["test".to_string()],
            ..Default::default()
        },
        pool,
    )
    .await?;
    Ok(listing.id)
}

/// Create a listing and approve it, as an admin would
pub async fn create_approved_listing(
    pool: &PgPool,
    kind: ListingKind,
    name: &str,
) -> Result<ListingId> {
    let id = create_pending_listing(pool, kind, name).await?;
    moderation::approve(id, pool).await?;
    Ok(id)
}
