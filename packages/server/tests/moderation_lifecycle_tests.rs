//! Moderation state machine against a real database.
//!
//! Count assertions use the client kind only; the other tests in this
//! binary stick to servers so concurrent test threads cannot disturb the
//! client-bucket counts mid-assertion.

mod common;

use common::{create_approved_listing, create_pending_listing, TestHarness};
use directory_core::domains::listings::models::{Listing, ListingKind, ModerationStatus};
use directory_core::domains::listings::moderation::{self, ModerationStats};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn approving_moves_listing_out_of_pending_and_bumps_counts(ctx: &TestHarness) {
    let before = ModerationStats::load(&ctx.db_pool).await.unwrap();

    let id = create_pending_listing(&ctx.db_pool, ListingKind::Client, "Lifecycle Client A")
        .await
        .unwrap();

    let approved = moderation::approve(id, &ctx.db_pool).await.unwrap();
    assert_eq!(approved.status, ModerationStatus::Approved);

    // Gone from the pending bucket
    let pending = Listing::find_page(
        ModerationStatus::Pending,
        ListingKind::Client,
        500,
        0,
        &ctx.db_pool,
    )
    .await
    .unwrap();
    assert!(pending.iter().all(|l| l.id != id));

    // Counts refresh by re-query
    let after = ModerationStats::load(&ctx.db_pool).await.unwrap();
    assert!(after.approved_clients >= before.approved_clients + 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejecting_is_terminal_for_moderation(ctx: &TestHarness) {
    let id = create_pending_listing(&ctx.db_pool, ListingKind::Server, "Lifecycle Server B")
        .await
        .unwrap();

    let rejected = moderation::reject(id, &ctx.db_pool).await.unwrap();
    assert_eq!(rejected.status, ModerationStatus::Rejected);

    // No second moderation pass: the conditional write finds no pending row
    assert!(moderation::approve(id, &ctx.db_pool).await.is_err());
    assert!(moderation::reject(id, &ctx.db_pool).await.is_err());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deleting_requires_prior_moderation(ctx: &TestHarness) {
    let pending_id =
        create_pending_listing(&ctx.db_pool, ListingKind::Server, "Lifecycle Server C")
            .await
            .unwrap();

    // Pending records cannot be deleted directly
    assert!(moderation::delete(pending_id, &ctx.db_pool).await.is_err());
    assert!(Listing::find_by_id(pending_id, &ctx.db_pool)
        .await
        .unwrap()
        .is_some());

    // Approved records can, and the deletion is permanent
    let approved_id =
        create_approved_listing(&ctx.db_pool, ListingKind::Server, "Lifecycle Server D")
            .await
            .unwrap();
    moderation::delete(approved_id, &ctx.db_pool).await.unwrap();
    assert!(Listing::find_by_id(approved_id, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());

    // A second delete has nothing to act on
    assert!(moderation::delete(approved_id, &ctx.db_pool).await.is_err());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn approved_listings_are_publicly_visible_pending_ones_are_not(ctx: &TestHarness) {
    let pending_id =
        create_pending_listing(&ctx.db_pool, ListingKind::Server, "Lifecycle Server E")
            .await
            .unwrap();
    let approved_id =
        create_approved_listing(&ctx.db_pool, ListingKind::Server, "Lifecycle Server F")
            .await
            .unwrap();

    assert!(Listing::find_approved_by_id(pending_id, &ctx.db_pool)
        .await
        .unwrap()
        .is_none());
    assert!(Listing::find_approved_by_id(approved_id, &ctx.db_pool)
        .await
        .unwrap()
        .is_some());
}
