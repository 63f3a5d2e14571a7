//! Admin moderation actions and aggregate stats.
//!
//! The state machine is small and one-way: pending submissions are approved
//! or rejected, and only already-moderated listings can be deleted. There is
//! no path back to pending. Transitions are single conditional writes; when
//! two admins race on the same record the last write wins.

use anyhow::{bail, Result};
use futures::try_join;
use serde::Serialize;
use sqlx::PgPool;

use crate::common::ListingId;

use super::models::{Listing, ListingKind, ModerationStatus};

/// Approve a pending listing, making it publicly visible.
pub async fn approve(id: ListingId, pool: &PgPool) -> Result<Listing> {
    match Listing::moderate(id, ModerationStatus::Approved, pool).await? {
        Some(listing) => Ok(listing),
        None => bail!("Listing {} is not pending (already moderated or unknown)", id),
    }
}

/// Reject a pending listing.
pub async fn reject(id: ListingId, pool: &PgPool) -> Result<Listing> {
    match Listing::moderate(id, ModerationStatus::Rejected, pool).await? {
        Some(listing) => Ok(listing),
        None => bail!("Listing {} is not pending (already moderated or unknown)", id),
    }
}

/// Permanently delete an approved or rejected listing.
pub async fn delete(id: ListingId, pool: &PgPool) -> Result<()> {
    if !Listing::delete_moderated(id, pool).await? {
        bail!("Listing {} cannot be deleted (unknown or still pending)", id);
    }
    Ok(())
}

/// Listing counts per status/kind bucket, shown on the admin dashboard and
/// refreshed after every moderation action.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModerationStats {
    pub pending_servers: i64,
    pub pending_clients: i64,
    pub approved_servers: i64,
    pub approved_clients: i64,
    pub rejected_servers: i64,
    pub rejected_clients: i64,
}

impl ModerationStats {
    /// Count all six status/kind buckets.
    ///
    /// The counts are independent queries, so they are dispatched
    /// concurrently and joined rather than awaited one by one.
    pub async fn load(pool: &PgPool) -> Result<Self> {
        use ListingKind::{Client, Server};
        use ModerationStatus::{Approved, Pending, Rejected};

        let (
            pending_servers,
            pending_clients,
            approved_servers,
            approved_clients,
            rejected_servers,
            rejected_clients,
        ) = try_join!(
            Listing::count(Pending, Server, pool),
            Listing::count(Pending, Client, pool),
            Listing::count(Approved, Server, pool),
            Listing::count(Approved, Client, pool),
            Listing::count(Rejected, Server, pool),
            Listing::count(Rejected, Client, pool),
        )?;

        Ok(ModerationStats {
            pending_servers,
            pending_clients,
            approved_servers,
            approved_clients,
            rejected_servers,
            rejected_clients,
        })
    }

    pub fn pending(&self) -> i64 {
        self.pending_servers + self.pending_clients
    }

    pub fn approved(&self) -> i64 {
        self.approved_servers + self.approved_clients
    }

    pub fn rejected(&self) -> i64 {
        self.rejected_servers + self.rejected_clients
    }
}
