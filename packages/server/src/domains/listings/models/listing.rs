use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::normalize::normalize_list;
use crate::common::slug::generate_slug;
use crate::common::{ListingId, MemberId};

/// Listing - a server or client directory entry
///
/// List-valued fields are normalized from whatever shape the row holds
/// (array, JSON-encoded string, comma-separated string) when the row is
/// converted; see [`ListingRow`].
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub id: ListingId,
    pub kind: ListingKind,
    pub name: String,
    pub description: String,
    pub url: String,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
    pub github_url: Option<String>,
    pub twitter_url: Option<String>,
    pub tags: Vec<String>,
    pub capabilities: Vec<String>,
    pub features: Vec<String>,
    pub compatibility: Vec<String>,
    pub status: ModerationStatus,
    pub owner_id: Option<MemberId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw database row, before list-field normalization.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ListingRow {
    pub id: ListingId,
    pub kind: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
    pub github_url: Option<String>,
    pub twitter_url: Option<String>,
    pub tags: Json<Value>,
    pub capabilities: Json<Value>,
    pub features: Json<Value>,
    pub compatibility: Json<Value>,
    pub status: String,
    pub owner_id: Option<MemberId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = anyhow::Error;

    fn try_from(row: ListingRow) -> Result<Self> {
        Ok(Listing {
            id: row.id,
            kind: row.kind.parse()?,
            name: row.name,
            description: row.description,
            url: row.url,
            logo_url: row.logo_url,
            contact_email: row.contact_email,
            github_url: row.github_url,
            twitter_url: row.twitter_url,
            tags: normalize_list(&row.tags),
            capabilities: normalize_list(&row.capabilities),
            features: normalize_list(&row.features),
            compatibility: normalize_list(&row.compatibility),
            status: row.status.parse()?,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rows_into(rows: Vec<ListingRow>) -> Result<Vec<Listing>> {
    rows.into_iter().map(Listing::try_from).collect()
}

/// Input for creating a listing from the submission form.
#[derive(Debug, Clone, Default)]
pub struct NewListing {
    pub kind: ListingKind,
    pub name: String,
    pub description: String,
    pub url: String,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
    pub github_url: Option<String>,
    pub twitter_url: Option<String>,
    pub tags: Vec<String>,
    pub capabilities: Vec<String>,
    pub features: Vec<String>,
    pub compatibility: Vec<String>,
    pub owner_id: Option<MemberId>,
}

// =============================================================================
// Enums for type-safe status and kind handling
// =============================================================================

/// Listing kind enum
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    #[default]
    Server,
    Client,
}

impl ListingKind {
    /// URL path segment for this kind's browse and detail pages.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ListingKind::Server => "servers",
            ListingKind::Client => "clients",
        }
    }

    /// Browse page size differs per kind.
    pub fn default_page_size(&self) -> u32 {
        match self {
            ListingKind::Server => 9,
            ListingKind::Client => 12,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ListingKind::Server => "Server",
            ListingKind::Client => "Client",
        }
    }
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingKind::Server => write!(f, "server"),
            ListingKind::Client => write!(f, "client"),
        }
    }
}

impl std::str::FromStr for ListingKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "server" => Ok(ListingKind::Server),
            "client" => Ok(ListingKind::Client),
            _ => Err(anyhow::anyhow!("Invalid listing kind: {}", s)),
        }
    }
}

/// Moderation status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Approved => write!(f, "approved"),
            ModerationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ModerationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            "rejected" => Ok(ModerationStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid moderation status: {}", s)),
        }
    }
}

impl ModerationStatus {
    /// Approval and rejection only apply to pending submissions.
    pub fn can_moderate(&self) -> bool {
        matches!(self, ModerationStatus::Pending)
    }

    /// Deletion is only offered from the approved/rejected admin views and
    /// is irreversible. Pending records must be moderated first.
    pub fn can_delete(&self) -> bool {
        matches!(self, ModerationStatus::Approved | ModerationStatus::Rejected)
    }
}

// =============================================================================
// Derived fields
// =============================================================================

impl Listing {
    /// Slug derived from the display name; recomputed on every read, never
    /// stored.
    pub fn slug(&self) -> String {
        generate_slug(&self.name)
    }

    /// Canonical site path for this listing.
    pub fn path(&self) -> String {
        format!("/{}/{}", self.kind.path_segment(), self.slug())
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Listing {
    /// Find a listing by ID regardless of status (admin views)
    pub async fn find_by_id(id: ListingId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, ListingRow>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(Listing::try_from).transpose()
    }

    /// Find an approved listing by ID (public detail pages)
    pub async fn find_approved_by_id(id: ListingId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, ListingRow>(
            "SELECT * FROM listings WHERE id = $1 AND status = 'approved'",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        row.map(Listing::try_from).transpose()
    }

    /// Page of listings in one status/kind bucket, newest first
    pub async fn find_page(
        status: ModerationStatus,
        kind: ListingKind,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            "SELECT * FROM listings
             WHERE status = $1 AND kind = $2
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4",
        )
        .bind(status.to_string())
        .bind(kind.to_string())
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        rows_into(rows)
    }

    /// Count listings in one status/kind bucket (for pagination and stats)
    pub async fn count(status: ModerationStatus, kind: ListingKind, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM listings WHERE status = $1 AND kind = $2",
        )
        .bind(status.to_string())
        .bind(kind.to_string())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// All approved listings of a kind, newest first.
    ///
    /// Used for slug matching (slugs are computed, so matching needs the
    /// candidate names) and for the sitemap.
    pub async fn find_all_approved(kind: ListingKind, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            "SELECT * FROM listings
             WHERE status = 'approved' AND kind = $1
             ORDER BY created_at DESC",
        )
        .bind(kind.to_string())
        .fetch_all(pool)
        .await?;
        rows_into(rows)
    }

    /// Approved listings whose name contains a fragment (fuzzy fallback)
    pub async fn search_approved_by_name(
        kind: ListingKind,
        fragment: &str,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            "SELECT * FROM listings
             WHERE status = 'approved' AND kind = $1 AND name ILIKE '%' || $2 || '%'
             ORDER BY created_at DESC",
        )
        .bind(kind.to_string())
        .bind(fragment)
        .fetch_all(pool)
        .await?;
        rows_into(rows)
    }

    /// Approved listings matching a caller-built ILIKE pattern (last-resort
    /// fallback with hyphens widened to wildcards)
    pub async fn search_approved_by_pattern(
        kind: ListingKind,
        pattern: &str,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            "SELECT * FROM listings
             WHERE status = 'approved' AND kind = $1 AND name ILIKE $2
             ORDER BY created_at DESC",
        )
        .bind(kind.to_string())
        .bind(pattern)
        .fetch_all(pool)
        .await?;
        rows_into(rows)
    }

    /// Create a new listing; submissions always start out pending
    pub async fn create(input: NewListing, pool: &PgPool) -> Result<Self> {
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            INSERT INTO listings (
                kind,
                name,
                description,
                url,
                logo_url,
                contact_email,
                github_url,
                twitter_url,
                tags,
                capabilities,
                features,
                compatibility,
                status,
                owner_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'pending', $13)
            RETURNING *
            "#,
        )
        .bind(input.kind.to_string())
        .bind(input.name)
        .bind(input.description)
        .bind(input.url)
        .bind(input.logo_url)
        .bind(input.contact_email)
        .bind(input.github_url)
        .bind(input.twitter_url)
        .bind(Json(Value::from(input.tags)))
        .bind(Json(Value::from(input.capabilities)))
        .bind(Json(Value::from(input.features)))
        .bind(Json(Value::from(input.compatibility)))
        .bind(input.owner_id)
        .fetch_one(pool)
        .await?;
        row.try_into()
    }

    /// Move a pending listing to approved or rejected.
    ///
    /// Single conditional write keyed by id; returns None when the listing
    /// does not exist or is no longer pending (last write wins, no further
    /// conflict detection).
    pub async fn moderate(
        id: ListingId,
        to: ModerationStatus,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            UPDATE listings
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(to.to_string())
        .bind(id)
        .fetch_optional(pool)
        .await?;
        row.map(Listing::try_from).transpose()
    }

    /// Delete an already-moderated listing. Irreversible.
    ///
    /// Returns false when nothing was deleted (unknown id, or the listing is
    /// still pending).
    pub async fn delete_moderated(id: ListingId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM listings WHERE id = $1 AND status IN ('approved', 'rejected')",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Most recent approved listings across both kinds (home page)
    pub async fn find_recent_approved(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            "SELECT * FROM listings
             WHERE status = 'approved'
             ORDER BY created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;
        rows_into(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn row_with_tags(tags: Value) -> ListingRow {
        ListingRow {
            id: ListingId::from_i64(1),
            kind: "server".to_string(),
            name: "Test Server".to_string(),
            description: "desc".to_string(),
            url: "https://example.com".to_string(),
            logo_url: None,
            contact_email: None,
            github_url: None,
            twitter_url: None,
            tags: Json(tags),
            capabilities: Json(Value::Null),
            features: Json(Value::Null),
            compatibility: Json(Value::Null),
            status: "approved".to_string(),
            owner_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion_normalizes_string_tags() {
        let listing = Listing::try_from(row_with_tags(Value::from("a, b,c"))).unwrap();
        assert_eq!(listing.tags, vec!["a", "b", "c"]);
        assert!(listing.capabilities.is_empty());
    }

    #[test]
    fn test_row_conversion_rejects_unknown_status() {
        let mut row = row_with_tags(Value::Null);
        row.status = "banana".to_string();
        assert!(Listing::try_from(row).is_err());
    }

    #[test]
    fn test_slug_and_path_are_derived_from_name() {
        let listing = Listing::try_from(row_with_tags(Value::Null)).unwrap();
        assert_eq!(listing.slug(), "test-server");
        assert_eq!(listing.path(), "/servers/test-server");
    }

    #[test]
    fn test_moderation_transitions() {
        assert!(ModerationStatus::Pending.can_moderate());
        assert!(!ModerationStatus::Approved.can_moderate());
        assert!(!ModerationStatus::Rejected.can_moderate());

        assert!(!ModerationStatus::Pending.can_delete());
        assert!(ModerationStatus::Approved.can_delete());
        assert!(ModerationStatus::Rejected.can_delete());
    }

    #[test]
    fn test_kind_defaults() {
        assert_eq!(ListingKind::Server.default_page_size(), 9);
        assert_eq!(ListingKind::Client.default_page_size(), 12);
        assert_eq!(ListingKind::Client.path_segment(), "clients");
    }
}
