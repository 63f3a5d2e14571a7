use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::MemberId;

/// Member - a local row for an account managed by the hosted identity
/// provider, keyed by its stable subject claim. Listing owners and post
/// authors reference this.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Member {
    pub id: MemberId,
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Get or create the member row for a verified token.
    ///
    /// Profile fields mirror the latest token; the admin flag follows the
    /// provider's role claim.
    pub async fn upsert_from_token(
        subject: &str,
        display_name: &str,
        email: Option<&str>,
        is_admin: bool,
        pool: &PgPool,
    ) -> Result<Self> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (subject, display_name, email, is_admin)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subject) DO UPDATE
            SET display_name = EXCLUDED.display_name,
                email = EXCLUDED.email,
                is_admin = EXCLUDED.is_admin
            RETURNING *
            "#,
        )
        .bind(subject)
        .bind(display_name)
        .bind(email)
        .bind(is_admin)
        .fetch_one(pool)
        .await?;
        Ok(member)
    }
}
