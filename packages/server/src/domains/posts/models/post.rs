use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::normalize::normalize_list;
use crate::common::slug::generate_slug;
use crate::common::{MemberId, PostId};

/// BlogPost - a published or draft article
///
/// Unlike listings, post slugs are stored: they are part of the published
/// URL and must survive title edits.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub excerpt: Option<String>,
    pub featured_image_url: Option<String>,
    pub author_id: Option<MemberId>,
    pub status: PostStatus,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw database row, before list-field normalization.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: PostId,
    pub title: String,
    pub slug: String,
    pub content_html: String,
    pub excerpt: Option<String>,
    pub featured_image_url: Option<String>,
    pub author_id: Option<MemberId>,
    pub status: String,
    pub tags: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = anyhow::Error;

    fn try_from(row: PostRow) -> Result<Self> {
        Ok(Post {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content_html: row.content_html,
            excerpt: row.excerpt,
            featured_image_url: row.featured_image_url,
            author_id: row.author_id,
            status: row.status.parse()?,
            tags: normalize_list(&row.tags),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rows_into(rows: Vec<PostRow>) -> Result<Vec<Post>> {
    rows.into_iter().map(Post::try_from).collect()
}

/// Post status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            _ => Err(anyhow::anyhow!("Invalid post status: {}", s)),
        }
    }
}

/// Input for composing a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content_html: String,
    pub excerpt: Option<String>,
    pub featured_image_url: Option<String>,
    pub author_id: Option<MemberId>,
    pub status: PostStatus,
    pub tags: Vec<String>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Post {
    /// Page of published posts, newest first
    pub async fn find_published(limit: i64, offset: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT * FROM posts
             WHERE status = 'published'
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
        rows_into(rows)
    }

    /// Count published posts (for pagination)
    pub async fn count_published(pool: &PgPool) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE status = 'published'")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Find a published post by its stored slug
    pub async fn find_published_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT * FROM posts WHERE slug = $1 AND status = 'published'",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;
        row.map(Post::try_from).transpose()
    }

    /// All published posts (for the sitemap)
    pub async fn find_all_published(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT * FROM posts WHERE status = 'published' ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        rows_into(rows)
    }

    /// Whether a slug is already taken
    pub async fn slug_exists(slug: &str, pool: &PgPool) -> Result<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
                .bind(slug)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Create a post; the slug is derived from the title at creation time
    /// and stored unchanged from then on. Colliding titles get a numeric
    /// suffix so the slug UNIQUE constraint never fires.
    pub async fn create(input: NewPost, pool: &PgPool) -> Result<Self> {
        let base = generate_slug(&input.title);
        let mut slug = base.clone();
        let mut suffix = 2;
        while Self::slug_exists(&slug, pool).await? {
            slug = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (
                title,
                slug,
                content_html,
                excerpt,
                featured_image_url,
                author_id,
                status,
                tags
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(input.title)
        .bind(slug)
        .bind(input.content_html)
        .bind(input.excerpt)
        .bind(input.featured_image_url)
        .bind(input.author_id)
        .bind(input.status.to_string())
        .bind(Json(Value::from(input.tags)))
        .fetch_one(pool)
        .await?;
        row.try_into()
    }

    /// Publish a draft
    pub async fn publish(id: PostId, pool: &PgPool) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET status = 'published', updated_at = NOW()
            WHERE id = $1 AND status = 'draft'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        row.map(Post::try_from).transpose()
    }
}
