//! Blog browse and detail pages.

use axum::extract::{Extension, Path, Query};
use axum::response::Html;

use crate::common::pagination::{page_items, total_pages, PageParams};
use crate::domains::posts::models::Post;
use crate::server::app::AppState;
use crate::server::error::{PageError, PageResult};
use crate::server::views;

use super::listings::PageQuery;

const BLOG_PAGE_SIZE: u32 = 6;

pub async fn index(
    Extension(state): Extension<AppState>,
    Query(query): Query<PageQuery>,
) -> PageResult<Html<String>> {
    let params = PageParams::from_query(query.page.as_deref(), query.size.as_deref(), BLOG_PAGE_SIZE);
    let total = Post::count_published(&state.db_pool).await?;
    let posts = Post::find_published(params.limit(), params.offset(), &state.db_pool).await?;

    let pages = total_pages(total, params.size);
    let controls =
        views::pagination_controls(&page_items(params.page, pages), params.page, pages, "/blog");
    Ok(Html(views::blog_index_page(&posts, &controls)))
}

pub async fn detail(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
) -> PageResult<Html<String>> {
    match Post::find_published_by_slug(&slug, &state.db_pool).await? {
        Some(post) => Ok(Html(views::blog_post_page(&post))),
        None => Err(PageError::NotFound),
    }
}
