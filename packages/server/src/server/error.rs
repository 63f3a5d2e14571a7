//! Page-boundary error handling.
//!
//! Nothing here is fatal to the process: backend failures render an inline
//! "failed to load" panel, unknown paths render the not-found page, and
//! authorization failures either bounce to login or render an access-denied
//! panel. No automatic retries anywhere; the panels carry a manual
//! try-again affordance.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use super::views;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("not found")]
    NotFound,

    #[error("authentication required")]
    Unauthenticated,

    #[error("admin access required")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => {
                (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response()
            }
            PageError::Unauthenticated => Redirect::to("/login").into_response(),
            PageError::Forbidden => {
                (StatusCode::FORBIDDEN, Html(views::access_denied_page())).into_response()
            }
            PageError::Internal(e) => {
                tracing::error!(error = ?e, "page render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::load_failed_page()),
                )
                    .into_response()
            }
        }
    }
}

/// Convenience alias for page handlers.
pub type PageResult<T> = Result<T, PageError>;
