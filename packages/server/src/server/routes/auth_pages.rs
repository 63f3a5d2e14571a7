//! Login page and OAuth callback.
//!
//! Sign-in itself happens at the hosted identity provider; the callback
//! just verifies the returned token and stores it in the session cookie so
//! later requests authenticate through the middleware.

use axum::extract::{Extension, Query};
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::server::app::AppState;
use crate::server::error::{PageError, PageResult};
use crate::server::middleware::SESSION_COOKIE;
use crate::server::views;

pub async fn login(Extension(state): Extension<AppState>) -> Html<String> {
    Html(views::login_page(&state.login_url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub token: Option<String>,
}

pub async fn callback(
    Extension(state): Extension<AppState>,
    Query(query): Query<CallbackQuery>,
) -> PageResult<Response> {
    let Some(token) = query.token else {
        return Err(PageError::Unauthenticated);
    };
    // Reject forged or expired tokens before trusting them with a cookie
    if state.jwt_service.verify_token(&token).is_err() {
        return Err(PageError::Unauthenticated);
    }

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age=86400",
        SESSION_COOKIE, token
    );
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/")).into_response())
}

pub async fn logout() -> Response {
    let cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    (AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/")).into_response()
}
