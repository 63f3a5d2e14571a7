use std::sync::Arc;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::debug;

use crate::domains::auth::JwtService;

/// Session cookie set by the OAuth callback.
pub const SESSION_COOKIE: &str = "session";

/// Authenticated user information from a verified token.
///
/// Identity travels with the request as an extension; there is no global
/// session state anywhere in the process.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

/// JWT authentication middleware
///
/// Reads the token from the Authorization header or the session cookie,
/// verifies it, and adds AuthUser to request extensions. Without a valid
/// token the request continues unauthenticated (public access).
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_user = extract_auth_user(&request, &jwt_service);

    if let Some(user) = auth_user {
        debug!(
            "Authenticated user: {} (admin: {})",
            user.subject, user.is_admin
        );
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify a token from the request
fn extract_auth_user(request: &Request<Body>, jwt_service: &JwtService) -> Option<AuthUser> {
    let token = bearer_token(request).or_else(|| cookie_token(request))?;
    let claims = jwt_service.verify_token(token).ok()?;

    let display_name = claims
        .name
        .clone()
        .or_else(|| claims.email.clone())
        .unwrap_or_else(|| claims.sub.clone());
    let is_admin = claims.is_admin();

    Some(AuthUser {
        subject: claims.sub,
        display_name,
        email: claims.email,
        is_admin,
    })
}

fn bearer_token<'a>(request: &'a Request<Body>) -> Option<&'a str> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    // Handle both "Bearer <token>" and raw token
    Some(auth_str.strip_prefix("Bearer ").unwrap_or(auth_str))
}

fn cookie_token<'a>(request: &'a Request<Body>) -> Option<&'a str> {
    let cookie_header = request.headers().get("cookie")?.to_str().ok()?;
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test_secret", "test_issuer".to_string())
    }

    fn admin_token(service: &JwtService) -> String {
        service
            .create_token(
                "user-1",
                Some("Ada".to_string()),
                None,
                Some("admin".to_string()),
            )
            .unwrap()
    }

    #[test]
    fn test_extract_token_from_bearer_header() {
        let service = service();
        let token = admin_token(&service);

        let request = Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let user = extract_auth_user(&request, &service).unwrap();
        assert_eq!(user.subject, "user-1");
        assert_eq!(user.display_name, "Ada");
        assert!(user.is_admin);
    }

    #[test]
    fn test_extract_token_from_session_cookie() {
        let service = service();
        let token = admin_token(&service);

        let request = Request::builder()
            .header("cookie", format!("theme=dark; session={}", token))
            .body(Body::empty())
            .unwrap();

        let user = extract_auth_user(&request, &service);
        assert!(user.is_some());
    }

    #[test]
    fn test_no_auth() {
        let service = service();
        let request = Request::builder().body(Body::empty()).unwrap();
        assert!(extract_auth_user(&request, &service).is_none());
    }

    #[test]
    fn test_invalid_token() {
        let service = service();
        let request = Request::builder()
            .header("authorization", "Bearer invalid_token")
            .body(Body::empty())
            .unwrap();
        assert!(extract_auth_user(&request, &service).is_none());
    }

    #[test]
    fn test_admin_flag_and_email_both_survive_extraction() {
        let service = service();
        let token = service
            .create_token(
                "user-5",
                None,
                Some("ops@example.com".to_string()),
                Some("admin".to_string()),
            )
            .unwrap();
        let request = Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let user = extract_auth_user(&request, &service).unwrap();
        assert!(user.is_admin);
        assert_eq!(user.email.as_deref(), Some("ops@example.com"));
        assert_eq!(user.display_name, "ops@example.com");
    }

    #[test]
    fn test_display_name_falls_back_to_subject() {
        let service = service();
        let token = service.create_token("user-2", None, None, None).unwrap();
        let request = Request::builder()
            .header("authorization", token)
            .body(Body::empty())
            .unwrap();

        let user = extract_auth_user(&request, &service).unwrap();
        assert_eq!(user.display_name, "user-2");
        assert!(!user.is_admin);
    }
}
