//! Admin token middleware
//!
//! Every path under `/api/admin` requires the configured `ADMIN_TOKEN`,
//! sent either as `X-Admin-Token: <token>` or `Authorization: Bearer <token>`.
//! Without a configured token the admin API rejects every request.
//!
//! Rejections are always a bare 401; the response never says whether the
//! token was missing or wrong.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;
use shared::AppError;

use crate::core::ServerState;
use crate::security_log;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";
const ADMIN_PREFIX: &str = "/api/admin";

fn is_admin_path(path: &str) -> bool {
    path == ADMIN_PREFIX || path.starts_with("/api/admin/")
}

/// Token from `X-Admin-Token`, falling back to a Bearer authorization header
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(token) = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token);
    }

    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Compare without short-circuiting on the first differing byte
fn tokens_match(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    let mut diff = a.len() ^ b.len();
    for (i, &byte) in b.iter().enumerate() {
        diff |= usize::from(byte ^ a.get(i).copied().unwrap_or(0));
    }
    diff == 0
}

pub async fn require_admin(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS || !is_admin_path(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let Some(expected) = state.config.admin_token.as_deref() else {
        security_log!("WARN", "admin_disabled", uri = req.uri().path().to_string());
        return Err(AppError::unauthorized());
    };

    let rejection = match extract_token(req.headers()) {
        Some(given) if tokens_match(given, expected) => None,
        Some(_) => Some("admin_token_rejected"),
        None => Some("admin_token_missing"),
    };

    match rejection {
        None => Ok(next.run(req).await),
        Some(event) => {
            security_log!("WARN", event, uri = req.uri().path().to_string());
            Err(AppError::unauthorized())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_admin_paths() {
        assert!(is_admin_path("/api/admin"));
        assert!(is_admin_path("/api/admin/products/3"));
        assert!(!is_admin_path("/api/administrator"));
        assert!(!is_admin_path("/api/products"));
    }

    #[test]
    fn test_extract_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(http::header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(extract_token(&headers), Some("abc"));

        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static("xyz"));
        assert_eq!(extract_token(&headers), Some("xyz"));

        let mut basic = HeaderMap::new();
        basic.insert(http::header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_token(&basic), None);
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("s3cret", "s3cret"));
        assert!(!tokens_match("s3cre", "s3cret"));
        assert!(!tokens_match("s3cretx", "s3cret"));
        assert!(!tokens_match("", "s3cret"));
        assert!(!tokens_match("S3cret", "s3cret"));
    }
}
