/// Request authentication context
///
/// The transport layer carries the bearer credential in the
/// `Authorization` header, never in the argument body. This module turns
/// that header into an [`AuthContext`] which the API layer inserts into
/// request extensions for handlers to extract.
///
/// # Example
///
/// ```
/// use axum::http::{HeaderMap, HeaderValue};
/// use taskdesk_shared::auth::jwt::{create_token, Claims};
/// use taskdesk_shared::auth::middleware::authenticate;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-signing-secret-of-at-least-32-bytes";
/// let token = create_token(&Claims::new(Uuid::new_v4(), false), secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("authorization", HeaderValue::from_str(&format!("Bearer {}", token))?);
///
/// let ctx = authenticate(&headers, secret)?;
/// assert!(!ctx.actor.is_admin);
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, Claims, JwtError};
use super::permissions::Actor;

/// Authentication context added to request extensions
///
/// Carries both the derived actor identity and the raw validated claims
/// (the latter so `get_token_info` can echo issuance/expiry times).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// The authenticated caller
    pub actor: Actor,

    /// Validated credential claims
    pub claims: Claims,
}

impl AuthContext {
    /// Builds a context from validated claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            actor: Actor {
                id: claims.sub,
                is_admin: claims.is_admin,
            },
            claims,
        }
    }
}

/// Authenticates a request from its headers
///
/// Reads the `Authorization` header and validates the bearer credential.
/// An absent header is reported the same way as an empty token so callers
/// see one "missing credential" condition.
///
/// # Errors
///
/// Propagates the four-way [`JwtError`] split from token validation.
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, JwtError> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(JwtError::Missing)?;

    let claims = validate_token(presented, secret)?;
    Ok(AuthContext::from_claims(claims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_bearer_header() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id, true), SECRET).unwrap();

        let ctx = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();
        assert_eq!(ctx.actor.id, user_id);
        assert!(ctx.actor.is_admin);
        assert_eq!(ctx.claims.sub, user_id);
    }

    #[test]
    fn test_authenticate_bare_token() {
        // The Bearer prefix is optional by convention
        let token = create_token(&Claims::new(Uuid::new_v4(), false), SECRET).unwrap();
        assert!(authenticate(&headers_with(&token), SECRET).is_ok());
    }

    #[test]
    fn test_authenticate_missing_header() {
        let result = authenticate(&HeaderMap::new(), SECRET);
        assert!(matches!(result, Err(JwtError::Missing)));
    }

    #[test]
    fn test_authenticate_bad_token() {
        let result = authenticate(&headers_with("Bearer junk"), SECRET);
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }
}
