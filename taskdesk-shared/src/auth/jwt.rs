/// JWT token generation and validation
///
/// This module implements the bearer credential for TaskDesk. Tokens are
/// signed with HS256 (HMAC-SHA256) and carry the subject user id plus the
/// admin role flag. They are never persisted; a credential is reconstructed
/// entirely by verifying the signature over its own claims.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Lifetime**: 24 hours from issuance (configurable at the call site)
/// - **Validation**: signature, expiration, not-before, and issuer checks
/// - **Secret Management**: the symmetric key comes from configuration and
///   should be at least 32 bytes
///
/// # Failure modes
///
/// Validation failures are split into four conditions a caller can branch
/// on: missing input, malformed encoding, signature mismatch, and expiry.
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-signing-secret-of-at-least-32-bytes";
///
/// let token = create_token(&Claims::new(user_id, false), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// assert!(!claims.is_admin);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped into every token
pub const ISSUER: &str = "taskdesk";

/// Default credential lifetime
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Error type for token operations
///
/// The validation variants are deliberately distinct: callers branch on
/// whether a credential was absent, unreadable, forged, or stale.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// No token was presented (empty or whitespace-only input)
    #[error("token is required")]
    Missing,

    /// The presented string is not a decodable token
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The signature does not verify against the configured secret
    #[error("token signature mismatch")]
    BadSignature,

    /// The token's expiry window has passed
    #[error("token has expired")]
    Expired,

    /// Failed to sign a new token
    #[error("failed to create token: {0}")]
    Creation(String),
}

/// JWT claims carried by a TaskDesk credential
///
/// # Standard claims
///
/// - `sub`: subject user id
/// - `iss`: always `"taskdesk"`
/// - `iat` / `exp` / `nbf`: Unix timestamps
///
/// # Custom claims
///
/// - `is_admin`: role flag copied from the user record at issuance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Role flag at issuance time
    pub is_admin: bool,

    /// Issuer - always "taskdesk"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims with the default 24-hour lifetime
    pub fn new(user_id: Uuid, is_admin: bool) -> Self {
        Self::with_ttl(user_id, is_admin, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    /// Creates claims with a custom lifetime
    ///
    /// # Example
    ///
    /// ```
    /// use taskdesk_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::with_ttl(Uuid::new_v4(), true, Duration::hours(1));
    /// assert!(!claims.is_expired());
    /// ```
    pub fn with_ttl(user_id: Uuid, is_admin: bool, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            is_admin,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks whether the expiry window has passed
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Time remaining until expiry, if any
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Signs claims into a token string
///
/// # Errors
///
/// Returns `JwtError::Creation` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::Creation(e.to_string()))
}

/// Validates a presented credential and extracts its claims
///
/// A leading `Bearer ` prefix, as carried by the transport-level
/// Authorization header, is stripped before verification.
///
/// Verifies:
/// - the input is non-empty
/// - the token decodes structurally
/// - the signature matches the configured secret
/// - the issuer is `"taskdesk"`
/// - `exp` has not passed and `nbf` has
///
/// # Errors
///
/// - `JwtError::Missing` for empty input
/// - `JwtError::Malformed` for undecodable input or foreign issuers
/// - `JwtError::BadSignature` when the signature does not verify
/// - `JwtError::Expired` when the token is stale
pub fn validate_token(presented: &str, secret: &str) -> Result<Claims, JwtError> {
    let trimmed = presented.trim();
    if trimmed.is_empty() {
        return Err(JwtError::Missing);
    }

    let token = trimmed.strip_prefix("Bearer ").unwrap_or(trimmed);

    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            ErrorKind::InvalidSignature => JwtError::BadSignature,
            _ => JwtError::Malformed(e.to_string()),
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, true);

        assert_eq!(claims.sub, user_id);
        assert!(claims.is_admin);
        assert_eq!(claims.iss, ISSUER);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_custom_ttl() {
        let claims = Claims::with_ttl(Uuid::new_v4(), false, Duration::hours(1));

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500);
        assert!(time_left.num_seconds() <= 3600);
    }

    #[test]
    fn test_create_and_validate_roundtrip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, true);
        let token = create_token(&claims, SECRET).expect("should create token");

        let validated = validate_token(&token, SECRET).expect("should validate token");
        assert_eq!(validated.sub, user_id);
        assert!(validated.is_admin);
        assert_eq!(validated.iss, ISSUER);
    }

    #[test]
    fn test_validate_strips_bearer_prefix() {
        let claims = Claims::new(Uuid::new_v4(), false);
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&format!("Bearer {}", token), SECRET).unwrap();
        assert_eq!(validated.sub, claims.sub);
    }

    #[test]
    fn test_validate_empty_input() {
        assert!(matches!(validate_token("", SECRET), Err(JwtError::Missing)));
        assert!(matches!(
            validate_token("   ", SECRET),
            Err(JwtError::Missing)
        ));
    }

    #[test]
    fn test_validate_garbage_input() {
        let result = validate_token("not-a-token", SECRET);
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), false);
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "another-secret-key-of-32-bytes!!");
        assert!(matches!(result, Err(JwtError::BadSignature)));
    }

    #[test]
    fn test_validate_expired_token() {
        // Backdate well past the default decode leeway
        let claims = Claims::with_ttl(Uuid::new_v4(), false, Duration::seconds(-3600));
        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_foreign_issuer() {
        let mut claims = Claims::new(Uuid::new_v4(), false);
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }
}
