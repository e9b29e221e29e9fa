/// Authentication and authorization for TaskDesk
///
/// # Modules
///
/// - [`jwt`]: bearer credential issuance and validation (HS256)
/// - [`permissions`]: the permission rule table as pure checks
/// - [`middleware`]: request authentication context for the API layer
///
/// # Example
///
/// ```
/// use taskdesk_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-signing-secret-of-at-least-32-bytes";
/// let token = create_token(&Claims::new(Uuid::new_v4(), true), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert!(claims.is_admin);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod permissions;
