pub mod extractors;
pub mod middleware;
pub mod password;
pub mod policy;
pub mod service;
pub mod token;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use extractors::Requester;
pub use middleware::{authenticate_request, AuthMiddleware};
pub use password::{PasswordHasher, MAX_PASSWORD_BYTES};
pub use policy::{authorize_mutation, can_mutate, can_read};
pub use service::AuthService;
pub use token::{Claims, TokenIssuer};

const MIN_PASSWORD_BYTES: usize = 6;
const MIN_NAME_CHARS: usize = 2;

/// Canonical form of an email address: surrounding whitespace removed, lower-cased.
///
/// Idempotent, so normalizing an already normalized address is a no-op.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Represents the payload for a user login request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Checked after normalization.
    #[validate(custom = "validate_email_normalized")]
    pub email: String,
    #[validate(length(min = 1, message = "password cannot be empty"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// At least 2 characters once trimmed.
    #[validate(custom = "validate_name")]
    pub first_name: String,
    /// At least 2 characters once trimmed.
    #[validate(custom = "validate_name")]
    pub last_name: String,
    /// Checked after normalization.
    #[validate(custom = "validate_email_normalized")]
    pub email: String,
    /// Between 6 and 72 bytes.
    #[validate(custom = "validate_password")]
    pub password: String,
}

/// Response structure after successful authentication (login or registration).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The bearer token for subsequent requests.
    pub token: String,
    /// The identity the token was issued for.
    pub user_id: Uuid,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_email_normalized(email: &str) -> Result<(), ValidationError> {
    if validator::validate_email(normalize_email(email)) {
        Ok(())
    } else {
        Err(invalid("email", "invalid email format"))
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() >= MIN_NAME_CHARS {
        Ok(())
    } else {
        Err(invalid("name", "name must be at least 2 characters"))
    }
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    match password.len() {
        n if n < MIN_PASSWORD_BYTES => Err(invalid(
            "password",
            "password must be at least 6 characters",
        )),
        n if n > MAX_PASSWORD_BYTES => Err(invalid(
            "password",
            "password must be at most 72 bytes",
        )),
        _ => Ok(()),
    }
}
