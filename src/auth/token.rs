use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of every issued session token.
pub const TOKEN_TTL_HOURS: i64 = 72;

/// The only message a failed verification ever produces, whatever check failed.
pub const INVALID_TOKEN: &str = "invalid token";

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the identity of the authenticated user.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies HS256-signed bearer tokens.
///
/// The signing secret is handed in once at startup and never changes afterwards, so a
/// single instance is shared read-only by every request.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Signs a token for `subject`, valid from now until now + the configured lifetime.
    pub fn issue(&self, subject: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expiry = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("token expiry out of range".into()))?;

        let claims = Claims {
            sub: subject,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature and expiry and returns the subject.
    ///
    /// Every failure (bad signature, malformed structure, missing or mistyped subject,
    /// expired) collapses into the same `Unauthorized(INVALID_TOKEN)`.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                log::debug!("token rejected: {:?}", e.kind());
                AppError::Unauthorized(INVALID_TOKEN.into())
            })
    }
}
