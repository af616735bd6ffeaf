//! Registration and login.
//!
//! Both flows end in a freshly issued token. Hashing and verification run on the
//! blocking pool so a slow bcrypt round never stalls the request executor.

use std::sync::Arc;

use validator::Validate;

use super::{normalize_email, AuthResponse, LoginRequest, PasswordHasher, RegisterRequest, TokenIssuer};
use crate::error::AppError;
use crate::models::NewUser;
use crate::store::Store;

const INVALID_CREDENTIALS: &str = "invalid credentials";

pub struct AuthService {
    store: Arc<dyn Store>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
    // Verified against when the email is unknown, so both failure paths cost one bcrypt round.
    decoy_hash: String,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn Store>,
        hasher: PasswordHasher,
        tokens: Arc<TokenIssuer>,
    ) -> Result<Self, AppError> {
        let decoy_hash = hasher.hash("decoy password for unknown accounts")?;
        Ok(Self {
            store,
            hasher,
            tokens,
            decoy_hash,
        })
    }

    /// Creates an identity and returns a token for it.
    ///
    /// Fails with `Validation` for bad input, `Conflict` when the normalized email is taken,
    /// `Internal` when hashing, persistence or signing fails.
    pub async fn register(&self, input: RegisterRequest) -> Result<AuthResponse, AppError> {
        input.validate()?;
        let email = normalize_email(&input.email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("email already registered".into()));
        }

        let hasher = self.hasher;
        let password = input.password;
        let password_hash = run_blocking(move || hasher.hash(&password)).await?;

        let user = self
            .store
            .insert_user(NewUser {
                first_name: input.first_name.trim().to_string(),
                last_name: input.last_name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;
        log::info!("registered user {}", user.id);

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse {
            token,
            user_id: user.id,
        })
    }

    /// Checks credentials and returns a token.
    ///
    /// An unknown email and a wrong password produce the identical `Unauthorized` error.
    pub async fn login(&self, input: LoginRequest) -> Result<AuthResponse, AppError> {
        input.validate()?;
        let email = normalize_email(&input.email);
        let user = self.store.find_user_by_email(&email).await?;

        let digest = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.decoy_hash.clone(),
        };
        let hasher = self.hasher;
        let password = input.password;
        let matches = run_blocking(move || hasher.verify(&password, &digest)).await?;

        match user {
            Some(user) if matches => {
                let token = self.tokens.issue(user.id)?;
                Ok(AuthResponse {
                    token,
                    user_id: user.id,
                })
            }
            _ => {
                log::debug!("login rejected");
                Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()))
            }
        }
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))?
}
