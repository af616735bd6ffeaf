use crate::error::AppError;
use bcrypt::BcryptError;

/// bcrypt reads at most this many bytes of its input and silently ignores the rest.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// One-way password hashing with a tunable bcrypt work factor.
///
/// Both operations are CPU-bound by design; async callers should run them on the
/// blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `password` with a fresh random salt.
    ///
    /// Inputs over [`MAX_PASSWORD_BYTES`] are refused; callers validate length first.
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::Internal(format!(
                "refusing to hash a {}-byte password",
                password.len()
            )));
        }
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    /// Checks `password` against a stored digest.
    ///
    /// A malformed digest is a plain mismatch, and so is any password longer than
    /// [`MAX_PASSWORD_BYTES`]. Only a failure of the hashing engine itself is reported
    /// as an error.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        // The bcrypt round still runs for over-long input so rejection costs the same.
        let within_limit = password.len() <= MAX_PASSWORD_BYTES;
        match bcrypt::verify(password, digest) {
            Ok(matches) => Ok(matches && within_limit),
            Err(e) if is_malformed_digest(&e) => Ok(false),
            Err(e) => Err(AppError::Internal(format!(
                "Failed to verify password: {}",
                e
            ))),
        }
    }
}

fn is_malformed_digest(error: &BcryptError) -> bool {
    matches!(
        error,
        BcryptError::InvalidHash(_)
            | BcryptError::InvalidPrefix(_)
            | BcryptError::InvalidCost(_)
            | BcryptError::CostNotAllowed(_)
            | BcryptError::InvalidSaltLen(_)
            | BcryptError::InvalidBase64(_)
    )
}
