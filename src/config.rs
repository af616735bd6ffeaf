use std::env;
use std::fmt;

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or blank.
    Missing(&'static str),
    /// A variable is present but unusable.
    Invalid(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "{} must be set", var),
            ConfigError::Invalid(var, reason) => write!(f, "{} is invalid: {}", var, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = required("JWT_SECRET")?;

        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("SERVER_PORT", format!("{:?} is not a port", raw)))?,
            Err(_) => 8080,
        };

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => {
                let cost: u32 = raw.trim().parse().map_err(|_| {
                    ConfigError::Invalid("BCRYPT_COST", format!("{:?} is not a number", raw))
                })?;
                if !(4..=31).contains(&cost) {
                    return Err(ConfigError::Invalid(
                        "BCRYPT_COST",
                        format!("{} is outside 4..=31", cost),
                    ));
                }
                cost
            }
            Err(_) => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_port,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret,
            bcrypt_cost,
        })
    }

    /// Only the database location, for the `migrate` commands which never sign tokens.
    pub fn database_url_from_env() -> Result<String, ConfigError> {
        required("DATABASE_URL")
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}
