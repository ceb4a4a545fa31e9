use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default bcrypt cost factor (2^12 iterations, ~200ms per hash).
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Default token lifetime in minutes.
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 60;

/// Token signing and validation settings.
///
/// Loaded once at process start and never mutated afterwards; issuance and
/// validation both read from the same instance so issuer/audience always
/// match exactly.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Symmetric signing key. Redacted in Debug output.
    pub secret: SecretString,
    pub issuer: String,
    pub audience: String,
    pub expiration_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub jwt: JwtConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("JWT_SECRET must not be empty")]
    EmptySecret,

    #[error("Invalid TOKEN_EXPIRATION_MINUTES: {0}")]
    InvalidExpiration(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8083".to_string());

        let secret = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let issuer = vars
            .get("JWT_ISSUER")
            .cloned()
            .unwrap_or_else(|| "identity-controller".to_string());

        let audience = vars
            .get("JWT_AUDIENCE")
            .cloned()
            .unwrap_or_else(|| "identity-clients".to_string());

        let expiration_minutes = match vars.get("TOKEN_EXPIRATION_MINUTES") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or_else(|| ConfigError::InvalidExpiration(raw.clone()))?,
            None => DEFAULT_EXPIRATION_MINUTES,
        };

        Ok(Config {
            database_url,
            bind_address,
            jwt: JwtConfig {
                secret: SecretString::from(secret.clone()),
                issuer,
                audience,
                expiration_minutes,
            },
        })
    }
}

impl JwtConfig {
    /// Signing key bytes for HMAC operations.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}
