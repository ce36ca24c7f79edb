use serde::Deserialize;

use crate::error::Error;

/// Deployment secrets for the credential pipeline. Both values must come
/// from the environment; there are no compiled-in defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct SecretsConfig {
    /// Application-wide pepper mixed into every password hash.
    pub pepper: String,
    /// HMAC key for remember-token digests, distinct from the pepper.
    pub hmac_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Gate for `destructive_reset`. Off unless the environment opts in.
    pub allow_destructive: bool,
    pub secrets: SecretsConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Error> {
        dotenvy::dotenv().ok();

        let database_url = require("DATABASE_URL")?;
        let secrets = SecretsConfig {
            pepper: require("GATEHOUSE_PEPPER")?,
            hmac_key: require("GATEHOUSE_HMAC_KEY")?,
        };
        let max_connections = std::env::var("GATEHOUSE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let allow_destructive = std::env::var("GATEHOUSE_ALLOW_DESTRUCTIVE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            max_connections,
            allow_destructive,
            secrets,
        })
    }
}

fn require(name: &'static str) -> Result<String, Error> {
    std::env::var(name).map_err(|_| Error::MissingConfig(name))
}
