use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use tracing::Level;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    pub seed_default_users: bool,
    pub issue_dev_tokens: bool,

    pub log_dir: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            server_addr: text("SERVER_ADDR", "0.0.0.0:8080"),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            jwt_secret: lookup("JWT_SECRET").ok_or_else(|| anyhow!("JWT_SECRET must be set"))?,
            access_token_ttl: parse_var(&lookup, "ACCESS_TOKEN_TTL", "900")?, // default 15 min
            rate_protected_per_min: parse_var(&lookup, "RATE_PROTECTED_PER_MIN", "1000")?,
            api_prefix: text("API_PREFIX", "/api"),
            seed_default_users: parse_var(&lookup, "SEED_DEFAULT_USERS", "true")?,
            issue_dev_tokens: parse_var(&lookup, "ISSUE_DEV_TOKENS", "false")?,
            log_dir: text("LOG_DIR", "logs"),
            log_level: parse_var(&lookup, "LOG_LEVEL", "debug")?,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:8080");
        assert!(config.database_url.is_none());
        assert_eq!(config.access_token_ttl, 900);
        assert_eq!(config.api_prefix, "/api");
        assert!(config.seed_default_users);
        assert!(!config.issue_dev_tokens);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn malformed_numbers_name_the_variable() {
        let err = config_from(&[("JWT_SECRET", "s"), ("RATE_PROTECTED_PER_MIN", "lots")])
            .unwrap_err();
        assert!(err.to_string().contains("RATE_PROTECTED_PER_MIN"));
    }

    #[test]
    fn blank_database_url_means_memory_store() {
        let config = config_from(&[("JWT_SECRET", "s"), ("DATABASE_URL", " ")]).unwrap();
        assert!(config.database_url.is_none());
    }
}
