//! Centralized configuration (environment variables + defaults).

use anyhow::{anyhow, Context};
use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://cafes.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CSRF_TIME_LIMIT_SECS: i64 = 3600;

/// Everything the server needs, loaded once at startup and passed down explicitly.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: String,
    /// Signs the anti-forgery tokens embedded in every form.
    pub secret_key: String,
    /// Passphrase required to report a café as closed.
    pub delete_key: String,
    pub csrf_time_limit_secs: i64,
}

impl AppConfig {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let database_max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let csrf_time_limit_secs =
            parse_or(&lookup, "CSRF_TIME_LIMIT_SECS", DEFAULT_CSRF_TIME_LIMIT_SECS)?;
        let secret_key = required(&lookup, "SECRET_KEY")?;
        let delete_key = required(&lookup, "DELETE_API_KEY")?;

        Ok(Self {
            database_url,
            database_max_connections,
            bind_addr,
            secret_key,
            delete_key,
            csrf_time_limit_secs,
        })
    }
}

// Secrets stay out of debug output.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("bind_addr", &self.bind_addr)
            .field("secret_key", &"<redacted>")
            .field("delete_key", &"<redacted>")
            .field("csrf_time_limit_secs", &self.csrf_time_limit_secs)
            .finish()
    }
}

fn required<F>(lookup: &F, key: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(anyhow!("{} must be set", key)),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("{} must be a valid number (got '{}')", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults_around_required_secrets() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SECRET_KEY", "sign-me"),
            ("DELETE_API_KEY", "TopSecretAPIKey"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.database_max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.csrf_time_limit_secs, DEFAULT_CSRF_TIME_LIMIT_SECS);
        assert_eq!(config.secret_key, "sign-me");
        assert_eq!(config.delete_key, "TopSecretAPIKey");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("SECRET_KEY", "sign-me")])).unwrap_err();
        assert!(err.to_string().contains("DELETE_API_KEY"));

        let err = AppConfig::from_lookup(lookup_from(&[
            ("SECRET_KEY", "  "),
            ("DELETE_API_KEY", "k"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("SECRET_KEY", "s"),
            ("DELETE_API_KEY", "k"),
            ("DATABASE_MAX_CONNECTIONS", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SECRET_KEY", "sign-me"),
            ("DELETE_API_KEY", "TopSecretAPIKey"),
        ]))
        .unwrap();
        let shown = format!("{:?}", config);
        assert!(!shown.contains("sign-me"));
        assert!(!shown.contains("TopSecretAPIKey"));
    }
}
