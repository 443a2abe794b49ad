use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PUBLIC_URL: &str = "http://localhost:5000";

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// When unset, analyses are kept in memory for the life of the process.
    pub database_url: Option<String>,
    /// Credential for the default remote provider. Requests without their own
    /// provider settings fall back to the similarity analyzer when this is unset.
    pub default_provider_key: Option<String>,
    pub provider_timeout: Duration,
    /// Sent to OpenRouter as the `HTTP-Referer` header.
    pub public_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let provider_timeout_secs = match optional_env("PROVIDER_TIMEOUT_SECS") {
            Some(raw) => parse_timeout_secs(&raw)?,
            None => DEFAULT_PROVIDER_TIMEOUT_SECS,
        };

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            default_provider_key: optional_env("OPENROUTER_API_KEY")
                .or_else(|| optional_env("OPENROUTER_KEY")),
            provider_timeout: Duration::from_secs(provider_timeout_secs),
            public_url: optional_env("APP_PUBLIC_URL")
                .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field(
                "default_provider_key",
                &self.default_provider_key.as_ref().map(|_| "<redacted>"),
            )
            .field("provider_timeout", &self.provider_timeout)
            .field("public_url", &self.public_url)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

/// A zero timeout would fail every remote attempt before it starts.
fn parse_timeout_secs(raw: &str) -> Result<u64> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .context("PROVIDER_TIMEOUT_SECS must be a whole number of seconds")?;
    if secs == 0 {
        anyhow::bail!("PROVIDER_TIMEOUT_SECS must be at least 1 second");
    }
    Ok(secs)
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_credentials() {
        let config = Config {
            database_url: Some("postgres://user:pw@localhost/db".to_string()),
            default_provider_key: Some("sk-or-very-secret".to_string()),
            provider_timeout: Duration::from_secs(30),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("pw@"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_timeout_must_be_positive() {
        assert_eq!(parse_timeout_secs("45").unwrap(), 45);
        assert_eq!(parse_timeout_secs(" 1 ").unwrap(), 1);
        let err = parse_timeout_secs("0").unwrap_err();
        assert!(err.to_string().contains("at least 1 second"));
        assert!(parse_timeout_secs("-5").is_err());
        assert!(parse_timeout_secs("soon").is_err());
    }
}
