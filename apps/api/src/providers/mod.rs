//! Remote analysis providers. The only place that talks to AI vendors.
//!
//! Every vendor is reached through `RemoteAnalyst::complete`, which turns a
//! prompt into the vendor's raw text reply. Choosing a provider and falling
//! back when it fails is the orchestrator's job, not this module's.
//!
//! Credentials are always passed in per call. Nothing here reads or writes
//! process-global state.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::errors::AppError;

pub mod http;
pub mod prompts;
pub mod response;

#[cfg(test)]
pub mod testing;

/// The supported vendors. Adding one means adding a binding in `http`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    OpenRouter,
    Claude,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Claude => "claude",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ProviderKind::OpenAi),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "claude" => Ok(ProviderKind::Claude),
            other => Err(AppError::Validation(format!(
                "Unsupported provider '{other}'. Expected one of: openai, openrouter, claude"
            ))),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} API key not configured")]
    MissingCredential(ProviderKind),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0} returned empty content")]
    EmptyContent(ProviderKind),

    #[error("Malformed provider response: {0}")]
    ResponseFormat(String),

    #[error("Provider call timed out after {0:?}")]
    Timeout(Duration),
}

/// `apiSettings` as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    pub openai_key: Option<String>,
    pub openrouter_key: Option<String>,
    pub claude_key: Option<String>,
    pub preferred_provider: Option<String>,
}

/// Per-request provider choice. Never persisted.
#[derive(Clone)]
pub struct ProviderConfig {
    pub preferred: ProviderKind,
    credentials: HashMap<ProviderKind, String>,
}

impl ProviderConfig {
    pub fn new(preferred: ProviderKind) -> Self {
        Self {
            preferred,
            credentials: HashMap::new(),
        }
    }

    pub fn with_credential(mut self, provider: ProviderKind, credential: impl Into<String>) -> Self {
        let credential = credential.into();
        if !credential.trim().is_empty() {
            self.credentials.insert(provider, credential);
        }
        self
    }

    pub fn credential_for(&self, provider: ProviderKind) -> Option<&str> {
        self.credentials.get(&provider).map(String::as_str)
    }
}

// Credentials stay out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut configured: Vec<&str> = self.credentials.keys().map(|k| k.as_str()).collect();
        configured.sort_unstable();
        f.debug_struct("ProviderConfig")
            .field("preferred", &self.preferred)
            .field("configured", &configured)
            .finish()
    }
}

impl TryFrom<ApiSettings> for ProviderConfig {
    type Error = AppError;

    /// Unknown provider names are rejected here, before any remote call.
    /// A missing key is not an error: that attempt simply fails and falls back.
    fn try_from(settings: ApiSettings) -> Result<Self, Self::Error> {
        let preferred = match settings.preferred_provider.as_deref() {
            Some(name) => name.parse()?,
            None => ProviderKind::OpenRouter,
        };

        let mut config = ProviderConfig::new(preferred);
        for (provider, key) in [
            (ProviderKind::OpenAi, settings.openai_key),
            (ProviderKind::OpenRouter, settings.openrouter_key),
            (ProviderKind::Claude, settings.claude_key),
        ] {
            if let Some(key) = key {
                config = config.with_credential(provider, key);
            }
        }
        Ok(config)
    }
}

/// A remote analysis backend. Implement this to reach vendors through
/// something other than HTTP (tests use a scripted stub).
#[async_trait]
pub trait RemoteAnalyst: Send + Sync {
    /// Sends `prompt` to `provider` and returns the raw text of its reply.
    async fn complete(
        &self,
        provider: ProviderKind,
        credential: &str,
        prompt: &str,
    ) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names_round_trip() {
        for kind in [ProviderKind::OpenAi, ProviderKind::OpenRouter, ProviderKind::Claude] {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_provider_is_validation_error() {
        let err = "gemini".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("gemini")));
    }

    #[test]
    fn test_settings_default_to_openrouter() {
        let config = ProviderConfig::try_from(ApiSettings::default()).unwrap();
        assert_eq!(config.preferred, ProviderKind::OpenRouter);
        assert!(config.credential_for(ProviderKind::OpenRouter).is_none());
    }

    #[test]
    fn test_settings_map_keys_to_providers() {
        let settings: ApiSettings = serde_json::from_value(serde_json::json!({
            "openaiKey": "sk-openai",
            "claudeKey": "sk-ant",
            "preferredProvider": "claude"
        }))
        .unwrap();
        let config = ProviderConfig::try_from(settings).unwrap();
        assert_eq!(config.preferred, ProviderKind::Claude);
        assert_eq!(config.credential_for(ProviderKind::Claude), Some("sk-ant"));
        assert_eq!(config.credential_for(ProviderKind::OpenAi), Some("sk-openai"));
        assert_eq!(config.credential_for(ProviderKind::OpenRouter), None);
    }

    #[test]
    fn test_blank_key_counts_as_absent() {
        let config = ProviderConfig::new(ProviderKind::OpenAi).with_credential(ProviderKind::OpenAi, "  ");
        assert!(config.credential_for(ProviderKind::OpenAi).is_none());
    }

    #[test]
    fn test_settings_reject_unknown_provider() {
        let settings = ApiSettings {
            preferred_provider: Some("bard".to_string()),
            ..ApiSettings::default()
        };
        assert!(ProviderConfig::try_from(settings).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_keys() {
        let config = ProviderConfig::new(ProviderKind::Claude)
            .with_credential(ProviderKind::Claude, "sk-ant-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-ant-secret"));
        assert!(rendered.contains("claude"));
    }
}
