//! Analysis Orchestrator: picks one remote strategy per request and guarantees a result.
//!
//! Flow: configured provider (when the request carries settings) or the default
//! provider → on any failure, the similarity analyzer on the untouched input.
//!
//! Exactly one remote attempt is made. Failures are logged and swallowed here;
//! they never reach the caller.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::analysis::similarity::SimilarityAnalyzer;
use crate::models::analysis::{AnalysisInput, AnalysisResult};
use crate::providers::prompts::build_analysis_prompt;
use crate::providers::response::parse_analysis;
use crate::providers::{ProviderConfig, ProviderError, ProviderKind, RemoteAnalyst};

/// Provider used when a request carries no settings of its own.
pub const DEFAULT_PROVIDER: ProviderKind = ProviderKind::OpenRouter;

/// The strategy that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Configured(ProviderKind),
    Default(ProviderKind),
    Fallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Configured(provider) => write!(f, "configured:{provider}"),
            Strategy::Default(provider) => write!(f, "default:{provider}"),
            Strategy::Fallback => f.write_str("fallback"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub strategy: Strategy,
}

#[derive(Clone)]
pub struct AnalysisOrchestrator {
    analyst: Arc<dyn RemoteAnalyst>,
    default_credential: Option<String>,
    timeout: Duration,
    fallback: SimilarityAnalyzer,
}

impl AnalysisOrchestrator {
    pub fn new(
        analyst: Arc<dyn RemoteAnalyst>,
        default_credential: Option<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            analyst,
            default_credential: default_credential.filter(|c| !c.trim().is_empty()),
            timeout,
            fallback: SimilarityAnalyzer,
        }
    }

    /// Never fails: a failed remote attempt degrades to the similarity analyzer.
    pub async fn analyze(
        &self,
        input: &AnalysisInput,
        provider_config: Option<&ProviderConfig>,
    ) -> AnalysisOutcome {
        let (provider, credential, strategy) = match provider_config {
            Some(config) => (
                config.preferred,
                config.credential_for(config.preferred),
                Strategy::Configured(config.preferred),
            ),
            None => (
                DEFAULT_PROVIDER,
                self.default_credential.as_deref(),
                Strategy::Default(DEFAULT_PROVIDER),
            ),
        };

        match self.attempt_remote(provider, credential, input).await {
            Ok(result) => {
                info!(
                    "Remote analysis via {provider} succeeded (match_score={})",
                    result.match_score
                );
                AnalysisOutcome { result, strategy }
            }
            Err(e) => {
                warn!("Provider {provider} failed, falling back to text similarity: {e}");
                AnalysisOutcome {
                    result: self.fallback.analyze(input),
                    strategy: Strategy::Fallback,
                }
            }
        }
    }

    async fn attempt_remote(
        &self,
        provider: ProviderKind,
        credential: Option<&str>,
        input: &AnalysisInput,
    ) -> Result<AnalysisResult, ProviderError> {
        let credential = credential.ok_or(ProviderError::MissingCredential(provider))?;
        let prompt = build_analysis_prompt(input.job_description(), input.resume_text());

        let raw = tokio::time::timeout(
            self.timeout,
            self.analyst.complete(provider, credential, &prompt),
        )
        .await
        .map_err(|_| ProviderError::Timeout(self.timeout))??;

        parse_analysis(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::similarity::compute_similarity;
    use crate::providers::testing::{Reply, StubAnalyst, VALID_REPLY};

    const JD: &str = "Senior backend engineer. 5+ years experience with Rust and PostgreSQL. \
        Bachelor degree in Computer Science.";
    const RESUME: &str = "Backend engineer with 6 years building Rust services on PostgreSQL \
        and Docker. Bachelor of Science in Computer Science from State University.";

    fn input() -> AnalysisInput {
        AnalysisInput::new(JD.to_string(), RESUME.to_string()).unwrap()
    }

    fn orchestrator(stub: Arc<StubAnalyst>, default_key: Option<&str>) -> AnalysisOrchestrator {
        AnalysisOrchestrator::new(
            stub,
            default_key.map(str::to_string),
            Duration::from_secs(30),
        )
    }

    fn assert_matches_similarity(result: &AnalysisResult) {
        let expected = compute_similarity(JD, RESUME);
        assert_eq!(result, &expected);
        assert!(!result.is_ai_generated);
    }

    #[tokio::test]
    async fn test_default_provider_success_is_normalized() {
        let stub = Arc::new(StubAnalyst::replying(VALID_REPLY));
        let outcome = orchestrator(stub.clone(), Some("sk-default"))
            .analyze(&input(), None)
            .await;

        assert_eq!(outcome.strategy, Strategy::Default(ProviderKind::OpenRouter));
        assert!(outcome.result.is_ai_generated);
        assert_eq!(outcome.result.match_score, 100);
        assert_eq!(outcome.result.experience_match, 71);
        assert_eq!(outcome.result.education_match, 0);
        assert!(outcome.result.improvements.is_empty());
        assert_eq!(
            stub.calls(),
            vec![(ProviderKind::OpenRouter, "sk-default".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_default_key_falls_back_without_calling() {
        let stub = Arc::new(StubAnalyst::replying(VALID_REPLY));
        let outcome = orchestrator(stub.clone(), None).analyze(&input(), None).await;

        assert_eq!(outcome.strategy, Strategy::Fallback);
        assert_matches_similarity(&outcome.result);
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_configured_provider_uses_its_own_credential() {
        let stub = Arc::new(StubAnalyst::replying(VALID_REPLY));
        let config = ProviderConfig::new(ProviderKind::Claude)
            .with_credential(ProviderKind::Claude, "sk-ant")
            .with_credential(ProviderKind::OpenAi, "sk-openai");
        let outcome = orchestrator(stub.clone(), Some("sk-default"))
            .analyze(&input(), Some(&config))
            .await;

        assert_eq!(outcome.strategy, Strategy::Configured(ProviderKind::Claude));
        assert!(outcome.result.is_ai_generated);
        assert_eq!(stub.calls(), vec![(ProviderKind::Claude, "sk-ant".to_string())]);
    }

    #[tokio::test]
    async fn test_configured_provider_without_key_does_not_use_default() {
        let stub = Arc::new(StubAnalyst::replying(VALID_REPLY));
        let config = ProviderConfig::new(ProviderKind::OpenAi)
            .with_credential(ProviderKind::Claude, "sk-ant");
        let outcome = orchestrator(stub.clone(), Some("sk-default"))
            .analyze(&input(), Some(&config))
            .await;

        assert_eq!(outcome.strategy, Strategy::Fallback);
        assert_matches_similarity(&outcome.result);
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unparsable_reply_falls_back_to_similarity() {
        let stub = Arc::new(StubAnalyst::replying("{ this is not json }"));
        let outcome = orchestrator(stub.clone(), Some("sk-default"))
            .analyze(&input(), None)
            .await;

        assert_eq!(outcome.strategy, Strategy::Fallback);
        assert_matches_similarity(&outcome.result);
        assert_eq!(stub.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_reply_falls_back() {
        let stub = Arc::new(StubAnalyst::replying(r#"{"matchScore": 90}"#));
        let outcome = orchestrator(stub, Some("sk-default"))
            .analyze(&input(), None)
            .await;
        assert_matches_similarity(&outcome.result);
    }

    #[tokio::test]
    async fn test_api_error_falls_back_after_single_attempt() {
        let stub = Arc::new(StubAnalyst::new(Reply::Status(503)));
        let outcome = orchestrator(stub.clone(), Some("sk-default"))
            .analyze(&input(), None)
            .await;

        assert_eq!(outcome.strategy, Strategy::Fallback);
        assert_matches_similarity(&outcome.result);
        assert_eq!(stub.calls().len(), 1, "provider must not be retried");
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_times_out_and_falls_back() {
        let stub = Arc::new(StubAnalyst::new(Reply::Hang));
        let outcome = orchestrator(stub, Some("sk-default"))
            .analyze(&input(), None)
            .await;

        assert_eq!(outcome.strategy, Strategy::Fallback);
        assert_matches_similarity(&outcome.result);
    }

    #[test]
    fn test_strategy_labels() {
        assert_eq!(Strategy::Default(ProviderKind::OpenRouter).to_string(), "default:openrouter");
        assert_eq!(Strategy::Configured(ProviderKind::OpenAi).to_string(), "configured:openai");
        assert_eq!(Strategy::Fallback.to_string(), "fallback");
    }

    #[test]
    fn test_blank_default_key_is_ignored() {
        let stub = Arc::new(StubAnalyst::replying(VALID_REPLY));
        let orchestrator = orchestrator(stub, Some("   "));
        assert!(orchestrator.default_credential.is_none());
    }
}
