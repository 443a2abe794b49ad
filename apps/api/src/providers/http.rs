//! HTTP bindings for each vendor. One request per call, no retries: the
//! orchestrator falls back instead of retrying an unreliable provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::providers::prompts::ANALYST_SYSTEM;
use crate::providers::{ProviderError, ProviderKind, RemoteAnalyst};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4";

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const OPENROUTER_MODEL: &str = "openai/gpt-4";
const APP_TITLE: &str = "AI Resume Matcher";

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const CLAUDE_MODEL: &str = "claude-3-sonnet-20240229";

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatCompletionResponse {
    fn into_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first text block.
    fn into_text(self) -> Option<String> {
        self.content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
            .filter(|t| !t.trim().is_empty())
    }
}

/// Error envelope shared by OpenAI, OpenRouter and Anthropic.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Reaches every vendor over HTTPS with one shared, timeout-bounded client.
#[derive(Clone)]
pub struct HttpAnalyst {
    client: Client,
    referer: String,
}

impl HttpAnalyst {
    pub fn new(timeout: Duration, referer: String) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            referer,
        })
    }

    fn openai_request(&self, credential: &str, prompt: &str) -> RequestBuilder {
        self.client
            .post(OPENAI_API_URL)
            .bearer_auth(credential)
            .json(&chat_request(OPENAI_MODEL, prompt))
    }

    fn openrouter_request(&self, credential: &str, prompt: &str) -> RequestBuilder {
        self.client
            .post(OPENROUTER_API_URL)
            .bearer_auth(credential)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", APP_TITLE)
            .json(&chat_request(OPENROUTER_MODEL, prompt))
    }

    fn claude_request(&self, credential: &str, prompt: &str) -> RequestBuilder {
        self.client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", credential)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&messages_request(prompt))
    }

    async fn openai(&self, credential: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = self.openai_request(credential, prompt);
        let body: ChatCompletionResponse = send(ProviderKind::OpenAi, request).await?;
        body.into_text()
            .ok_or(ProviderError::EmptyContent(ProviderKind::OpenAi))
    }

    async fn openrouter(&self, credential: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = self.openrouter_request(credential, prompt);
        let body: ChatCompletionResponse = send(ProviderKind::OpenRouter, request).await?;
        body.into_text()
            .ok_or(ProviderError::EmptyContent(ProviderKind::OpenRouter))
    }

    async fn claude(&self, credential: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = self.claude_request(credential, prompt);
        let body: MessagesResponse = send(ProviderKind::Claude, request).await?;
        body.into_text()
            .ok_or(ProviderError::EmptyContent(ProviderKind::Claude))
    }
}

#[async_trait]
impl RemoteAnalyst for HttpAnalyst {
    async fn complete(
        &self,
        provider: ProviderKind,
        credential: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        match provider {
            ProviderKind::OpenAi => self.openai(credential, prompt).await,
            ProviderKind::OpenRouter => self.openrouter(credential, prompt).await,
            ProviderKind::Claude => self.claude(credential, prompt).await,
        }
    }
}

fn chat_request<'a>(model: &'a str, prompt: &'a str) -> ChatCompletionRequest<'a> {
    ChatCompletionRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: ANALYST_SYSTEM,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

/// Anthropic takes the system prompt as a top-level field.
fn messages_request(prompt: &str) -> MessagesRequest<'_> {
    MessagesRequest {
        model: CLAUDE_MODEL,
        max_tokens: MAX_TOKENS,
        system: ANALYST_SYSTEM,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: TEMPERATURE,
    }
}

/// Sends the request once and decodes a success body. Any non-2xx status is
/// an error carrying the vendor's message when it can be parsed.
async fn send<T: serde::de::DeserializeOwned>(
    provider: ProviderKind,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("{provider} API returned {status}");
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }

    let body = response.json::<T>().await?;
    debug!("{provider} call succeeded");
    Ok(body)
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.to_string())
}
