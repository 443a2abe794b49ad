//! Scripted `RemoteAnalyst` for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::providers::{ProviderError, ProviderKind, RemoteAnalyst};

pub enum Reply {
    Text(String),
    Status(u16),
    Hang,
}

pub struct StubAnalyst {
    reply: Reply,
    calls: Mutex<Vec<(ProviderKind, String)>>,
}

impl StubAnalyst {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string()))
    }

    /// `(provider, credential)` for every call received.
    pub fn calls(&self) -> Vec<(ProviderKind, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteAnalyst for StubAnalyst {
    async fn complete(
        &self,
        provider: ProviderKind,
        credential: &str,
        _prompt: &str,
    ) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((provider, credential.to_string()));
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Status(status) => Err(ProviderError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            }),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ProviderError::EmptyContent(provider))
            }
        }
    }
}

pub const VALID_REPLY: &str = r#"Sure! Here is the analysis:
{
  "matchScore": 150,
  "skillMatch": 88,
  "experienceMatch": 71.4,
  "educationMatch": -3,
  "keywordMatch": 55,
  "strengths": ["Hands-on Rust services"],
  "improvements": "none",
  "recommendations": ["Mention observability work"],
  "summary": "Strong candidate for the role."
}
Let me know if you need more detail."#;
