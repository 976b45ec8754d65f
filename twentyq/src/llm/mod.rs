//! LLM client abstraction used by the model-backed capabilities.
//!
//! `LlmClient` takes a short message list (system prompt plus one user prompt in
//! practice) and returns the assistant text. Implementations: `ChatOpenAI` (real
//! Chat Completions API) and `MockLlm` (scripted replies for tests).

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CapabilityError;

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Instructions; placed first.
    System(String),
    User(String),
    Assistant(String),
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant(content.into())
    }

    pub fn content(&self) -> &str {
        match self {
            Message::System(s) | Message::User(s) | Message::Assistant(s) => s,
        }
    }
}

/// Token usage for one call, when the provider reports it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Assistant reply.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    pub content: String,
    pub usage: Option<LlmUsage>,
}

/// Failure of one LLM call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("request build failed: {0}")]
    Request(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("provider returned no choices")]
    NoChoices,
}

impl From<LlmError> for CapabilityError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::NoChoices => CapabilityError::Empty,
            other => CapabilityError::Provider(other.to_string()),
        }
    }
}

/// LLM client: messages in, assistant text out.
///
/// **Interaction**: Used by `LlmQuestioner`, `LlmAnswerer` and `LlmJudge`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, LlmError>;
}
