//! Mock LLM for tests and offline runs.
//!
//! Replies from a script: each call takes the next reply, and the last reply repeats
//! once the script is exhausted. Every received message list is recorded so tests can
//! assert on the prompts. A mock can also be built to fail every call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, LlmResponse, Message};

/// Scripted `LlmClient`.
pub struct MockLlm {
    replies: Vec<String>,
    /// When set, every call fails with this error.
    failure: Option<LlmError>,
    call_count: AtomicUsize,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// Always replies with `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self::scripted([content.into()])
    }

    /// Replies with each entry in turn, then keeps repeating the last one.
    pub fn scripted<I, T>(replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            failure: None,
            call_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self {
            failure: Some(error),
            ..Self::scripted(Vec::<String>::new())
        }
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Message lists received so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, LlmError> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        if let Some(ref e) = self.failure {
            return Err(e.clone());
        }
        let content = self
            .replies
            .get(n)
            .or_else(|| self.replies.last())
            .cloned()
            .ok_or(LlmError::NoChoices)?;
        Ok(LlmResponse {
            content,
            usage: None,
        })
    }
}
