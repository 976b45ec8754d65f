//! Model-backed capabilities: each role builds a system + user prompt from
//! [`GamePrompts`] and asks its own [`LlmClient`].
//!
//! Roles can use different clients (and so different models); the CLI gives the
//! questioner a stronger model than the answerer and judge by default.

mod verdict;

pub use verdict::parse_verdict;

use std::sync::Arc;

use async_trait::async_trait;

use crate::capability::{Answerer, Judge, Questioner};
use crate::error::CapabilityError;
use crate::llm::{LlmClient, Message};
use crate::prompts::{render, GamePrompts};
use crate::record::Exchange;

/// Renders a list of strings as a JSON array, e.g. `["Is it alive? → No"]`.
fn render_list<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: ToString,
{
    let items: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    serde_json::to_string(&items).unwrap_or_else(|_| format!("{:?}", items))
}

/// Calls `llm` and returns the trimmed, non-empty reply.
async fn complete(
    llm: &dyn LlmClient,
    system: String,
    user: String,
) -> Result<String, CapabilityError> {
    let messages = [Message::System(system), Message::User(user)];
    let response = llm.invoke(&messages).await?;
    let text = response.content.trim();
    if text.is_empty() {
        return Err(CapabilityError::Empty);
    }
    Ok(text.to_string())
}

/// Questioner backed by an LLM.
pub struct LlmQuestioner {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<GamePrompts>,
}

impl LlmQuestioner {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<GamePrompts>) -> Self {
        Self { llm, prompts }
    }
}

#[async_trait]
impl Questioner for LlmQuestioner {
    async fn ask_question(&self, history: &[Exchange]) -> Result<String, CapabilityError> {
        let p = &self.prompts.questioner;
        let history = render_list(history);
        let user = render(&p.ask, &[("history", history.as_str())]);
        complete(self.llm.as_ref(), p.system.trim().to_string(), user).await
    }

    async fn guess(
        &self,
        history: &[Exchange],
        prior_guesses: &[String],
    ) -> Result<String, CapabilityError> {
        let p = &self.prompts.questioner;
        let history = render_list(history);
        let guesses = render_list(prior_guesses);
        let user = render(
            &p.guess,
            &[("history", history.as_str()), ("guesses", guesses.as_str())],
        );
        complete(self.llm.as_ref(), p.guess_system.trim().to_string(), user).await
    }
}

/// Answerer backed by an LLM. The reply is passed through unvalidated.
pub struct LlmAnswerer {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<GamePrompts>,
}

impl LlmAnswerer {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<GamePrompts>) -> Self {
        Self { llm, prompts }
    }
}

#[async_trait]
impl Answerer for LlmAnswerer {
    async fn answer(&self, secret: &str, question: &str) -> Result<String, CapabilityError> {
        let p = &self.prompts.answerer;
        let secret = secret.to_lowercase();
        let user = render(&p.user, &[("question", question), ("secret", secret.as_str())]);
        complete(self.llm.as_ref(), p.system.trim().to_string(), user).await
    }
}

/// Judge backed by an LLM; the reply goes through [`parse_verdict`].
pub struct LlmJudge {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<GamePrompts>,
}

impl LlmJudge {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<GamePrompts>) -> Self {
        Self { llm, prompts }
    }
}

#[async_trait]
impl Judge for LlmJudge {
    async fn is_correct(&self, secret: &str, guess: &str) -> Result<bool, CapabilityError> {
        let p = &self.prompts.judge;
        let secret = secret.to_lowercase();
        let user = render(&p.user, &[("secret", secret.as_str()), ("guess", guess)]);
        let reply = complete(self.llm.as_ref(), p.system.trim().to_string(), user).await?;
        let verdict = parse_verdict(&reply)?;
        tracing::debug!(reply = %reply, verdict, "Judge reply parsed");
        Ok(verdict)
    }
}
