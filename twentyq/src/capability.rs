//! Capabilities the coordinator calls out to: questioner, answerer, judge.
//!
//! Each is an external collaborator (a hosted model in production, a stub in tests).
//! The coordinator never inspects how they produce their strings.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CapabilityError;
use crate::record::Exchange;

/// Generates strategic yes/no questions and final guesses.
#[async_trait]
pub trait Questioner: Send + Sync {
    /// Next question, given every exchange so far (answered or not).
    async fn ask_question(&self, history: &[Exchange]) -> Result<String, CapabilityError>;

    /// A guess at the secret, given the history and earlier guesses.
    async fn guess(
        &self,
        history: &[Exchange],
        prior_guesses: &[String],
    ) -> Result<String, CapabilityError>;
}

/// Answers a yes/no question about the secret. Expected replies are "Yes" or "No"
/// but the text is not validated.
#[async_trait]
pub trait Answerer: Send + Sync {
    async fn answer(&self, secret: &str, question: &str) -> Result<String, CapabilityError>;
}

/// Decides whether a guess names the secret.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn is_correct(&self, secret: &str, guess: &str) -> Result<bool, CapabilityError>;
}

#[async_trait]
impl<T: Questioner + ?Sized> Questioner for Arc<T> {
    async fn ask_question(&self, history: &[Exchange]) -> Result<String, CapabilityError> {
        (**self).ask_question(history).await
    }

    async fn guess(
        &self,
        history: &[Exchange],
        prior_guesses: &[String],
    ) -> Result<String, CapabilityError> {
        (**self).guess(history, prior_guesses).await
    }
}

#[async_trait]
impl<T: Answerer + ?Sized> Answerer for Arc<T> {
    async fn answer(&self, secret: &str, question: &str) -> Result<String, CapabilityError> {
        (**self).answer(secret, question).await
    }
}

#[async_trait]
impl<T: Judge + ?Sized> Judge for Arc<T> {
    async fn is_correct(&self, secret: &str, guess: &str) -> Result<bool, CapabilityError> {
        (**self).is_correct(secret, guess).await
    }
}
