//! Game execution error types.
//!
//! `CapabilityError` is what an injected `Questioner`, `Answerer` or `Judge` returns;
//! the coordinator wraps it in `GameError::CapabilityFailure` together with the phase
//! it happened in. No error is retried. `Coordinator::run` returns a `GameFailure`, which
//! pairs the error with the record as it stood when the run stopped.

use std::fmt;

use thiserror::Error;

use crate::record::{GameRecord, Phase};

/// Failure reported by one capability call (ask, answer, guess or judge).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CapabilityError {
    /// The backing provider failed (network, HTTP status, API error).
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider replied but the reply could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The provider replied with no usable content.
    #[error("empty response")]
    Empty,
}

/// Error returned by `Coordinator::run`.
///
/// Any variant aborts the game; whatever was already appended to the record
/// stays there, but no winner is resolved.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    /// A capability call failed; carries the phase in which it happened.
    #[error("capability failure during {phase}: {source}")]
    CapabilityFailure {
        phase: Phase,
        #[source]
        source: CapabilityError,
    },

    /// The run configuration was rejected before any round started.
    #[error("invalid game configuration: {0}")]
    InvalidConfig(String),

    /// The cancellation token fired; observed at the boundary before `phase`.
    #[error("game cancelled before {phase}")]
    Cancelled { phase: Phase },

    /// The run deadline passed; observed at the boundary before `phase`.
    #[error("game deadline exceeded before {phase}")]
    DeadlineExceeded { phase: Phase },
}

impl GameError {
    /// Phase the error is attached to, if any.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            GameError::CapabilityFailure { phase, .. }
            | GameError::Cancelled { phase }
            | GameError::DeadlineExceeded { phase } => Some(*phase),
            GameError::InvalidConfig(_) => None,
        }
    }

    pub(crate) fn capability(phase: Phase, source: CapabilityError) -> Self {
        GameError::CapabilityFailure { phase, source }
    }
}

/// A run that stopped early, with everything appended to the record up to that point.
///
/// For a rejected configuration the record is the one passed in, unchanged.
#[derive(Debug)]
pub struct GameFailure {
    pub error: GameError,
    pub record: Box<GameRecord>,
}

impl GameFailure {
    pub fn new(error: GameError, record: GameRecord) -> Self {
        Self {
            error,
            record: Box::new(record),
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        self.error.phase()
    }

    pub fn into_parts(self) -> (GameError, GameRecord) {
        (self.error, *self.record)
    }
}

impl fmt::Display for GameFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for GameFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.error)
    }
}

impl From<GameFailure> for GameError {
    fn from(failure: GameFailure) -> Self {
        failure.error
    }
}
