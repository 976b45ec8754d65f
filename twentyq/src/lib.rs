//! # twentyq
//!
//! Twenty Questions between language-model agents, driven by a small typed state
//! machine. One agent asks yes/no questions and guesses, a second answers, a third
//! judges each guess. All of the intelligence lives behind three capability traits;
//! this crate owns the turn order and the game record.
//!
//! ## Main modules
//!
//! - [`record`]: [`GameRecord`], [`Exchange`], [`Phase`], [`Winner`], [`GameSummary`].
//! - [`capability`]: [`Questioner`], [`Answerer`], [`Judge`], the injected collaborators.
//! - [`coordinator`]: [`Coordinator`], which runs Ask → Answer → Guess → Judge → (Ask | End).
//! - [`trace`]: [`TraceEvent`] and [`TraceSink`] implementations for observing a run.
//! - [`llm`]: [`LlmClient`] trait, [`ChatOpenAI`], [`MockLlm`].
//! - [`agents`]: [`LlmQuestioner`], [`LlmAnswerer`], [`LlmJudge`], [`parse_verdict`].
//! - [`prompts`]: [`GamePrompts`] loaded from embedded or on-disk YAML.
//! - [`catalogue`]: [`SecretCatalogue`] and seeded secret selection.
//! - [`error`]: [`GameError`], [`CapabilityError`], [`GameFailure`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use twentyq::{
//!     ChatOpenAI, Coordinator, GamePrompts, GameRecord, LlmAnswerer, LlmJudge, LlmQuestioner,
//!     SecretCatalogue,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let prompts = Arc::new(GamePrompts::load(None)?);
//! let coordinator = Coordinator::new(
//!     Arc::new(LlmQuestioner::new(Arc::new(ChatOpenAI::new("gpt-4.1")), prompts.clone())),
//!     Arc::new(LlmAnswerer::new(Arc::new(ChatOpenAI::new("gpt-4-turbo")), prompts.clone())),
//!     Arc::new(LlmJudge::new(Arc::new(ChatOpenAI::new("gpt-4-turbo")), prompts)),
//! );
//! let secret = SecretCatalogue::default().pick(None).to_string();
//! let record = coordinator.run(GameRecord::new(secret, 20)).await?;
//! println!("{}", record.summary());
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod capability;
pub mod catalogue;
pub mod coordinator;
pub mod error;
pub mod llm;
pub mod prompts;
pub mod record;
pub mod trace;

pub use agents::{parse_verdict, LlmAnswerer, LlmJudge, LlmQuestioner};
pub use capability::{Answerer, Judge, Questioner};
pub use catalogue::{SecretCatalogue, DEFAULT_SECRETS};
pub use coordinator::Coordinator;
pub use error::{CapabilityError, GameError, GameFailure};
pub use llm::{ChatOpenAI, LlmClient, LlmError, LlmResponse, LlmUsage, Message, MockLlm};
pub use prompts::{GamePrompts, PromptLoadError};
pub use record::{Exchange, GameRecord, GameSummary, Phase, Winner};
pub use trace::{ChannelSink, FnSink, NoopSink, RecordingSink, TraceEvent, TraceSink};

/// Re-exported so callers can build a cancellation token without naming tokio-util.
pub use tokio_util::sync::CancellationToken;
