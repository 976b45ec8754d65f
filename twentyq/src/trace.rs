//! Trace events for a game run.
//!
//! Every state transition that produces data emits one `TraceEvent` to the
//! configured `TraceSink`. Sinks are infallible from the coordinator's point of
//! view: a dropped receiver or a panicking consumer is not the game's problem.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use twentyq::trace::{ChannelSink, TraceEvent};
//!
//! let (sink, mut rx) = ChannelSink::new();
//! let sink = Arc::new(sink);
//! // pass `sink` to `Coordinator::with_trace_sink`, then:
//! # async fn consume(mut rx: tokio::sync::mpsc::UnboundedReceiver<TraceEvent>) {
//! while let Some(event) = rx.recv().await {
//!     println!("{:?}", event);
//! }
//! # }
//! ```

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::record::GameSummary;

/// One observable step of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// Emitted once before the first phase. The secret itself is not traced.
    GameStarted { secret_len: usize, max_rounds: u32 },
    QuestionAsked { round: u32, question: String },
    AnswerReceived { round: u32, answer: String },
    GuessMade { round: u32, guess: String },
    Verdict { round: u32, correct: bool },
    GameOver { summary: GameSummary },
}

/// Consumer of trace events.
pub trait TraceSink: Send + Sync {
    fn emit(&self, event: &TraceEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn emit(&self, _event: &TraceEvent) {}
}

/// Forwards events into an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TraceEvent>,
}

impl ChannelSink {
    /// Creates the sink together with the receiving end.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TraceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn from_sender(tx: mpsc::UnboundedSender<TraceEvent>) -> Self {
        Self { tx }
    }
}

impl TraceSink for ChannelSink {
    fn emit(&self, event: &TraceEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// Calls a closure for each event.
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: Fn(&TraceEvent) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> TraceSink for FnSink<F>
where
    F: Fn(&TraceEvent) + Send + Sync,
{
    fn emit(&self, event: &TraceEvent) {
        (self.0)(event)
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl TraceSink for RecordingSink {
    fn emit(&self, event: &TraceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
