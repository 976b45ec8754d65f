//! Deterministic stub capabilities shared by the coordinator tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use twentyq::{
    Answerer, CapabilityError, Coordinator, Exchange, Judge, Questioner, RecordingSink,
};

/// Asks "Question n?" and guesses "guess n", where n counts from 1. Fails guess number
/// `fail_guess_on` (1-based) when set.
#[derive(Default)]
pub struct CountingQuestioner {
    pub asks: AtomicUsize,
    pub guesses: AtomicUsize,
    pub fail_guess_on: Option<usize>,
}

impl CountingQuestioner {
    pub fn failing_guess_on(n: usize) -> Self {
        Self {
            fail_guess_on: Some(n),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Questioner for CountingQuestioner {
    async fn ask_question(&self, history: &[Exchange]) -> Result<String, CapabilityError> {
        self.asks.fetch_add(1, Ordering::SeqCst);
        Ok(format!("Question {}?", history.len() + 1))
    }

    async fn guess(
        &self,
        history: &[Exchange],
        prior_guesses: &[String],
    ) -> Result<String, CapabilityError> {
        let n = self.guesses.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_guess_on == Some(n) {
            return Err(CapabilityError::MalformedResponse("no guess in reply".into()));
        }
        assert_eq!(history.len(), prior_guesses.len() + 1);
        assert!(history.last().map_or(false, Exchange::is_answered));
        Ok(format!("guess {}", prior_guesses.len() + 1))
    }
}

/// Answers alternately "Yes" and "No"; fails on call number `fail_on` (1-based) when set.
#[derive(Default)]
pub struct AlternatingAnswerer {
    pub calls: AtomicUsize,
    pub fail_on: Option<usize>,
}

impl AlternatingAnswerer {
    pub fn failing_on(n: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on: Some(n),
        }
    }
}

#[async_trait]
impl Answerer for AlternatingAnswerer {
    async fn answer(&self, _secret: &str, _question: &str) -> Result<String, CapabilityError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == Some(n) {
            return Err(CapabilityError::Provider("connection reset".into()));
        }
        Ok(if n % 2 == 1 { "Yes" } else { "No" }.to_string())
    }
}

/// Returns true on call number `correct_on` (1-based), false otherwise.
#[derive(Default)]
pub struct NthCallJudge {
    pub calls: AtomicUsize,
    pub correct_on: Option<usize>,
}

impl NthCallJudge {
    pub fn never() -> Self {
        Self::default()
    }

    pub fn on(n: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            correct_on: Some(n),
        }
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Judge for NthCallJudge {
    async fn is_correct(&self, _secret: &str, _guess: &str) -> Result<bool, CapabilityError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(self.correct_on == Some(n))
    }
}

pub struct Harness {
    pub questioner: Arc<CountingQuestioner>,
    pub answerer: Arc<AlternatingAnswerer>,
    pub judge: Arc<NthCallJudge>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    pub fn new(answerer: AlternatingAnswerer, judge: NthCallJudge) -> Self {
        Self::with_questioner(CountingQuestioner::default(), answerer, judge)
    }

    pub fn with_questioner(
        questioner: CountingQuestioner,
        answerer: AlternatingAnswerer,
        judge: NthCallJudge,
    ) -> Self {
        Self {
            questioner: Arc::new(questioner),
            answerer: Arc::new(answerer),
            judge: Arc::new(judge),
            sink: Arc::new(RecordingSink::new()),
        }
    }

    pub fn coordinator(&self) -> Coordinator {
        Coordinator::new(
            self.questioner.clone(),
            self.answerer.clone(),
            self.judge.clone(),
        )
        .with_trace_sink(self.sink.clone())
    }
}
