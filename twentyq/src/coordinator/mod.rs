//! Game coordinator: the turn-taking state machine.
//!
//! Owns one `GameRecord` for the length of a run and drives it through
//! Ask → Answer → Guess → Judge, looping back to Ask until the judge accepts a
//! guess or the round budget is spent. Each phase awaits its capability before the
//! next one starts; nothing runs in parallel.
//!
//! Cancellation and the optional deadline are checked at phase boundaries only, so an
//! in-flight capability call is never interrupted.

mod logging;

pub use logging::{
    log_game_complete, log_game_error, log_game_start, log_phase_complete, log_phase_start,
    log_verdict,
};

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::capability::{Answerer, Judge, Questioner};
use crate::error::{GameError, GameFailure};
use crate::record::{Exchange, GameRecord, Phase, Winner};
use crate::trace::{NoopSink, TraceEvent, TraceSink};

/// Runs a game against three injected capabilities.
///
/// **Interaction**: Built by the CLI (with LLM-backed capabilities) or by tests
/// (with deterministic stubs); see `run` and `step`.
#[derive(Clone)]
pub struct Coordinator {
    questioner: Arc<dyn Questioner>,
    answerer: Arc<dyn Answerer>,
    judge: Arc<dyn Judge>,
    sink: Arc<dyn TraceSink>,
    cancel: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl Coordinator {
    pub fn new(
        questioner: Arc<dyn Questioner>,
        answerer: Arc<dyn Answerer>,
        judge: Arc<dyn Judge>,
    ) -> Self {
        Self {
            questioner,
            answerer,
            judge,
            sink: Arc::new(NoopSink),
            cancel: None,
            deadline: None,
        }
    }

    /// Sends every transition to `sink` in addition to the tracing logs.
    pub fn with_trace_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Aborts the run at the next phase boundary once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Aborts the run at the first phase boundary reached after `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Plays the game to the end and returns the final record.
    ///
    /// Rejects `max_rounds == 0`, an empty secret and an inconsistent record before any
    /// capability is called. A record already in `End` is returned unchanged. On error the
    /// [`GameFailure`] carries the record as it stood when the run stopped.
    pub async fn run(&self, initial: GameRecord) -> Result<GameRecord, GameFailure> {
        if let Err(e) = validate(&initial) {
            return Err(GameFailure::new(e, initial));
        }
        if initial.is_finished() {
            return Ok(initial);
        }

        let span = tracing::info_span!("game", run_id = %Uuid::new_v4());
        async move {
            let mut record = initial;
            log_game_start(record.max_rounds);
            self.sink.emit(&TraceEvent::GameStarted {
                secret_len: record.secret.chars().count(),
                max_rounds: record.max_rounds,
            });

            while !record.is_finished() {
                if let Err(e) = self.step(&mut record).await {
                    log_game_error(&e);
                    return Err(GameFailure::new(e, record));
                }
            }
            Ok(record)
        }
        .instrument(span)
        .await
    }

    /// Executes exactly one phase of `record`. A finished record is left untouched; an
    /// inconsistent one is rejected with `InvalidConfig` and left untouched too.
    pub async fn step(&self, record: &mut GameRecord) -> Result<(), GameError> {
        let phase = record.phase;
        if phase == Phase::End {
            return Ok(());
        }
        check_shape(record)?;
        self.check_boundary(phase)?;
        log_phase_start(phase, record.round);

        match phase {
            Phase::Ask => {
                let question = self
                    .questioner
                    .ask_question(&record.exchanges)
                    .await
                    .map_err(|e| GameError::capability(phase, e))?;
                self.sink.emit(&TraceEvent::QuestionAsked {
                    round: record.round,
                    question: question.clone(),
                });
                record.push_question(question);
            }
            Phase::Answer => {
                let answer = {
                    let question = record.last_question().ok_or_else(|| {
                        GameError::InvalidConfig("answer phase without a question".into())
                    })?;
                    self.answerer
                        .answer(&record.secret, question)
                        .await
                        .map_err(|e| GameError::capability(phase, e))?
                };
                self.sink.emit(&TraceEvent::AnswerReceived {
                    round: record.round,
                    answer: answer.clone(),
                });
                record.attach_answer(answer);
            }
            Phase::Guess => {
                let guess = self
                    .questioner
                    .guess(&record.exchanges, &record.guesses)
                    .await
                    .map_err(|e| GameError::capability(phase, e))?;
                self.sink.emit(&TraceEvent::GuessMade {
                    round: record.round,
                    guess: guess.clone(),
                });
                record.push_guess(guess);
            }
            Phase::Judge => {
                let correct = {
                    let guess = record.last_guess().ok_or_else(|| {
                        GameError::InvalidConfig("judge phase without a guess".into())
                    })?;
                    self.judge
                        .is_correct(&record.secret, guess)
                        .await
                        .map_err(|e| GameError::capability(phase, e))?
                };
                log_verdict(record.round, correct);
                self.sink.emit(&TraceEvent::Verdict {
                    round: record.round,
                    correct,
                });

                if correct {
                    record.winner = Some(Winner::Questioner);
                    self.enter_end(record);
                } else if record.round >= record.max_rounds {
                    self.enter_end(record);
                } else {
                    record.round += 1;
                    record.phase = Phase::Ask;
                }
            }
            Phase::End => return Ok(()),
        }

        // Ask, Answer and Guess have a single fixed successor; Judge set the phase above.
        if let Some(next) = phase.next_in_round() {
            record.phase = next;
        }
        log_phase_complete(phase, record.phase);
        Ok(())
    }

    fn enter_end(&self, record: &mut GameRecord) {
        record.phase = Phase::End;
        let summary = record.summary();
        log_game_complete(&summary);
        self.sink.emit(&TraceEvent::GameOver { summary });
    }

    fn check_boundary(&self, phase: Phase) -> Result<(), GameError> {
        if self.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(GameError::Cancelled { phase });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(GameError::DeadlineExceeded { phase });
        }
        Ok(())
    }
}

fn validate(record: &GameRecord) -> Result<(), GameError> {
    if record.max_rounds == 0 {
        return Err(GameError::InvalidConfig("max_rounds must be at least 1".into()));
    }
    if record.secret.trim().is_empty() {
        return Err(GameError::InvalidConfig("secret must not be empty".into()));
    }
    if record.round == 0 || record.round > record.max_rounds {
        return Err(GameError::InvalidConfig(format!(
            "round {} outside 1..={}",
            record.round, record.max_rounds
        )));
    }
    check_shape(record)
}

/// A winner only exists at End, and the histories must fit the phase:
/// Ask and Judge have one guess per exchange, Answer and Guess have one exchange more.
fn check_shape(record: &GameRecord) -> Result<(), GameError> {
    if record.winner.is_some() && record.phase != Phase::End {
        return Err(GameError::InvalidConfig(format!(
            "winner already set in phase {}",
            record.phase
        )));
    }
    let (exchanges, guesses) = (record.exchanges.len(), record.guesses.len());
    let fits = match record.phase {
        Phase::Ask => exchanges == guesses,
        Phase::Judge => exchanges == guesses && guesses > 0,
        Phase::Answer => {
            exchanges == guesses + 1
                && !record.exchanges.last().is_some_and(Exchange::is_answered)
        }
        Phase::Guess => exchanges == guesses + 1,
        Phase::End => true,
    };
    if !fits {
        return Err(GameError::InvalidConfig(format!(
            "{} phase with {} exchanges and {} guesses",
            record.phase, exchanges, guesses
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::CapabilityError;

    struct Fixed;

    #[async_trait]
    impl Questioner for Fixed {
        async fn ask_question(&self, history: &[Exchange]) -> Result<String, CapabilityError> {
            Ok(format!("question {}", history.len() + 1))
        }
        async fn guess(
            &self,
            _history: &[Exchange],
            prior: &[String],
        ) -> Result<String, CapabilityError> {
            Ok(format!("guess {}", prior.len() + 1))
        }
    }

    #[async_trait]
    impl Answerer for Fixed {
        async fn answer(&self, _secret: &str, _question: &str) -> Result<String, CapabilityError> {
            Ok("No".into())
        }
    }

    #[async_trait]
    impl Judge for Fixed {
        async fn is_correct(&self, _secret: &str, _guess: &str) -> Result<bool, CapabilityError> {
            Ok(false)
        }
    }

    fn coordinator() -> Coordinator {
        Coordinator::new(Arc::new(Fixed), Arc::new(Fixed), Arc::new(Fixed))
    }

    /// **Scenario**: One step from Ask appends an unanswered exchange and moves to Answer.
    #[tokio::test]
    async fn step_from_ask_appends_question() {
        let mut record = GameRecord::new("ball", 2);
        coordinator().step(&mut record).await.unwrap();
        assert_eq!(record.phase, Phase::Answer);
        assert_eq!(record.exchanges, vec![Exchange::new("question 1")]);
    }

    /// **Scenario**: Stepping a finished record is a no-op.
    #[tokio::test]
    async fn step_on_end_is_noop() {
        let mut record = GameRecord::new("ball", 2);
        record.phase = Phase::End;
        let before = record.clone();
        coordinator().step(&mut record).await.unwrap();
        assert_eq!(record, before);
    }

    /// **Scenario**: A record in Answer with no exchange is rejected, not panicked on.
    #[tokio::test]
    async fn answer_without_question_is_invalid() {
        let mut record = GameRecord::new("ball", 2);
        record.phase = Phase::Answer;
        let err = coordinator().step(&mut record).await.unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }

    /// **Scenario**: A Judge record whose guesses outnumber its exchanges is rejected and
    /// left as it was.
    #[tokio::test]
    async fn judge_with_mismatched_history_is_invalid() {
        let mut record = GameRecord::new("ball", 2);
        record.push_guess("ball");
        record.phase = Phase::Judge;
        let before = record.clone();
        let err = coordinator().step(&mut record).await.unwrap_err();
        match err {
            GameError::InvalidConfig(msg) => {
                assert_eq!(msg, "judge phase with 0 exchanges and 1 guesses")
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
        assert_eq!(record, before);
    }

    /// **Scenario**: Answer on an exchange that already has its answer is rejected.
    #[tokio::test]
    async fn answer_on_answered_exchange_is_invalid() {
        let mut record = GameRecord::new("ball", 2);
        record.push_question("Is it round?");
        record.attach_answer("Yes");
        record.phase = Phase::Answer;
        let err = coordinator().step(&mut record).await.unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
        assert_eq!(record.exchanges[0].answer, "Yes");
    }

    /// **Scenario**: A winner on a record that is not finished is rejected before any call.
    #[tokio::test]
    async fn winner_outside_end_is_rejected() {
        let mut record = GameRecord::new("ball", 3);
        record.winner = Some(Winner::Questioner);
        let failure = coordinator().run(record.clone()).await.unwrap_err();
        assert!(matches!(failure.error, GameError::InvalidConfig(_)));
        assert_eq!(*failure.record, record);

        let mut stepped = record.clone();
        assert!(coordinator().step(&mut stepped).await.is_err());
        assert_eq!(stepped, record);
    }

    #[test]
    fn validate_checks_history_against_phase() {
        let mut r = GameRecord::new("ball", 3);
        r.phase = Phase::Guess;
        assert!(validate(&r).is_err());
        r.push_question("Is it round?");
        r.attach_answer("Yes");
        assert!(validate(&r).is_ok());
        r.phase = Phase::Ask;
        assert!(validate(&r).is_err());
        r.push_guess("ball");
        assert!(validate(&r).is_ok());
        r.phase = Phase::Judge;
        assert!(validate(&r).is_ok());
    }

    #[test]
    fn validate_rejects_zero_rounds_and_blank_secret() {
        assert!(matches!(
            validate(&GameRecord::new("ball", 0)),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(matches!(
            validate(&GameRecord::new("  ", 3)),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(validate(&GameRecord::new("ball", 1)).is_ok());
    }

    /// **Scenario**: A deadline already in the past stops the run before Ask.
    #[tokio::test]
    async fn past_deadline_stops_before_first_phase() {
        let c = coordinator().with_deadline(Instant::now());
        let failure = c.run(GameRecord::new("ball", 3)).await.unwrap_err();
        assert!(matches!(
            failure.error,
            GameError::DeadlineExceeded { phase: Phase::Ask }
        ));
        assert_eq!(*failure.record, GameRecord::new("ball", 3));
    }
}
