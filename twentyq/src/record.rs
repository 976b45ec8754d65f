//! Game record: the single typed state that flows through every phase.
//!
//! One `GameRecord` per run. The coordinator owns it exclusively; phases only
//! append to `exchanges` and `guesses`, except for attaching the answer to the
//! most recent question.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Current state of the turn sequencer.
///
/// Fixed cycle: Ask → Answer → Guess → Judge → (Ask | End).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Ask,
    Answer,
    Guess,
    Judge,
    End,
}

impl Phase {
    /// Successor for phases that have exactly one. Judge branches and End is terminal.
    pub fn next_in_round(self) -> Option<Phase> {
        match self {
            Phase::Ask => Some(Phase::Answer),
            Phase::Answer => Some(Phase::Guess),
            Phase::Guess => Some(Phase::Judge),
            Phase::Judge | Phase::End => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Ask => "ask",
            Phase::Answer => "answer",
            Phase::Guess => "guess",
            Phase::Judge => "judge",
            Phase::End => "end",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who won. Only the judge sets it; "no winner" is `Option::None` on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Questioner,
}

impl Winner {
    /// Display form of an optional winner: `"No one"` when unset.
    pub fn label(winner: Option<Winner>) -> &'static str {
        match winner {
            Some(Winner::Questioner) => "Questioner",
            None => "No one",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Winner::label(Some(*self)))
    }
}

/// One question and, once answered, its answer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    /// Empty until the answerer has replied.
    pub answer: String,
}

impl Exchange {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: String::new(),
        }
    }

    pub fn is_answered(&self) -> bool {
        !self.answer.is_empty()
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_answered() {
            write!(f, "{} → {}", self.question, self.answer)
        } else {
            f.write_str(&self.question)
        }
    }
}

/// Shared game state for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Hidden object, fixed for the run.
    pub secret: String,
    pub exchanges: Vec<Exchange>,
    pub guesses: Vec<String>,
    /// Current round, starting at 1. After the game ends it equals the number of judge steps.
    pub round: u32,
    pub max_rounds: u32,
    pub winner: Option<Winner>,
    pub phase: Phase,
}

impl GameRecord {
    /// Fresh record: round 1, phase Ask, empty histories.
    pub fn new(secret: impl Into<String>, max_rounds: u32) -> Self {
        Self {
            secret: secret.into(),
            exchanges: Vec::new(),
            guesses: Vec::new(),
            round: 1,
            max_rounds,
            winner: None,
            phase: Phase::Ask,
        }
    }

    /// Appends a new exchange with an empty answer.
    pub fn push_question(&mut self, question: impl Into<String>) {
        self.exchanges.push(Exchange::new(question));
    }

    /// Attaches `answer` to the most recent exchange. Returns false when there is none.
    pub fn attach_answer(&mut self, answer: impl Into<String>) -> bool {
        match self.exchanges.last_mut() {
            Some(last) => {
                last.answer = answer.into();
                true
            }
            None => false,
        }
    }

    pub fn push_guess(&mut self, guess: impl Into<String>) {
        self.guesses.push(guess.into());
    }

    pub fn last_question(&self) -> Option<&str> {
        self.exchanges.last().map(|e| e.question.as_str())
    }

    pub fn last_guess(&self) -> Option<&str> {
        self.guesses.last().map(String::as_str)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::End
    }

    /// Winner for display: "Questioner" or "No one".
    pub fn winner_label(&self) -> &'static str {
        Winner::label(self.winner)
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            secret: self.secret.clone(),
            winner: self.winner,
            rounds: self.round,
            questions_asked: self.exchanges.len(),
        }
    }

    /// Conversation log: one `Q{n}` line per exchange followed by its `Guess {n}` line.
    pub fn transcript(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.exchanges.len() + self.guesses.len());
        for (i, exchange) in self.exchanges.iter().enumerate() {
            let n = i + 1;
            lines.push(format!("Q{}: {}", n, exchange));
            if let Some(guess) = self.guesses.get(i) {
                lines.push(format!("Guess {}: {}", n, guess));
            }
        }
        lines
    }
}

/// Final outcome of a run, emitted at End.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub secret: String,
    pub winner: Option<Winner>,
    pub rounds: u32,
    pub questions_asked: usize,
}

impl fmt::Display for GameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "----- GAME OVER -----")?;
        writeln!(f, "The correct answer was: {}", self.secret)?;
        writeln!(f, "Winner: {}", Winner::label(self.winner))?;
        write!(f, "Rounds played: {}", self.rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_starts_at_round_one_in_ask() {
        let r = GameRecord::new("chair", 5);
        assert_eq!(r.round, 1);
        assert_eq!(r.phase, Phase::Ask);
        assert!(r.winner.is_none());
        assert!(r.exchanges.is_empty() && r.guesses.is_empty());
    }

    #[test]
    fn attach_answer_merges_into_last_exchange() {
        let mut r = GameRecord::new("chair", 5);
        assert!(!r.attach_answer("Yes"));
        r.push_question("Is it alive?");
        r.push_question("Is it furniture?");
        assert!(r.attach_answer("Yes"));
        assert_eq!(r.exchanges.len(), 2);
        assert!(!r.exchanges[0].is_answered());
        assert_eq!(r.exchanges[1].answer, "Yes");
    }

    #[test]
    fn exchange_display_uses_arrow_once_answered() {
        let mut e = Exchange::new("Is it big?");
        assert_eq!(e.to_string(), "Is it big?");
        e.answer = "No".into();
        assert_eq!(e.to_string(), "Is it big? → No");
    }

    #[test]
    fn phase_cycle_has_fixed_successors() {
        assert_eq!(Phase::Ask.next_in_round(), Some(Phase::Answer));
        assert_eq!(Phase::Answer.next_in_round(), Some(Phase::Guess));
        assert_eq!(Phase::Guess.next_in_round(), Some(Phase::Judge));
        assert_eq!(Phase::Judge.next_in_round(), None);
        assert_eq!(Phase::End.next_in_round(), None);
    }

    #[test]
    fn transcript_interleaves_questions_and_guesses() {
        let mut r = GameRecord::new("ball", 3);
        r.push_question("Is it round?");
        r.attach_answer("Yes");
        r.push_guess("ball");
        assert_eq!(
            r.transcript(),
            vec!["Q1: Is it round? → Yes".to_string(), "Guess 1: ball".to_string()]
        );
    }

    #[test]
    fn summary_reports_no_one_when_winner_unset() {
        let r = GameRecord::new("tree", 1);
        let s = r.summary();
        assert_eq!(s.winner, None);
        assert!(s.to_string().contains("Winner: No one"));
        assert!(s.to_string().contains("The correct answer was: tree"));
    }

    #[test]
    fn winner_label_comes_from_option() {
        let mut r = GameRecord::new("tree", 1);
        assert_eq!(r.winner_label(), "No one");
        r.winner = Some(Winner::Questioner);
        assert_eq!(r.winner_label(), "Questioner");
        assert_eq!(Winner::Questioner.to_string(), "Questioner");
        assert!(serde_json::from_str::<Winner>("\"none\"").is_err());
    }

    #[test]
    fn phase_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Phase::Judge).unwrap(), "\"judge\"");
        assert_eq!(
            serde_json::to_string(&Winner::Questioner).unwrap(),
            "\"questioner\""
        );
    }
}
