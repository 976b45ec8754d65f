//! Human-readable console output: banner, live transcript lines per trace event, and the
//! closing summary blocks.

use twentyq::{GameRecord, TraceEvent};

/// Banner printed before the game starts. The secret is shown to the operator only.
pub fn banner(secret: &str, max_rounds: u32) -> Vec<String> {
    vec![
        "===== 20 QUESTIONS GAME =====".to_string(),
        format!("Object to guess (hidden from player): {}", secret),
        format!("Maximum rounds: {}", max_rounds),
        "Game starting...".to_string(),
    ]
}

/// Console lines for one event; empty for events that have no console form.
pub fn event_lines(event: &TraceEvent) -> Vec<String> {
    match event {
        TraceEvent::GameStarted { .. } => Vec::new(),
        TraceEvent::QuestionAsked { round, question } => {
            vec![String::new(), format!("Question {}: {}", round, question)]
        }
        TraceEvent::AnswerReceived { answer, .. } => vec![format!("Answer: {}", answer)],
        TraceEvent::GuessMade { guess, .. } => vec![format!("Guess: {}", guess)],
        TraceEvent::Verdict { correct: true, .. } => vec!["Correct!".to_string()],
        TraceEvent::Verdict { correct: false, .. } => {
            vec!["Incorrect. Moving to next question...".to_string()]
        }
        TraceEvent::GameOver { summary } => {
            let mut lines = vec![String::new()];
            lines.extend(summary.to_string().lines().map(str::to_string));
            lines
        }
    }
}

/// Conversation log and final-state block printed after the run.
pub fn closing(record: &GameRecord) -> Vec<String> {
    let mut lines = vec![String::new(), "----- CONVERSATION LOG -----".to_string()];
    lines.extend(record.transcript());
    lines.push(String::new());
    lines.push("----- FINAL STATE -----".to_string());
    lines.push(format!("Questions asked: {}", record.exchanges.len()));
    lines.push(format!("Rounds completed: {}", record.round));
    lines.push(format!("Winner: {}", record.winner_label()));
    lines
}

/// Conversation so far for a game that stopped before it was decided.
pub fn aborted(record: &GameRecord) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!("----- GAME STOPPED IN {} -----", record.phase.to_string().to_uppercase()),
    ];
    lines.extend(record.transcript());
    lines.push(format!("Rounds reached: {}", record.round));
    lines
}
