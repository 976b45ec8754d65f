//! Logging helpers for game execution.
//!
//! Structured `tracing` events for run boundaries and phase transitions.

use crate::error::GameError;
use crate::record::{GameSummary, Phase, Winner};

/// Log game start.
pub fn log_game_start(max_rounds: u32) {
    tracing::info!(max_rounds, "Starting game");
}

/// Log phase entry.
pub fn log_phase_start(phase: Phase, round: u32) {
    tracing::debug!(phase = %phase, round, "Entering phase");
}

/// Log phase exit and the phase that follows.
pub fn log_phase_complete(phase: Phase, next: Phase) {
    tracing::debug!(phase = %phase, next = %next, "Phase complete");
}

/// Log the judge's verdict for a round.
pub fn log_verdict(round: u32, correct: bool) {
    tracing::debug!(round, correct, "Judge verdict");
}

/// Log game completion.
pub fn log_game_complete(summary: &GameSummary) {
    tracing::info!(
        winner = Winner::label(summary.winner),
        rounds = summary.rounds,
        questions = summary.questions_asked,
        "Game complete"
    );
}

/// Log game failure.
pub fn log_game_error(error: &GameError) {
    tracing::error!(?error, phase = ?error.phase(), "Game aborted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CapabilityError;

    #[test]
    fn test_logging_functions() {
        log_game_start(3);
        log_phase_start(Phase::Ask, 1);
        log_phase_complete(Phase::Ask, Phase::Answer);
        log_verdict(1, false);
        log_game_complete(&GameSummary {
            secret: "ball".into(),
            winner: Some(Winner::Questioner),
            rounds: 1,
            questions_asked: 1,
        });
        log_game_error(&GameError::CapabilityFailure {
            phase: Phase::Judge,
            source: CapabilityError::Empty,
        });
    }
}
