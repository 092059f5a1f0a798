//! Whole-log validation.
//!
//! Streams a log through a [`Replayer`] without keeping the steps, so it
//! works on multi-million line logs from the generator.

use std::io::BufRead;

use serde::Serialize;

use crate::board::N_PIECES_PER_PLAYER;
use crate::core::{Move, PlayerId, PlayerMap};

use super::replayer::{ReplayDiagnostic, Replayer};

/// Result of validating a log.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    /// Every rejected line, in log order.
    pub errors: Vec<ReplayDiagnostic>,
    /// Applied hops per player and piece.
    pub piece_moves: PlayerMap<[u64; N_PIECES_PER_PLAYER]>,
    /// Lines applied to the replayed game.
    pub moves_applied: u64,
    /// Completed turns in the replayed game.
    pub turns: u32,
    /// Winner of the replayed game.
    pub winner: Option<PlayerId>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Counts only, for machine-readable output.
#[derive(Serialize)]
pub struct ReportSummary<'a> {
    pub errors: usize,
    pub moves_applied: u64,
    pub turns: u32,
    pub winner: Option<PlayerId>,
    pub piece_moves: &'a PlayerMap<[u64; N_PIECES_PER_PLAYER]>,
}

impl ValidationReport {
    #[must_use]
    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            errors: self.errors.len(),
            moves_applied: self.moves_applied,
            turns: self.turns,
            winner: self.winner,
            piece_moves: &self.piece_moves,
        }
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            writeln!(f, "All {} moves are valid.", self.moves_applied)?;
        } else {
            writeln!(f, "Found {} invalid lines:", self.errors.len())?;
            for error in &self.errors {
                writeln!(f, "  {}", error)?;
            }
        }
        writeln!(f, "Turns completed: {}", self.turns)?;
        if let Some(winner) = self.winner {
            writeln!(f, "Winner: {}", winner)?;
        }

        writeln!(f)?;
        writeln!(f, "Piece movement analysis:")?;
        for (player, counts) in self.piece_moves.iter() {
            writeln!(f, "{} piece movements:", player)?;
            for (piece, count) in counts.iter().enumerate() {
                writeln!(f, "  Piece {}: {} moves", piece, count)?;
            }
        }
        Ok(())
    }
}

/// Replay a log and collect every problem with it.
pub fn validate_log<R: BufRead>(reader: R) -> std::io::Result<ValidationReport> {
    let mut replayer = Replayer::new();
    let mut report = ValidationReport::default();

    for line in reader.lines() {
        match replayer.feed(&line?) {
            Some(Ok(step)) => {
                report.moves_applied += 1;
                if let Move::Hop { piece, .. } = step.log_move.mv {
                    report.piece_moves[step.log_move.player][piece] += 1;
                }
            }
            Some(Err(diagnostic)) => report.errors.push(diagnostic),
            None => {}
        }
    }

    let state = replayer.state();
    report.turns = state.turn_count();
    report.winner = state.winner();
    Ok(report)
}
