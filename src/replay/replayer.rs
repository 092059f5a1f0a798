//! Replaying a move log through the rules engine.
//!
//! The log stores no coordinates, so every consumer that wants from/to
//! cells (renderers, validators) has to replay it from the opening
//! position. Lines that fail to parse, belong to the wrong player, or are
//! illegal in the replayed position are skipped and reported as
//! diagnostics; they never touch the state.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::board::Cell;
use crate::core::{GameState, MoveOutcome, PlayerId};
use crate::rules::{ChineseCheckers, RulesEngine, RulesError};

use super::log::{LogMove, LogParseError};

/// One applied log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStep {
    /// 1-based line number in the log.
    pub line: usize,
    pub log_move: LogMove,
    pub outcome: MoveOutcome,
}

impl ReplayStep {
    /// Cell the piece left, if a piece moved.
    #[must_use]
    pub fn from(&self) -> Option<Cell> {
        self.outcome.cells().map(|(from, _)| from)
    }

    /// Cell the piece landed on, if a piece moved.
    #[must_use]
    pub fn to(&self) -> Option<Cell> {
        self.outcome.cells().map(|(_, to)| to)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticReason {
    Parse(LogParseError),
    WrongPlayer { expected: PlayerId, found: PlayerId },
    Illegal(RulesError),
}

impl std::fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticReason::Parse(e) => write!(f, "could not parse move: {}", e),
            DiagnosticReason::WrongPlayer { expected, found } => {
                write!(f, "wrong player: expected {}, got {}", expected.raw(), found.raw())
            }
            DiagnosticReason::Illegal(e) => write!(f, "{}", e),
        }
    }
}

/// A skipped log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayDiagnostic {
    pub line: usize,
    pub text: String,
    pub reason: DiagnosticReason,
}

impl std::fmt::Display for ReplayDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {} - {}", self.line, self.text, self.reason)
    }
}

/// Streaming replayer: feed lines one at a time.
#[derive(Clone, Debug, Default)]
pub struct Replayer {
    state: GameState,
    line: usize,
}

impl Replayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process the next line. Blank lines count toward line numbers but
    /// yield `None`.
    pub fn feed(&mut self, text: &str) -> Option<Result<ReplayStep, ReplayDiagnostic>> {
        self.line += 1;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let line = self.line;
        let diagnostic = |reason| ReplayDiagnostic {
            line,
            text: trimmed.to_string(),
            reason,
        };

        let log_move = match trimmed.parse::<LogMove>() {
            Ok(m) => m,
            Err(e) => return Some(Err(diagnostic(DiagnosticReason::Parse(e)))),
        };
        let expected = self.state.current_player();
        if log_move.player != expected {
            return Some(Err(diagnostic(DiagnosticReason::WrongPlayer {
                expected,
                found: log_move.player,
            })));
        }

        Some(
            ChineseCheckers
                .apply_move(&mut self.state, log_move.mv)
                .map(|outcome| ReplayStep {
                    line,
                    log_move,
                    outcome,
                })
                .map_err(|e| diagnostic(DiagnosticReason::Illegal(e))),
        )
    }

    /// Position after every line fed so far.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}

/// A fully replayed log.
#[derive(Clone, Debug)]
pub struct Replay {
    steps: Vec<ReplayStep>,
    diagnostics: Vec<ReplayDiagnostic>,
    final_state: GameState,
}

impl Replay {
    /// Read and replay a whole log.
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut builder = ReplayBuilder::default();
        for line in reader.lines() {
            builder.push(&line?);
        }
        Ok(builder.finish())
    }

    /// Replay a log held in memory.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut builder = ReplayBuilder::default();
        for line in text.lines() {
            builder.push(line);
        }
        builder.finish()
    }

    #[must_use]
    pub fn steps(&self) -> &[ReplayStep] {
        &self.steps
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[ReplayDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn final_state(&self) -> &GameState {
        &self.final_state
    }

    /// Position after the first `n` applied steps.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds the number of steps.
    #[must_use]
    pub fn state_after(&self, n: usize) -> GameState {
        assert!(n <= self.steps.len(), "Only {} steps recorded", self.steps.len());
        let mut state = GameState::new();
        for step in &self.steps[..n] {
            ChineseCheckers.apply_move_unchecked(&mut state, step.log_move.mv);
        }
        state
    }
}

#[derive(Default)]
struct ReplayBuilder {
    replayer: Replayer,
    steps: Vec<ReplayStep>,
    diagnostics: Vec<ReplayDiagnostic>,
}

impl ReplayBuilder {
    fn push(&mut self, line: &str) {
        match self.replayer.feed(line) {
            Some(Ok(step)) => self.steps.push(step),
            Some(Err(diagnostic)) => self.diagnostics.push(diagnostic),
            None => {}
        }
    }

    fn finish(self) -> Replay {
        Replay {
            steps: self.steps,
            diagnostics: self.diagnostics,
            final_state: self.replayer.into_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Direction;
    use crate::core::Move;

    #[test]
    fn test_replay_records_cells() {
        let replay = Replay::from_text("PLAYER 1 MOVE: 9 2\nPLAYER 2 MOVE: 9 5\n");

        assert!(replay.diagnostics().is_empty());
        assert_eq!(replay.steps().len(), 2);
        let first = replay.steps()[0];
        assert_eq!(first.from(), Some(Cell::new(3, 7)));
        assert_eq!(first.to(), Some(Cell::new(4, 8)));
        assert_eq!(replay.final_state().turn_count(), 2);
    }

    #[test]
    fn test_replay_skips_bad_lines() {
        let text = "garbage\n\nPLAYER 2 MOVE: 0 0\nPLAYER 1 MOVE: END TURN\nPLAYER 1 MOVE: 9 3\n";
        let replay = Replay::from_text(text);

        let reasons: Vec<_> = replay.diagnostics().iter().map(|d| (d.line, d.reason.clone())).collect();
        assert_eq!(
            reasons,
            vec![
                (1, DiagnosticReason::Parse(LogParseError::Malformed)),
                (
                    3,
                    DiagnosticReason::WrongPlayer {
                        expected: PlayerId::One,
                        found: PlayerId::Two
                    }
                ),
                (4, DiagnosticReason::Illegal(RulesError::EndTurnWithoutChain)),
            ]
        );
        assert_eq!(replay.steps().len(), 1);
        assert_eq!(replay.steps()[0].line, 5);
        assert_eq!(
            replay.steps()[0].log_move.mv,
            Move::hop(9, Direction::SouthWest)
        );
    }

    #[test]
    fn test_state_after() {
        let replay = Replay::from_text("PLAYER 1 MOVE: 9 2\nPLAYER 2 MOVE: 9 5\n");
        assert_eq!(replay.state_after(0), GameState::new());
        assert_eq!(&replay.state_after(2), replay.final_state());
        assert_eq!(replay.state_after(1).current_player(), PlayerId::Two);
    }

    #[test]
    fn test_from_reader() {
        let text = "PLAYER 1 MOVE: 9 2\n";
        let replay = Replay::from_reader(std::io::Cursor::new(text)).unwrap();
        assert_eq!(replay.steps().len(), 1);
    }

    #[test]
    fn test_diagnostic_display() {
        let replay = Replay::from_text("PLAYER 1 MOVE: END TURN");
        assert_eq!(
            replay.diagnostics()[0].to_string(),
            "line 1: PLAYER 1 MOVE: END TURN - END TURN without an active skip chain"
        );
    }
}
