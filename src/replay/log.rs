//! Text move-log line format.
//!
//! One line per applied move:
//!
//! ```text
//! PLAYER <id> MOVE: <piece> <direction>
//! PLAYER <id> MOVE: END TURN
//! ```
//!
//! The format is the interchange between the playout generator, the
//! validator and renderers, and must not change.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Direction, N_PIECES_PER_PLAYER};
use crate::core::{Move, PlayerId};

/// One parsed log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogMove {
    pub player: PlayerId,
    pub mv: Move,
}

impl LogMove {
    #[must_use]
    pub fn new(player: PlayerId, mv: Move) -> Self {
        Self { player, mv }
    }
}

impl std::fmt::Display for LogMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mv {
            Move::Hop { piece, direction } => write!(
                f,
                "PLAYER {} MOVE: {} {}",
                self.player.raw(),
                piece,
                direction.index()
            ),
            Move::EndTurn => write!(f, "PLAYER {} MOVE: END TURN", self.player.raw()),
        }
    }
}

/// Why a line is not a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogParseError {
    /// Not of the form `PLAYER <id> MOVE: <a> <b>`.
    Malformed,
    /// Player token is not 1 or 2.
    BadPlayer(String),
    /// Piece token is not an integer in `0..10`.
    BadPiece(String),
    /// Direction token is not an integer in `0..6`.
    BadDirection(String),
}

impl std::fmt::Display for LogParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogParseError::Malformed => write!(f, "not a move line"),
            LogParseError::BadPlayer(token) => write!(f, "invalid player {:?}", token),
            LogParseError::BadPiece(token) => write!(f, "invalid piece index {:?}", token),
            LogParseError::BadDirection(token) => write!(f, "invalid direction {:?}", token),
        }
    }
}

impl std::error::Error for LogParseError {}

impl FromStr for LogMove {
    type Err = LogParseError;

    /// Tokens may be separated by any run of whitespace.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [keyword, player, label, a, b] = tokens[..] else {
            return Err(LogParseError::Malformed);
        };
        if keyword != "PLAYER" || label != "MOVE:" {
            return Err(LogParseError::Malformed);
        }

        let player = player
            .parse::<i32>()
            .ok()
            .and_then(PlayerId::from_raw)
            .ok_or_else(|| LogParseError::BadPlayer(player.to_string()))?;

        if (a, b) == ("END", "TURN") {
            return Ok(LogMove::new(player, Move::EndTurn));
        }

        let piece = a
            .parse::<usize>()
            .ok()
            .filter(|&p| p < N_PIECES_PER_PLAYER)
            .ok_or_else(|| LogParseError::BadPiece(a.to_string()))?;
        let direction = b
            .parse::<usize>()
            .ok()
            .and_then(Direction::from_index)
            .ok_or_else(|| LogParseError::BadDirection(b.to_string()))?;

        Ok(LogMove::new(player, Move::Hop { piece, direction }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let hop = LogMove::new(PlayerId::One, Move::hop(9, Direction::SouthEast));
        assert_eq!(hop.to_string(), "PLAYER 1 MOVE: 9 2");

        let end = LogMove::new(PlayerId::Two, Move::EndTurn);
        assert_eq!(end.to_string(), "PLAYER 2 MOVE: END TURN");
    }

    #[test]
    fn test_parse_lines() {
        assert_eq!(
            "PLAYER 2 MOVE: 0 5".parse::<LogMove>(),
            Ok(LogMove::new(PlayerId::Two, Move::hop(0, Direction::NorthWest)))
        );
        assert_eq!(
            "  PLAYER 1\tMOVE:  END   TURN \n".parse::<LogMove>(),
            Ok(LogMove::new(PlayerId::One, Move::EndTurn))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<LogMove>(), Err(LogParseError::Malformed));
        assert_eq!("PLAYER 1 MOVE: 3".parse::<LogMove>(), Err(LogParseError::Malformed));
        assert_eq!("PLAYER 1 MOVES: 3 1".parse::<LogMove>(), Err(LogParseError::Malformed));
        assert_eq!("PLAYER 1 MOVE: 3 1 7".parse::<LogMove>(), Err(LogParseError::Malformed));
        assert_eq!(
            "PLAYER 3 MOVE: 3 1".parse::<LogMove>(),
            Err(LogParseError::BadPlayer("3".into()))
        );
        assert_eq!(
            "PLAYER 1 MOVE: 10 1".parse::<LogMove>(),
            Err(LogParseError::BadPiece("10".into()))
        );
        assert_eq!(
            "PLAYER 1 MOVE: 4 six".parse::<LogMove>(),
            Err(LogParseError::BadDirection("six".into()))
        );
        assert_eq!(
            "PLAYER 1 MOVE: END NOW".parse::<LogMove>(),
            Err(LogParseError::BadPiece("END".into()))
        );
    }
}
