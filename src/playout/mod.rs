//! Uniform random self-play.
//!
//! A playout repeatedly samples a legal move uniformly from the action
//! mask and applies it, optionally writing each move as a log line. This
//! is how bulk move logs are generated for validation and rendering.
//!
//! ```
//! use chinese_checkers::playout::{Playout, PlayoutConfig};
//!
//! let config = PlayoutConfig::new().with_max_turns(20).with_seed(1);
//! let mut log = Vec::new();
//! let summary = Playout::new(config).run(&mut log).unwrap();
//!
//! assert_eq!(summary.turns, 20);
//! assert_eq!(String::from_utf8(log).unwrap().lines().count() as u64, summary.moves);
//! ```

pub mod config;

pub use config::PlayoutConfig;

use std::io::Write;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::{GameRng, GameState, PlayerId};
use crate::replay::LogMove;
use crate::rules::{ChineseCheckers, RulesEngine};

/// Why a playout stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayoutEnd {
    /// A winner was recorded and the config stops on wins.
    Winner(PlayerId),
    /// `max_turns` turns completed.
    TurnLimit,
    /// The mask was empty.
    NoLegalMoves,
}

impl std::fmt::Display for PlayoutEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayoutEnd::Winner(p) => write!(f, "{} wins", p),
            PlayoutEnd::TurnLimit => write!(f, "turn limit reached"),
            PlayoutEnd::NoLegalMoves => write!(f, "no legal moves"),
        }
    }
}

/// Result of one playout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutSummary {
    pub seed: u64,
    /// Completed turns.
    pub turns: u32,
    /// Applied moves, END_TURN included.
    pub moves: u64,
    pub end: PlayoutEnd,
    /// Winner recorded in the final state, whether or not play stopped for it.
    pub winner: Option<PlayerId>,
}

/// One game driven by uniform random move choice.
#[derive(Clone, Debug)]
pub struct Playout {
    config: PlayoutConfig,
    rng: GameRng,
    state: GameState,
    moves: u64,
    stalled: bool,
}

impl Playout {
    /// Playout seeded from `config.seed`.
    pub fn new(config: PlayoutConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self::with_rng(config, rng)
    }

    /// Playout drawing moves from an explicit generator.
    pub fn with_rng(config: PlayoutConfig, rng: GameRng) -> Self {
        Self {
            config,
            rng,
            state: GameState::new(),
            moves: 0,
            stalled: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Why play has stopped, or `None` if it can continue.
    pub fn end(&self) -> Option<PlayoutEnd> {
        if self.stalled {
            return Some(PlayoutEnd::NoLegalMoves);
        }
        if self.config.stop_on_win {
            if let Some(winner) = self.state.winner() {
                return Some(PlayoutEnd::Winner(winner));
            }
        }
        if self.state.turn_count() >= self.config.max_turns {
            return Some(PlayoutEnd::TurnLimit);
        }
        None
    }

    /// Sample and apply one move. Returns `None` once play has stopped.
    pub fn step(&mut self) -> Option<LogMove> {
        if self.end().is_some() {
            return None;
        }
        let mask = ChineseCheckers.compute_action_mask(&self.state);
        let Some(mv) = self.rng.sample_legal(mask) else {
            self.stalled = true;
            return None;
        };
        let log_move = LogMove::new(self.state.current_player(), mv);
        ChineseCheckers.apply_move_unchecked(&mut self.state, mv);
        self.moves += 1;
        Some(log_move)
    }

    /// Play to the end, writing one log line per move to `out`.
    ///
    /// Progress goes to stderr every `progress_every` completed turns.
    pub fn run<W: Write>(&mut self, out: &mut W) -> std::io::Result<PlayoutSummary> {
        let start = Instant::now();
        let every = self.config.progress_every;
        let mut last_turn = self.state.turn_count();

        while let Some(log_move) = self.step() {
            writeln!(out, "{}", log_move)?;

            let turn = self.state.turn_count();
            if every > 0 && turn != last_turn && turn % every == 0 {
                eprintln!("Total time elapsed for turn: {} = {}s", turn, start.elapsed().as_secs());
            }
            last_turn = turn;
        }
        out.flush()?;
        Ok(self.summary())
    }

    /// Play to the end without logging.
    pub fn run_silent(&mut self) -> PlayoutSummary {
        while self.step().is_some() {}
        self.summary()
    }

    pub fn summary(&self) -> PlayoutSummary {
        PlayoutSummary {
            seed: self.rng.seed(),
            turns: self.state.turn_count(),
            moves: self.moves,
            end: self.end().unwrap_or(PlayoutEnd::TurnLimit),
            winner: self.state.winner(),
        }
    }
}

/// Play `n_games` independent silent playouts in parallel.
///
/// Game `i` uses `GameRng::for_stream(config.seed, i)`, so results do not
/// depend on thread scheduling.
pub fn run_many(config: &PlayoutConfig, n_games: usize) -> Vec<PlayoutSummary> {
    (0..n_games)
        .into_par_iter()
        .map(|i| {
            let rng = GameRng::for_stream(config.seed, i as u64);
            Playout::with_rng(config.clone(), rng).run_silent()
        })
        .collect()
}
