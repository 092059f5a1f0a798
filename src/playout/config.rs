//! Random-playout configuration.

use serde::{Deserialize, Serialize};

/// Configuration for random playouts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutConfig {
    /// Stop once this many turns have completed.
    pub max_turns: u32,

    /// Seed for move sampling. Parallel runs derive one stream per game.
    pub seed: u64,

    /// Stop as soon as a winner is recorded. When false, play continues
    /// until `max_turns` like the original log generator.
    pub stop_on_win: bool,

    /// Completed turns between progress lines on stderr.
    /// 0 = silent.
    pub progress_every: u32,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            max_turns: 10_000,
            seed: 0,
            stop_on_win: true,
            progress_every: 0,
        }
    }
}

impl PlayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the turn limit.
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = turns;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set whether a recorded winner ends the playout.
    pub fn with_stop_on_win(mut self, stop: bool) -> Self {
        self.stop_on_win = stop;
        self
    }

    /// Set the progress interval in turns (0 disables).
    pub fn with_progress_every(mut self, turns: u32) -> Self {
        self.progress_every = turns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = PlayoutConfig::default();
        assert_eq!(config.max_turns, 10_000);
        assert!(config.stop_on_win);
        assert_eq!(config.progress_every, 0);
    }

    #[test]
    fn test_builders() {
        let config = PlayoutConfig::new()
            .with_max_turns(5)
            .with_seed(9)
            .with_stop_on_win(false)
            .with_progress_every(100);

        assert_eq!(config.max_turns, 5);
        assert_eq!(config.seed, 9);
        assert!(!config.stop_on_win);
        assert_eq!(config.progress_every, 100);
    }

    #[test]
    fn test_serde() {
        let config = PlayoutConfig::new().with_seed(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: PlayoutConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
