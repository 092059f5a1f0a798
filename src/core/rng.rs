//! Deterministic random number generation for self-play.
//!
//! - **Deterministic**: same seed, same sequence of moves
//! - **Forkable**: independent child generators for parallel games
//! - **Mask sampling**: uniform choice among legal move slots
//!
//! ```
//! use chinese_checkers::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let mut child = rng.fork();
//!
//! // A second generator with the same seed forks the same child.
//! let mut rng2 = GameRng::new(42);
//! let mut child2 = rng2.fork();
//! assert_eq!(child.gen_range_usize(0..1000), child2.gen_range_usize(0..1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::action::{ActionMask, Move};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork a child generator. Each call yields a different, reproducible
    /// child.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        Self::new(mix(self.seed, self.fork_counter))
    }

    /// Generator for the `index`-th game of a run seeded with `seed`.
    ///
    /// Unlike `fork`, this needs no shared mutable parent, so parallel
    /// workers can derive their streams independently.
    #[must_use]
    pub fn for_stream(seed: u64, index: u64) -> Self {
        Self::new(mix(seed, index.wrapping_add(1)))
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Pick one legal move uniformly at random, or `None` for an empty mask.
    pub fn sample_legal(&mut self, mask: ActionMask) -> Option<Move> {
        let count = mask.count();
        if count == 0 {
            return None;
        }
        let n = self.gen_range_usize(0..count);
        mask.nth_index(n).and_then(Move::from_index)
    }
}

fn mix(seed: u64, counter: u64) -> u64 {
    seed.wrapping_add(counter.wrapping_mul(GOLDEN_GAMMA))
}
