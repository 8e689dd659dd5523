//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! RandomStep draws from a GameRng seeded once per run, so a run
//! replayed with the same seed and the same input makes the same moves.

use crate::types::Direction;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct GameRng {
    seed:  u64,
    inner: Pcg64Mcg,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// One of the four directions, uniformly.
    pub fn direction(&mut self) -> Direction {
        Direction::ALL[self.next_u64_below(Direction::ALL.len() as u64) as usize]
    }
}
