//! Source of the random choices made while practicing: which item of the
//! priority window comes next, and the coin flips in question generation.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait Chooser {
    /// A uniformly random index in `0..len`. Callers never pass zero.
    fn index(&mut self, len: usize) -> usize;

    /// A fair coin.
    fn coin_flip(&mut self) -> bool {
        self.index(2) == 1
    }
}

impl<C: Chooser + ?Sized> Chooser for &mut C {
    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }

    fn coin_flip(&mut self) -> bool {
        (**self).coin_flip()
    }
}

/// Adapts any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngChooser<R>(pub R);

impl RngChooser<StdRng> {
    pub fn from_os_rng() -> Self {
        Self(StdRng::from_os_rng())
    }
}

impl RngChooser<ChaCha8Rng> {
    /// Reproducible choices, for simulations.
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Chooser for RngChooser<R> {
    fn index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }

    fn coin_flip(&mut self) -> bool {
        self.0.random_bool(0.5)
    }
}

/// Replays a fixed sequence of picks, for tests.
///
/// Each pick is reduced modulo the requested length, so a script written for
/// a five-item window still works on a two-item pool. Once the script runs
/// out every pick is 0.
#[derive(Clone, Debug, Default)]
pub struct ScriptedChooser {
    picks: VecDeque<usize>,
}

impl ScriptedChooser {
    pub fn new(picks: impl IntoIterator<Item = usize>) -> Self {
        Self {
            picks: picks.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl Chooser for ScriptedChooser {
    fn index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len.max(1)
    }
}
