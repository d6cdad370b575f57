//! Injectable random source for combat
//!
//! The resolver never touches a global RNG. Production code hands it an
//! entropy-seeded `RandSource`; tests hand it a seeded one or a scripted
//! implementation of `CombatRng` to force exact draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait CombatRng {
    /// Uniform draw in `[0, 1)`
    fn chance(&mut self) -> f64;

    /// Uniform draw in `[lo, hi)`; returns `lo` for an empty range
    fn uniform(&mut self, lo: f64, hi: f64) -> f64;

    /// Uniform index in `0..len`; `len` must be non-zero
    fn index(&mut self, len: usize) -> usize;

    /// Fair coin
    fn coin(&mut self) -> bool {
        self.chance() < 0.5
    }
}

/// Adapter from any `rand::Rng` to `CombatRng`
#[derive(Debug, Clone)]
pub struct RandSource<R>(pub R);

impl RandSource<StdRng> {
    /// Unseeded source for production battles
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl RandSource<ChaCha8Rng> {
    /// Reproducible source for tests and replays of the runner
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> CombatRng for RandSource<R> {
    fn chance(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            lo
        } else {
            self.0.gen_range(lo..hi)
        }
    }

    fn index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

impl<T: CombatRng + ?Sized> CombatRng for &mut T {
    fn chance(&mut self) -> f64 {
        (**self).chance()
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        (**self).uniform(lo, hi)
    }

    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }

    fn coin(&mut self) -> bool {
        (**self).coin()
    }
}
