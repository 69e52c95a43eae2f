//! Seeded random stream owned by each generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// An explicit, owned, seedable random stream.
///
/// Generators only draw from it when they are duplicated: each draw seeds
/// one clone, so a tree of generators built from the same initial seed
/// always produces the same derived seeds.
#[derive(Debug, Clone)]
pub struct RandomStream {
    seed: u64,
    draws: u64,
    rng: StdRng,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed this stream was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Draw the seed of a derived stream. Advances the stream.
    pub fn next_seed(&mut self) -> u64 {
        self.draws += 1;
        self.rng.r#gen::<u64>()
    }
}
