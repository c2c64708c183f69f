//! Seeded random source shared by an experiment.

use rand::prelude::*;

/// Random number generator wrapper that hands out seeds for landscapes and
/// agents, so one experiment seed reproduces the whole run.
pub struct ExperimentRng {
    rng: StdRng,
}

impl ExperimentRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Next seed for a dependent generator.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Fresh generator seeded from this one.
    pub fn fork(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.next_seed())
    }
}

impl RngCore for ExperimentRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
