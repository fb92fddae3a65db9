//! Gaussian noise sources, used to model the noise floor of analog circuits.

use iir::pinking::Pinking;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256PlusPlus;


/// Unit variance white Gaussian noise.
#[derive(Debug, Clone)]
pub struct WhiteNoise {
    rng: Xoshiro256PlusPlus,
}

impl Default for WhiteNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl WhiteNoise {
    /// A source seeded from the operating system's entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }

    /// A reproducible source.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    pub fn process(&mut self) -> f64 {
        self.rng.sample(StandardNormal)
    }
}

/// Noise with a -3dB/octave spectrum.
#[derive(Debug, Clone, Default)]
pub struct PinkNoise {
    white: WhiteNoise,
    pinking: Pinking,
}

impl PinkNoise {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            white: WhiteNoise::with_seed(seed),
            pinking: Pinking::default(),
        }
    }

    pub fn process(&mut self) -> f64 {
        self.pinking.process(self.white.process())
    }
}
