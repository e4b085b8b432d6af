//! Height randomization for new nodes.
//!
//! Every insert draws one height in `[1, N]`. Heights only change how fast
//! searches are; every structural invariant holds for any draw.
//!
//! | Distribution | Shape | `P(h = 1)` for `N = 6` |
//! |---|---|---|
//! | `Uniform` | flat over `[1, N]` | 1/6 |
//! | `Logarithmic` (default) | reflected `log2` of a sample in `[1, 2^N)` | ~1/2 |
//! | `SquareRoot` | reflected `sqrt` of a sample in `[0, N^2)` | 11/36 |
//! | `Fixed(h)` | always `h` | 0 or 1 |

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Distribution of node heights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HeightDistribution {
    /// Every height equally likely.
    Uniform,

    /// Each level roughly half as populated as the one below.
    #[default]
    Logarithmic,

    /// Mass falls off linearly with height.
    SquareRoot,

    /// Always the given height, clamped to `[1, N]`.
    Fixed(usize),
}

/// Draws heights from a [`HeightDistribution`].
#[derive(Debug, Clone)]
pub(crate) struct HeightSampler {
    rng: SmallRng,
    distribution: HeightDistribution,
}

impl HeightSampler {
    pub(crate) fn new(distribution: HeightDistribution, seed: Option<u64>) -> Self {
        let rng: SmallRng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self { rng, distribution }
    }

    #[inline]
    pub(crate) const fn distribution(&self) -> HeightDistribution {
        self.distribution
    }

    /// Draw a height in `[1, max]`.
    pub(crate) fn draw(&mut self, max: usize) -> usize {
        debug_assert!(max > 0, "draw: max height must be positive");

        match self.distribution {
            HeightDistribution::Uniform => self.rng.gen_range(1..=max),

            HeightDistribution::Logarithmic => {
                let bits: u32 = u32::try_from(max).unwrap_or(u32::MAX).min(63);
                let sample: u64 = self.rng.gen_range(1..(1u64 << bits));
                let floor_log: usize = sample.ilog2() as usize;
                max.saturating_sub(floor_log).max(1)
            }

            HeightDistribution::SquareRoot => {
                let side: u64 = max as u64;
                let sample: u64 = self.rng.gen_range(0..side.saturating_mul(side));
                let floor_sqrt: usize = usize::try_from(sample.isqrt()).unwrap_or(max);
                max.saturating_sub(floor_sqrt).max(1)
            }

            HeightDistribution::Fixed(height) => height.clamp(1, max),
        }
    }
}
