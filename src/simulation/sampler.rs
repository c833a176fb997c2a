//! Random return sources for the simulation engine.
//!
//! The engine never touches an RNG directly. It asks a [`RandomSource`]
//! for one [`ReturnSampler`] per path, so every path owns an independent
//! stream and paths can be simulated in any order or in parallel.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// One normally distributed monthly return per call.
pub trait ReturnSampler {
    fn sample(&mut self, mean: f64, std_dev: f64) -> f64;
}

/// Hands out an independent sampler for each path index.
///
/// Implementations must return the same stream for the same index so
/// that a run does not depend on the order paths are processed in.
pub trait RandomSource: Sync {
    type Sampler: ReturnSampler;

    fn sampler_for_path(&self, path: usize) -> Self::Sampler;
}

/// Normal draws backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct NormalSampler<R> {
    rng: R,
}

impl<R: Rng> NormalSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ReturnSampler for NormalSampler<R> {
    fn sample(&mut self, mean: f64, std_dev: f64) -> f64 {
        let z: f64 = self.rng.sample(StandardNormal);
        mean + std_dev * z
    }
}

/// Reproducible per-path streams derived from one base seed.
///
/// # Examples
///
/// ```
/// use retirement_stress::simulation::sampler::{RandomSource, ReturnSampler, SeededSource};
///
/// let source = SeededSource::new(42);
/// let a = source.sampler_for_path(7).sample(0.0, 1.0);
/// let b = source.sampler_for_path(7).sample(0.0, 1.0);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededSource {
    seed: u64,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededSource {
    type Sampler = NormalSampler<StdRng>;

    fn sampler_for_path(&self, path: usize) -> Self::Sampler {
        NormalSampler::new(StdRng::seed_from_u64(derive_seed(self.seed, path)))
    }
}

/// Seeded from OS entropy; every run differs.
#[derive(Debug, Clone, Copy)]
pub struct EntropySource {
    inner: SeededSource,
}

impl EntropySource {
    pub fn new() -> Self {
        Self {
            inner: SeededSource::new(rand::random()),
        }
    }

    /// The seed drawn for this source, so a run can be replayed.
    pub fn seed(&self) -> u64 {
        self.inner.seed()
    }
}

impl Default for EntropySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropySource {
    type Sampler = NormalSampler<StdRng>;

    fn sampler_for_path(&self, path: usize) -> Self::Sampler {
        self.inner.sampler_for_path(path)
    }
}

/// Every draw is exactly the mean: the deterministic expected path.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSampler;

impl ReturnSampler for MeanSampler {
    fn sample(&mut self, mean: f64, _std_dev: f64) -> f64 {
        mean
    }
}

impl RandomSource for MeanSource {
    type Sampler = MeanSampler;

    fn sampler_for_path(&self, _path: usize) -> Self::Sampler {
        MeanSampler
    }
}

fn derive_seed(base_seed: u64, path: usize) -> u64 {
    splitmix64(base_seed ^ (path as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
