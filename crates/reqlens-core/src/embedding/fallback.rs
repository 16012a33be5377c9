//! Synthetic vectors used when no embedding vendor can serve a batch

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Model name reported for synthetic batches
pub const FALLBACK_MODEL: &str = "synthetic-fallback";

/// Generates shape-correct but meaningless vectors with components in [-1, 1]
#[derive(Debug, Clone)]
pub struct SyntheticEmbedder {
    dimensions: usize,
    seed: Option<u64>,
}

impl SyntheticEmbedder {
    pub fn new(dimensions: usize, seed: Option<u64>) -> Self {
        Self { dimensions, seed }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// One vector per input. With a seed, the same batch size always yields the same vectors.
    pub fn generate(&self, count: usize) -> Vec<Vec<f32>> {
        match self.seed {
            Some(seed) => self.fill(&mut StdRng::seed_from_u64(seed), count),
            None => self.fill(&mut rand::thread_rng(), count),
        }
    }

    fn fill<R: Rng>(&self, rng: &mut R, count: usize) -> Vec<Vec<f32>> {
        (0..count)
            .map(|_| {
                (0..self.dimensions)
                    .map(|_| rng.gen_range(-1.0f32..=1.0))
                    .collect()
            })
            .collect()
    }
}

/// Approximate usage for synthetic batches: total characters, not tokens
pub fn approximate_usage(texts: &[String]) -> u32 {
    let chars: usize = texts.iter().map(|t| t.chars().count()).sum();
    u32::try_from(chars).unwrap_or(u32::MAX)
}
