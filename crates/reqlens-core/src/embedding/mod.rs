//! Text embeddings with guaranteed shape
//!
//! Every batch comes back with one vector per input, each exactly
//! `dimensions` long. Callers must check `fallback` before trusting the
//! vectors for similarity search.

mod fallback;
mod pipeline;

pub use fallback::{approximate_usage, SyntheticEmbedder, FALLBACK_MODEL};
pub use pipeline::{EmbeddingBatchResult, EmbeddingPipeline, EmbeddingUsage};

/// Default vector length, matching the default embedding model
pub const DEFAULT_DIMENSIONS: usize = 1536;
