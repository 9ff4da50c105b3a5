//! # Sampler Boundary
//!
//! The contract between the narrator and whatever executes the algorithms on
//! random graphs. The narrator never generates graphs itself; it pulls raw
//! samples through these traits.
//!
//! ## Implementations
//!
//! | Sampler | Module | Description |
//! |---------|--------|-------------|
//! | `ReplaySampler` | `replay` | Replays prepared samples from memory |

pub mod replay;

use serde::{Deserialize, Serialize};

use crate::model::{Algorithm, RawSample};
use crate::{Error, Result};

pub use replay::{ReplayFactory, ReplaySampler};

// ============================================================================
// SamplerSpec
// ============================================================================

/// What a factory actually built. Echoed back so callers can log the
/// effective parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerSpec {
    pub algorithm: Algorithm,
    /// Graph size (node count) of every sample.
    pub length: usize,
    pub seed: u64,
    /// `None` for an unbounded stream.
    pub num_samples: Option<usize>,
}

// ============================================================================
// Traits
// ============================================================================

/// A stream of raw samples.
pub trait Sampler {
    /// Pull the next `batch_size` samples.
    fn next_batch(&mut self, batch_size: usize) -> Result<Vec<RawSample>>;

    /// Pull a single-sample batch and unwrap it.
    fn next_sample(&mut self) -> Result<RawSample> {
        self.next_batch(1)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Sampler("sampler returned an empty batch".into()))
    }
}

impl<S: Sampler + ?Sized> Sampler for Box<S> {
    fn next_batch(&mut self, batch_size: usize) -> Result<Vec<RawSample>> {
        (**self).next_batch(batch_size)
    }
}

/// Builds samplers for one algorithm and graph size.
pub trait SamplerFactory {
    type Sampler: Sampler;

    /// Build a sampler producing graphs of `length` nodes.
    ///
    /// `num_samples: None` requests an unbounded stream.
    fn build_sampler(
        &self,
        algorithm: Algorithm,
        num_samples: Option<usize>,
        length: usize,
        seed: u64,
    ) -> Result<(Self::Sampler, SamplerSpec)>;
}
