//! In-memory sampler.
//!
//! This is the reference implementation of `Sampler`. It hands out samples
//! that were prepared up front, in order, and fails once they run out.
//!
//! ## Limitations
//!
//! - **No generation**: the seed is echoed in `SamplerSpec` but never used.
//! - **Finite**: an exhausted replay is a `Sampler` error, not an end of
//!   stream, because the assembler only stops on quota.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use crate::model::{Algorithm, RawSample};
use crate::{Error, Result};
use super::{Sampler, SamplerFactory, SamplerSpec};

// ============================================================================
// ReplaySampler
// ============================================================================

/// Replays a fixed queue of samples.
#[derive(Debug, Clone, Default)]
pub struct ReplaySampler {
    queue: VecDeque<RawSample>,
}

impl ReplaySampler {
    pub fn new(samples: impl IntoIterator<Item = RawSample>) -> Self {
        Self { queue: samples.into_iter().collect() }
    }

    /// Samples left to replay.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Sampler for ReplaySampler {
    fn next_batch(&mut self, batch_size: usize) -> Result<Vec<RawSample>> {
        if self.queue.len() < batch_size {
            return Err(Error::Sampler(format!(
                "replay exhausted: {} requested, {} left",
                batch_size,
                self.queue.len()
            )));
        }
        Ok(self.queue.drain(..batch_size).collect())
    }
}

// ============================================================================
// ReplayFactory
// ============================================================================

/// Hands out one `ReplaySampler` per graph size.
#[derive(Debug, Clone, Default)]
pub struct ReplayFactory {
    by_size: BTreeMap<usize, Vec<RawSample>>,
}

impl ReplayFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the samples replayed for graphs of `graph_size` nodes.
    pub fn with_size(mut self, graph_size: usize, samples: Vec<RawSample>) -> Self {
        self.by_size.insert(graph_size, samples);
        self
    }

    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_size.keys().copied()
    }
}

impl SamplerFactory for ReplayFactory {
    type Sampler = ReplaySampler;

    fn build_sampler(
        &self,
        algorithm: Algorithm,
        num_samples: Option<usize>,
        length: usize,
        seed: u64,
    ) -> Result<(ReplaySampler, SamplerSpec)> {
        let samples = self.by_size.get(&length).ok_or_else(|| {
            Error::Sampler(format!("no samples prepared for graph size {length}"))
        })?;
        let take = num_samples.unwrap_or(samples.len()).min(samples.len());
        debug!(%algorithm, length, take, "building replay sampler");

        let sampler = ReplaySampler::new(samples.iter().take(take).cloned());
        let spec = SamplerSpec { algorithm, length, seed, num_samples };
        Ok((sampler, spec))
    }
}
