//! # Split Assembly
//!
//! Pulls samples one at a time, rejects structural duplicates and fills the
//! training, validation and testing buckets of one graph size until the
//! quota is met.
//!
//! ```text
//! FillingTrain ──(training quota met)──► FillingEval ──(evaluation quota met)──► Done
//! ```
//!
//! ## Evaluation slots
//!
//! The first `evaluation / 2` accepted evaluation samples go to validation
//! at their own index. Every later one goes to testing at
//! `index % (evaluation / 2)`, so with an odd quota testing slot 0 is
//! written twice and the earlier sample is lost. Each such overwrite is
//! counted and logged at `warn`.
//!
//! The dedup index spans all three buckets of a size and is reset between
//! sizes.

pub mod quota;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::canonical::canonicalize;
use crate::index::{hash_edges, DedupIndex};
use crate::model::{Algorithm, RawSample, ReasoningTrace};
use crate::sampler::Sampler;
use crate::{narrate, Error, Result};

pub use quota::{Quota, QuotaTable};

// ============================================================================
// Buckets
// ============================================================================

/// Which bucket a sample lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    Training,
    Validation,
    Testing,
}

impl SplitKind {
    pub const ALL: [SplitKind; 3] = [SplitKind::Training, SplitKind::Validation, SplitKind::Testing];

    /// Name of the raw container file.
    pub fn name(&self) -> &'static str {
        match self {
            SplitKind::Training => "training",
            SplitKind::Validation => "validation",
            SplitKind::Testing => "testing",
        }
    }

    /// Name of the split in the exported chat dataset.
    pub fn dataset_split_name(&self) -> &'static str {
        match self {
            SplitKind::Training => "train",
            SplitKind::Validation => "test",
            SplitKind::Testing => "evaluation",
        }
    }

    /// Validation and testing records withhold the answer from the prompt.
    pub fn is_evaluation(&self) -> bool {
        !matches!(self, SplitKind::Training)
    }
}

/// Raw samples and their traces, keyed identically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitBucket {
    samples: BTreeMap<usize, RawSample>,
    traces: BTreeMap<usize, ReasoningTrace>,
}

impl SplitBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a sample and its trace at `index`. Returns true if an earlier
    /// pair at that index was replaced.
    pub fn insert(&mut self, index: usize, sample: RawSample, trace: ReasoningTrace) -> bool {
        let replaced = self.samples.insert(index, sample).is_some();
        self.traces.insert(index, trace);
        replaced
    }

    pub fn get(&self, index: usize) -> Option<(&RawSample, &ReasoningTrace)> {
        Some((self.samples.get(&index)?, self.traces.get(&index)?))
    }

    pub fn samples(&self) -> &BTreeMap<usize, RawSample> {
        &self.samples
    }

    pub fn traces(&self) -> &BTreeMap<usize, ReasoningTrace> {
        &self.traces
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Counters of one assembly run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyStats {
    pub accepted: usize,
    pub discarded: usize,
    pub overwritten: usize,
}

/// All three buckets of one graph size.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSet {
    pub graph_size: usize,
    pub algorithm: Algorithm,
    pub training: SplitBucket,
    pub validation: SplitBucket,
    pub testing: SplitBucket,
    pub stats: AssemblyStats,
}

impl SplitSet {
    pub fn new(algorithm: Algorithm, graph_size: usize) -> Self {
        Self {
            graph_size,
            algorithm,
            training: SplitBucket::new(),
            validation: SplitBucket::new(),
            testing: SplitBucket::new(),
            stats: AssemblyStats::default(),
        }
    }

    pub fn bucket(&self, kind: SplitKind) -> &SplitBucket {
        match kind {
            SplitKind::Training => &self.training,
            SplitKind::Validation => &self.validation,
            SplitKind::Testing => &self.testing,
        }
    }
}

// ============================================================================
// Assembler
// ============================================================================

/// Where the quota loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FillingTrain,
    FillingEval,
    Done,
}

/// The quota loop for one algorithm.
///
/// Reusable across graph sizes; each `assemble` call starts from an empty
/// dedup index.
#[derive(Debug, Clone)]
pub struct SplitAssembler {
    algorithm: Algorithm,
    negative_edges: bool,
    /// Consecutive duplicates tolerated before giving up. 0 disables the cap.
    retry_budget: usize,
    dedup: DedupIndex,
    phase: Phase,
}

impl SplitAssembler {
    pub fn new(algorithm: Algorithm, negative_edges: bool, retry_budget: usize) -> Self {
        Self {
            algorithm,
            negative_edges,
            retry_budget,
            dedup: DedupIndex::new(),
            phase: Phase::FillingTrain,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Distinct graphs accepted by the last or current run.
    pub fn unique_graphs(&self) -> usize {
        self.dedup.len()
    }

    /// Fill the buckets of one graph size from `sampler`.
    pub fn assemble<S: Sampler + ?Sized>(
        &mut self,
        sampler: &mut S,
        graph_size: usize,
        quota: Quota,
    ) -> Result<SplitSet> {
        self.dedup.clear();
        let mut set = SplitSet::new(self.algorithm, graph_size);
        let half = quota.validation_half();
        let mut filled_train = 0;
        let mut filled_eval = 0;
        let mut consecutive_duplicates = 0;

        loop {
            self.phase = if filled_train < quota.training {
                Phase::FillingTrain
            } else if filled_eval < quota.evaluation {
                Phase::FillingEval
            } else {
                Phase::Done
            };
            if self.phase == Phase::Done {
                break;
            }

            let sample = sampler.next_sample()?;
            let graph = canonicalize(self.algorithm, &sample.inputs)?;
            let hash = hash_edges(graph.edges());

            if self.dedup.is_duplicate(&hash) {
                set.stats.discarded += 1;
                consecutive_duplicates += 1;
                debug!(graph_size, hash = hash.0, consecutive_duplicates, "duplicate graph discarded");
                if self.retry_budget > 0 && consecutive_duplicates >= self.retry_budget {
                    return Err(Error::ExhaustedUniqueGraphs {
                        graph_size,
                        attempts: consecutive_duplicates,
                    });
                }
                continue;
            }
            consecutive_duplicates = 0;

            let trace = narrate(self.algorithm, self.negative_edges, &graph, &sample)?;
            self.dedup.record(hash);

            match self.phase {
                Phase::FillingTrain => {
                    set.training.insert(filled_train, sample, trace);
                    filled_train += 1;
                }
                Phase::FillingEval => {
                    if filled_eval < half {
                        set.validation.insert(filled_eval, sample, trace);
                    } else {
                        let slot = if half == 0 { filled_eval } else { filled_eval % half };
                        if set.testing.insert(slot, sample, trace) {
                            set.stats.overwritten += 1;
                            warn!(graph_size, slot, "testing slot overwritten by evaluation wrap-around");
                        }
                    }
                    filled_eval += 1;
                }
                Phase::Done => {}
            }
            set.stats.accepted += 1;
        }

        Ok(set)
    }
}
