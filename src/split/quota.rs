//! Per-graph-size sample quotas.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How many unique samples one graph size contributes.
///
/// Serialized as a `[training, evaluation]` pair. The evaluation count is
/// split between validation and testing by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Quota {
    pub training: usize,
    pub evaluation: usize,
}

impl Quota {
    pub fn new(training: usize, evaluation: usize) -> Self {
        Self { training, evaluation }
    }

    /// Evaluation slots that go to validation; the rest go to testing.
    pub fn validation_half(&self) -> usize {
        self.evaluation / 2
    }
}

impl From<(usize, usize)> for Quota {
    fn from((training, evaluation): (usize, usize)) -> Self {
        Self { training, evaluation }
    }
}

impl From<Quota> for (usize, usize) {
    fn from(quota: Quota) -> Self {
        (quota.training, quota.evaluation)
    }
}

/// Quotas keyed by graph size, with a fallback for untabulated sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaTable {
    pub default: Quota,
    #[serde(default)]
    pub sizes: BTreeMap<usize, Quota>,
}

impl QuotaTable {
    pub fn new(default: Quota) -> Self {
        Self { default, sizes: BTreeMap::new() }
    }

    pub fn with_size(mut self, graph_size: usize, quota: Quota) -> Self {
        self.sizes.insert(graph_size, quota);
        self
    }

    pub fn quota_for(&self, graph_size: usize) -> Quota {
        self.sizes.get(&graph_size).copied().unwrap_or(self.default)
    }
}
