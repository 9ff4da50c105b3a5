//! Graph deduplication index.
//!
//! Canonical edge sets are hashed so structurally identical samples are
//! emitted at most once per graph size. The hash is a membership key only,
//! not a cryptographic digest.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::model::Edge;

/// Order-independent hash of a canonical edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphHash(pub u64);

/// Hash an edge list so that set-equal lists collide regardless of edge
/// order or endpoint orientation.
///
/// Each edge becomes `[min, max]` (or `[min, max, weight]`), the strings are
/// sorted and joined, and the joined key is hashed with SipHash under fixed
/// keys so the value is stable across runs.
pub fn hash_edges(edges: &[Edge]) -> GraphHash {
    let mut keys: Vec<String> = edges
        .iter()
        .map(|edge| {
            let (a, b) = edge.endpoints();
            match edge.weight {
                Some(w) => format!("[{a}, {b}, {w:?}]"),
                None => format!("[{a}, {b}]"),
            }
        })
        .collect();
    keys.sort();

    let mut hasher = DefaultHasher::new();
    keys.join(",").hash(&mut hasher);
    GraphHash(hasher.finish())
}

/// Hashes accepted so far within one graph-size run.
#[derive(Debug, Clone, Default)]
pub struct DedupIndex {
    seen: HashSet<GraphHash>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_duplicate(&self, hash: &GraphHash) -> bool {
        self.seen.contains(hash)
    }

    /// Record a hash. Idempotent; returns false if it was already present.
    pub fn record(&mut self, hash: GraphHash) -> bool {
        self.seen.insert(hash)
    }

    /// Forget everything, e.g. when moving to the next graph size.
    pub fn clear(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
