//! Canonical graph instance and the edge lookup translators query.

use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Node index inside one sampled graph.
pub type NodeIdx = usize;

/// An undirected edge, optionally weighted.
///
/// Renders like the tuples in the narrated text: `(0, 1)` or `(0, 1, 2.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: NodeIdx,
    pub v: NodeIdx,
    pub weight: Option<f64>,
}

impl Edge {
    pub fn unweighted(u: NodeIdx, v: NodeIdx) -> Self {
        Self { u, v, weight: None }
    }

    pub fn weighted(u: NodeIdx, v: NodeIdx, weight: f64) -> Self {
        Self { u, v, weight: Some(weight) }
    }

    /// Endpoints ordered smaller first.
    pub fn endpoints(&self) -> (NodeIdx, NodeIdx) {
        (self.u.min(self.v), self.u.max(self.v))
    }

    pub fn connects(&self, a: NodeIdx, b: NodeIdx) -> bool {
        (self.u == a && self.v == b) || (self.u == b && self.v == a)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.weight {
            Some(w) => write!(f, "({}, {}, {:?})", self.u, self.v, w),
            None => write!(f, "({}, {})", self.u, self.v),
        }
    }
}

/// A sampled graph after canonicalization. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphInstance {
    node_count: usize,
    edges: Vec<Edge>,
    source: Option<NodeIdx>,
}

impl GraphInstance {
    pub fn new(node_count: usize, edges: Vec<Edge>, source: Option<NodeIdx>) -> Self {
        Self { node_count, edges, source }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn source(&self) -> Option<NodeIdx> {
        self.source
    }

    pub fn lookup(&self) -> EdgeLookup {
        EdgeLookup::from_edges(self.node_count, &self.edges)
    }
}

/// Membership and neighborhood queries over a canonical edge list.
///
/// Translators consult this instead of the raw adjacency matrix.
#[derive(Debug, Clone, Default)]
pub struct EdgeLookup {
    pairs: HashSet<(NodeIdx, NodeIdx)>,
    /// node → sorted, distinct neighbors
    neighbors: Vec<SmallVec<[NodeIdx; 8]>>,
}

impl EdgeLookup {
    pub fn from_edges(node_count: usize, edges: &[Edge]) -> Self {
        let span = edges
            .iter()
            .map(|e| e.u.max(e.v) + 1)
            .max()
            .unwrap_or(0)
            .max(node_count);

        let mut pairs = HashSet::with_capacity(edges.len());
        let mut neighbors: Vec<SmallVec<[NodeIdx; 8]>> = vec![SmallVec::new(); span];
        for edge in edges {
            if pairs.insert(edge.endpoints()) {
                neighbors[edge.u].push(edge.v);
                neighbors[edge.v].push(edge.u);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }
        Self { pairs, neighbors }
    }

    /// Whether an edge joins `a` and `b`, in either orientation.
    pub fn contains(&self, a: NodeIdx, b: NodeIdx) -> bool {
        self.pairs.contains(&(a.min(b), a.max(b)))
    }

    /// Sorted 1-hop neighborhood. Unknown nodes have none.
    pub fn neighbors(&self, node: NodeIdx) -> &[NodeIdx] {
        self.neighbors.get(node).map(|n| n.as_slice()).unwrap_or(&[])
    }

    /// Whether any edge has both endpoints inside `nodes`.
    pub fn has_internal_edge(&self, nodes: &[NodeIdx]) -> bool {
        nodes.iter().any(|&a| {
            self.neighbors(a).iter().any(|b| nodes.contains(b))
        })
    }
}
