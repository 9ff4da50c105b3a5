//! The six supported algorithm families.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Algorithm whose execution traces can be narrated.
///
/// Names follow the sampler's registry (`bfs`, `mst_prim`, ...). Parsing any
/// other name fails with [`Error::UnsupportedAlgorithm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    BellmanFord,
    MstPrim,
    FloydWarshall,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Dijkstra,
        Algorithm::BellmanFord,
        Algorithm::MstPrim,
        Algorithm::FloydWarshall,
    ];

    /// Registry name, as used in configuration and output paths.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::BellmanFord => "bellman_ford",
            Algorithm::MstPrim => "mst_prim",
            Algorithm::FloydWarshall => "floyd_warshall",
        }
    }

    /// Human-readable name used in prompts.
    pub fn title(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "Breadth-First Search",
            Algorithm::Dfs => "Depth-First Search",
            Algorithm::Dijkstra => "Dijkstra's algorithm",
            Algorithm::BellmanFord => "the Bellman-Ford algorithm",
            Algorithm::MstPrim => "Prim's minimum spanning tree algorithm",
            Algorithm::FloydWarshall => "the Floyd-Warshall algorithm",
        }
    }

    /// Whether the canonical edge list carries weights.
    pub fn is_weighted(&self) -> bool {
        !matches!(self, Algorithm::Bfs | Algorithm::Dfs)
    }

    /// Whether the sampler supplies a one-hot source vector `s`.
    pub fn has_source(&self) -> bool {
        !matches!(self, Algorithm::Dfs | Algorithm::FloydWarshall)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| Error::UnsupportedAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}
