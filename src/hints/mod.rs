//! # Hint Translators
//!
//! One interpreter per algorithm family. Each reads the per-step snapshots
//! of a sample's hint probes and reconstructs the discrete events they imply:
//! dequeues, pushes and pops, relaxations, terminations.
//!
//! ## Flow
//!
//! ```text
//! RawSample ─► HintState::from_sample()   validate probe names and shapes once
//!           ─► HintState::translate()     per-family interpreter
//!           ─► Translation { events, answer }
//! ```
//!
//! Every interpreter stops emitting once it detects its family's termination
//! condition. Rows after that point are padding.
//!
//! | Family | Module | Probes |
//! |--------|--------|--------|
//! | BFS | `bfs` | `reach_h`, `pi_h`, output `pi` |
//! | DFS | `dfs` | `color`, `s` |
//! | Dijkstra | `dijkstra` | `d`, `mark`, `in_queue`, `u` |
//! | Bellman-Ford | `bellman_ford` | `d`, `pi_h`, `msk` |
//! | Prim | `prim` | `key`, `pi_h`, `mark`, `in_queue`, `u` |
//! | Floyd-Warshall | `floyd_warshall` | `D` |

pub mod bfs;
pub mod dfs;
pub mod dijkstra;
pub mod bellman_ford;
pub mod prim;
pub mod floyd_warshall;

use ndarray::{s, Array2, Ix3, Ix4};

use crate::model::{Algorithm, Edge, EdgeLookup, NodeIdx, Probe, RawSample, TraceEvent};
use crate::{Error, Result};

pub use bfs::BfsState;
pub use dfs::{DfsState, NodeColor};
pub use dijkstra::DijkstraState;
pub use bellman_ford::BellmanFordState;
pub use prim::PrimState;
pub use floyd_warshall::FloydWarshallState;

/// One value per node, one row per step.
pub type NodeRows = Vec<Vec<f64>>;

// ============================================================================
// Translation context and result
// ============================================================================

/// Everything a translator needs besides the snapshots themselves.
#[derive(Debug, Clone, Copy)]
pub struct TranslateContext<'a> {
    /// Recover BFS edges the reachability array may have missed.
    pub negative_edges: bool,
    /// Canonical edges of the sample's graph.
    pub edges: &'a EdgeLookup,
    pub source: Option<NodeIdx>,
}

impl TranslateContext<'_> {
    pub(crate) fn require_source(&self, algorithm: Algorithm) -> Result<NodeIdx> {
        self.source.ok_or_else(|| {
            Error::MalformedInput(format!("{algorithm} translation needs a source node"))
        })
    }
}

/// Final value a translator derives, handed to the output renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Nodes whose predecessor differs from themselves.
    Reachable(Vec<NodeIdx>),
    /// Merged, node-sorted components.
    Components(Vec<Vec<NodeIdx>>),
    /// `(from, to, distance)` triples.
    Distances(Vec<Edge>),
    /// One distance per node, measured from `source`.
    DistanceArray { source: NodeIdx, distances: Vec<f64> },
    /// `(min, max, key)` triples.
    MstEdges(Vec<Edge>),
}

impl Answer {
    pub fn kind(&self) -> &'static str {
        match self {
            Answer::Reachable(_) => "reachable-set",
            Answer::Components(_) => "components",
            Answer::Distances(_) => "distance-triples",
            Answer::DistanceArray { .. } => "distance-array",
            Answer::MstEdges(_) => "mst-edges",
        }
    }
}

/// Ordered events plus the derived answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub events: Vec<TraceEvent>,
    pub answer: Answer,
}

// ============================================================================
// Typed per-algorithm state
// ============================================================================

/// A sample's hint probes, validated and flattened for one algorithm.
#[derive(Debug, Clone, PartialEq)]
pub enum HintState {
    Bfs(BfsState),
    Dfs(DfsState),
    Dijkstra(DijkstraState),
    BellmanFord(BellmanFordState),
    Prim(PrimState),
    FloydWarshall(FloydWarshallState),
}

impl HintState {
    /// Validate the probes `algorithm` needs and flatten them to per-node rows.
    pub fn from_sample(algorithm: Algorithm, sample: &RawSample) -> Result<Self> {
        Ok(match algorithm {
            Algorithm::Bfs => HintState::Bfs(BfsState::from_sample(sample)?),
            Algorithm::Dfs => HintState::Dfs(DfsState::from_sample(sample)?),
            Algorithm::Dijkstra => HintState::Dijkstra(DijkstraState::from_sample(sample)?),
            Algorithm::BellmanFord => HintState::BellmanFord(BellmanFordState::from_sample(sample)?),
            Algorithm::MstPrim => HintState::Prim(PrimState::from_sample(sample)?),
            Algorithm::FloydWarshall => {
                HintState::FloydWarshall(FloydWarshallState::from_sample(sample)?)
            }
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            HintState::Bfs(_) => Algorithm::Bfs,
            HintState::Dfs(_) => Algorithm::Dfs,
            HintState::Dijkstra(_) => Algorithm::Dijkstra,
            HintState::BellmanFord(_) => Algorithm::BellmanFord,
            HintState::Prim(_) => Algorithm::MstPrim,
            HintState::FloydWarshall(_) => Algorithm::FloydWarshall,
        }
    }

    pub fn translate(&self, ctx: &TranslateContext<'_>) -> Result<Translation> {
        match self {
            HintState::Bfs(state) => bfs::translate(state, ctx),
            HintState::Dfs(state) => dfs::translate(state, ctx),
            HintState::Dijkstra(state) => dijkstra::translate(state, ctx),
            HintState::BellmanFord(state) => bellman_ford::translate(state, ctx),
            HintState::Prim(state) => prim::translate(state, ctx),
            HintState::FloydWarshall(state) => floyd_warshall::translate(state, ctx),
        }
    }
}

/// Translate a sample's hints for an algorithm given by registry name.
pub fn translate_hints(
    algorithm: &str,
    negative_edges: bool,
    edges: &EdgeLookup,
    sample: &RawSample,
    source: Option<NodeIdx>,
) -> Result<Translation> {
    let algorithm: Algorithm = algorithm.parse()?;
    let state = HintState::from_sample(algorithm, sample)?;
    state.translate(&TranslateContext { negative_edges, edges, source })
}

// ============================================================================
// Flattening helpers
// ============================================================================

fn unsupported(algorithm: Algorithm, probe: &Probe) -> Error {
    Error::UnsupportedHintKind {
        algorithm: algorithm.to_string(),
        probe: format!("{} {:?}", probe.name, probe.shape()),
    }
}

/// `(steps, 1, nodes)` → one row of node values per step.
pub(crate) fn node_rows(algorithm: Algorithm, probe: &Probe) -> Result<NodeRows> {
    let view = probe
        .data
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|_| unsupported(algorithm, probe))?;
    if view.shape()[1] != 1 {
        return Err(unsupported(algorithm, probe));
    }
    Ok((0..view.shape()[0])
        .map(|step| view.slice(s![step, 0, ..]).to_vec())
        .collect())
}

/// Node rows whose values are node indices (predecessor arrays).
pub(crate) fn index_rows(algorithm: Algorithm, probe: &Probe) -> Result<Vec<Vec<NodeIdx>>> {
    node_rows(algorithm, probe)?
        .into_iter()
        .map(|row| row.into_iter().map(|v| as_node(&probe.name, v)).collect())
        .collect()
}

/// `(steps, 1, nodes, categories)` one-hot → category index per node per step.
pub(crate) fn categorical_rows(algorithm: Algorithm, probe: &Probe) -> Result<Vec<Vec<usize>>> {
    let view = probe
        .data
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|_| unsupported(algorithm, probe))?;
    if view.shape()[1] != 1 {
        return Err(unsupported(algorithm, probe));
    }

    let (steps, nodes) = (view.shape()[0], view.shape()[2]);
    let mut rows = Vec::with_capacity(steps);
    for step in 0..steps {
        let mut row = Vec::with_capacity(nodes);
        for node in 0..nodes {
            let cats = view.slice(s![step, 0, node, ..]);
            let hot: Vec<usize> = cats
                .iter()
                .enumerate()
                .filter(|(_, v)| **v != 0.0)
                .map(|(idx, _)| idx)
                .collect();
            match hot.as_slice() {
                [idx] if cats[*idx] == 1.0 => row.push(*idx),
                _ => return Err(unsupported(algorithm, probe)),
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// `(steps, 1, nodes, nodes)` → one square matrix per step.
pub(crate) fn matrix_rows(algorithm: Algorithm, probe: &Probe) -> Result<Vec<Array2<f64>>> {
    let view = probe
        .data
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|_| unsupported(algorithm, probe))?;
    let shape = view.shape();
    if shape[1] != 1 || shape[2] != shape[3] {
        return Err(unsupported(algorithm, probe));
    }
    Ok((0..shape[0])
        .map(|step| view.slice(s![step, 0, .., ..]).to_owned())
        .collect())
}

/// All values of an output probe, batch axis dropped.
pub(crate) fn flat_values(probe: &Probe) -> Vec<f64> {
    probe.data.iter().copied().collect()
}

/// A float that must hold a node index.
pub(crate) fn as_node(probe: &str, value: f64) -> Result<NodeIdx> {
    if value >= 0.0 && value.fract() == 0.0 && value.is_finite() {
        Ok(value as NodeIdx)
    } else {
        Err(Error::MalformedInput(format!(
            "probe '{probe}' holds {value}, not a node index"
        )))
    }
}

/// Nodes whose flag is set, ascending.
pub(crate) fn flagged(row: &[f64]) -> Vec<NodeIdx> {
    row.iter()
        .enumerate()
        .filter(|(_, v)| **v != 0.0)
        .map(|(idx, _)| idx)
        .collect()
}

pub(crate) fn all_zero(row: &[f64]) -> bool {
    row.iter().all(|v| *v == 0.0)
}
