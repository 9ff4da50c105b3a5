//! Edge-set canonicalization.
//!
//! Turns the sampler's adjacency (and weight) matrices into the undirected
//! edge list every later stage works with, and extracts the source node from
//! its one-hot vector.
//!
//! ```text
//! inputs.adj (1, N, N) ─┐
//! inputs.A   (1, N, N) ─┼─► canonicalize() ─► GraphInstance { edges, source }
//! inputs.s   (1, N)    ─┘
//! ```

use hashbrown::HashSet;
use ndarray::Array2;

use crate::model::{Algorithm, Edge, GraphInstance, NodeIdx, Probe, ProbeBundle};
use crate::{Error, Result};

/// Build the canonical graph instance for one sample's input bundle.
pub fn canonicalize(algorithm: Algorithm, inputs: &ProbeBundle) -> Result<GraphInstance> {
    let adj = square_matrix(inputs.require("adj")?)?;
    let node_count = adj.nrows();

    let edges = if algorithm.is_weighted() {
        let weights = square_matrix(inputs.require("A")?)?;
        weighted_edges(&adj, &weights)?
    } else {
        unweighted_edges(&adj)
    };

    let source = if algorithm.has_source() {
        Some(source_node(inputs.require("s")?)?)
    } else {
        None
    };

    Ok(GraphInstance::new(node_count, edges, source))
}

/// Squeeze leading singleton axes off a `(…, N, N)` probe.
pub fn square_matrix(probe: &Probe) -> Result<Array2<f64>> {
    let shape = probe.shape();
    let n = match shape {
        [.., rows, cols] if rows == cols => *cols,
        _ => {
            return Err(Error::MalformedInput(format!(
                "probe '{}' is not a square matrix: shape {:?}",
                probe.name, shape
            )));
        }
    };
    if probe.data.len() != n * n {
        return Err(Error::MalformedInput(format!(
            "probe '{}' has a non-singleton batch axis: shape {:?}",
            probe.name, shape
        )));
    }

    let values: Vec<f64> = probe.data.iter().copied().collect();
    Array2::from_shape_vec((n, n), values)
        .map_err(|e| Error::MalformedInput(format!("probe '{}': {e}", probe.name)))
}

/// `(i, j)` for every `i < j` with a nonzero adjacency entry.
pub fn unweighted_edges(adj: &Array2<f64>) -> Vec<Edge> {
    let n = adj.nrows();
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if adj[[i, j]] != 0.0 {
                edges.push(Edge::unweighted(i, j));
            }
        }
    }
    edges
}

/// `(i, j, w)` wherever adjacency is set, the weight is nonzero and `i != j`.
///
/// Once `(i, j, ·)` is emitted, the reverse pair `(j, i, ·)` is skipped no
/// matter what weight it carries: asymmetric weights collapse to the
/// first-seen orientation.
pub fn weighted_edges(adj: &Array2<f64>, weights: &Array2<f64>) -> Result<Vec<Edge>> {
    if adj.dim() != weights.dim() {
        return Err(Error::MalformedInput(format!(
            "adjacency {:?} and weight {:?} matrices differ in shape",
            adj.dim(),
            weights.dim()
        )));
    }

    let n = adj.nrows();
    let mut seen: HashSet<(NodeIdx, NodeIdx)> = HashSet::new();
    let mut edges = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if i == j || adj[[i, j]] == 0.0 || weights[[i, j]] == 0.0 {
                continue;
            }
            if seen.contains(&(j, i)) {
                continue;
            }
            if seen.insert((i, j)) {
                edges.push(Edge::weighted(i, j, weights[[i, j]]));
            }
        }
    }
    Ok(edges)
}

/// The unique index set in a one-hot source vector.
pub fn source_node(probe: &Probe) -> Result<NodeIdx> {
    let hot: Vec<NodeIdx> = probe
        .data
        .iter()
        .enumerate()
        .filter(|(_, v)| **v != 0.0)
        .map(|(idx, _)| idx)
        .collect();

    match hot.as_slice() {
        [idx] => Ok(*idx),
        [] => Err(Error::MalformedInput(format!(
            "source vector '{}' has no set index",
            probe.name
        ))),
        many => Err(Error::MalformedInput(format!(
            "source vector '{}' has {} set indices: {:?}",
            probe.name,
            many.len(),
            many
        ))),
    }
}
