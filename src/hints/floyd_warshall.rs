//! Floyd-Warshall all-pairs shortest paths.
//!
//! The `D` probe holds the whole distance matrix after each intermediate
//! vertex. There is no termination signal: every step after the first is
//! narrated as one dequeue of the previous vertex followed by the upper
//! triangle of the current matrix.

use ndarray::Array2;

use crate::model::{trace::fmt_list, Algorithm, Edge, RawSample, TraceEvent};
use crate::Result;
use super::{matrix_rows, Answer, TranslateContext, Translation};

/// Snapshot matrices for one Floyd-Warshall run.
#[derive(Debug, Clone, PartialEq)]
pub struct FloydWarshallState {
    /// `D`: one `nodes × nodes` matrix per step.
    pub dist: Vec<Array2<f64>>,
}

impl FloydWarshallState {
    pub fn from_sample(sample: &RawSample) -> Result<Self> {
        let dist = matrix_rows(Algorithm::FloydWarshall, sample.hints.require("D")?)?;
        Ok(Self { dist })
    }

    pub fn node_count(&self) -> usize {
        self.dist.first().map(|m| m.nrows()).unwrap_or(0)
    }
}

/// `(j, k, d)` for every nonzero entry above the diagonal.
fn upper_triangle(matrix: &Array2<f64>) -> Vec<Edge> {
    let n = matrix.nrows().min(matrix.ncols());
    let mut edges = Vec::new();
    for j in 0..n {
        for k in (j + 1)..n {
            let d = matrix[[j, k]];
            if d != 0.0 {
                edges.push(Edge::weighted(j, k, d));
            }
        }
    }
    edges
}

pub fn translate(state: &FloydWarshallState, _ctx: &TranslateContext<'_>) -> Result<Translation> {
    let nodes = state.node_count();
    let mut events = Vec::new();
    let mut distances: Vec<Edge> = Vec::new();

    for (k, matrix) in state.dist.iter().enumerate().skip(1) {
        let vertex = k - 1;
        events.push(TraceEvent::new(format!(
            "Queue: {}\n Dequeue {vertex}",
            fmt_list(vertex..nodes.max(k))
        )));
        distances = upper_triangle(matrix);
        events.push(TraceEvent::new(format!("Distances: {}", fmt_list(&distances))));
    }

    Ok(Translation { events, answer: Answer::Distances(distances) })
}
