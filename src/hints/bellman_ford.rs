//! Bellman-Ford single-source shortest paths.
//!
//! A step relaxes `(u, v)` when `u` is active in the mask, `v`'s predecessor
//! is `u` and `u`'s distance is finite. Edges are only narrated the first
//! time they appear across the whole run. A step that relaxes nothing new
//! ends the run.

use hashbrown::HashSet;

use crate::model::{trace::fmt_list, Algorithm, Edge, NodeIdx, RawSample, TraceEvent};
use crate::Result;
use super::{index_rows, node_rows, Answer, NodeRows, TranslateContext, Translation};

pub(crate) const NO_MORE_RELAXATIONS: &str = "No more edges to relax. The algorithm terminates.";

/// Snapshot rows for one Bellman-Ford run.
#[derive(Debug, Clone, PartialEq)]
pub struct BellmanFordState {
    /// `d`: distance per node.
    pub dist: NodeRows,
    /// `pi_h`: predecessor per node.
    pub pred: Vec<Vec<NodeIdx>>,
    /// `msk`: nodes active in this step.
    pub mask: NodeRows,
}

impl BellmanFordState {
    pub fn from_sample(sample: &RawSample) -> Result<Self> {
        let hints = &sample.hints;
        Ok(Self {
            dist: node_rows(Algorithm::BellmanFord, hints.require("d")?)?,
            pred: index_rows(Algorithm::BellmanFord, hints.require("pi_h")?)?,
            mask: node_rows(Algorithm::BellmanFord, hints.require("msk")?)?,
        })
    }

    pub fn steps(&self) -> usize {
        self.dist.len().min(self.pred.len()).min(self.mask.len())
    }
}

/// Relaxation bookkeeping that persists across steps.
#[derive(Debug, Default)]
struct Relaxations {
    /// `(u, v, bits(weight))` of every edge narrated so far.
    seen: HashSet<(NodeIdx, NodeIdx, u64)>,
    /// Nodes that were the target of any relaxation so far.
    touched: Vec<bool>,
}

impl Relaxations {
    fn new(nodes: usize) -> Self {
        Self { seen: HashSet::new(), touched: vec![false; nodes] }
    }

    /// New edges relaxed at one step.
    fn step(&mut self, dist: &[f64], pred: &[NodeIdx], mask: &[f64]) -> Vec<Edge> {
        let nodes = dist.len().min(pred.len()).min(mask.len()).min(self.touched.len());
        let mut relaxed = Vec::new();
        for u in 0..nodes {
            if mask[u] == 0.0 || dist[u] == f64::INFINITY {
                continue;
            }
            for v in 0..nodes {
                if pred[v] != u {
                    continue;
                }
                let weight = dist[u] + dist[v];
                if self.seen.insert((u, v, weight.to_bits())) {
                    relaxed.push(Edge::weighted(u, v, weight));
                }
                self.touched[v] = true;
            }
        }
        relaxed
    }

    /// Distances with every never-touched node reset to infinity.
    fn mask_untouched(&self, dist: &[f64]) -> Vec<f64> {
        dist.iter()
            .zip(&self.touched)
            .map(|(d, touched)| if *touched { *d } else { f64::INFINITY })
            .collect()
    }
}

pub fn translate(state: &BellmanFordState, ctx: &TranslateContext<'_>) -> Result<Translation> {
    let source = ctx.require_source(Algorithm::BellmanFord)?;
    let nodes = state.dist.first().map(Vec::len).unwrap_or(0);
    let mut relaxations = Relaxations::new(nodes);
    let mut events = Vec::new();
    let mut distances: Vec<f64> = Vec::new();

    for step in 0..state.steps() {
        let relaxed = relaxations.step(&state.dist[step], &state.pred[step], &state.mask[step]);

        if relaxed.is_empty() {
            // Step 0 has no earlier snapshot and reports its own.
            let previous = &state.pred[step.saturating_sub(1)];
            events.push(TraceEvent::new(format!(
                "Step {step}:\nRelaxed Edges: [] \nPredecessors: {}",
                fmt_list(previous)
            )));
            events.push(TraceEvent::new(NO_MORE_RELAXATIONS));
            break;
        }

        let current = relaxations.mask_untouched(&state.dist[step]);
        events.push(TraceEvent::new(format!(
            "Step {step}:\nRelaxed Edges: {} \nPredecessors: {}",
            fmt_list(&relaxed),
            fmt_list(&state.pred[step])
        )));
        events.push(TraceEvent::new(format!("Distances: {current:?}")));
        distances = current;
    }

    Ok(Translation {
        events,
        answer: Answer::DistanceArray { source, distances },
    })
}
