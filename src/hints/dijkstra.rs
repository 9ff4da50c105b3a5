//! Dijkstra's single-source shortest paths.
//!
//! Each step rebuilds the priority queue from the in-queue flags and current
//! distances, and splits nodes into visited and unvisited by the mark array.
//! The run ends on the first step where mark, in-queue and current-node are
//! all zero at once.

use crate::model::{trace::fmt_list, Algorithm, Edge, NodeIdx, RawSample, TraceEvent};
use crate::Result;
use super::{all_zero, flagged, node_rows, Answer, NodeRows, TranslateContext, Translation};

/// Snapshot rows for one Dijkstra run.
#[derive(Debug, Clone, PartialEq)]
pub struct DijkstraState {
    /// `d`: tentative distance per node; 0 means unset.
    pub dist: NodeRows,
    /// `mark`: 1 once a node has been settled.
    pub mark: NodeRows,
    /// `in_queue`: 1 while a node sits in the priority queue.
    pub in_queue: NodeRows,
    /// `u`: one-hot node being extracted.
    pub current: NodeRows,
}

impl DijkstraState {
    pub fn from_sample(sample: &RawSample) -> Result<Self> {
        let hints = &sample.hints;
        Ok(Self {
            dist: node_rows(Algorithm::Dijkstra, hints.require("d")?)?,
            mark: node_rows(Algorithm::Dijkstra, hints.require("mark")?)?,
            in_queue: node_rows(Algorithm::Dijkstra, hints.require("in_queue")?)?,
            current: node_rows(Algorithm::Dijkstra, hints.require("u")?)?,
        })
    }

    pub fn steps(&self) -> usize {
        self.dist
            .len()
            .min(self.mark.len())
            .min(self.in_queue.len())
            .min(self.current.len())
    }
}

/// Queue entries `(node, distance)` ordered by distance, unset distances last.
pub(crate) fn priority_queue(dist: &[f64], in_queue: &[f64]) -> Vec<(NodeIdx, f64)> {
    let mut queue: Vec<(NodeIdx, f64)> = flagged(in_queue)
        .into_iter()
        .map(|node| (node, dist.get(node).copied().unwrap_or(0.0)))
        .collect();
    let order = |d: f64| if d == 0.0 { f64::INFINITY } else { d };
    queue.sort_by(|a, b| order(a.1).total_cmp(&order(b.1)));
    queue
}

/// Unvisited and visited partitions of the mark array.
pub(crate) fn partitions(mark: &[f64]) -> (Vec<NodeIdx>, Vec<NodeIdx>) {
    (0..mark.len()).partition(|&node| mark[node] == 0.0)
}

/// The shared termination test of Dijkstra and Prim.
pub(crate) fn queue_exhausted(mark: &[f64], in_queue: &[f64], current: &[f64]) -> bool {
    all_zero(mark) && all_zero(in_queue) && all_zero(current)
}

pub(crate) const QUEUE_EMPTY: &str = "\nQueue is empty.\n Algorithm terminates.";

pub fn translate(state: &DijkstraState, ctx: &TranslateContext<'_>) -> Result<Translation> {
    let source = ctx.require_source(Algorithm::Dijkstra)?;
    let mut events = Vec::new();
    let mut distances: Vec<Edge> = Vec::new();

    for step in 0..state.steps() {
        let dist = &state.dist[step];
        let queue = priority_queue(dist, &state.in_queue[step]);
        let (unvisited, visited) = partitions(&state.mark[step]);

        let entries = queue.iter().map(|(node, d)| format!("({node}, {d:?})"));
        events.push(TraceEvent::new(format!(
            "Step {step}:\nPriority Queue: {} \nUnvisited Nodes: {}\nVisited Nodes: {}",
            fmt_list(entries),
            fmt_list(&unvisited),
            fmt_list(&visited),
        )));

        if queue_exhausted(&state.mark[step], &state.in_queue[step], &state.current[step]) {
            events.push(TraceEvent::new(QUEUE_EMPTY));
            break;
        }

        distances = dist
            .iter()
            .enumerate()
            .filter(|(_, d)| **d != 0.0)
            .map(|(node, d)| Edge::weighted(source, node, *d))
            .collect();
        events.push(TraceEvent::new(format!("Distances: {}", fmt_list(&distances))));
    }

    Ok(Translation { events, answer: Answer::Distances(distances) })
}
