//! Prim's minimum spanning tree.
//!
//! Same queue and visited bookkeeping as Dijkstra, except the queue is
//! listed by node id and each step's payload is the tree built so far.

use hashbrown::HashSet;

use crate::model::{trace::fmt_list, Algorithm, Edge, NodeIdx, RawSample, TraceEvent};
use crate::Result;
use super::dijkstra::{partitions, queue_exhausted, QUEUE_EMPTY};
use super::{flagged, index_rows, node_rows, Answer, NodeRows, TranslateContext, Translation};

/// Snapshot rows for one Prim run.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimState {
    /// `key`: cheapest known edge weight into the tree.
    pub key: NodeRows,
    /// `pi_h`: tree parent per node; a node is its own parent until attached.
    pub pred: Vec<Vec<NodeIdx>>,
    pub mark: NodeRows,
    pub in_queue: NodeRows,
    /// `u`: one-hot node being extracted.
    pub current: NodeRows,
}

impl PrimState {
    pub fn from_sample(sample: &RawSample) -> Result<Self> {
        let hints = &sample.hints;
        Ok(Self {
            key: node_rows(Algorithm::MstPrim, hints.require("key")?)?,
            pred: index_rows(Algorithm::MstPrim, hints.require("pi_h")?)?,
            mark: node_rows(Algorithm::MstPrim, hints.require("mark")?)?,
            in_queue: node_rows(Algorithm::MstPrim, hints.require("in_queue")?)?,
            current: node_rows(Algorithm::MstPrim, hints.require("u")?)?,
        })
    }

    pub fn steps(&self) -> usize {
        [self.key.len(), self.pred.len(), self.mark.len(), self.in_queue.len(), self.current.len()]
            .into_iter()
            .min()
            .unwrap_or(0)
    }
}

/// `(min(parent, j), max(parent, j), key[j])` for every attached node,
/// each endpoint pair once.
fn tree_edges(key: &[f64], pred: &[NodeIdx]) -> Vec<Edge> {
    let mut seen: HashSet<(NodeIdx, NodeIdx)> = HashSet::new();
    pred.iter()
        .enumerate()
        .filter(|&(node, &parent)| node != parent)
        .map(|(node, &parent)| {
            let weight = key.get(node).copied().unwrap_or(0.0);
            Edge::weighted(parent.min(node), parent.max(node), weight)
        })
        .filter(|edge| edge.u < edge.v && seen.insert((edge.u, edge.v)))
        .collect()
}

pub fn translate(state: &PrimState, _ctx: &TranslateContext<'_>) -> Result<Translation> {
    let mut events = Vec::new();
    let mut mst: Vec<Edge> = Vec::new();

    for step in 0..state.steps() {
        let queue = flagged(&state.in_queue[step]);
        let (unvisited, visited) = partitions(&state.mark[step]);
        events.push(TraceEvent::new(format!(
            "Step {step}:\nPriority Queue: {} \nUnvisited Nodes: {}\nVisited Nodes: {}",
            fmt_list(&queue),
            fmt_list(&unvisited),
            fmt_list(&visited),
        )));

        if queue_exhausted(&state.mark[step], &state.in_queue[step], &state.current[step]) {
            events.push(TraceEvent::new(QUEUE_EMPTY));
            break;
        }

        mst = tree_edges(&state.key[step], &state.pred[step]);
        events.push(TraceEvent::new(format!("MST Edges: {}", fmt_list(&mst))));
    }

    Ok(Translation { events, answer: Answer::MstEdges(mst) })
}
