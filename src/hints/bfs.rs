//! Breadth-first search.
//!
//! The sampler records a cumulative reachability flag and a predecessor per
//! node per step. Nodes first flagged at the same step form one discovery
//! level; the levels drive an explicit FIFO queue that is narrated one
//! dequeue at a time.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use hashbrown::HashSet;

use crate::model::{trace::fmt_list, Algorithm, NodeIdx, RawSample, TraceEvent};
use crate::Result;
use super::{all_zero, as_node, flat_values, index_rows, node_rows, Answer, NodeRows, TranslateContext, Translation};

/// Snapshot rows for one BFS run.
#[derive(Debug, Clone, PartialEq)]
pub struct BfsState {
    /// `reach_h`: 1 once a node has been reached.
    pub reach: NodeRows,
    /// `pi_h`: predecessor per node.
    pub pred: Vec<Vec<NodeIdx>>,
    /// Output `pi`: final predecessor per node.
    pub final_pred: Vec<NodeIdx>,
}

impl BfsState {
    pub fn from_sample(sample: &RawSample) -> Result<Self> {
        let reach = node_rows(Algorithm::Bfs, sample.hints.require("reach_h")?)?;
        let pred = index_rows(Algorithm::Bfs, sample.hints.require("pi_h")?)?;
        let pi = sample.outputs.require("pi")?;
        let final_pred = flat_values(pi)
            .into_iter()
            .map(|v| as_node(&pi.name, v))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { reach, pred, final_pred })
    }

    pub fn node_count(&self) -> usize {
        self.reach.first().map(Vec::len).unwrap_or(self.final_pred.len())
    }
}

/// Discovery levels plus, per predecessor, the nodes it reached.
struct Discovery {
    levels: Vec<Vec<NodeIdx>>,
    children: BTreeMap<NodeIdx, BTreeSet<NodeIdx>>,
}

/// Group nodes by the step that first flags them reachable.
///
/// All-zero rows are padding and skipped. The first step that discovers
/// nothing new ends the search.
fn discover(state: &BfsState) -> Discovery {
    let mut levels = Vec::new();
    let mut children: BTreeMap<NodeIdx, BTreeSet<NodeIdx>> = BTreeMap::new();
    let mut seen: HashSet<NodeIdx> = HashSet::new();

    for (reach, pred) in state.reach.iter().zip(&state.pred) {
        if all_zero(reach) && pred.iter().all(|p| *p == 0) {
            continue;
        }

        let mut level = BTreeSet::new();
        for (node, (&flag, &parent)) in reach.iter().zip(pred).enumerate() {
            if flag == 0.0 {
                continue;
            }
            if node != parent {
                children.entry(parent).or_default().insert(node);
            }
            if seen.insert(node) {
                level.insert(node);
            }
        }
        if level.is_empty() {
            break;
        }
        levels.push(level.into_iter().collect());
    }

    Discovery { levels, children }
}

pub fn translate(state: &BfsState, ctx: &TranslateContext<'_>) -> Result<Translation> {
    let Discovery { levels, children } = discover(state);
    let no_children = BTreeSet::new();

    let mut queue: VecDeque<NodeIdx> = levels.first().cloned().unwrap_or_default().into();
    let mut discovered: BTreeSet<NodeIdx> = queue.iter().copied().collect();
    let mut dequeued: HashSet<NodeIdx> = HashSet::new();
    let mut reachable: BTreeSet<NodeIdx> = BTreeSet::new();
    let mut events = Vec::new();

    for level in &levels {
        let mut lines = Vec::with_capacity(level.len() * 2);
        let mut drained = false;

        for _ in level {
            lines.push(format!("Queue: {}", fmt_list(&queue)));
            let Some(current) = queue.pop_front() else {
                drained = true;
                lines.pop();
                break;
            };

            let unvisited: Vec<NodeIdx> = ctx
                .edges
                .neighbors(current)
                .iter()
                .copied()
                .filter(|n| !discovered.contains(n))
                .collect();
            lines.push(format!(
                "Dequeue: {current}\nUnvisited neighborhood of {current}: {}",
                fmt_list(&unvisited)
            ));

            if ctx.negative_edges {
                dequeued.insert(current);
            }

            let reached = children.get(&current).unwrap_or(&no_children);
            if reached.is_empty() {
                continue;
            }
            reachable.extend(reached.iter().copied());
            discovered.extend(reached.iter().copied());

            if ctx.negative_edges {
                for node in 0..state.node_count() {
                    if node == current || reached.contains(&node) {
                        continue;
                    }
                    if ctx.edges.contains(node, current) && dequeued.contains(&node) {
                        reachable.insert(node);
                    }
                }
            }
            queue.extend(reached.iter().copied());
        }

        if !lines.is_empty() {
            events.push(TraceEvent::new(lines.join("\n")));
            events.push(TraceEvent::new(format!("Reachable Nodes: {}", fmt_list(&reachable))));
        }
        if drained {
            break;
        }
    }

    let answer = state
        .final_pred
        .iter()
        .enumerate()
        .filter(|&(node, &pred)| node != pred)
        .map(|(node, _)| node)
        .collect();

    Ok(Translation { events, answer: Answer::Reachable(answer) })
}
