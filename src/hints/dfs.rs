//! Depth-first search.
//!
//! Each step carries a three-color flag per node and a one-hot vector naming
//! the root of the current search tree. A node turning "discovered" is a
//! push. Every finished-colored node pops the stack while it is non-empty,
//! on every step, so nodes finished earlier keep popping later. Whenever the
//! stack drains, the nodes seen since it was last empty close into one
//! component; the merge step joins pieces of one tree through their root.

use std::collections::BTreeMap;

use hashbrown::HashSet;

use crate::model::{trace::fmt_list, Algorithm, NodeIdx, RawSample, TraceEvent};
use crate::{Error, Result};
use super::{categorical_rows, flagged, node_rows, Answer, TranslateContext, Translation};

/// DFS node color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeColor {
    Unvisited,
    Discovered,
    Finished,
}

impl NodeColor {
    fn from_category(category: usize) -> Option<Self> {
        match category {
            0 => Some(NodeColor::Unvisited),
            1 => Some(NodeColor::Discovered),
            2 => Some(NodeColor::Finished),
            _ => None,
        }
    }
}

/// Snapshot rows for one DFS run.
#[derive(Debug, Clone, PartialEq)]
pub struct DfsState {
    /// `color`: per node per step.
    pub colors: Vec<Vec<NodeColor>>,
    /// `s`: root of the tree being explored at each step, if any is set.
    pub roots: Vec<Option<NodeIdx>>,
}

impl DfsState {
    pub fn from_sample(sample: &RawSample) -> Result<Self> {
        let color_probe = sample.hints.require("color")?;
        let colors = categorical_rows(Algorithm::Dfs, color_probe)?
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cat| {
                        NodeColor::from_category(cat).ok_or_else(|| Error::UnsupportedHintKind {
                            algorithm: Algorithm::Dfs.to_string(),
                            probe: format!("{} category {cat}", color_probe.name),
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let roots = node_rows(Algorithm::Dfs, sample.hints.require("s")?)?
            .iter()
            .map(|row| flagged(row).first().copied())
            .collect();

        Ok(Self { colors, roots })
    }
}

// ============================================================================
// Union-find for the component merge
// ============================================================================

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self { parent: (0..size).collect() }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

fn sorted_distinct(nodes: &[NodeIdx]) -> Vec<NodeIdx> {
    let mut out = nodes.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

fn fmt_components<'a>(groups: impl IntoIterator<Item = &'a Vec<NodeIdx>>) -> String {
    let parts: Vec<String> = groups
        .into_iter()
        .map(|group| {
            let ids: Vec<String> = sorted_distinct(group).iter().map(|n| n.to_string()).collect();
            format!("({})", ids.join(", "))
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

/// Drop edgeless components, merge those that share a node, sort.
fn merge_components(groupings: &[Vec<NodeIdx>], ctx: &TranslateContext<'_>) -> Vec<Vec<NodeIdx>> {
    let kept: Vec<Vec<NodeIdx>> = groupings
        .iter()
        .map(|g| sorted_distinct(g))
        .filter(|g| ctx.edges.has_internal_edge(g))
        .collect();

    let span = kept.iter().flatten().copied().max().map_or(0, |m| m + 1);
    let mut sets = DisjointSet::new(span);
    for group in &kept {
        for pair in group.windows(2) {
            sets.union(pair[0], pair[1]);
        }
    }

    let mut merged: BTreeMap<usize, Vec<NodeIdx>> = BTreeMap::new();
    for &node in kept.iter().flatten() {
        let root = sets.find(node);
        merged.entry(root).or_default().push(node);
    }

    let mut out: Vec<Vec<NodeIdx>> = merged.into_values().map(|g| sorted_distinct(&g)).collect();
    out.sort();
    out
}

pub fn translate(state: &DfsState, ctx: &TranslateContext<'_>) -> Result<Translation> {
    let mut stack: Vec<NodeIdx> = Vec::new();
    let mut discovered: HashSet<NodeIdx> = HashSet::new();
    let mut groupings: Vec<Vec<NodeIdx>> = Vec::new();
    let mut current: Vec<NodeIdx> = Vec::new();
    let mut events = Vec::new();

    for (step, colors) in state.colors.iter().enumerate() {
        for (node, color) in colors.iter().enumerate() {
            match color {
                NodeColor::Discovered if discovered.insert(node) => {
                    stack.push(node);
                    if current.is_empty() {
                        let root = state.roots.get(step).copied().flatten().ok_or_else(|| {
                            Error::MalformedInput(format!("dfs step {step} has no root in 's'"))
                        })?;
                        current.push(root);
                    }
                    current.push(node);

                    events.push(TraceEvent::new(format!(
                        "Stack: {}, Pop Node: {node}, 1-hop Neighborhood of {node}: {}.",
                        fmt_list(&stack),
                        fmt_list(ctx.edges.neighbors(node)),
                    )));
                    events.push(TraceEvent::new(format!(
                        "Connected Components: {}",
                        fmt_components(groupings.iter().chain(std::iter::once(&current)))
                    )));
                }
                NodeColor::Finished if !stack.is_empty() => {
                    stack.pop();
                }
                _ => {}
            }
        }

        if stack.is_empty() && !current.is_empty() {
            groupings.push(std::mem::take(&mut current));
        }
        if !colors.is_empty() && colors.iter().all(|c| *c == NodeColor::Finished) {
            break;
        }
    }

    Ok(Translation {
        events,
        answer: Answer::Components(merge_components(&groupings, ctx)),
    })
}
