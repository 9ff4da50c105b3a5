//! Rendered reasoning traces.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Algorithm, Edge, NodeIdx};

/// One rendered unit of narration, e.g. a dequeue or a set of relaxed edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceEvent(String);

impl TraceEvent {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TraceEvent {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// The problem statement a trace narrates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceInputs {
    pub algorithm: Algorithm,
    pub edges: Vec<Edge>,
    pub source: Option<NodeIdx>,
}

/// Hints plus final answer for one accepted sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningTrace {
    pub inputs: TraceInputs,
    pub hints: Vec<TraceEvent>,
    pub output: String,
}

impl ReasoningTrace {
    /// All hint events, one per line.
    pub fn hint_text(&self) -> String {
        self.hints
            .iter()
            .map(TraceEvent::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render items as `[a, b, c]` using their `Display` impls.
pub(crate) fn fmt_list<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    let inner: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    format!("[{}]", inner.join(", "))
}
