//! # Sample and Trace Model
//!
//! Plain data types that cross every boundary: sampler → canonicalizer →
//! translators → assembler → exporter.
//!
//! Design rule: no I/O and no translation logic here. This module is pure
//! data plus the rendering helpers every translator shares.

pub mod algorithm;
pub mod graph;
pub mod sample;
pub mod trace;

pub use algorithm::Algorithm;
pub use graph::{Edge, EdgeLookup, GraphInstance, NodeIdx};
pub use sample::{Location, Probe, ProbeBundle, RawSample, Stage};
pub use trace::{ReasoningTrace, TraceEvent, TraceInputs};
