//! Raw samples as produced by the external sampler.
//!
//! A sample is three bundles of named arrays. The narrator only reads them;
//! the typed view lives in [`crate::hints::HintState`].

use std::fmt;

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which bundle a probe belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Input,
    Hint,
    Output,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Input => f.write_str("input"),
            Stage::Hint => f.write_str("hint"),
            Stage::Output => f.write_str("output"),
        }
    }
}

/// What a probe's trailing axes index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Node,
    Edge,
    Graph,
}

/// One named array.
///
/// Hint probes lead with a step axis and a singleton batch axis:
/// `(steps, 1, nodes, ...)`. Input and output probes lead with the batch
/// axis only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    pub name: String,
    pub location: Location,
    pub data: ArrayD<f64>,
}

impl Probe {
    pub fn new(name: impl Into<String>, location: Location, data: ArrayD<f64>) -> Self {
        Self { name: name.into(), location, data }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}

/// Named probes of one stage, in sampler order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeBundle {
    stage: Option<Stage>,
    probes: Vec<Probe>,
}

impl ProbeBundle {
    pub fn new(stage: Stage) -> Self {
        Self { stage: Some(stage), probes: Vec::new() }
    }

    pub fn with(mut self, probe: Probe) -> Self {
        self.push(probe);
        self
    }

    /// Add a probe, replacing any earlier probe of the same name.
    pub fn push(&mut self, probe: Probe) {
        match self.probes.iter_mut().find(|p| p.name == probe.name) {
            Some(existing) => *existing = probe,
            None => self.probes.push(probe),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Probe> {
        self.probes.iter().find(|p| p.name == name)
    }

    /// Like `get`, but a missing probe is a malformed sample.
    pub fn require(&self, name: &str) -> Result<&Probe> {
        self.get(name).ok_or_else(|| {
            let stage = self.stage.map(|s| s.to_string()).unwrap_or_else(|| "unknown".into());
            Error::MalformedInput(format!("missing {stage} probe '{name}'"))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.probes.iter().map(|p| p.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Probe> {
        self.probes.iter()
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

/// One sample pulled from the sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub inputs: ProbeBundle,
    pub hints: ProbeBundle,
    pub outputs: ProbeBundle,
}

impl RawSample {
    pub fn new(inputs: ProbeBundle, hints: ProbeBundle, outputs: ProbeBundle) -> Self {
        Self { inputs, hints, outputs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn probe(name: &str) -> Probe {
        Probe::new(name, Location::Node, ArrayD::zeros(IxDyn(&[1, 3])))
    }

    #[test]
    fn test_require_names_stage() {
        let bundle = ProbeBundle::new(Stage::Hint).with(probe("pi_h"));
        assert!(bundle.require("pi_h").is_ok());
        let err = bundle.require("reach_h").unwrap_err();
        assert_eq!(err.to_string(), "Malformed input: missing hint probe 'reach_h'");
    }

    #[test]
    fn test_push_replaces_same_name() {
        let mut bundle = ProbeBundle::new(Stage::Input);
        bundle.push(probe("s"));
        bundle.push(Probe::new("s", Location::Node, ArrayD::ones(IxDyn(&[1, 2]))));
        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.get("s").unwrap().shape(), &[1, 2]);
    }
}
