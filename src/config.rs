//! Generator configuration.
//!
//! Loaded from JSON. Every field has a default, so a config file only needs
//! the keys it changes:
//!
//! ```json
//! {
//!   "algorithm": "dijkstra",
//!   "graph_sizes": [4, 5, 6],
//!   "seed": 1234,
//!   "train_test_split": [1000, 200],
//!   "quotas": { "4": [500, 100] },
//!   "output_dir": "data",
//!   "output_formats": ["jsonl"]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::Algorithm;
use crate::split::quota::{Quota, QuotaTable};
use crate::Result;

/// Everything one generation run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub algorithm: Algorithm,
    pub graph_sizes: Vec<usize>,
    pub seed: u64,
    /// Recover BFS edges the reachability snapshots may have missed.
    pub neg_edges: bool,
    /// Quota for graph sizes without an entry in `quotas`.
    pub train_test_split: Quota,
    pub quotas: BTreeMap<usize, Quota>,
    pub output_dir: PathBuf,
    /// Format names, validated before sampling starts.
    pub output_formats: Vec<String>,
    /// Consecutive duplicate graphs tolerated per size. 0 disables the cap.
    pub retry_budget: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Bfs,
            graph_sizes: vec![4, 5, 6, 7, 8],
            seed: 1234,
            neg_edges: false,
            train_test_split: Quota::new(1000, 200),
            quotas: BTreeMap::new(),
            output_dir: PathBuf::from("data"),
            output_formats: vec!["json".to_string()],
            retry_budget: 10_000,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Small run for eyeballing traces: one graph size of 6 nodes,
    /// 2 training and 2 evaluation samples.
    pub fn debug(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            graph_sizes: vec![6],
            train_test_split: Quota::new(2, 2),
            quotas: BTreeMap::new(),
            ..Self::default()
        }
    }

    pub fn quota_table(&self) -> QuotaTable {
        QuotaTable {
            default: self.train_test_split,
            sizes: self.quotas.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GeneratorConfig::from_json_str(
            r#"{ "algorithm": "mst_prim", "graph_sizes": [5], "quotas": { "5": [10, 4] } }"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, Algorithm::MstPrim);
        assert_eq!(config.graph_sizes, vec![5]);
        assert_eq!(config.retry_budget, 10_000);
        assert_eq!(config.quota_table().quota_for(5), Quota::new(10, 4));
        assert_eq!(config.quota_table().quota_for(6), Quota::new(1000, 200));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let err = GeneratorConfig::from_json_str(r#"{ "algorithm": "dka" }"#).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_debug_profile() {
        let config = GeneratorConfig::debug(Algorithm::Dfs);
        assert_eq!(config.graph_sizes, vec![6]);
        assert_eq!(config.quota_table().quota_for(6), Quota::new(2, 2));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generate.json");
        std::fs::write(&path, r#"{ "seed": 7, "neg_edges": true }"#).unwrap();
        let config = GeneratorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert!(config.neg_edges);
    }
}
