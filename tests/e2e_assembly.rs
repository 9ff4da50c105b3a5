//! End-to-end tests for split assembly and export.
//!
//! Each test drives the quota loop from an in-memory replay of generated
//! traces; the export tests write into a temporary directory.

mod common;

use std::collections::BTreeMap;

use algo_narrator::export::{read_raw_bucket, ChatRecord, Manifest};
use algo_narrator::index::hash_edges;
use algo_narrator::{
    Algorithm, DatasetGenerator, Error, FsExporter, GeneratorConfig, Quota, RawSample,
    ReplayFactory, ReplaySampler, SplitAssembler, SplitKind,
};
use common::*;
use pretty_assertions::assert_eq;

// ============================================================================
// Helper: a stream of structurally distinct BFS samples
// ============================================================================

/// Path 0-1-...-(n-1) plus chord (0, k) for k in 2..: every sample differs.
fn distinct_bfs(n: usize, count: usize) -> Vec<RawSample> {
    assert!(count + 2 <= n, "not enough distinct chords");
    let path: Vec<(usize, usize)> = (1..n).map(|i| (i - 1, i)).collect();
    (0..count)
        .map(|k| {
            let mut edges = path.clone();
            edges.push((0, k + 2));
            bfs_sample(n, &edges, 0)
        })
        .collect()
}

// ============================================================================
// 1. Quota scenario
// ============================================================================

#[test]
fn test_odd_evaluation_quota_wraps_testing_slots() {
    let samples = distinct_bfs(8, 6);
    let mut sampler = ReplaySampler::new(samples.clone());
    let mut assembler = SplitAssembler::new(Algorithm::Bfs, false, 100);
    let set = assembler.assemble(&mut sampler, 8, Quota::new(1, 5)).unwrap();

    assert_eq!(set.training.len(), 1);
    assert_eq!(set.validation.samples().keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(set.testing.samples().keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(set.stats.overwritten, 1);

    // Evaluation indices 2, 3, 4 map to testing slots 0, 1, 0: the fifth
    // evaluation sample replaced the third.
    assert_eq!(set.validation.get(0).unwrap().0, &samples[1]);
    assert_eq!(set.validation.get(1).unwrap().0, &samples[2]);
    assert_eq!(set.testing.get(0).unwrap().0, &samples[5]);
    assert_eq!(set.testing.get(1).unwrap().0, &samples[4]);
}

#[test]
fn test_raw_and_traces_stay_aligned() {
    let mut sampler = ReplaySampler::new(distinct_bfs(6, 4));
    let mut assembler = SplitAssembler::new(Algorithm::Bfs, false, 100);
    let set = assembler.assemble(&mut sampler, 6, Quota::new(2, 2)).unwrap();

    for kind in SplitKind::ALL {
        let bucket = set.bucket(kind);
        assert_eq!(
            bucket.samples().keys().collect::<Vec<_>>(),
            bucket.traces().keys().collect::<Vec<_>>()
        );
    }
}

// ============================================================================
// 2. Deduplication
// ============================================================================

#[test]
fn test_duplicates_are_skipped_without_counting() {
    let unique = distinct_bfs(6, 4);
    // Same edge set as unique[0], listed in a different order.
    let shuffled = bfs_sample(6, &[(0, 2), (4, 5), (3, 4), (2, 3), (1, 2), (0, 1)], 0);
    let stream = vec![
        unique[0].clone(),
        shuffled,
        unique[1].clone(),
        unique[0].clone(),
        unique[2].clone(),
        unique[3].clone(),
    ];

    let mut sampler = ReplaySampler::new(stream);
    let mut assembler = SplitAssembler::new(Algorithm::Bfs, false, 100);
    let set = assembler.assemble(&mut sampler, 6, Quota::new(2, 2)).unwrap();

    assert_eq!(set.stats.accepted, 4);
    assert_eq!(set.stats.discarded, 2);
    assert_eq!(set.training.get(1).unwrap().0, &unique[1]);
    assert_eq!(set.validation.get(0).unwrap().0, &unique[2]);
    assert_eq!(set.testing.get(0).unwrap().0, &unique[3]);
}

#[test]
fn test_accepted_hashes_pairwise_distinct() {
    let mut stream = distinct_bfs(7, 5);
    stream.insert(2, stream[0].clone());
    stream.insert(4, stream[1].clone());

    let mut sampler = ReplaySampler::new(stream);
    let mut assembler = SplitAssembler::new(Algorithm::Bfs, false, 100);
    let set = assembler.assemble(&mut sampler, 7, Quota::new(3, 2)).unwrap();

    let mut hashes = Vec::new();
    for kind in SplitKind::ALL {
        for trace in set.bucket(kind).traces().values() {
            hashes.push(hash_edges(&trace.inputs.edges));
        }
    }
    let total = hashes.len();
    hashes.sort_by_key(|h| h.0);
    hashes.dedup();
    assert_eq!(hashes.len(), total);
}

#[test]
fn test_retry_budget_stops_a_stalled_size() {
    let only = bfs_sample(3, &[(0, 1)], 0);
    let mut sampler = ReplaySampler::new(vec![only; 10]);
    let mut assembler = SplitAssembler::new(Algorithm::Bfs, false, 4);
    let err = assembler.assemble(&mut sampler, 3, Quota::new(2, 0)).unwrap_err();
    assert!(matches!(err, Error::ExhaustedUniqueGraphs { graph_size: 3, attempts: 4 }));
}

#[test]
fn test_malformed_sample_aborts_the_size() {
    let mut broken = bfs_sample(3, &[(0, 1)], 0);
    broken.hints = Default::default();
    let mut sampler = ReplaySampler::new(vec![broken]);
    let mut assembler = SplitAssembler::new(Algorithm::Bfs, false, 4);
    let err = assembler.assemble(&mut sampler, 3, Quota::new(1, 0)).unwrap_err();
    assert!(matches!(err, Error::MalformedInput(_)));
}

// ============================================================================
// 3. Generator run with filesystem export
// ============================================================================

fn config(output_dir: &std::path::Path, formats: &[&str]) -> GeneratorConfig {
    let mut quotas = BTreeMap::new();
    quotas.insert(8, Quota::new(3, 3));
    GeneratorConfig {
        algorithm: Algorithm::Bfs,
        graph_sizes: vec![6, 8],
        seed: 42,
        train_test_split: Quota::new(2, 2),
        quotas,
        output_dir: output_dir.to_path_buf(),
        output_formats: formats.iter().map(|f| f.to_string()).collect(),
        ..GeneratorConfig::default()
    }
}

#[test]
fn test_generator_writes_raw_and_chat_datasets() {
    let dir = tempfile::tempdir().unwrap();
    let factory = ReplayFactory::new()
        .with_size(6, distinct_bfs(6, 4))
        .with_size(8, distinct_bfs(8, 6));
    let generator = DatasetGenerator::new(config(dir.path(), &["json", "jsonl"]), factory, FsExporter::new());
    let report = generator.run().unwrap();

    assert_eq!(report.sizes.len(), 2);
    assert_eq!(report.sizes[0].graph_size, 6);
    assert_eq!((report.sizes[0].training, report.sizes[0].validation, report.sizes[0].testing), (2, 1, 1));
    // 3 evaluation samples with a validation half of 1: testing slot 0 is written twice.
    assert_eq!((report.sizes[1].training, report.sizes[1].validation, report.sizes[1].testing), (3, 1, 1));
    assert_eq!(report.sizes[1].accepted, 6);
    assert_eq!(report.sizes[1].overwritten, 1);

    let size_dir = dir.path().join("bfs").join("8");
    let training = read_raw_bucket(&size_dir.join("raw").join("training.bin")).unwrap();
    assert_eq!(training.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);

    let jsonl = std::fs::read_to_string(size_dir.join("llm/jsonl/chain_of_thought/train.jsonl")).unwrap();
    let records: Vec<ChatRecord> = jsonl.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].messages.last().unwrap().role, "assistant");
    assert!(records[0].messages[2].content.starts_with("Queue: [0]\nDequeue: 0\n"));

    let evaluation = std::fs::read_to_string(size_dir.join("llm/json/direct/evaluation.json")).unwrap();
    let records: Vec<ChatRecord> = serde_json::from_str(&evaluation).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].messages.len(), 2);
    assert!(records[0].reference.as_deref().unwrap().starts_with("Reachable Nodes: "));

    let manifest = Manifest::read(&size_dir.join("manifest.json")).unwrap();
    assert_eq!(manifest.seed, 42);
    assert_eq!(manifest.counts["training"], 3);
    assert_eq!(manifest.stats.overwritten, 1);
}

#[test]
fn test_raw_bucket_roundtrip_preserves_arrays() {
    let dir = tempfile::tempdir().unwrap();
    let samples = distinct_bfs(6, 4);
    let factory = ReplayFactory::new().with_size(6, samples.clone());
    let mut cfg = config(dir.path(), &["jsonl"]);
    cfg.graph_sizes = vec![6];
    DatasetGenerator::new(cfg, factory, FsExporter::new()).run().unwrap();

    let validation = read_raw_bucket(&dir.path().join("bfs/6/raw/validation.bin")).unwrap();
    assert_eq!(validation.get(&0), Some(&samples[2]));
}

#[test]
fn test_unsupported_format_fails_before_sampling() {
    let dir = tempfile::tempdir().unwrap();
    // No samples registered: reaching the sampler would be a Sampler error.
    let generator = DatasetGenerator::new(config(dir.path(), &["jsonl", "arrow"]), ReplayFactory::new(), FsExporter::new());
    let err = generator.run().unwrap_err();
    assert!(matches!(err, Error::UnsupportedOutputFormat(name) if name == "arrow"));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_config_file_drives_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let path = dir.path().join("generate.json");
    std::fs::write(
        &path,
        format!(
            r#"{{ "algorithm": "bfs", "graph_sizes": [6], "train_test_split": [1, 2], "output_dir": {:?}, "output_formats": ["json"] }}"#,
            out.display().to_string()
        ),
    )
    .unwrap();

    let config = GeneratorConfig::from_json_file(&path).unwrap();
    let factory = ReplayFactory::new().with_size(6, distinct_bfs(6, 3));
    let report = DatasetGenerator::new(config, factory, FsExporter::new()).run().unwrap();
    assert_eq!(report.sizes[0].training, 1);
    assert!(out.join("bfs/6/llm/json/direct/test.json").exists());
}
