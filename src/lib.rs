//! # algo-narrator: Reasoning Traces from Graph Algorithm Executions
//!
//! Reads the step-by-step state snapshots that a graph-algorithm sampler
//! records (distance arrays, predecessor arrays, visited/queued flags) and
//! narrates them as text: what sits on the queue or stack, which edges get
//! relaxed, which components are discovered, and what the final answer is.
//! Accepted samples are deduplicated per graph size and packed into
//! training / validation / testing splits.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `Sampler` is the contract with whatever executes the
//!    algorithms; `DatasetExporter` is the contract with persistence
//! 2. **Validate once**: raw probe bundles become a typed `HintState` at the
//!    boundary, translators never look up arrays by name
//! 3. **Translators own nothing**: snapshot rows → events is a pure function
//! 4. **Sequential and deterministic**: given the sampler's seed, the same
//!    samples are accepted in the same order
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use algo_narrator::{DatasetGenerator, GeneratorConfig, FsExporter, ReplayFactory};
//!
//! # fn example(factory: ReplayFactory) -> algo_narrator::Result<()> {
//! let config = GeneratorConfig::from_json_file("generate.json")?;
//! let generator = DatasetGenerator::new(config, factory, FsExporter::new());
//! let report = generator.run()?;
//! for size in &report.sizes {
//!     println!("{} nodes: {} training samples", size.graph_size, size.training);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported Algorithms
//!
//! | Algorithm | Name | Answer |
//! |-----------|------|--------|
//! | Breadth-first search | `bfs` | reachable nodes |
//! | Depth-first search | `dfs` | connected components |
//! | Dijkstra | `dijkstra` | distance triples |
//! | Bellman-Ford | `bellman_ford` | distance triples |
//! | Prim | `mst_prim` | MST edge triples |
//! | Floyd-Warshall | `floyd_warshall` | distance triples |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod canonical;
pub mod index;
pub mod hints;
pub mod output;
pub mod split;
pub mod sampler;
pub mod config;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Algorithm, Edge, EdgeLookup, GraphInstance, NodeIdx,
    Location, Probe, ProbeBundle, RawSample, Stage,
    ReasoningTrace, TraceEvent, TraceInputs,
};

// ============================================================================
// Re-exports: Translation
// ============================================================================

pub use hints::{Answer, HintState, TranslateContext, Translation};
pub use index::{DedupIndex, GraphHash};

// ============================================================================
// Re-exports: Assembly, sampling, export
// ============================================================================

pub use split::{AssemblyStats, Phase, SplitAssembler, SplitBucket, SplitKind, SplitSet};
pub use split::quota::{Quota, QuotaTable};
pub use sampler::{Sampler, SamplerFactory, SamplerSpec, ReplayFactory, ReplaySampler};
pub use config::GeneratorConfig;
pub use export::{DatasetExporter, ExportLayout, FsExporter, OutputFormat, ReasoningStrategy};

use tracing::info;

// ============================================================================
// Per-sample narration
// ============================================================================

/// Narrate one raw sample whose graph has already been canonicalized.
///
/// Builds the typed hint state, runs the algorithm's translator and
/// renders its answer. The returned trace borrows nothing from `sample`.
pub fn narrate(
    algorithm: Algorithm,
    negative_edges: bool,
    graph: &GraphInstance,
    sample: &RawSample,
) -> Result<ReasoningTrace> {
    // Phase 1: Validate raw state
    let state = HintState::from_sample(algorithm, sample)?;

    // Phase 2: Translate hints
    let lookup = graph.lookup();
    let ctx = TranslateContext {
        negative_edges,
        edges: &lookup,
        source: graph.source(),
    };
    let translation = state.translate(&ctx)?;

    // Phase 3: Render answer
    let output = output::render_answer(algorithm, &translation.answer)?;

    Ok(ReasoningTrace {
        inputs: TraceInputs {
            algorithm,
            edges: graph.edges().to_vec(),
            source: graph.source(),
        },
        hints: translation.events,
        output,
    })
}

// ============================================================================
// Top-level generator handle
// ============================================================================

/// The primary entry point. A `DatasetGenerator` pulls samples from a
/// sampler factory, assembles splits per graph size and hands them to an
/// exporter.
pub struct DatasetGenerator<F: SamplerFactory, E: DatasetExporter> {
    config: GeneratorConfig,
    factory: F,
    exporter: E,
}

/// Per-graph-size outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeReport {
    pub graph_size: usize,
    pub training: usize,
    pub validation: usize,
    pub testing: usize,
    pub accepted: usize,
    pub discarded: usize,
    pub overwritten: usize,
}

/// Outcome of a full generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub sizes: Vec<SizeReport>,
}

impl<F: SamplerFactory, E: DatasetExporter> DatasetGenerator<F, E> {
    pub fn new(config: GeneratorConfig, factory: F, exporter: E) -> Self {
        Self { config, factory, exporter }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Assemble the splits for one graph size without exporting them.
    pub fn assemble(&self, graph_size: usize) -> Result<SplitSet> {
        let quota = self.config.quota_table().quota_for(graph_size);
        let (mut sampler, spec) = self.factory.build_sampler(
            self.config.algorithm,
            None,
            graph_size,
            self.config.seed,
        )?;
        info!(
            algorithm = %spec.algorithm,
            graph_size,
            seed = spec.seed,
            training = quota.training,
            evaluation = quota.evaluation,
            "sampling started"
        );

        let mut assembler = SplitAssembler::new(
            self.config.algorithm,
            self.config.neg_edges,
            self.config.retry_budget,
        );
        let set = assembler.assemble(&mut sampler, graph_size, quota)?;
        info!(graph_size, discarded = set.stats.discarded, "sampling complete");
        Ok(set)
    }

    /// Run every configured graph size: assemble, then export.
    ///
    /// Output formats are validated before any sampling starts.
    pub fn run(&self) -> Result<GenerationReport> {
        for name in &self.config.output_formats {
            name.parse::<OutputFormat>()?;
        }

        let mut report = GenerationReport::default();
        for &graph_size in &self.config.graph_sizes {
            let set = self.assemble(graph_size)?;
            let layout = export::resolve_output_dirs(
                &self.config.output_dir,
                self.config.algorithm,
                &self.config.output_formats,
                graph_size,
            )?;
            self.exporter.export(&set, &layout, self.config.seed)?;

            report.sizes.push(SizeReport {
                graph_size,
                training: set.training.len(),
                validation: set.validation.len(),
                testing: set.testing.len(),
                accepted: set.stats.accepted,
                discarded: set.stats.discarded,
                overwritten: set.stats.overwritten,
            });
        }
        Ok(report)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Unsupported hint kind for {algorithm}: cannot flatten probe '{probe}'")]
    UnsupportedHintKind { algorithm: String, probe: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    #[error("No unique graph of size {graph_size} found after {attempts} consecutive duplicates")]
    ExhaustedUniqueGraphs { graph_size: usize, attempts: usize },

    #[error("Sampler error: {0}")]
    Sampler(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
