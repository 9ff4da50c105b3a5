//! Dataset export: raw sample containers plus chat-format reasoning data.
//!
//! One graph size produces this tree:
//!
//! ```text
//! <out>/<algorithm>/<graph_size>/
//!   manifest.json
//!   raw/training.bin  raw/validation.bin  raw/testing.bin     (bincode)
//!   llm/<format>/<strategy>/train.<ext>  test.<ext>  evaluation.<ext>
//! ```
//!
//! The chat splits keep the historical naming: the training bucket is
//! `train`, validation is `test` and testing is `evaluation`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{trace::fmt_list, Algorithm, RawSample, ReasoningTrace};
use crate::split::{AssemblyStats, SplitBucket, SplitKind, SplitSet};
use crate::{Error, Result};

// ============================================================================
// Formats and strategies
// ============================================================================

/// Serialization of the chat datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One JSON array per split file.
    Json,
    /// One JSON record per line.
    Jsonl,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.name()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            other => Err(Error::UnsupportedOutputFormat(other.to_string())),
        }
    }
}

/// How much of the trace the assistant turn carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningStrategy {
    /// Final answer only.
    Direct,
    /// Every hint event, then the final answer.
    ChainOfThought,
}

impl ReasoningStrategy {
    pub const ALL: [ReasoningStrategy; 2] = [ReasoningStrategy::Direct, ReasoningStrategy::ChainOfThought];

    pub fn name(&self) -> &'static str {
        match self {
            ReasoningStrategy::Direct => "direct",
            ReasoningStrategy::ChainOfThought => "chain_of_thought",
        }
    }
}

// ============================================================================
// Chat records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self { role: role.to_string(), content: content.into() }
    }
}

/// One exported example.
///
/// Training records end with the assistant turn. Evaluation records stop at
/// the user turn and carry the expected answer in `reference`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

fn system_prompt(algorithm: Algorithm) -> String {
    format!(
        "You are an expert in graph algorithms. You execute {} exactly and report each step.",
        algorithm.title()
    )
}

fn user_prompt(trace: &ReasoningTrace, strategy: ReasoningStrategy) -> String {
    let inputs = &trace.inputs;
    let mut prompt = format!(
        "Run {} on the undirected graph with edges {}",
        inputs.algorithm.title(),
        fmt_list(&inputs.edges)
    );
    if let Some(source) = inputs.source {
        prompt.push_str(&format!(", starting from source node {source}"));
    }
    prompt.push('.');
    match strategy {
        ReasoningStrategy::Direct => prompt.push_str(" Give only the final result."),
        ReasoningStrategy::ChainOfThought => {
            prompt.push_str(" Describe every step, then give the final result.")
        }
    }
    prompt
}

fn assistant_text(trace: &ReasoningTrace, strategy: ReasoningStrategy) -> String {
    match strategy {
        ReasoningStrategy::Direct => trace.output.clone(),
        ReasoningStrategy::ChainOfThought if trace.hints.is_empty() => trace.output.clone(),
        ReasoningStrategy::ChainOfThought => format!("{}\n{}", trace.hint_text(), trace.output),
    }
}

/// Build the chat record for one trace.
pub fn chat_record(trace: &ReasoningTrace, strategy: ReasoningStrategy, kind: SplitKind) -> ChatRecord {
    let mut messages = vec![
        ChatMessage::new("system", system_prompt(trace.inputs.algorithm)),
        ChatMessage::new("user", user_prompt(trace, strategy)),
    ];
    if kind.is_evaluation() {
        return ChatRecord { messages, reference: Some(trace.output.clone()) };
    }
    messages.push(ChatMessage::new("assistant", assistant_text(trace, strategy)));
    ChatRecord { messages, reference: None }
}

/// Records for a whole bucket, in index order.
pub fn chat_records(bucket: &SplitBucket, strategy: ReasoningStrategy, kind: SplitKind) -> Vec<ChatRecord> {
    bucket
        .traces()
        .values()
        .map(|trace| chat_record(trace, strategy, kind))
        .collect()
}

// ============================================================================
// Layout
// ============================================================================

/// Output directories for one graph size. Computing a layout touches no files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLayout {
    pub size_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub llm_dirs: Vec<(OutputFormat, PathBuf)>,
}

impl ExportLayout {
    pub fn raw_file(&self, kind: SplitKind) -> PathBuf {
        self.raw_dir.join(format!("{}.bin", kind.name()))
    }

    pub fn llm_file(&self, format: OutputFormat, strategy: ReasoningStrategy, kind: SplitKind) -> Option<PathBuf> {
        self.llm_dirs
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, dir)| {
                dir.join(strategy.name())
                    .join(format!("{}.{}", kind.dataset_split_name(), format.extension()))
            })
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.size_dir.join("manifest.json")
    }
}

/// Resolve the output tree for one graph size.
///
/// Every format name is validated here, so an unsupported one fails before
/// anything is written.
pub fn resolve_output_dirs(
    root: &Path,
    algorithm: Algorithm,
    formats: &[String],
    graph_size: usize,
) -> Result<ExportLayout> {
    let size_dir = root.join(algorithm.name()).join(graph_size.to_string());
    let llm_dirs = formats
        .iter()
        .map(|name| {
            let format: OutputFormat = name.parse()?;
            Ok((format, size_dir.join("llm").join(format.name())))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ExportLayout {
        raw_dir: size_dir.join("raw"),
        size_dir,
        llm_dirs,
    })
}

// ============================================================================
// Raw containers
// ============================================================================

pub fn write_raw_bucket(path: &Path, bucket: &SplitBucket) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, bucket.samples())?;
    writer.flush()?;
    Ok(())
}

pub fn read_raw_bucket(path: &Path) -> Result<BTreeMap<usize, RawSample>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

// ============================================================================
// Manifest
// ============================================================================

/// Summary written next to the exported data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub algorithm: Algorithm,
    pub graph_size: usize,
    pub seed: u64,
    pub generated_at: DateTime<Utc>,
    /// Bucket name → sample count.
    pub counts: BTreeMap<String, usize>,
    pub stats: AssemblyStats,
    pub formats: Vec<OutputFormat>,
}

impl Manifest {
    pub fn new(set: &SplitSet, layout: &ExportLayout, seed: u64) -> Self {
        Self {
            algorithm: set.algorithm,
            graph_size: set.graph_size,
            seed,
            generated_at: Utc::now(),
            counts: SplitKind::ALL
                .iter()
                .map(|kind| (kind.name().to_string(), set.bucket(*kind).len()))
                .collect(),
            stats: set.stats,
            formats: layout.llm_dirs.iter().map(|(format, _)| *format).collect(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

// ============================================================================
// Exporter trait and filesystem implementation
// ============================================================================

/// The persistence contract for assembled splits.
pub trait DatasetExporter {
    fn export(&self, set: &SplitSet, layout: &ExportLayout, seed: u64) -> Result<()>;
}

/// Writes the tree described in the module docs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsExporter;

impl FsExporter {
    pub fn new() -> Self {
        Self
    }

    fn write_records(path: &Path, format: OutputFormat, records: &[ChatRecord]) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        match format {
            OutputFormat::Json => serde_json::to_writer_pretty(&mut writer, records)?,
            OutputFormat::Jsonl => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writer.write_all(b"\n")?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl DatasetExporter for FsExporter {
    fn export(&self, set: &SplitSet, layout: &ExportLayout, seed: u64) -> Result<()> {
        fs::create_dir_all(&layout.raw_dir)?;
        for kind in SplitKind::ALL {
            write_raw_bucket(&layout.raw_file(kind), set.bucket(kind))?;
        }

        for (format, _) in &layout.llm_dirs {
            for strategy in ReasoningStrategy::ALL {
                for kind in SplitKind::ALL {
                    let Some(path) = layout.llm_file(*format, strategy, kind) else {
                        continue;
                    };
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    let records = chat_records(set.bucket(kind), strategy, kind);
                    Self::write_records(&path, *format, &records)?;
                }
            }
        }

        let manifest = Manifest::new(set, layout, seed);
        let mut writer = BufWriter::new(File::create(layout.manifest_file())?);
        serde_json::to_writer_pretty(&mut writer, &manifest)?;
        writer.flush()?;

        info!(
            algorithm = %set.algorithm,
            graph_size = set.graph_size,
            dir = %layout.size_dir.display(),
            "splits exported"
        );
        Ok(())
    }
}
