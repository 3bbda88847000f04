pub mod diagnostic;
pub mod loader;
pub mod media;
pub mod report;
pub mod summary_json;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use diagnostic::{discard, Diagnostic, DiagnosticSink, SkipReason};
pub use loader::{load, load_tracks, load_videos, parse_text, LoadOptions, LoadOutcome};
pub use media::{Playlist, Record, Track, Video};
pub use report::{write_report, Ranked, Report, ReportSummary, TOP_N};
pub use summary_json::{DatasetSummary, RunSummary};

fn default_tracks() -> Option<PathBuf> {
    Some(PathBuf::from("tracks.txt"))
}

fn default_videos() -> Option<PathBuf> {
    Some(PathBuf::from("videos.txt"))
}

fn default_output() -> PathBuf {
    PathBuf::from(".")
}

fn default_tracks_report() -> String {
    "tracks_output.txt".to_string()
}

fn default_videos_report() -> String {
    "videos_output.txt".to_string()
}

fn default_encoding() -> String {
    "windows-1251".to_string()
}

/// Everything a run needs. `None` for an input skips that dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOptions {
    #[serde(default = "default_tracks")]
    pub tracks: Option<PathBuf>,
    #[serde(default = "default_videos")]
    pub videos: Option<PathBuf>,
    /// Directory receiving both reports
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_tracks_report")]
    pub tracks_report: String,
    #[serde(default = "default_videos_report")]
    pub videos_report: String,
    /// Fallback encoding label for input that is not UTF-8
    #[serde(default = "default_encoding")]
    pub encoding: String,
    #[serde(default)]
    pub strict_header: bool,
    #[serde(default)]
    pub summary_json: Option<PathBuf>,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            tracks: default_tracks(),
            videos: default_videos(),
            output: default_output(),
            tracks_report: default_tracks_report(),
            videos_report: default_videos_report(),
            encoding: default_encoding(),
            strict_header: false,
            summary_json: None,
        }
    }
}

impl ProcessOptions {
    /// Load options from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open config {}", path.display()))?;
        let options = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(options)
    }

    pub fn load_options(&self) -> anyhow::Result<LoadOptions> {
        LoadOptions::default()
            .with_encoding_label(&self.encoding)
            .map(|o| o.with_strict_header(self.strict_header))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub datasets: Vec<DatasetSummary>,
    pub warnings: Vec<String>,
}

impl ProcessResult {
    pub fn records_loaded(&self) -> usize {
        self.datasets.iter().map(|d| d.loaded).sum()
    }

    pub fn lines_skipped(&self) -> usize {
        self.datasets.iter().map(|d| d.skipped).sum()
    }
}

/// Load one dataset and write its report.
fn run_dataset<R: Ranked>(
    input: &Path,
    report_path: PathBuf,
    load_options: &LoadOptions,
    sink: &DiagnosticSink,
    warnings: &mut Vec<String>,
) -> anyhow::Result<DatasetSummary> {
    let outcome: LoadOutcome<R> = loader::load(input, load_options, sink)?;
    warnings.extend(outcome.diagnostics.iter().map(|d| d.to_string()));

    let stats = report::write_report(&outcome.playlist, &report_path)?;

    Ok(DatasetSummary {
        kind: R::KIND.to_string(),
        input: input.to_path_buf(),
        report: report_path,
        loaded: outcome.playlist.len(),
        skipped: outcome.skipped_lines(),
        stats,
    })
}

/// Run the loader and reporter for every configured dataset.
///
/// Skipped lines are passed to `sink` as they are found and also collected
/// into [`ProcessResult::warnings`]. The first I/O failure aborts the run.
pub fn process(options: &ProcessOptions, sink: &DiagnosticSink) -> anyhow::Result<ProcessResult> {
    let load_options = options.load_options()?;

    fs::create_dir_all(&options.output)
        .with_context(|| format!("Failed to create output directory {}", options.output.display()))?;

    let mut datasets = Vec::new();
    let mut warnings = Vec::new();

    if let Some(input) = &options.tracks {
        let report_path = options.output.join(&options.tracks_report);
        datasets.push(run_dataset::<Track>(input, report_path, &load_options, sink, &mut warnings)?);
    }

    if let Some(input) = &options.videos {
        let report_path = options.output.join(&options.videos_report);
        datasets.push(run_dataset::<Video>(input, report_path, &load_options, sink, &mut warnings)?);
    }

    if let Some(path) = &options.summary_json {
        let summary = RunSummary {
            generated_at: Utc::now(),
            datasets: datasets.clone(),
            warnings: warnings.clone(),
        };
        summary_json::write_summary_json(&summary, path)?;
    }

    Ok(ProcessResult { datasets, warnings })
}
