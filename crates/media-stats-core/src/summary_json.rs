use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report::ReportSummary;

/// Outcome of one dataset: where it came from, where it went, and its figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub kind: String,
    pub input: PathBuf,
    pub report: PathBuf,
    pub loaded: usize,
    pub skipped: usize,
    pub stats: ReportSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub datasets: Vec<DatasetSummary>,
    pub warnings: Vec<String>,
}

/// Write the run summary as pretty-printed JSON.
pub fn write_summary_json(summary: &RunSummary, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
