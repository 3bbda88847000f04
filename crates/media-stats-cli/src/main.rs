use std::path::PathBuf;

use clap::Parser;
use media_stats_core::{Diagnostic, ProcessOptions};

#[derive(Parser)]
#[command(name = "media-stats", version, about = "Summarize track and video lists into text reports")]
struct Cli {
    /// Tracks input (Title;Artist;Genre;Duration;Rating) [default: tracks.txt]
    #[arg(long)]
    tracks: Option<PathBuf>,

    /// Videos input (Title;Channel;Category;Duration;Views) [default: videos.txt]
    #[arg(long)]
    videos: Option<PathBuf>,

    /// Output directory for the reports [default: .]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File name of the tracks report [default: tracks_output.txt]
    #[arg(long)]
    tracks_report: Option<String>,

    /// File name of the videos report [default: videos_output.txt]
    #[arg(long)]
    videos_report: Option<String>,

    /// Do not process the tracks input
    #[arg(long, conflicts_with = "tracks")]
    skip_tracks: bool,

    /// Do not process the videos input
    #[arg(long, conflicts_with = "videos")]
    skip_videos: bool,

    /// Encoding used when an input is not valid UTF-8 [default: windows-1251]
    #[arg(long)]
    encoding: Option<String>,

    /// Report a header line that does not name the expected columns
    #[arg(long)]
    strict_header: bool,

    /// Also write a JSON summary of the run to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Read options from a JSON file; flags given here take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not print skipped lines
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn resolve_options(&self) -> anyhow::Result<ProcessOptions> {
        let mut options = match &self.config {
            Some(path) => ProcessOptions::from_json_file(path)?,
            None => ProcessOptions::default(),
        };

        if let Some(tracks) = &self.tracks {
            options.tracks = Some(tracks.clone());
        }
        if let Some(videos) = &self.videos {
            options.videos = Some(videos.clone());
        }
        if self.skip_tracks {
            options.tracks = None;
        }
        if self.skip_videos {
            options.videos = None;
        }
        if let Some(output) = &self.output {
            options.output = output.clone();
        }
        if let Some(name) = &self.tracks_report {
            options.tracks_report = name.clone();
        }
        if let Some(name) = &self.videos_report {
            options.videos_report = name.clone();
        }
        if let Some(encoding) = &self.encoding {
            options.encoding = encoding.clone();
        }
        if self.strict_header {
            options.strict_header = true;
        }
        if let Some(path) = &self.summary_json {
            options.summary_json = Some(path.clone());
        }

        Ok(options)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let t_total = std::time::Instant::now();
    let options = cli.resolve_options()?;

    if options.tracks.is_none() && options.videos.is_none() {
        eprintln!("Both datasets skipped. Nothing to do.");
        return Ok(());
    }

    let quiet = cli.quiet;
    let result = media_stats_core::process(&options, &|diagnostic: &Diagnostic| {
        if !quiet {
            eprintln!("  Skipped {}", diagnostic);
        }
    })?;

    for dataset in &result.datasets {
        eprintln!("=== {} ===", dataset.kind);
        eprintln!(
            "Loaded {} records from {}, skipped {} lines",
            dataset.loaded,
            dataset.input.display(),
            dataset.skipped
        );
        eprintln!("Wrote {}", dataset.report.display());
    }
    if let Some(path) = &options.summary_json {
        eprintln!("Wrote {}", path.display());
    }

    eprintln!(
        "Done! {} records, {} lines skipped ({:.2}s)",
        result.records_loaded(),
        result.lines_skipped(),
        t_total.elapsed().as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["media-stats"]).unwrap();
        assert_eq!(cli.resolve_options().unwrap(), ProcessOptions::default());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.json");
        std::fs::write(
            &config,
            r#"{ "tracks": "music.txt", "output": "reports", "encoding": "latin1" }"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "media-stats",
            "--config",
            config.to_str().unwrap(),
            "--output",
            "elsewhere",
            "--skip-videos",
            "--strict-header",
        ])
        .unwrap();
        let options = cli.resolve_options().unwrap();

        assert_eq!(options.tracks, Some(PathBuf::from("music.txt")));
        assert_eq!(options.videos, None);
        assert_eq!(options.output, PathBuf::from("elsewhere"));
        assert_eq!(options.encoding, "latin1");
        assert!(options.strict_header);
    }

    #[test]
    fn test_skip_conflicts_with_path() {
        assert!(Cli::try_parse_from(["media-stats", "--tracks", "a.txt", "--skip-tracks"]).is_err());
    }
}
