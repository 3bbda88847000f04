use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::media::{Playlist, Record, Track, Video};

/// Length of the ranking section
pub const TOP_N: usize = 3;

/// Report vocabulary for a record kind: how it ranks, what it filters on,
/// and how it reads in the output.
pub trait Ranked: Record {
    /// Capitalized dataset name used on the count line
    const COUNT_LABEL: &'static str;
    /// Name of the popularity metric in the ranking heading
    const METRIC: &'static str;
    /// Classifier value selected by the filter section
    const FILTER_TARGET: &'static str;

    /// Most popular first.
    fn rank(a: &Self, b: &Self) -> Ordering;
    /// Genre or category
    fn classifier(&self) -> &str;
    /// One ranking entry, without the position prefix
    fn top_entry(&self) -> String;
}

impl Ranked for Track {
    const COUNT_LABEL: &'static str = "Tracks";
    const METRIC: &'static str = "rating";
    const FILTER_TARGET: &'static str = "Pop";

    /// Higher rating first, the longer track wins a tie.
    fn rank(a: &Self, b: &Self) -> Ordering {
        b.rating()
            .cmp(&a.rating())
            .then_with(|| b.duration().cmp(&a.duration()))
    }

    fn classifier(&self) -> &str {
        self.genre()
    }

    fn top_entry(&self) -> String {
        format!("{} (rating {})", self.title(), self.rating())
    }
}

impl Ranked for Video {
    const COUNT_LABEL: &'static str = "Videos";
    const METRIC: &'static str = "views";
    const FILTER_TARGET: &'static str = "Education";

    // No secondary key: equal view counts keep input order.
    fn rank(a: &Self, b: &Self) -> Ordering {
        b.views().cmp(&a.views())
    }

    fn classifier(&self) -> &str {
        self.category()
    }

    fn top_entry(&self) -> String {
        format!("{} ({} views)", self.title(), self.views())
    }
}

/// Mean duration truncated toward zero, 0 for an empty slice
pub fn average_duration<R: Record>(items: &[R]) -> i64 {
    if items.is_empty() {
        return 0;
    }
    let total: i64 = items.iter().map(|r| i64::from(r.duration())).sum();
    total / items.len() as i64
}

/// The `n` best-ranked records. Stable, so ties the comparator leaves open keep input order.
pub fn top_n<R: Ranked>(items: &[R], n: usize) -> Vec<&R> {
    let mut sorted: Vec<&R> = items.iter().collect();
    sorted.sort_by(|a, b| R::rank(a, b));
    sorted.truncate(n);
    sorted
}

fn fold_case(s: &str) -> String {
    s.nfc().collect::<String>().to_lowercase()
}

/// Case-insensitive comparison of a classifier value against a target
pub fn classifier_matches(value: &str, target: &str) -> bool {
    fold_case(value) == fold_case(target)
}

/// Records whose classifier equals [`Ranked::FILTER_TARGET`], in input order.
pub fn filter_by_classifier<R: Ranked>(items: &[R]) -> Vec<&R> {
    items
        .iter()
        .filter(|r| classifier_matches(r.classifier(), R::FILTER_TARGET))
        .collect()
}

/// Statistics for one playlist, borrowed from it.
#[derive(Debug)]
pub struct Report<'a, R> {
    pub count: usize,
    pub average_duration: i64,
    pub top: Vec<&'a R>,
    pub matching: Vec<&'a R>,
}

impl<'a, R: Ranked> Report<'a, R> {
    pub fn build(playlist: &'a Playlist<R>) -> Self {
        let items = playlist.items();
        Self {
            count: items.len(),
            average_duration: average_duration(items),
            top: top_n(items, TOP_N),
            matching: filter_by_classifier(items),
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            kind: R::KIND.to_string(),
            count: self.count,
            average_duration: self.average_duration,
            top: self.top.iter().map(|r| r.top_entry()).collect(),
            filter_label: R::FILTER_TARGET.to_string(),
            filtered: self.matching.iter().map(|r| r.title().to_string()).collect(),
        }
    }
}

impl<R: Ranked> fmt::Display for Report<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} count: {}", R::COUNT_LABEL, self.count)?;
        writeln!(f, "Average duration: {} seconds", self.average_duration)?;
        writeln!(f)?;

        writeln!(f, "Top {} {} by {}:", TOP_N, R::KIND, R::METRIC)?;
        for (i, r) in self.top.iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, r.top_entry())?;
        }
        writeln!(f)?;

        writeln!(f, "{} {}:", R::FILTER_TARGET, R::KIND)?;
        for r in &self.matching {
            writeln!(f, "- {}", r.title())?;
        }
        Ok(())
    }
}

/// Serializable copy of a report's figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub kind: String,
    pub count: usize,
    pub average_duration: i64,
    pub top: Vec<String>,
    pub filter_label: String,
    pub filtered: Vec<String>,
}

/// Build the report for `playlist` and write it to `output`, replacing any existing file.
pub fn write_report<R: Ranked>(playlist: &Playlist<R>, output: &Path) -> anyhow::Result<ReportSummary> {
    let report = Report::build(playlist);
    fs::write(output, report.render())
        .with_context(|| format!("Failed to write {} report {}", R::KIND, output.display()))?;
    Ok(report.summary())
}
