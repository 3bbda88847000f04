use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use encoding_rs::{Encoding, WINDOWS_1251};

use crate::diagnostic::{Diagnostic, DiagnosticSink, SkipReason};
use crate::media::{Playlist, Record, Track, Video};

const DELIMITER: char = ';';

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Used when the input is not valid UTF-8
    pub fallback_encoding: &'static Encoding,
    /// Compare the header line against the expected column names
    pub strict_header: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            fallback_encoding: WINDOWS_1251,
            strict_header: false,
        }
    }
}

impl LoadOptions {
    /// Resolve a WHATWG encoding label such as "windows-1251" or "latin1".
    pub fn with_encoding_label(mut self, label: &str) -> anyhow::Result<Self> {
        self.fallback_encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown text encoding: {}", label))?;
        Ok(self)
    }

    pub fn with_strict_header(mut self, strict_header: bool) -> Self {
        self.strict_header = strict_header;
        self
    }
}

/// Records that survived parsing, plus every diagnostic emitted on the way.
#[derive(Debug, Clone)]
pub struct LoadOutcome<R> {
    pub playlist: Playlist<R>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<R> LoadOutcome<R> {
    /// Number of data lines that were dropped.
    pub fn skipped_lines(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_skipped_line()).count()
    }
}

/// Decode input text, trying UTF-8 first, then the fallback encoding
pub fn decode_text(bytes: &[u8], fallback: &'static Encoding) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.strip_prefix('\u{feff}').unwrap_or(s).to_string();
    }
    let (decoded, _, _) = fallback.decode(bytes);
    decoded.into_owned()
}

/// Split text into lines on `\r\n`, `\n` or a lone `\r`. A final terminator does not open an empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(|c: char| c == '\r' || c == '\n') {
        lines.push(&rest[..pos]);
        let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + skip..];
    }
    if !rest.is_empty() {
        lines.push(rest);
    }
    lines
}

/// Strip ASCII control characters and spaces (code points up to U+0020) from both ends.
fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c <= ' ')
}

/// Split a line on `;`. Trailing empty fields are dropped before counting.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(DELIMITER).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    fields
}

fn header_matches<R: Record>(header: &str) -> bool {
    let fields = split_fields(trim_line(header));
    fields.len() == R::COLUMNS.len()
        && fields
            .iter()
            .zip(R::COLUMNS)
            .all(|(found, expected)| found.trim().eq_ignore_ascii_case(expected))
}

/// Parse already-decoded text. The first line is always treated as the header.
pub fn parse_text<R: Record>(
    text: &str,
    source: &str,
    options: &LoadOptions,
    sink: &DiagnosticSink,
) -> LoadOutcome<R> {
    let mut playlist = Playlist::new();
    let mut diagnostics = Vec::new();
    let mut emit = |line_number: usize, line: &str, reason: SkipReason| {
        let diagnostic = Diagnostic {
            source: source.to_string(),
            line_number,
            line: line.to_string(),
            reason,
        };
        sink(&diagnostic);
        diagnostics.push(diagnostic);
    };

    let mut lines = split_lines(text).into_iter();

    if let Some(header) = lines.next() {
        if options.strict_header && !header_matches::<R>(header) {
            emit(
                1,
                trim_line(header),
                SkipReason::HeaderMismatch {
                    expected: R::COLUMNS.join(";"),
                },
            );
        }
    }

    for (i, raw) in lines.enumerate() {
        let line_number = i + 2;
        let line = trim_line(raw);
        if line.is_empty() {
            continue;
        }

        let fields = split_fields(line);
        let Ok(fields) = <[&str; 5]>::try_from(fields.as_slice()) else {
            emit(line_number, line, SkipReason::FieldCount { found: fields.len() });
            continue;
        };

        match R::from_fields(fields) {
            Ok(record) => playlist.add(record),
            Err(reason) => emit(line_number, line, reason),
        }
    }

    LoadOutcome {
        playlist,
        diagnostics,
    }
}

/// Read and parse a whole file. Only an unreadable file is an error;
/// malformed lines go to `sink` and are left out of the playlist.
pub fn load<R: Record>(
    path: &Path,
    options: &LoadOptions,
    sink: &DiagnosticSink,
) -> anyhow::Result<LoadOutcome<R>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {} input {}", R::KIND, path.display()))?;
    let text = decode_text(&bytes, options.fallback_encoding);
    Ok(parse_text(&text, &path.display().to_string(), options, sink))
}

pub fn load_tracks(path: &Path, options: &LoadOptions, sink: &DiagnosticSink) -> anyhow::Result<LoadOutcome<Track>> {
    load(path, options, sink)
}

pub fn load_videos(path: &Path, options: &LoadOptions, sink: &DiagnosticSink) -> anyhow::Result<LoadOutcome<Video>> {
    load(path, options, sink)
}
