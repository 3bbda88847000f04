use std::fmt;

/// Why an input line did not become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The line did not split into exactly five fields.
    FieldCount { found: usize },
    /// A numeric column held something other than an integer.
    InvalidNumber { column: &'static str, value: String },
    /// The header line does not name the expected columns (strict header mode only).
    HeaderMismatch { expected: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FieldCount { found } => {
                write!(f, "expected 5 fields, found {}", found)
            }
            SkipReason::InvalidNumber { column, value } => {
                write!(f, "{} is not an integer: {:?}", column, value)
            }
            SkipReason::HeaderMismatch { expected } => {
                write!(f, "header does not match {:?}", expected)
            }
        }
    }
}

impl std::error::Error for SkipReason {}

/// Advisory message about one input line. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Display name of the input (usually its path)
    pub source: String,
    /// 1-based line number, the header being line 1
    pub line_number: usize,
    /// The offending line, trimmed
    pub line: String,
    pub reason: SkipReason,
}

impl Diagnostic {
    /// True when the diagnostic stands for a dropped data line.
    pub fn is_skipped_line(&self) -> bool {
        !matches!(self.reason, SkipReason::HeaderMismatch { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.source, self.line_number, self.reason, self.line)
    }
}

/// Receives diagnostics as the loader produces them. May borrow caller state.
pub type DiagnosticSink<'a> = dyn Fn(&Diagnostic) + Send + Sync + 'a;

/// Sink that drops everything.
pub fn discard(_: &Diagnostic) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_line() {
        let d = Diagnostic {
            source: "tracks.txt".to_string(),
            line_number: 4,
            line: "a;b;c".to_string(),
            reason: SkipReason::FieldCount { found: 3 },
        };
        assert_eq!(d.to_string(), "tracks.txt:4: expected 5 fields, found 3: a;b;c");
        assert!(d.is_skipped_line());
    }

    fn emit_to(sink: &DiagnosticSink, line_number: usize) {
        sink(&Diagnostic {
            source: "t".to_string(),
            line_number,
            line: "x".to_string(),
            reason: SkipReason::FieldCount { found: 1 },
        });
    }

    #[test]
    fn test_sink_can_borrow_local_state() {
        let collected = std::sync::Mutex::new(Vec::new());
        let verbose = true;
        let sink = |d: &Diagnostic| {
            if verbose {
                collected.lock().unwrap().push(d.line_number);
            }
        };
        emit_to(&sink, 2);
        emit_to(&sink, 5);
        assert_eq!(*collected.lock().unwrap(), vec![2, 5]);
    }

    #[test]
    fn test_header_mismatch_is_not_a_skipped_line() {
        let d = Diagnostic {
            source: "videos.txt".to_string(),
            line_number: 1,
            line: "Name;Owner".to_string(),
            reason: SkipReason::HeaderMismatch {
                expected: "Title;Channel;Category;Duration;Views".to_string(),
            },
        };
        assert!(!d.is_skipped_line());
        assert!(d.to_string().starts_with("videos.txt:1: header does not match"));
    }
}
