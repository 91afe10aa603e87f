//! Shared types for runlog
//!
//! This crate contains data structures used across multiple runlog crates.

use chrono::{DateTime, Utc};
use ratatui::style::Color;
use serde::Serialize;

// ============================================================================
// Line Classification
// ============================================================================

/// Coarse kind of a log line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    #[default]
    Plain,
    Error,
    Warning,
}

impl LineKind {
    /// Get display color for this kind
    pub fn color(&self) -> Color {
        match self {
            Self::Plain => Color::White,
            Self::Error => Color::Red,
            Self::Warning => Color::Yellow,
        }
    }

    /// Short display string (3 chars)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "   ",
            Self::Error => "ERR",
            Self::Warning => "WRN",
        }
    }
}

/// Result of classifying a single line.
///
/// Error and warning variants carry the diagnostic body extracted from the
/// line (the text after the marker, or the whole stripped line when the kind
/// came from markup).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LineClass {
    #[default]
    Plain,
    Error { body: String },
    Warning { body: String },
}

impl LineClass {
    pub fn kind(&self) -> LineKind {
        match self {
            Self::Plain => LineKind::Plain,
            Self::Error { .. } => LineKind::Error,
            Self::Warning { .. } => LineKind::Warning,
        }
    }

    /// Diagnostic body, if this line is a diagnostic
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Plain => None,
            Self::Error { body } | Self::Warning { body } => Some(body),
        }
    }
}

/// Style attached to a run of text by the log producer's markup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SegmentStyle {
    #[default]
    Plain,
    Error,
    Warning,
    Note,
    Emphasis,
}

impl SegmentStyle {
    /// Map a markup class name to a style
    pub fn from_class(class: &str) -> Self {
        match class.trim().to_lowercase().as_str() {
            "log-error" | "error" => Self::Error,
            "log-warning" | "warning" => Self::Warning,
            "log-note" | "note" => Self::Note,
            _ => Self::Emphasis,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Plain => Color::White,
            Self::Error => Color::Red,
            Self::Warning => Color::Yellow,
            Self::Note => Color::Cyan,
            Self::Emphasis => Color::Magenta,
        }
    }
}

/// A run of text sharing one render style
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

impl Segment {
    pub fn new(text: impl Into<String>, style: SegmentStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SegmentStyle::Plain)
    }
}

/// A log line after classification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassifiedLine {
    /// 0-based line number within the log
    pub index: usize,

    /// Classification result
    pub class: LineClass,

    /// Markup-free text (copy form)
    pub text: String,

    /// Styled runs (render form)
    pub segments: Vec<Segment>,
}

impl ClassifiedLine {
    pub fn kind(&self) -> LineKind {
        self.class.kind()
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Diagnostic severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Error,
    Warning,
}

impl DiagnosticKind {
    /// Plural label used for tree headings
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Errors",
            Self::Warning => "Warnings",
        }
    }

    pub fn color(&self) -> Color {
        LineKind::from(*self).color()
    }
}

impl From<DiagnosticKind> for LineKind {
    fn from(kind: DiagnosticKind) -> Self {
        match kind {
            DiagnosticKind::Error => LineKind::Error,
            DiagnosticKind::Warning => LineKind::Warning,
        }
    }
}

/// An error or warning found in a log
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub body: String,
    /// 0-based line number
    pub line: usize,
    /// Position among diagnostics of the same kind, in line order
    pub sequence_id: usize,
}

// ============================================================================
// Chunks and Records
// ============================================================================

/// A contiguous slice of log lines rendered as a unit
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub index: usize,
    pub start_line: usize,
    /// Inclusive
    pub end_line: usize,
    /// Markup-free text of the chunk, lines joined with '\n'
    pub text: String,
}

impl Chunk {
    /// Number of lines in this chunk
    pub fn line_count(&self) -> usize {
        self.end_line + 1 - self.start_line
    }

    pub fn contains(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }

    /// Half-open line range, for slicing line vectors
    pub fn line_range(&self) -> std::ops::Range<usize> {
        self.start_line..self.end_line + 1
    }
}

/// A parsed execution log
#[derive(Clone, Debug)]
pub struct LogRecord {
    /// Raw log text
    pub body: String,

    /// Number of lines in the log
    pub line_count: usize,

    /// Errors ordered by line
    pub errors: Vec<Diagnostic>,

    /// Warnings ordered by line
    pub warnings: Vec<Diagnostic>,

    /// Classified lines, one per log line
    pub lines: Vec<ClassifiedLine>,

    /// When the record was installed
    pub received_at: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(
        body: String,
        lines: Vec<ClassifiedLine>,
        errors: Vec<Diagnostic>,
        warnings: Vec<Diagnostic>,
    ) -> Self {
        Self {
            body,
            line_count: lines.len(),
            errors,
            warnings,
            lines,
            received_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    /// Total number of diagnostics
    pub fn diagnostic_count(&self) -> usize {
        self.errors.len() + self.warnings.len()
    }
}

/// Where a navigation landed; consumed once by the highlight effect
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationTarget {
    pub diagnostic: Diagnostic,
    pub chunk_index: usize,
}

impl NavigationTarget {
    pub fn line(&self) -> usize {
        self.diagnostic.line
    }
}

// ============================================================================
// Execution Responses
// ============================================================================

/// Shape of an execution response payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// webout, log and print output separated by the sentinel
    #[default]
    ThreePart,
    /// No sentinel found; the whole payload is the log
    Opaque,
}

/// Execution response split into its parts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionResponse {
    pub webout: String,
    pub log: String,
    pub print_output: String,
    pub format: PayloadFormat,
}

impl ExecutionResponse {
    /// Response consisting only of a log (no sentinel framing)
    pub fn opaque(payload: impl Into<String>) -> Self {
        Self {
            webout: String::new(),
            log: payload.into(),
            print_output: String::new(),
            format: PayloadFormat::Opaque,
        }
    }
}
