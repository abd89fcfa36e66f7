//! Error types for Hypatia.
//!
//! Two levels of errors:
//! - [`Error`]: crate-level failures (database, I/O, internal invariants)
//! - [`RecordError`]: per-record failures during bulk ingest, carrying the
//!   source line number so a bad record never aborts the whole load

use thiserror::Error;

/// Convenient result alias for Hypatia operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal invariant violated. Indicates a bug in Hypatia itself.
    #[error("internal error: {0}")]
    Internal(String),
}

// ============================================================================
// Per-record ingest errors
// ============================================================================

/// Describes what went wrong with a single record during bulk ingest.
///
/// Record errors are collected and reported, not propagated: one malformed
/// line must never abort the load of a million-line file.
#[derive(Error, Debug, Clone)]
#[error("line {line}: {message}")]
pub struct RecordError {
    /// 1-based line number in the input file.
    pub line: usize,
    /// What category of failure occurred.
    pub kind: RecordErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of per-record ingest failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordErrorKind {
    /// The line was not valid JSON.
    MalformedJson,
    /// The JSON parsed but the record is semantically invalid.
    InvalidRecord,
    /// An article with this pmid already exists in the store.
    DuplicateArticle,
    /// The database rejected the write.
    Database,
}

impl RecordErrorKind {
    /// Short lowercase label, used when grouping errors in reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedJson => "malformed-json",
            Self::InvalidRecord => "invalid-record",
            Self::DuplicateArticle => "duplicate-article",
            Self::Database => "database",
        }
    }
}

impl RecordError {
    /// The line was not parseable as JSON.
    pub fn malformed_json(line: usize, err: &serde_json::Error) -> Self {
        Self {
            line,
            kind: RecordErrorKind::MalformedJson,
            message: format!("malformed JSON: {err}"),
        }
    }

    /// The record parsed but fails validation.
    pub fn invalid(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            kind: RecordErrorKind::InvalidRecord,
            message: message.into(),
        }
    }

    /// The record's pmid is already present in the store.
    pub fn duplicate(line: usize, pmid: i64) -> Self {
        Self {
            line,
            kind: RecordErrorKind::DuplicateArticle,
            message: format!("article {pmid} already exists"),
        }
    }

    /// The database rejected the write.
    pub fn database(line: usize, err: &rusqlite::Error) -> Self {
        Self {
            line,
            kind: RecordErrorKind::Database,
            message: format!("database error: {err}"),
        }
    }

    /// Whether this error was caused by the input data.
    ///
    /// Input errors are expected in the wild and reported at `warn` level;
    /// internal errors indicate something wrong with the store itself.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.kind,
            RecordErrorKind::MalformedJson
                | RecordErrorKind::InvalidRecord
                | RecordErrorKind::DuplicateArticle
        )
    }

    /// Whether this error points at the store rather than the input.
    #[must_use]
    pub fn is_internal_error(&self) -> bool {
        !self.is_input_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_json_is_input_error() {
        let err = serde_json::from_str::<serde_json::Value>("{nope")
            .expect_err("must not parse");
        let record = RecordError::malformed_json(7, &err);
        assert_eq!(record.line, 7);
        assert_eq!(record.kind, RecordErrorKind::MalformedJson);
        assert!(record.is_input_error());
        assert!(!record.is_internal_error());
    }

    #[test]
    fn duplicate_is_input_error() {
        let record = RecordError::duplicate(3, 12345);
        assert!(record.is_input_error());
        assert!(record.message.contains("12345"));
    }

    #[test]
    fn database_is_internal_error() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        let record = RecordError::database(1, &err);
        assert!(record.is_internal_error());
        assert!(!record.is_input_error());
    }

    #[test]
    fn display_includes_line_number() {
        let record = RecordError::invalid(42, "missing title");
        assert_eq!(record.to_string(), "line 42: missing title");
    }

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(RecordErrorKind::MalformedJson.as_str(), "malformed-json");
        assert_eq!(RecordErrorKind::Database.as_str(), "database");
    }
}
