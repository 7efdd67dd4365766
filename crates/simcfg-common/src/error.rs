//! Error types for simcfg.
//!
//! Every variant is fatal at the point of detection. Library code returns it,
//! callers stop the run; nothing in the workspace retries or recovers.

use crate::plural::plural_s;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for simcfg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for simcfg.
#[derive(Error, Debug)]
pub enum Error {
    // Lookup errors (10-19)
    #[error("required setting {key} not found")]
    MissingKey { key: String },

    #[error("setting {key} has type {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("path conflict at {key}: found a {found} where a group is needed")]
    TypeConflict { key: String, found: String },

    #[error("setting {key} value {value} does not fit in {target}")]
    IntegerOverflow {
        key: String,
        value: String,
        target: String,
    },

    #[error("setting {key} has unsupported value kind {found}")]
    UnsupportedValue { key: String, found: String },

    // Syntax errors (20-29)
    #[error("invalid range syntax: {0}")]
    RangeSyntax(String),

    #[error("invalid range bounds: {0}")]
    RangeBounds(String),

    #[error("{field} in list [{input}] could not be parsed")]
    ListParse { field: String, input: String },

    // Finalize errors (30-39)
    #[error("{count} setting{} not used during configuration", plural_s_ref(.count))]
    UnusedSettings { count: usize },

    #[error("setting {key} was read, should be private")]
    PrivateSettingRead { key: String },

    // I/O errors (60-69)
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Codes are grouped by family: lookup 1x, syntax 2x, finalize 3x, I/O 6x.
    pub fn code(&self) -> u32 {
        match self {
            Error::MissingKey { .. } => 10,
            Error::TypeMismatch { .. } => 11,
            Error::TypeConflict { .. } => 12,
            Error::IntegerOverflow { .. } => 13,
            Error::UnsupportedValue { .. } => 14,
            Error::RangeSyntax(_) => 20,
            Error::RangeBounds(_) => 21,
            Error::ListParse { .. } => 22,
            Error::UnusedSettings { .. } => 30,
            Error::PrivateSettingRead { .. } => 31,
            Error::Io { .. } => 60,
            Error::Json(_) => 61,
        }
    }

    /// True for malformed mask/list expressions.
    pub fn is_syntax(&self) -> bool {
        (20..30).contains(&self.code())
    }

    /// True for filesystem and document-format failures.
    pub fn is_io(&self) -> bool {
        self.code() >= 60
    }

    /// Build an [`Error::Io`] tagged with the path that failed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

fn plural_s_ref(count: &usize) -> &'static str {
    plural_s(*count)
}
