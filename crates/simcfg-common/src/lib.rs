//! simcfg common types and errors.
//!
//! This crate provides foundational pieces shared by the configuration core
//! and the command-line front end:
//! - The unified error taxonomy with stable numeric codes
//! - Pluralization helpers for human-readable diagnostics
//! - Formatting constants for emitted configuration documents

pub mod error;
pub mod plural;

pub use error::{Error, Result};
pub use plural::{plural_count, plural_s};

/// Indentation width of emitted configuration documents.
pub const OUTPUT_INDENT: usize = 4;
