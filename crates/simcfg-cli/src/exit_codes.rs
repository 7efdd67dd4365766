//! Exit codes for the simcfg CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.

use simcfg_common::Error;

/// Exit codes for simcfg operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// Missing or mistyped setting, unused settings in strict mode
    ConfigError = 10,

    /// Malformed mask or list expression
    SyntaxError = 11,

    /// File could not be read, written, or parsed
    IoError = 13,
}

impl ExitCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        if err.is_syntax() {
            ExitCode::SyntaxError
        } else if err.is_io() {
            ExitCode::IoError
        } else {
            ExitCode::ConfigError
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_u8())
    }
}
