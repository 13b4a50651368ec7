//! Exit codes for the fl-core CLI.
//!
//! Exit codes communicate operation outcome without requiring output
//! parsing. They are a stable contract for automation; changes require a
//! major version bump.
//!
//! Ranges:
//! - 0: success
//! - 10-19: user/environment errors (recoverable by user action)
//! - 20-29: internal errors (bugs, should be reported)

use fl_common::error::ErrorCategory;
use fl_common::Error;

/// Exit codes for fl-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Clean run.
    Success = 0,

    /// Invalid arguments.
    ArgsError = 10,

    /// Configuration invalid or unreadable.
    ConfigError = 11,

    /// Input batch unreadable or unparsable.
    InputError = 12,

    /// Filesystem I/O failure.
    IoError = 13,

    /// Internal error (rendering, serialization bugs).
    InternalError = 20,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Input => ExitCode::InputError,
            ErrorCategory::Io => ExitCode::IoError,
            ErrorCategory::Output => ExitCode::InternalError,
        }
    }
}
