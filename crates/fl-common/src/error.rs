//! Error types for FlowLens.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! Errors can be formatted for human consumption with headline, reason, and fix:
//! ```text
//! ✗ Configuration Error
//!   Reason: invalid workflow config: duplicate state name "Done"
//!   Fix: Run 'fl-core check --config <file>' to validate the workflow config.
//! ```
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 12,
//!   "category": "config",
//!   "message": "invalid workflow config: duplicate state name \"Done\"",
//!   "recoverable": true,
//!   "context": { "file": "flowlens.json" }
//! }
//! ```
//!
//! Note that per-issue processing never surfaces an `Error`: a malformed
//! issue yields a best-effort partial record, not a failure. Errors here
//! cover the surrounding I/O, parsing, and configuration layers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for FlowLens operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors (workflow state map, label needle).
    Config,
    /// Input batch reading and deserialization errors.
    Input,
    /// Output serialization errors.
    Output,
    /// File I/O errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Output => write!(f, "output"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for FlowLens.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid workflow config: {0}")]
    InvalidWorkflow(String),

    // Input errors (20-29)
    #[error("failed to read issue batch: {0}")]
    BatchRead(String),

    #[error("failed to parse issue batch: {0}")]
    BatchParse(String),

    // Output errors (30-39)
    #[error("output rendering failed: {0}")]
    Render(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Output errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidWorkflow(_) => 12,
            Error::BatchRead(_) => 20,
            Error::BatchParse(_) => 21,
            Error::Render(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidWorkflow(_) => ErrorCategory::Config,
            Error::BatchRead(_) | Error::BatchParse(_) => ErrorCategory::Input,
            Error::Render(_) => ErrorCategory::Output,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Config errors: recoverable by fixing/resetting config
            Error::Config(_) => true,
            Error::InvalidWorkflow(_) => true,

            // Input: recoverable by fixing the batch file
            Error::BatchRead(_) => true,
            Error::BatchParse(_) => true,

            // Output rendering is an internal bug
            Error::Render(_) => false,

            // I/O: often transient
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'fl-core check' to validate configuration, or delete flowlens.json to use defaults."
            }
            Error::InvalidWorkflow(_) => {
                "Run 'fl-core check --config <file>' to validate the workflow config."
            }
            Error::BatchRead(_) => {
                "Check that the input path exists and is readable, or pass '-' to read stdin."
            }
            Error::BatchParse(_) => {
                "Input must be a JSON array of issue records. Check syntax with 'cat <file> | jq .'."
            }
            Error::Render(_) => {
                "Internal rendering issue. Re-run with --format json and report a bug."
            }
            Error::Io(_) => {
                "Check disk space, permissions, and that the target directory exists."
            }
            Error::Json(_) => {
                "Invalid JSON. Check syntax with 'cat <file> | jq .' or restore from backup."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidWorkflow(_) => "Invalid Workflow Configuration",
            Error::BatchRead(_) => "Batch Read Error",
            Error::BatchParse(_) => "Batch Parse Error",
            Error::Render(_) => "Output Rendering Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
///
/// Used by agent/robot modes for machine-parseable error reporting.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., file path).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context: HashMap::new(),
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("test".into()).code(), 10);
        assert_eq!(Error::BatchParse("test".into()).code(), 21);
        assert_eq!(Error::Render("test".into()).code(), 30);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(Error::Config("test".into()).category(), ErrorCategory::Config);
        assert_eq!(Error::BatchRead("test".into()).category(), ErrorCategory::Input);
        assert_eq!(
            Error::Json(serde_json::from_str::<()>("x").unwrap_err()).category(),
            ErrorCategory::Io
        );
    }

    #[test]
    fn test_error_recoverable() {
        assert!(Error::Config("test".into()).is_recoverable());
        assert!(Error::BatchParse("test".into()).is_recoverable());
        assert!(!Error::Render("test".into()).is_recoverable());
    }

    #[test]
    fn test_structured_error_from_error() {
        let err = Error::InvalidWorkflow("duplicate state name \"Done\"".into());
        let structured = StructuredError::from(&err).with_context("file", "flowlens.json");

        assert_eq!(structured.code, 12);
        assert_eq!(structured.category, ErrorCategory::Config);
        assert!(structured.recoverable);
        assert_eq!(
            structured.context.get("file"),
            Some(&serde_json::json!("flowlens.json"))
        );
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::BatchParse("expected array".into());
        let json = StructuredError::from(&err).to_json();

        assert!(json.contains(r#""code":21"#));
        assert!(json.contains(r#""category":"input""#));
        assert!(json.contains(r#""recoverable":true"#));
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::BatchRead("no such file: issues.json".into());
        let formatted = format_error_human(&err, false);

        assert!(formatted.contains("Batch Read Error"));
        assert!(formatted.contains("no such file: issues.json"));
        assert!(formatted.contains("read stdin"));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Config.to_string(), "config");
        assert_eq!(ErrorCategory::Input.to_string(), "input");
    }
}
