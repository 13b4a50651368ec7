//! FlowLens Core Library
//!
//! This library derives normalized lifecycle metrics from per-issue
//! workflow-history event logs:
//! - Canonical phase-transition timestamps (first occurrence wins)
//! - Day-granularity phase durations with composite fallback arithmetic
//! - Recurring QA feedback-cycle detection (two heuristics, one primary)
//! - Per-issue aggregation and batch KPI rollups
//!
//! Processing is a pure batch computation: issues are independent of one
//! another, no I/O happens inside the engine, and identical input always
//! produces identical output. The binary entry point is in `main.rs`.

pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod output;

pub use config::WorkflowConfig;
pub use metrics::aggregate::{process_batch, process_issue};
pub use metrics::summary::{summarize, BatchSummary};
pub use model::input::{HistoryEvent, IssueInput, SprintRef};
pub use model::processed::{FeedbackCycle, PatternType, ProcessedIssue};
