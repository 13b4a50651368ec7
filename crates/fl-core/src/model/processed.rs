//! Output records produced by the metrics engine.
//!
//! `ProcessedIssue` is the flat per-issue record consumed by downstream
//! dashboards and filters. Field names are a stable contract covered by
//! `fl_common::SCHEMA_VERSION`. Timestamps serialize as RFC 3339 or are
//! absent; durations are non-negative day counts rounded to two decimals
//! or absent. Neither is ever an empty string or NaN.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A recorded canonical-transition timestamp.
///
/// Keeps the raw source string alongside the parsed instant. A slot is
/// filled by the first matching event even when its timestamp fails to
/// parse; such a stamp blocks later matches but yields absent everywhere
/// an instant is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    /// Timestamp string as received from the source.
    pub raw: String,

    /// Parsed instant, absent when `raw` is not valid RFC 3339.
    pub at: Option<DateTime<Utc>>,
}

impl Stamp {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let at = DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok();
        Stamp { raw, at }
    }
}

/// The five canonical transition timestamps for one issue.
///
/// Each slot is set at most once (first occurrence wins) and never
/// mutated afterwards. All slots absent means the issue never left its
/// initial state; that is a valid result, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionStamps {
    /// Todo → In Progress.
    pub backlog_to_in_progress: Option<Stamp>,

    /// In Progress → In Review.
    pub in_progress_to_in_review: Option<Stamp>,

    /// In Review → Ready to QA.
    pub in_review_to_ready_to_qa: Option<Stamp>,

    /// Ready to QA → Done.
    pub ready_to_qa_to_done: Option<Stamp>,

    /// In Review → Done, skipping the QA phase entirely.
    pub in_review_to_done_direct: Option<Stamp>,
}

/// Day-granularity phase durations derived from `TransitionStamps`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseDurations {
    pub in_progress_to_in_review_days: Option<f64>,
    pub in_review_to_ready_to_qa_days: Option<f64>,
    pub ready_to_qa_to_done_days: Option<f64>,

    /// Composite review-to-done metric, see the fallback chain in
    /// `metrics::durations`.
    pub in_review_to_done_days: Option<f64>,

    /// True when `in_review_to_done_days` came from the approximation
    /// fallback (QA-entry event missed, Done event known).
    pub in_review_to_done_approximate: bool,
}

/// Which heuristic produced a feedback cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Anchored on leaving "Ready to QA" (primary heuristic).
    ReadyToQa,
    /// Anchored on leaving "In QA" (fallback heuristic).
    InQa,
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternType::ReadyToQa => write!(f, "ready_to_qa"),
            PatternType::InQa => write!(f, "in_qa"),
        }
    }
}

/// One complete "left a QA-gating state, got fixed, returned" loop.
///
/// Carries instants rather than pre-rounded durations so that downstream
/// time-to-fix arithmetic is lossless. Invariants:
/// `to_ready_to_qa_timestamp > feedback_start_timestamp` and
/// `status_change_timestamp >= feedback_start_timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackCycle {
    /// When the issue left the QA-gating state (feedback received).
    pub feedback_start_timestamp: DateTime<Utc>,

    /// Last status change before the return (work start for time-to-fix).
    pub status_change_timestamp: DateTime<Utc>,

    /// When the issue returned to "Ready to QA".
    pub to_ready_to_qa_timestamp: DateTime<Utc>,

    /// Heuristic that produced this cycle.
    pub pattern_type: PatternType,
}

/// Both heuristics' results plus the selected primary list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackDetection {
    /// Effective cycles: Pattern A unless it found nothing, else Pattern B.
    pub primary: Vec<FeedbackCycle>,

    /// Pattern A ("ready_to_qa") cycles, retained for diagnostics.
    pub ready_to_qa: Vec<FeedbackCycle>,

    /// Pattern B ("in_qa") cycles, retained for diagnostics.
    pub in_qa: Vec<FeedbackCycle>,
}

/// Flat per-issue output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessedIssue {
    // === Identity ===
    pub issue_id: String,
    pub issue_number: u64,
    pub issue_title: String,

    /// Assignee display name, "Unassigned" when the issue has none.
    pub assignee: String,

    /// Sprint display name, absent when unscheduled.
    pub sprint: Option<String>,

    pub estimate_points: Option<f64>,
    pub status: String,
    pub status_type: String,

    /// Label names verbatim, in source order.
    pub labels: Vec<String>,

    // === Phase durations (days, 2 decimals) ===
    pub in_progress_to_in_review_days: Option<f64>,
    pub in_review_to_ready_to_qa_days: Option<f64>,
    pub ready_to_qa_to_done_days: Option<f64>,
    pub in_review_to_done_days: Option<f64>,

    /// True when `in_review_to_done_days` is the documented approximation.
    pub in_review_to_done_approximate: bool,

    // === Canonical transition timestamps ===
    pub backlog_to_in_progress_timestamp: Option<DateTime<Utc>>,
    pub in_progress_to_in_review_timestamp: Option<DateTime<Utc>>,
    pub in_review_to_ready_to_qa_timestamp: Option<DateTime<Utc>>,
    pub ready_to_qa_to_done_timestamp: Option<DateTime<Utc>>,
    pub in_review_to_done_timestamp: Option<DateTime<Utc>>,

    // === QA feedback detection ===
    /// Primary iteration count (selected heuristic).
    pub qa_feedback_iterations: usize,

    /// Primary cycle list (selected heuristic).
    pub qa_feedback_cycles: Vec<FeedbackCycle>,

    // Per-pattern results for diagnostic comparison.
    pub ready_to_qa_pattern_iterations: usize,
    pub ready_to_qa_pattern_cycles: Vec<FeedbackCycle>,
    pub in_qa_pattern_iterations: usize,
    pub in_qa_pattern_cycles: Vec<FeedbackCycle>,
}
