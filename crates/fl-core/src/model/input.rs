//! Input records supplied by the external fetch collaborator.
//!
//! These types mirror what the issue tracker export provides per issue:
//! identity fields, labels, sprint reference, and the raw workflow-history
//! event list. History order is NOT guaranteed by the collaborator; the
//! engine sorts defensively before processing.
//!
//! Deserialization is deliberately lenient: every field is defaulted so a
//! sparse or partially malformed record still enters the batch and yields
//! a best-effort output record instead of aborting deserialization.

use serde::{Deserialize, Serialize};

/// One workflow-history event: the issue moved between two states.
///
/// The timestamp is kept as the raw string from the source. Parsing
/// happens inside the engine so that a malformed value only poisons the
/// computations that touch it, never the whole issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEvent {
    /// RFC 3339 timestamp of the state change, as received.
    pub timestamp: String,

    /// State the issue left, when recorded.
    pub from_state: Option<String>,

    /// State the issue entered, when recorded.
    pub to_state: Option<String>,
}

impl Default for HistoryEvent {
    fn default() -> Self {
        HistoryEvent {
            timestamp: String::new(),
            from_state: None,
            to_state: None,
        }
    }
}

impl HistoryEvent {
    /// Convenience constructor for building histories in tests and tools.
    pub fn new(
        timestamp: impl Into<String>,
        from_state: impl Into<String>,
        to_state: impl Into<String>,
    ) -> Self {
        HistoryEvent {
            timestamp: timestamp.into(),
            from_state: Some(from_state.into()),
            to_state: Some(to_state.into()),
        }
    }
}

/// Sprint (tracker "cycle") reference attached to an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintRef {
    pub name: Option<String>,
    pub number: Option<i64>,
}

impl SprintRef {
    /// Display name: the sprint's own name when non-empty, else
    /// "Cycle {number}" when a numeric id exists, else absent.
    pub fn display_name(&self) -> Option<String> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .or_else(|| self.number.map(|n| format!("Cycle {}", n)))
    }
}

/// One issue as supplied by the fetch collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueInput {
    /// Opaque tracker id.
    pub id: String,

    /// Human-facing issue number.
    pub number: u64,

    pub title: String,

    /// Assignee display name, absent when unassigned.
    pub assignee: Option<String>,

    /// Numeric estimate (story points), absent when unestimated.
    pub estimate: Option<f64>,

    /// Current workflow state name (e.g., "In Review").
    pub status: String,

    /// Workflow state category (e.g., "started", "completed").
    pub status_type: String,

    /// Sprint reference, absent when the issue is unscheduled.
    pub sprint: Option<SprintRef>,

    /// Label names, verbatim from the tracker, in source order.
    pub labels: Vec<String>,

    /// Workflow-history events, order not guaranteed.
    pub history: Vec<HistoryEvent>,
}
