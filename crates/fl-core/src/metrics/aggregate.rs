//! Per-issue aggregation and the batch driver.
//!
//! `process_issue` is a structural merge with no I/O and no side effects:
//! it runs the transition extractor, duration calculator, and feedback
//! detector over one issue's history and folds the results into a flat
//! `ProcessedIssue` together with normalized identity fields.
//!
//! Issues are fully independent of each other, so the batch driver is a
//! plain map; nothing here can fail. A malformed issue yields a
//! best-effort partial record, never a dropped issue or an aborted batch.

use crate::config::WorkflowConfig;
use crate::metrics::durations::compute_durations;
use crate::metrics::feedback::detect_feedback_cycles;
use crate::metrics::transitions::extract_transitions;
use crate::model::input::IssueInput;
use crate::model::processed::{ProcessedIssue, Stamp};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Display name for issues without an assignee.
const UNASSIGNED: &str = "Unassigned";

fn instant(stamp: &Option<Stamp>) -> Option<DateTime<Utc>> {
    stamp.as_ref().and_then(|s| s.at)
}

/// Transform one issue into its output record.
pub fn process_issue(issue: &IssueInput, config: &WorkflowConfig) -> ProcessedIssue {
    let stamps = extract_transitions(&issue.history, &config.states);
    let durations = compute_durations(&stamps);
    let detection = detect_feedback_cycles(&issue.history, &issue.labels, config);

    debug!(
        issue = %issue.id,
        events = issue.history.len(),
        qa_iterations = detection.primary.len(),
        "processed issue"
    );

    ProcessedIssue {
        issue_id: issue.id.clone(),
        issue_number: issue.number,
        issue_title: issue.title.clone(),
        assignee: issue
            .assignee
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(UNASSIGNED)
            .to_owned(),
        sprint: issue.sprint.as_ref().and_then(|s| s.display_name()),
        estimate_points: issue.estimate,
        status: issue.status.clone(),
        status_type: issue.status_type.clone(),
        labels: issue.labels.clone(),

        in_progress_to_in_review_days: durations.in_progress_to_in_review_days,
        in_review_to_ready_to_qa_days: durations.in_review_to_ready_to_qa_days,
        ready_to_qa_to_done_days: durations.ready_to_qa_to_done_days,
        in_review_to_done_days: durations.in_review_to_done_days,
        in_review_to_done_approximate: durations.in_review_to_done_approximate,

        backlog_to_in_progress_timestamp: instant(&stamps.backlog_to_in_progress),
        in_progress_to_in_review_timestamp: instant(&stamps.in_progress_to_in_review),
        in_review_to_ready_to_qa_timestamp: instant(&stamps.in_review_to_ready_to_qa),
        ready_to_qa_to_done_timestamp: instant(&stamps.ready_to_qa_to_done),
        in_review_to_done_timestamp: instant(&stamps.in_review_to_done_direct),

        qa_feedback_iterations: detection.primary.len(),
        ready_to_qa_pattern_iterations: detection.ready_to_qa.len(),
        in_qa_pattern_iterations: detection.in_qa.len(),
        qa_feedback_cycles: detection.primary,
        ready_to_qa_pattern_cycles: detection.ready_to_qa,
        in_qa_pattern_cycles: detection.in_qa,
    }
}

/// Transform a whole batch. Per-issue work is independent; input order is
/// preserved in the output.
pub fn process_batch(issues: &[IssueInput], config: &WorkflowConfig) -> Vec<ProcessedIssue> {
    issues.iter().map(|issue| process_issue(issue, config)).collect()
}
