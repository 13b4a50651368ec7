//! Batch-level KPI rollup.
//!
//! Aggregates a processed batch into the headline numbers dashboards
//! display: average phase durations, QA feedback totals, average
//! time-to-fix, and the sprint list. Purely derived from
//! `ProcessedIssue` records; rounding matches the per-issue rule
//! (two decimals).

use crate::model::processed::ProcessedIssue;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Headline metrics for one processed batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatchSummary {
    pub total_issues: usize,

    /// Issues whose status category is "completed".
    pub completed_issues: usize,

    // Averages over issues where the field is populated.
    pub avg_in_progress_to_in_review_days: Option<f64>,
    pub avg_in_review_to_ready_to_qa_days: Option<f64>,
    pub avg_ready_to_qa_to_done_days: Option<f64>,
    pub avg_in_review_to_done_days: Option<f64>,

    /// Sum of primary feedback iteration counts across the batch.
    pub total_qa_feedback_iterations: usize,

    /// Issues with at least one primary feedback cycle.
    pub issues_with_qa_feedback: usize,

    /// Mean time-to-fix across all primary cycles
    /// (return − work start, days).
    pub avg_qa_fix_days: Option<f64>,

    /// Deduplicated, sorted sprint names seen in the batch.
    pub sprints: Vec<String>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn average(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(round2(sum / count as f64))
    }
}

/// Roll a processed batch up into headline metrics.
pub fn summarize(issues: &[ProcessedIssue]) -> BatchSummary {
    let fix_days = issues.iter().flat_map(|issue| {
        issue.qa_feedback_cycles.iter().map(|cycle| {
            let ms = (cycle.to_ready_to_qa_timestamp - cycle.status_change_timestamp)
                .num_milliseconds();
            ms as f64 / 86_400_000.0
        })
    });

    let sprints: BTreeSet<String> = issues.iter().filter_map(|i| i.sprint.clone()).collect();

    BatchSummary {
        total_issues: issues.len(),
        completed_issues: issues.iter().filter(|i| i.status_type == "completed").count(),
        avg_in_progress_to_in_review_days: average(
            issues.iter().filter_map(|i| i.in_progress_to_in_review_days),
        ),
        avg_in_review_to_ready_to_qa_days: average(
            issues.iter().filter_map(|i| i.in_review_to_ready_to_qa_days),
        ),
        avg_ready_to_qa_to_done_days: average(
            issues.iter().filter_map(|i| i.ready_to_qa_to_done_days),
        ),
        avg_in_review_to_done_days: average(
            issues.iter().filter_map(|i| i.in_review_to_done_days),
        ),
        total_qa_feedback_iterations: issues.iter().map(|i| i.qa_feedback_iterations).sum(),
        issues_with_qa_feedback: issues
            .iter()
            .filter(|i| i.qa_feedback_iterations > 0)
            .count(),
        avg_qa_fix_days: average(fix_days),
        sprints: sprints.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowConfig;
    use crate::metrics::aggregate::process_issue;
    use crate::model::input::{HistoryEvent, IssueInput, SprintRef};

    fn issue(id: &str, sprint: Option<&str>, history: Vec<HistoryEvent>, labels: Vec<&str>) -> ProcessedIssue {
        let input = IssueInput {
            id: id.into(),
            status_type: "completed".into(),
            sprint: sprint.map(|s| SprintRef {
                name: Some(s.into()),
                number: None,
            }),
            labels: labels.into_iter().map(String::from).collect(),
            history,
            ..Default::default()
        };
        process_issue(&input, &WorkflowConfig::default())
    }

    #[test]
    fn test_empty_batch() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_issues, 0);
        assert_eq!(summary.avg_in_review_to_done_days, None);
        assert_eq!(summary.avg_qa_fix_days, None);
        assert!(summary.sprints.is_empty());
    }

    #[test]
    fn test_duration_averages_skip_absent() {
        let with_duration = issue(
            "a",
            None,
            vec![
                HistoryEvent::new("2024-01-01T00:00:00Z", "Todo", "In Progress"),
                HistoryEvent::new("2024-01-03T00:00:00Z", "In Progress", "In Review"),
            ],
            vec![],
        );
        let without = issue("b", None, vec![], vec![]);

        let summary = summarize(&[with_duration, without]);
        assert_eq!(summary.total_issues, 2);
        // One populated value, so the average is that value, not half of it.
        assert_eq!(summary.avg_in_progress_to_in_review_days, Some(2.0));
    }

    #[test]
    fn test_qa_rollup_and_fix_days() {
        let qa = issue(
            "a",
            None,
            vec![
                HistoryEvent::new("2024-01-01T00:00:00Z", "Ready to QA", "In Progress"),
                HistoryEvent::new("2024-01-02T00:00:00Z", "In Progress", "Ready to QA"),
            ],
            vec!["QA Feedback"],
        );
        let quiet = issue("b", None, vec![], vec![]);

        let summary = summarize(&[qa, quiet]);
        assert_eq!(summary.total_qa_feedback_iterations, 1);
        assert_eq!(summary.issues_with_qa_feedback, 1);
        assert_eq!(summary.avg_qa_fix_days, Some(1.0));
    }

    #[test]
    fn test_sprints_deduplicated_sorted() {
        let a = issue("a", Some("Sprint B"), vec![], vec![]);
        let b = issue("b", Some("Sprint A"), vec![], vec![]);
        let c = issue("c", Some("Sprint B"), vec![], vec![]);

        let summary = summarize(&[a, b, c]);
        assert_eq!(summary.sprints, vec!["Sprint A", "Sprint B"]);
    }

    #[test]
    fn test_completed_count() {
        let done = issue("a", None, vec![], vec![]);
        let mut open = issue("b", None, vec![], vec![]);
        open.status_type = "started".into();

        let summary = summarize(&[done, open]);
        assert_eq!(summary.completed_issues, 1);
    }
}
