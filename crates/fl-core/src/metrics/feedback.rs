//! QA feedback-cycle detection.
//!
//! Finds repeated "left a QA-gating state → worked on a fix → returned to
//! Ready to QA" loops in one issue's history. Two heuristics run over the
//! same sorted events:
//!
//! - Pattern A (`ready_to_qa`, primary): a cycle opens when the issue
//!   leaves "Ready to QA" and closes when it comes back.
//! - Pattern B (`in_qa`, fallback): a cycle opens when the issue leaves
//!   "In QA" and closes when it reaches "Ready to QA". Re-entering
//!   "In QA" mid-cycle restarts the cycle, discarding the unresolved one.
//!   Pattern A has no analogue of that rule because its leave state *is*
//!   the return state; the asymmetry matches observed source data and is
//!   kept deliberately (see DESIGN.md).
//!
//! Pattern A's list is primary; Pattern B substitutes only when A finds
//! nothing. Both lists are always retained for diagnostics.
//!
//! The detector only runs for issues labeled with the QA-feedback needle;
//! unlabeled issues yield zero cycles for both patterns without scanning.

use crate::config::WorkflowConfig;
use crate::metrics::{sorted_events, ParsedEvent};
use crate::model::input::HistoryEvent;
use crate::model::processed::{FeedbackCycle, FeedbackDetection, PatternType};
use chrono::{DateTime, Utc};

/// The single place the QA-feedback label rule lives.
///
/// Case-insensitive substring match of `needle` against any label name.
pub fn has_qa_feedback_label(labels: &[String], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    labels.iter().any(|label| label.to_lowercase().contains(&needle))
}

/// In-flight cycle state: (feedback start, last status change).
struct OpenCycle {
    feedback_start: DateTime<Utc>,
    last_change: DateTime<Utc>,
}

/// One parametrized scanner instantiated for both patterns.
///
/// A cycle opens on a transition out of `leave_state`, closes on a
/// transition into `return_state`, and any other real state change while
/// open advances the work-start marker. With `restart_on_reentry`, a
/// transition back into `leave_state` while open abandons the in-flight
/// cycle and starts over at that instant.
fn scan_cycles(
    events: &[ParsedEvent<'_>],
    leave_state: &str,
    return_state: &str,
    restart_on_reentry: bool,
    pattern: PatternType,
) -> Vec<FeedbackCycle> {
    let mut cycles = Vec::new();
    let mut open: Option<OpenCycle> = None;

    for ev in events {
        // Unparsable timestamps cannot be ordered; skip them.
        let Some(ts) = ev.at else { continue };

        open = match open.take() {
            None => {
                if ev.from == leave_state && ev.to != leave_state {
                    Some(OpenCycle {
                        feedback_start: ts,
                        last_change: ts,
                    })
                } else {
                    None
                }
            }
            Some(mut cycle) => {
                // A close must be strictly later than the open; a tied
                // instant leaves the cycle in flight.
                if ev.to == return_state && ev.from != return_state && ts > cycle.feedback_start {
                    cycles.push(FeedbackCycle {
                        feedback_start_timestamp: cycle.feedback_start,
                        status_change_timestamp: cycle.last_change,
                        to_ready_to_qa_timestamp: ts,
                        pattern_type: pattern,
                    });
                    None
                } else if restart_on_reentry && ev.to == leave_state && ev.from != leave_state {
                    Some(OpenCycle {
                        feedback_start: ts,
                        last_change: ts,
                    })
                } else {
                    if ev.from != ev.to && ev.to != return_state {
                        cycle.last_change = ts;
                    }
                    Some(cycle)
                }
            }
        };
    }

    // An unclosed cycle at end of history is not a feedback iteration.
    cycles
}

/// Run both patterns over (unsorted) history and apply the selection
/// policy.
pub fn detect_feedback_cycles(
    history: &[HistoryEvent],
    labels: &[String],
    config: &WorkflowConfig,
) -> FeedbackDetection {
    if !has_qa_feedback_label(labels, &config.qa_feedback_label) {
        return FeedbackDetection::default();
    }

    let events = sorted_events(history);
    let states = &config.states;

    let ready_to_qa = scan_cycles(
        &events,
        &states.ready_to_qa,
        &states.ready_to_qa,
        false,
        PatternType::ReadyToQa,
    );
    let in_qa = scan_cycles(
        &events,
        &states.in_qa,
        &states.ready_to_qa,
        true,
        PatternType::InQa,
    );

    let primary = if ready_to_qa.is_empty() {
        in_qa.clone()
    } else {
        ready_to_qa.clone()
    };

    FeedbackDetection {
        primary,
        ready_to_qa,
        in_qa,
    }
}
