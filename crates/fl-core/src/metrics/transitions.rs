//! Canonical transition extraction.
//!
//! Scans one issue's history chronologically and records the *first*
//! occurrence of each recognized state transition. Five pairs are
//! tracked: Todo→In Progress, In Progress→In Review, In Review→Ready to
//! QA, Ready to QA→Done, and the direct-skip pair In Review→Done.
//!
//! A filled slot is never overwritten; repeated transitions (send-backs,
//! re-opens) keep the earliest timestamp. An issue whose history matches
//! nothing yields all-absent stamps, meaning it never left its initial
//! state.

use crate::config::StateNames;
use crate::metrics::sorted_events;
use crate::model::input::HistoryEvent;
use crate::model::processed::{Stamp, TransitionStamps};

/// Extract canonical transition timestamps from (unsorted) history.
pub fn extract_transitions(history: &[HistoryEvent], states: &StateNames) -> TransitionStamps {
    let mut stamps = TransitionStamps::default();

    for ev in sorted_events(history) {
        let slot = if ev.from == states.todo && ev.to == states.in_progress {
            &mut stamps.backlog_to_in_progress
        } else if ev.from == states.in_progress && ev.to == states.in_review {
            &mut stamps.in_progress_to_in_review
        } else if ev.from == states.in_review && ev.to == states.ready_to_qa {
            &mut stamps.in_review_to_ready_to_qa
        } else if ev.from == states.ready_to_qa && ev.to == states.done {
            &mut stamps.ready_to_qa_to_done
        } else if ev.from == states.in_review && ev.to == states.done {
            &mut stamps.in_review_to_done_direct
        } else {
            continue;
        };

        if slot.is_none() {
            *slot = Some(Stamp::parse(ev.raw));
        }
    }

    stamps
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn states() -> StateNames {
        StateNames::default()
    }

    fn at(s: &str) -> Option<DateTime<Utc>> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn test_extracts_all_five_pairs() {
        let history = vec![
            HistoryEvent::new("2024-01-01T00:00:00Z", "Todo", "In Progress"),
            HistoryEvent::new("2024-01-02T00:00:00Z", "In Progress", "In Review"),
            HistoryEvent::new("2024-01-03T00:00:00Z", "In Review", "Ready to QA"),
            HistoryEvent::new("2024-01-04T00:00:00Z", "Ready to QA", "Done"),
            HistoryEvent::new("2024-01-05T00:00:00Z", "In Review", "Done"),
        ];
        let stamps = extract_transitions(&history, &states());

        assert_eq!(
            stamps.backlog_to_in_progress.unwrap().at,
            at("2024-01-01T00:00:00Z")
        );
        assert_eq!(
            stamps.in_progress_to_in_review.unwrap().at,
            at("2024-01-02T00:00:00Z")
        );
        assert_eq!(
            stamps.in_review_to_ready_to_qa.unwrap().at,
            at("2024-01-03T00:00:00Z")
        );
        assert_eq!(
            stamps.ready_to_qa_to_done.unwrap().at,
            at("2024-01-04T00:00:00Z")
        );
        assert_eq!(
            stamps.in_review_to_done_direct.unwrap().at,
            at("2024-01-05T00:00:00Z")
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let history = vec![
            HistoryEvent::new("2024-01-01T00:00:00Z", "Todo", "In Progress"),
            HistoryEvent::new("2024-01-05T00:00:00Z", "Todo", "In Progress"),
        ];
        let stamps = extract_transitions(&history, &states());
        assert_eq!(
            stamps.backlog_to_in_progress.unwrap().at,
            at("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_unsorted_input_first_occurrence_is_chronological() {
        // The later event comes first in source order; the extractor must
        // still record the chronologically earlier one.
        let history = vec![
            HistoryEvent::new("2024-01-05T00:00:00Z", "Todo", "In Progress"),
            HistoryEvent::new("2024-01-01T00:00:00Z", "Todo", "In Progress"),
        ];
        let stamps = extract_transitions(&history, &states());
        assert_eq!(
            stamps.backlog_to_in_progress.unwrap().at,
            at("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_no_matches_yields_all_absent() {
        let history = vec![HistoryEvent::new(
            "2024-01-01T00:00:00Z",
            "Backlog",
            "Triage",
        )];
        let stamps = extract_transitions(&history, &states());
        assert_eq!(stamps, TransitionStamps::default());
    }

    #[test]
    fn test_events_without_state_names_skipped() {
        let history = vec![HistoryEvent {
            timestamp: "2024-01-01T00:00:00Z".into(),
            from_state: Some("Todo".into()),
            to_state: None,
        }];
        let stamps = extract_transitions(&history, &states());
        assert!(stamps.backlog_to_in_progress.is_none());
    }

    #[test]
    fn test_malformed_timestamp_still_fills_slot() {
        let history = vec![
            HistoryEvent::new("bogus", "Todo", "In Progress"),
            HistoryEvent::new("2024-01-02T00:00:00Z", "Todo", "In Progress"),
        ];
        let stamps = extract_transitions(&history, &states());
        let stamp = stamps.backlog_to_in_progress.unwrap();
        assert_eq!(stamp.raw, "bogus");
        assert_eq!(stamp.at, None);
    }

    #[test]
    fn test_renamed_states_respected() {
        let mut states = StateNames::default();
        states.todo = "Backlog".into();
        let history = vec![
            HistoryEvent::new("2024-01-01T00:00:00Z", "Backlog", "In Progress"),
            HistoryEvent::new("2024-01-02T00:00:00Z", "Todo", "In Progress"),
        ];
        let stamps = extract_transitions(&history, &states);
        assert_eq!(
            stamps.backlog_to_in_progress.unwrap().at,
            at("2024-01-01T00:00:00Z")
        );
    }
}
