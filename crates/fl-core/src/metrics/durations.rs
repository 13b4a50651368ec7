//! Phase-duration arithmetic.
//!
//! Every duration is elapsed milliseconds divided by 86,400,000, rounded
//! to two decimal places. A pair with a missing or unparsable endpoint
//! yields absent for that pair only; a negative delta also yields absent
//! (never clamped, never NaN).
//!
//! The composite review-to-done metric keeps backward compatibility with
//! consumers that predate the QA phase. Fallback precedence:
//! 1. both QA-phase durations present → their sum
//! 2. direct In Review→Done stamp present → difference from review start
//! 3. Ready to QA→Done stamp present → difference from review start,
//!    flagged as an approximation (the QA-entry event was missed)
//! 4. absent

use crate::model::processed::{PhaseDurations, Stamp, TransitionStamps};
use chrono::{DateTime, Utc};

const MS_PER_DAY: f64 = 86_400_000.0;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn instant(stamp: &Option<Stamp>) -> Option<DateTime<Utc>> {
    stamp.as_ref().and_then(|s| s.at)
}

/// Elapsed days between two stamps, absent unless both endpoints parse
/// and the delta is non-negative.
fn days_between(start: &Option<Stamp>, end: &Option<Stamp>) -> Option<f64> {
    let start = instant(start)?;
    let end = instant(end)?;
    let ms = (end - start).num_milliseconds();
    if ms < 0 {
        return None;
    }
    Some(round2(ms as f64 / MS_PER_DAY))
}

/// Derive the four duration fields from canonical transition stamps.
pub fn compute_durations(stamps: &TransitionStamps) -> PhaseDurations {
    let in_progress_to_in_review_days =
        days_between(&stamps.backlog_to_in_progress, &stamps.in_progress_to_in_review);
    let in_review_to_ready_to_qa_days =
        days_between(&stamps.in_progress_to_in_review, &stamps.in_review_to_ready_to_qa);
    let ready_to_qa_to_done_days =
        days_between(&stamps.in_review_to_ready_to_qa, &stamps.ready_to_qa_to_done);

    let (in_review_to_done_days, in_review_to_done_approximate) =
        match (in_review_to_ready_to_qa_days, ready_to_qa_to_done_days) {
            (Some(qa_entry), Some(qa_exit)) => (Some(round2(qa_entry + qa_exit)), false),
            _ => {
                if let Some(direct) =
                    days_between(&stamps.in_progress_to_in_review, &stamps.in_review_to_done_direct)
                {
                    // The issue skipped the QA phase entirely.
                    (Some(direct), false)
                } else if let Some(approx) =
                    days_between(&stamps.in_progress_to_in_review, &stamps.ready_to_qa_to_done)
                {
                    (Some(approx), true)
                } else {
                    (None, false)
                }
            }
        };

    PhaseDurations {
        in_progress_to_in_review_days,
        in_review_to_ready_to_qa_days,
        ready_to_qa_to_done_days,
        in_review_to_done_days,
        in_review_to_done_approximate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(s: &str) -> Option<Stamp> {
        Some(Stamp::parse(s))
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.346), 2.35);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn test_simple_pair() {
        let stamps = TransitionStamps {
            backlog_to_in_progress: stamp("2024-01-01T00:00:00Z"),
            in_progress_to_in_review: stamp("2024-01-03T12:00:00Z"),
            ..Default::default()
        };
        let durations = compute_durations(&stamps);
        assert_eq!(durations.in_progress_to_in_review_days, Some(2.5));
    }

    #[test]
    fn test_missing_endpoint_absent() {
        let stamps = TransitionStamps {
            backlog_to_in_progress: stamp("2024-01-01T00:00:00Z"),
            ..Default::default()
        };
        let durations = compute_durations(&stamps);
        assert_eq!(durations.in_progress_to_in_review_days, None);
        assert_eq!(durations.in_review_to_done_days, None);
        assert!(!durations.in_review_to_done_approximate);
    }

    #[test]
    fn test_negative_delta_absent_not_clamped() {
        // Clock skew in the source: review recorded before work started.
        let stamps = TransitionStamps {
            backlog_to_in_progress: stamp("2024-01-05T00:00:00Z"),
            in_progress_to_in_review: stamp("2024-01-01T00:00:00Z"),
            ..Default::default()
        };
        let durations = compute_durations(&stamps);
        assert_eq!(durations.in_progress_to_in_review_days, None);
    }

    #[test]
    fn test_malformed_endpoint_isolated_to_pair() {
        let stamps = TransitionStamps {
            backlog_to_in_progress: stamp("not a timestamp"),
            in_progress_to_in_review: stamp("2024-01-03T00:00:00Z"),
            in_review_to_ready_to_qa: stamp("2024-01-04T00:00:00Z"),
            ..Default::default()
        };
        let durations = compute_durations(&stamps);
        // The pair touching the malformed stamp is absent...
        assert_eq!(durations.in_progress_to_in_review_days, None);
        // ...but the neighboring pair still computes.
        assert_eq!(durations.in_review_to_ready_to_qa_days, Some(1.0));
    }

    #[test]
    fn test_composite_rule_1_sums_qa_phases() {
        let stamps = TransitionStamps {
            in_progress_to_in_review: stamp("2024-01-01T00:00:00Z"),
            in_review_to_ready_to_qa: stamp("2024-01-02T00:00:00Z"),
            ready_to_qa_to_done: stamp("2024-01-04T00:00:00Z"),
            ..Default::default()
        };
        let durations = compute_durations(&stamps);
        assert_eq!(durations.in_review_to_done_days, Some(3.0));
        assert!(!durations.in_review_to_done_approximate);
    }

    #[test]
    fn test_composite_rule_2_direct_skip() {
        let stamps = TransitionStamps {
            in_progress_to_in_review: stamp("2024-01-01T00:00:00Z"),
            in_review_to_done_direct: stamp("2024-01-04T00:00:00Z"),
            ..Default::default()
        };
        let durations = compute_durations(&stamps);
        assert_eq!(durations.in_review_to_done_days, Some(3.0));
        assert!(!durations.in_review_to_done_approximate);
    }

    #[test]
    fn test_composite_rule_2_beats_rule_3() {
        // Both a direct Done stamp and a QA-exit stamp exist, but no
        // QA-entry stamp. Rule 2 must win over the rule-3 approximation.
        let stamps = TransitionStamps {
            in_progress_to_in_review: stamp("2024-01-01T00:00:00Z"),
            ready_to_qa_to_done: stamp("2024-01-10T00:00:00Z"),
            in_review_to_done_direct: stamp("2024-01-04T00:00:00Z"),
            ..Default::default()
        };
        let durations = compute_durations(&stamps);
        assert_eq!(durations.in_review_to_done_days, Some(3.0));
        assert!(!durations.in_review_to_done_approximate);
    }

    #[test]
    fn test_composite_rule_3_flagged_approximate() {
        let stamps = TransitionStamps {
            in_progress_to_in_review: stamp("2024-01-01T00:00:00Z"),
            ready_to_qa_to_done: stamp("2024-01-05T00:00:00Z"),
            ..Default::default()
        };
        let durations = compute_durations(&stamps);
        assert_eq!(durations.in_review_to_done_days, Some(4.0));
        assert!(durations.in_review_to_done_approximate);
    }

    #[test]
    fn test_composite_rule_4_absent() {
        let durations = compute_durations(&TransitionStamps::default());
        assert_eq!(durations.in_review_to_done_days, None);
        assert!(!durations.in_review_to_done_approximate);
    }

    #[test]
    fn test_sub_day_resolution() {
        let stamps = TransitionStamps {
            backlog_to_in_progress: stamp("2024-01-01T00:00:00Z"),
            in_progress_to_in_review: stamp("2024-01-01T08:00:00Z"),
            ..Default::default()
        };
        let durations = compute_durations(&stamps);
        assert_eq!(durations.in_progress_to_in_review_days, Some(0.33));
    }
}
