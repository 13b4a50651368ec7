//! The lifecycle-metrics engine.
//!
//! Four components, composed by `aggregate`:
//! - `transitions` — first-occurrence canonical transition extraction
//! - `durations`   — day-granularity phase durations with fallback chain
//! - `feedback`    — QA feedback-cycle detection (two heuristics)
//! - `summary`     — batch-level KPI rollup
//!
//! All components are pure functions over already-fetched data. Each one
//! that consumes history sorts it defensively; caller ordering is never
//! trusted, because silently processing unsorted history would corrupt
//! first-occurrence and cycle results without any observable fault.

pub mod aggregate;
pub mod durations;
pub mod feedback;
pub mod summary;
pub mod transitions;

use crate::model::input::HistoryEvent;
use chrono::{DateTime, Utc};

/// A history event with both state names present and its timestamp parsed.
///
/// Events missing either state name carry no transition information and
/// are dropped before sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedEvent<'a> {
    /// Parsed instant, absent when the source string is malformed.
    pub at: Option<DateTime<Utc>>,

    /// Raw timestamp string, kept for slot recording.
    pub raw: &'a str,

    pub from: &'a str,
    pub to: &'a str,
}

/// Parse and chronologically sort one issue's history.
///
/// The sort is stable and keyed on the parsed instant; events with
/// malformed timestamps sort ahead of parsable ones, keeping their source
/// order among themselves. They cannot fill a duration or participate in
/// cycle scanning, so their position only has to be deterministic.
pub(crate) fn sorted_events(history: &[HistoryEvent]) -> Vec<ParsedEvent<'_>> {
    let mut events: Vec<ParsedEvent<'_>> = history
        .iter()
        .filter_map(|ev| {
            let from = ev.from_state.as_deref()?;
            let to = ev.to_state.as_deref()?;
            Some(ParsedEvent {
                at: DateTime::parse_from_rfc3339(&ev.timestamp)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok(),
                raw: &ev.timestamp,
                from,
                to,
            })
        })
        .collect();

    events.sort_by_key(|ev| ev.at.unwrap_or(DateTime::<Utc>::MIN_UTC));
    events
}
