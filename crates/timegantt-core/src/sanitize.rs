//! Interval sanitizing: drop empty or inverted intervals, then duplicates
//! sharing an exact start instant (the first occurrence wins).

use std::collections::HashSet;

use tracing::debug;

use crate::Interval;

/// Sanitized intervals with counts of what was removed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sanitized {
    pub intervals: Vec<Interval>,
    pub dropped_invalid: usize,
    pub dropped_duplicates: usize,
}

pub fn sanitize(intervals: Vec<Interval>) -> Sanitized {
    let total = intervals.len();
    let valid: Vec<Interval> = intervals.into_iter().filter(Interval::is_valid).collect();
    let dropped_invalid = total - valid.len();

    let mut seen = HashSet::with_capacity(valid.len());
    let kept: Vec<Interval> = valid
        .into_iter()
        .filter(|i| seen.insert(i.start.naive_utc()))
        .collect();
    let dropped_duplicates = total - dropped_invalid - kept.len();

    debug!(
        total,
        dropped_invalid,
        dropped_duplicates,
        "sanitized intervals"
    );

    Sanitized {
        intervals: kept,
        dropped_invalid,
        dropped_duplicates,
    }
}
