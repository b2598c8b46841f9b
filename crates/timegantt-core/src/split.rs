//! Day splitting
//!
//! Cuts an interval that crosses one or more local midnights into one
//! interval per calendar day. Pieces are closed at second granularity:
//! each piece ends `gap` before the next midnight and the following piece
//! starts on that midnight, so with the default one-second gap
//! `piece[i].end + 1s == piece[i + 1].start`. A zero gap gives half-open
//! pieces that share their boundary instant.
//!
//! A piece starting less than `gap` before midnight is clamped to the single
//! instant `[start, start]`, so for that piece `end + gap` overshoots the next
//! start. With whole-second timestamps this only happens for gaps above one
//! second.
//!
//! An interval ending exactly at midnight ends on the previous day, so no
//! zero-length trailing piece is produced.

use chrono::Duration;
use chrono_tz::Tz;
use tracing::debug;

use crate::time::{last_day, next_day_start};
use crate::{ChartConfig, Interval, SplitError};

/// Splits intervals at the midnights of a reference timezone
#[derive(Clone, Debug)]
pub struct DaySplitter {
    tz: Tz,
    gap: Duration,
}

impl DaySplitter {
    /// Splitter with the default one-second boundary gap
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            gap: Duration::seconds(1),
        }
    }

    pub fn from_config(config: &ChartConfig) -> Self {
        Self::new(config.timezone).gap(config.boundary_gap)
    }

    /// Configure the distance between a piece's end and the next midnight
    pub fn gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Whether the interval starts and ends on the same local day
    pub fn is_mono_day(&self, interval: &Interval) -> bool {
        let start = interval.start.with_timezone(&self.tz);
        let end = interval.end.with_timezone(&self.tz);
        start.date_naive() >= last_day(&end)
    }

    /// Split one interval into per-day pieces.
    ///
    /// Mono-day intervals come back unchanged. Pieces of a split interval
    /// are expressed in the splitter's timezone.
    pub fn split(&self, interval: &Interval) -> Result<Vec<Interval>, SplitError> {
        if interval.start >= interval.end {
            return Err(SplitError::InvalidInterval {
                start: interval.start.to_rfc3339(),
                end: interval.end.to_rfc3339(),
            });
        }

        if self.is_mono_day(interval) {
            return Ok(vec![interval.clone()]);
        }

        let end = interval.end.with_timezone(&self.tz);
        let final_day = last_day(&end);

        let mut pieces = Vec::new();
        let mut current = interval.start.with_timezone(&self.tz);
        while current.date_naive() < final_day {
            let boundary =
                next_day_start(&current).ok_or_else(|| SplitError::OutOfRange(end.to_rfc3339()))?;
            // A start within `gap` of midnight still gets its own piece
            let piece_end = (boundary - self.gap).max(current);
            pieces.push(interval.with_bounds(current, piece_end));
            current = boundary;
        }
        pieces.push(interval.with_bounds(current, end));

        Ok(pieces)
    }

    /// Split every interval that crosses a day boundary.
    ///
    /// Mono-day intervals pass through untouched; the result is ordered by
    /// start, keeping input order among equal starts.
    pub fn split_all(&self, intervals: Vec<Interval>) -> Result<Vec<Interval>, SplitError> {
        // Invalid intervals go through `split` so they are rejected there
        let (mut result, multi_day): (Vec<_>, Vec<_>) = intervals
            .into_iter()
            .partition(|i| i.is_valid() && self.is_mono_day(i));

        let multi_count = multi_day.len();
        for interval in &multi_day {
            result.extend(self.split(interval)?);
        }
        result.sort_by_key(|i| i.start);

        debug!(
            split = multi_count,
            total = result.len(),
            tz = %self.tz,
            "split multi-day intervals"
        );
        Ok(result)
    }
}
