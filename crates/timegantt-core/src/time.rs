//! Calendar-day arithmetic in a named timezone
//!
//! Days run from one local midnight to the next. Local times skipped by a
//! DST change resolve to the first local time that exists after them, so a
//! zone that skips midnight starts the day at the end of the jump. Repeated
//! local times use their earliest occurrence.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::ConfigError;

/// Longest skipped stretch we probe through, in minutes (Samoa skipped a
/// whole day in 2011)
const MAX_GAP_MINUTES: i64 = 2 * 24 * 60;

/// Parse an IANA timezone name such as `Europe/Paris`
pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
}

/// Map a wall-clock time in `tz` to an instant.
///
/// Ambiguous times take their earliest mapping; skipped times move forward
/// to the first minute that exists.
pub fn resolve_local(local: NaiveDateTime, tz: &Tz) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => (1..=MAX_GAP_MINUTES).find_map(|step| {
            let probe = local + Duration::minutes(step);
            tz.from_local_datetime(&probe).earliest()
        }),
    }
}

/// First instant of `date` in `tz`
pub fn start_of_day(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    resolve_local(midnight, tz).unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Start of the day following the one `instant` falls on
pub fn next_day_start(instant: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let next = instant.date_naive().succ_opt()?;
    Some(start_of_day(next, &instant.timezone()))
}

/// Whether `instant` is exactly the start of its local day
pub fn is_day_start(instant: &DateTime<Tz>) -> bool {
    *instant == start_of_day(instant.date_naive(), &instant.timezone())
}

/// The last calendar day an interval ending at `end` occupies.
///
/// An end exactly at midnight closes the previous day.
pub fn last_day(end: &DateTime<Tz>) -> NaiveDate {
    let date = end.date_naive();
    if is_day_start(end) {
        date.pred_opt().unwrap_or(date)
    } else {
        date
    }
}
