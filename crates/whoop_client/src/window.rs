//! Calendar-day and cycle-relative time windows.
//!
//! Calendar days always start at UTC midnight. Once a cycle is known the
//! sub-resource windows are derived from its start and end:
//!
//! * recovery and workouts: `[cycle.start, cycle_end)`
//! * sleep: `[cycle.start - 24h, cycle_end)`, reaching back to the overnight
//!   sleep that precedes the cycle's start on waking.
//!
//! `cycle_end` is the cycle's own end when present and parseable, otherwise
//! the end of the queried day.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use crate::WhoopError;
use crate::models::Cycle;

/// Provider timestamp layout: millisecond precision (optional), literal `Z`.
const WHOOP_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Half-open UTC interval `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// `[midnight UTC, next midnight UTC)` for the given calendar date.
    pub fn day(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// `start`/`end` query parameters as RFC3339 UTC.
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("start", format_rfc3339(self.start)),
            ("end", format_rfc3339(self.end)),
        ]
    }
}

/// Windows for the sub-resources of one resolved cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleWindows {
    pub cycle_start: DateTime<Utc>,
    pub cycle_end: DateTime<Utc>,
    pub recovery: TimeWindow,
    pub sleep: TimeWindow,
    pub workout: TimeWindow,
}

impl CycleWindows {
    /// Derive the windows for `cycle`, found inside the calendar window `day`.
    ///
    /// Fails only when the cycle start cannot be parsed; an unparseable end
    /// is treated like an open cycle.
    pub fn resolve(cycle: &Cycle, day: &TimeWindow) -> Result<Self, WhoopError> {
        let cycle_start = parse_whoop_time(&cycle.start)?;
        let cycle_end = cycle
            .end
            .as_deref()
            .and_then(|end| parse_whoop_time(end).ok())
            .unwrap_or(day.end);

        let recovery = TimeWindow::new(cycle_start, cycle_end);
        Ok(Self {
            cycle_start,
            cycle_end,
            recovery,
            sleep: TimeWindow::new(cycle_start - Duration::hours(24), cycle_end),
            workout: recovery,
        })
    }
}

/// Parse a WHOOP timestamp, accepting the native `...ss.fffZ` layout or any
/// RFC3339 timestamp with a UTC offset.
pub fn parse_whoop_time(s: &str) -> Result<DateTime<Utc>, WhoopError> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, WHOOP_TIME_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| WhoopError::Timestamp(s.to_string()))
}

fn format_rfc3339(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}
