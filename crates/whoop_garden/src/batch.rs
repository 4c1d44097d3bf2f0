//! Multi-date collection on top of [`get_day_data`].
//!
//! A failed date never aborts a batch: it is logged and replaced with an
//! empty [`DayData`] so summaries still cover every requested date.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Days, NaiveDate};
use whoop_client::{DayData, WhoopClient, get_day_data};

use crate::error::{AppError, AppResult};

/// Monday through Sunday of the ISO week containing `date`.
pub fn week_of(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
    monday.iter_days().take(7).collect()
}

/// The `n` dates before `end`, oldest first; `end` itself is excluded.
pub fn trailing_days(end: NaiveDate, n: u32) -> AppResult<Vec<NaiveDate>> {
    let start = end
        .checked_sub_days(Days::new(u64::from(n)))
        .ok_or_else(|| AppError::Validation(format!("{n} days before {end} is out of range")))?;
    Ok(start.iter_days().take(n as usize).collect())
}

/// Aggregate each date in order.
///
/// Dates after `today` are not fetched. `pace` is slept between consecutive
/// fetches to stay clear of the provider's rate limit.
pub async fn collect_days(
    client: &Arc<dyn WhoopClient>,
    dates: &[NaiveDate],
    today: NaiveDate,
    pace: Duration,
) -> Vec<DayData> {
    let mut days = Vec::with_capacity(dates.len());
    let mut fetched_any = false;

    for &date in dates {
        if date > today {
            days.push(DayData::empty(date));
            continue;
        }
        if fetched_any && !pace.is_zero() {
            tokio::time::sleep(pace).await;
        }
        fetched_any = true;

        match get_day_data(Arc::clone(client), date).await {
            Ok(day) => days.push(day),
            Err(e) => {
                tracing::warn!(%date, error = %e.source, "could not fetch day, using empty data");
                days.push(DayData::empty(date));
            }
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_of_starts_on_monday() {
        // 2026-02-20 is a Friday
        let week = week_of(d(2026, 2, 20));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0], d(2026, 2, 16));
        assert_eq!(week[6], d(2026, 2, 22));
    }

    #[test]
    fn week_of_sunday_belongs_to_preceding_monday() {
        let week = week_of(d(2026, 2, 22));
        assert_eq!(week[0], d(2026, 2, 16));
    }

    #[test]
    fn week_of_crosses_year_boundary() {
        let week = week_of(d(2026, 1, 1));
        assert_eq!(week[0], d(2025, 12, 29));
        assert_eq!(week[6], d(2026, 1, 4));
    }

    #[test]
    fn trailing_days_excludes_end() {
        let days = trailing_days(d(2026, 3, 2), 3).unwrap();
        assert_eq!(days, vec![d(2026, 2, 27), d(2026, 2, 28), d(2026, 3, 1)]);
        assert!(trailing_days(d(2026, 3, 2), 0).unwrap().is_empty());
    }

    #[test]
    fn trailing_days_beyond_calendar_range_is_rejected() {
        let err = trailing_days(d(2026, 10, 18), u32::MAX).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
