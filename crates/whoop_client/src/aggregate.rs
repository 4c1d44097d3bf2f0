//! Calendar-day aggregation over WHOOP cycles.
//!
//! A WHOOP cycle starts when the user wakes up, so it never lines up with
//! calendar midnight. For a date we:
//!  1. query cycles starting in `[date 00:00 UTC, date+1 00:00 UTC)` and take
//!     the first one returned;
//!  2. fetch recoveries, sleeps and workouts concurrently over the windows
//!     derived from that cycle (see [`CycleWindows`]);
//!  3. attach the recovery whose `cycle_id` matches the cycle.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::fetch::{Resource, fetch_collection, get_cycles};
use crate::models::{Cycle, Recovery, Sleep, Workout};
use crate::window::{CycleWindows, TimeWindow};
use crate::{WhoopClient, WhoopError};

/// Everything known about one calendar date.
///
/// Without a cycle the other fields are always empty.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DayData {
    pub date: NaiveDate,
    pub cycle: Option<Cycle>,
    pub recovery: Option<Recovery>,
    pub sleeps: Vec<Sleep>,
    pub workouts: Vec<Workout>,
}

impl DayData {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            cycle: None,
            recovery: None,
            sleeps: Vec::new(),
            workouts: Vec::new(),
        }
    }

    pub fn has_cycle(&self) -> bool {
        self.cycle.is_some()
    }
}

/// A failed aggregation, carrying whatever was resolved before the failure
/// (at least the date, and the cycle if it had been found).
#[derive(Debug, Error)]
#[error("fetching WHOOP data for {}: {source}", .partial.date)]
pub struct DayDataError {
    pub partial: Box<DayData>,
    #[source]
    pub source: WhoopError,
}

impl DayDataError {
    fn new(partial: DayData, source: WhoopError) -> Self {
        Self {
            partial: Box::new(partial),
            source,
        }
    }

    pub fn into_parts(self) -> (DayData, WhoopError) {
        (*self.partial, self.source)
    }
}

/// Aggregate the WHOOP data for `date`.
///
/// A date without a cycle is a successful, empty result. If any of the three
/// detail fetches fails, the first failure in recovery, sleep, workout order
/// is returned; the remaining fetches finish in the background and their
/// results are dropped.
pub async fn get_day_data(
    client: Arc<dyn WhoopClient>,
    date: NaiveDate,
) -> Result<DayData, DayDataError> {
    let day = TimeWindow::day(date);
    let mut data = DayData::empty(date);

    let cycles = match get_cycles(client.as_ref(), &day).await {
        Ok(cycles) => cycles,
        Err(e) => return Err(DayDataError::new(data, e)),
    };
    let Some(cycle) = cycles.into_iter().next() else {
        tracing::debug!(%date, "no cycle for date");
        return Ok(data);
    };
    data.cycle = Some(cycle.clone());

    let windows = match CycleWindows::resolve(&cycle, &day) {
        Ok(w) => w,
        Err(e) => return Err(DayDataError::new(data, e)),
    };
    tracing::debug!(
        %date,
        cycle_id = cycle.id,
        cycle_start = %windows.cycle_start,
        cycle_end = %windows.cycle_end,
        "resolved cycle"
    );

    let recoveries = spawn_fetch::<Recovery>(&client, Resource::Recovery, windows.recovery);
    let sleeps = spawn_fetch::<Sleep>(&client, Resource::Sleep, windows.sleep);
    let workouts = spawn_fetch::<Workout>(&client, Resource::Workout, windows.workout);

    let recoveries = match join(recoveries).await {
        Ok(v) => v,
        Err(e) => return Err(DayDataError::new(data, e)),
    };
    let sleeps = match join(sleeps).await {
        Ok(v) => v,
        Err(e) => return Err(DayDataError::new(data, e)),
    };
    let workouts = match join(workouts).await {
        Ok(v) => v,
        Err(e) => return Err(DayDataError::new(data, e)),
    };

    data.recovery = recoveries.into_iter().find(|r| r.cycle_id == cycle.id);
    data.sleeps = sleeps;
    data.workouts = workouts;
    Ok(data)
}

fn spawn_fetch<T>(
    client: &Arc<dyn WhoopClient>,
    resource: Resource,
    window: TimeWindow,
) -> JoinHandle<Result<Vec<T>, WhoopError>>
where
    T: DeserializeOwned + Send + 'static,
{
    let client = Arc::clone(client);
    tokio::spawn(async move { fetch_collection(client.as_ref(), resource, &window).await })
}

async fn join<T>(handle: JoinHandle<Result<Vec<T>, WhoopError>>) -> Result<Vec<T>, WhoopError> {
    handle.await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedClient;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
    }

    fn open_cycle(id: i64) -> serde_json::Value {
        json!({"id": id, "start": "2026-02-20T07:15:00.000Z", "end": null, "score_state": "PENDING_SCORE"})
    }

    #[tokio::test]
    async fn no_cycle_short_circuits_without_detail_fetches() {
        let client = Arc::new(ScriptedClient::new());
        client.push_json("/cycle", json!({"records": [], "next_token": ""}));

        let data = get_day_data(client.clone(), date()).await.expect("day");
        assert_eq!(data, DayData::empty(date()));
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn cycle_not_found_is_empty_day() {
        let client = Arc::new(ScriptedClient::new());
        client.push_err("/cycle", WhoopError::NotFound(String::new()));
        let data = get_day_data(client, date()).await.expect("day");
        assert!(!data.has_cycle());
        assert!(data.sleeps.is_empty() && data.workouts.is_empty());
    }

    #[tokio::test]
    async fn open_cycle_windows_reach_end_of_day() {
        let client = Arc::new(ScriptedClient::new());
        client.push_json("/cycle", json!({"records": [open_cycle(9)]}));

        let data = get_day_data(client.clone(), date()).await.expect("day");
        assert_eq!(data.cycle.as_ref().map(|c| c.id), Some(9));

        let sleep = &client.calls_to("/activity/sleep")[0];
        assert_eq!(sleep.param("start"), Some("2026-02-19T07:15:00Z"));
        assert_eq!(sleep.param("end"), Some("2026-02-21T00:00:00Z"));
        for path in ["/recovery", "/activity/workout"] {
            let call = &client.calls_to(path)[0];
            assert_eq!(call.param("start"), Some("2026-02-20T07:15:00Z"));
            assert_eq!(call.param("end"), Some("2026-02-21T00:00:00Z"));
        }
    }

    #[tokio::test]
    async fn closed_cycle_windows_end_at_cycle_end() {
        let client = Arc::new(ScriptedClient::new());
        client.push_json(
            "/cycle",
            json!({"records": [{"id": 4, "start": "2026-02-20T06:00:00.000Z", "end": "2026-02-21T05:30:00.000Z"}]}),
        );
        get_day_data(client.clone(), date()).await.expect("day");
        for path in ["/recovery", "/activity/sleep", "/activity/workout"] {
            assert_eq!(
                client.calls_to(path)[0].param("end"),
                Some("2026-02-21T05:30:00Z")
            );
        }
    }

    #[tokio::test]
    async fn recovery_is_matched_by_cycle_id() {
        let client = Arc::new(ScriptedClient::new());
        client.push_json("/cycle", json!({"records": [open_cycle(9)]}));
        client.push_json(
            "/recovery",
            json!({"records": [{"cycle_id": 5, "sleep_id": "a"}, {"cycle_id": 9, "sleep_id": "b"}]}),
        );
        client.push_json(
            "/activity/sleep",
            json!({"records": [{"id": "s1", "nap": false}, {"id": "s2", "nap": true}]}),
        );
        client.push_json("/activity/workout", json!({"records": [{"id": "w1", "sport_id": 1}]}));

        let data = get_day_data(client, date()).await.expect("day");
        assert_eq!(data.recovery.as_ref().map(|r| r.sleep_id.as_str()), Some("b"));
        let sleep_ids: Vec<&str> = data.sleeps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(sleep_ids, vec!["s1", "s2"]);
        assert_eq!(data.workouts.len(), 1);
    }

    #[tokio::test]
    async fn unmatched_recovery_stays_absent() {
        let client = Arc::new(ScriptedClient::new());
        client.push_json("/cycle", json!({"records": [open_cycle(9)]}));
        client.push_json("/recovery", json!({"records": [{"cycle_id": 5}]}));
        let data = get_day_data(client, date()).await.expect("day");
        assert!(data.has_cycle());
        assert!(data.recovery.is_none());
    }

    #[tokio::test]
    async fn first_cycle_wins() {
        let client = Arc::new(ScriptedClient::new());
        client.push_json("/cycle", json!({"records": [open_cycle(11), open_cycle(12)]}));
        client.push_json("/recovery", json!({"records": [{"cycle_id": 12}, {"cycle_id": 11}]}));
        let data = get_day_data(client, date()).await.expect("day");
        assert_eq!(data.cycle.map(|c| c.id), Some(11));
        assert_eq!(data.recovery.map(|r| r.cycle_id), Some(11));
    }

    #[tokio::test]
    async fn recovery_failure_returns_partial_with_cycle() {
        let client = Arc::new(ScriptedClient::new());
        client.push_json("/cycle", json!({"records": [open_cycle(9)]}));
        client.push_err(
            "/recovery",
            WhoopError::Api {
                status: 502,
                body: "bad gateway".into(),
            },
        );
        client.push_json("/activity/sleep", json!({"records": [{"id": "s1"}]}));

        let err = get_day_data(client, date()).await.unwrap_err();
        let (partial, source) = err.into_parts();
        assert!(matches!(source, WhoopError::Api { status: 502, .. }));
        assert_eq!(partial.date, date());
        assert_eq!(partial.cycle.map(|c| c.id), Some(9));
        assert!(partial.recovery.is_none());
        assert!(partial.sleeps.is_empty());
        assert!(partial.workouts.is_empty());
    }

    #[tokio::test]
    async fn first_failure_in_fixed_order_is_reported() {
        let client = Arc::new(ScriptedClient::new());
        client.push_json("/cycle", json!({"records": [open_cycle(9)]}));
        client.push_err("/activity/workout", WhoopError::Auth("workout".into()));
        client.push_err(
            "/activity/sleep",
            WhoopError::Api {
                status: 500,
                body: "sleep".into(),
            },
        );
        let err = get_day_data(client, date()).await.unwrap_err();
        assert!(matches!(err.source, WhoopError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn unparseable_cycle_start_fails_with_cycle_set() {
        let client = Arc::new(ScriptedClient::new());
        client.push_json("/cycle", json!({"records": [{"id": 3, "start": "not a time"}]}));
        let err = get_day_data(client.clone(), date()).await.unwrap_err();
        assert!(matches!(err.source, WhoopError::Timestamp(_)));
        assert_eq!(err.partial.cycle.as_ref().map(|c| c.id), Some(3));
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn cycle_fetch_failure_returns_bare_date() {
        let client = Arc::new(ScriptedClient::new());
        client.push_err("/cycle", WhoopError::Auth("expired".into()));
        let err = get_day_data(client, date()).await.unwrap_err();
        assert_eq!(*err.partial, DayData::empty(date()));
        assert!(err.to_string().starts_with("fetching WHOOP data for 2026-02-20"));
    }
}
