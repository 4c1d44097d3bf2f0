//! Paginated collection fetches and single-record endpoints.

use serde::de::DeserializeOwned;

use crate::models::{BodyMeasurements, Cycle, Page, UserProfile};
use crate::window::TimeWindow;
use crate::{WhoopClient, WhoopError};

/// Time-windowed collection endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Cycle,
    Recovery,
    Sleep,
    Workout,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Cycle => "/cycle",
            Resource::Recovery => "/recovery",
            Resource::Sleep => "/activity/sleep",
            Resource::Workout => "/activity/workout",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Cycle => "cycles",
            Resource::Recovery => "recoveries",
            Resource::Sleep => "sleeps",
            Resource::Workout => "workouts",
        };
        f.write_str(name)
    }
}

/// Fetch every record of `resource` in `window`, following `next_token`
/// until the server stops returning one.
///
/// A 404 means "nothing in this range" and yields the records gathered so
/// far (normally none). Any other failure discards accumulated pages.
pub async fn fetch_collection<T>(
    client: &dyn WhoopClient,
    resource: Resource,
    window: &TimeWindow,
) -> Result<Vec<T>, WhoopError>
where
    T: DeserializeOwned + Send,
{
    let mut all = Vec::new();
    let mut next_token: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let mut query: Vec<(&str, String)> = window.query_pairs().into();
        if let Some(token) = &next_token {
            query.push(("nextToken", token.clone()));
        }

        let body = match client.get(resource.path(), &query).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => {
                tracing::debug!(%resource, "404 treated as empty collection");
                return Ok(all);
            }
            Err(e) => return Err(e),
        };

        let page: Page<T> = serde_json::from_slice(&body)?;
        pages += 1;
        next_token = page.continuation().map(str::to_string);
        all.extend(page.records);

        if next_token.is_none() {
            break;
        }
    }

    tracing::debug!(%resource, pages, records = all.len(), "fetched collection");
    Ok(all)
}

/// Cycles whose start falls in `window`.
pub async fn get_cycles(client: &dyn WhoopClient, window: &TimeWindow) -> Result<Vec<Cycle>, WhoopError> {
    fetch_collection(client, Resource::Cycle, window).await
}

pub async fn get_user_profile(client: &dyn WhoopClient) -> Result<UserProfile, WhoopError> {
    let body = client.get("/user/profile/basic", &[]).await?;
    Ok(serde_json::from_slice(&body)?)
}

pub async fn get_body_measurements(client: &dyn WhoopClient) -> Result<BodyMeasurements, WhoopError> {
    let body = client.get("/user/measurement/body", &[]).await?;
    Ok(serde_json::from_slice(&body)?)
}
