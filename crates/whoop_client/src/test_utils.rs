//! In-memory `WhoopClient` used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{WhoopClient, WhoopError};

/// One recorded request.
#[derive(Clone, Debug)]
pub struct Call {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Call {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Replays queued responses per path, in order. Unscripted requests get a 404.
#[derive(Default)]
pub struct ScriptedClient {
    responses: Mutex<HashMap<String, VecDeque<Result<Vec<u8>, WhoopError>>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_raw(&self, path: &str, body: Vec<u8>) {
        self.push(path, Ok(body));
    }

    pub fn push_json(&self, path: &str, value: serde_json::Value) {
        self.push(path, Ok(value.to_string().into_bytes()));
    }

    pub fn push_err(&self, path: &str, err: WhoopError) {
        self.push(path, Err(err));
    }

    fn push(&self, path: &str, response: Result<Vec<u8>, WhoopError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }
}

#[async_trait]
impl WhoopClient for ScriptedClient {
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<u8>, WhoopError> {
        self.calls.lock().unwrap().push(Call {
            path: path.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        });
        self.responses
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(WhoopError::NotFound(format!("unscripted {path}"))))
    }
}
