#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::{json, Value};
use staticdata_core::{
    LimiterHandle, Params, Settings, StaticDataSource, Transport, TransportError,
    UnlimitedRateLimiter,
};
use std::collections::HashMap;
use std::sync::Arc;

pub const HOST: &str = "http://static.test/{platform}";

pub fn url(platform: &str, path: &str) -> String {
    format!("http://static.test/{}/lol/static-data/v3/{}", platform, path)
}

/// Serves canned payloads by URL and records every request.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Value>>,
    calls: Mutex<Vec<(String, Params)>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(&self, url: String, payload: Value) {
        self.routes.lock().insert(url, payload);
    }

    pub fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|(u, _)| u == url).count()
    }
}

impl Transport for MockTransport {
    fn fetch(
        &self,
        url: &str,
        params: &Params,
        limiter: &LimiterHandle,
    ) -> Result<Value, TransportError> {
        limiter.acquire();
        self.calls.lock().push((url.to_string(), params.clone()));
        self.routes
            .lock()
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::NotFound(format!("404 for {}", url)))
    }
}

pub fn settings(request_by_id: bool) -> Settings {
    Settings {
        request_by_id,
        host_template: HOST.to_string(),
        ..Settings::default()
    }
}

pub fn source(transport: &Arc<MockTransport>, request_by_id: bool) -> StaticDataSource {
    StaticDataSource::new(
        &settings(request_by_id),
        transport.clone(),
        Arc::new(UnlimitedRateLimiter),
    )
    .expect("valid settings")
}

pub fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

pub fn realm(version: &str) -> Value {
    json!({"v": version, "l": "en_US", "cdn": "https://ddragon.test/cdn"})
}

pub fn champion_list() -> Value {
    json!({
        "type": "champion",
        "version": "7.24.1",
        "region": "EUW",
        "data": {
            "Annie": {"id": 1, "key": "Annie", "name": "Annie", "title": "the Dark Child", "region": "EUW"},
            "Teemo": {"id": 17, "key": "Teemo", "name": "Teemo", "title": "the Swift Scout"}
        }
    })
}

pub fn item_list() -> Value {
    json!({
        "type": "item",
        "version": "7.24.1",
        "data": {
            "1001": {"id": 1001, "name": "Boots of Speed", "tags": ["Boots"], "depth": 1},
            "3632": {"id": 3632, "name": "Placeholder"}
        }
    })
}
