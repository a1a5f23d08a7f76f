//! Canned transport for command tests.

use serde_json::{json, Value};
use staticdata_core::{
    LimiterHandle, Params, Settings, StaticDataSource, Transport, TransportError,
    UnlimitedRateLimiter,
};
use std::sync::Arc;

struct Canned;

impl Transport for Canned {
    fn fetch(
        &self,
        url: &str,
        _params: &Params,
        _limiter: &LimiterHandle,
    ) -> Result<Value, TransportError> {
        match url {
            "http://static.test/na1/lol/static-data/v3/champions" => Ok(json!({
                "version": "7.24.1",
                "data": {"Teemo": {"id": 17, "name": "Teemo"}}
            })),
            "http://static.test/na1/lol/static-data/v3/realms" => Ok(json!({"v": "7.24.1"})),
            other => Err(TransportError::NotFound(format!("404 for {}", other))),
        }
    }
}

pub fn source() -> StaticDataSource {
    let settings = Settings {
        host_template: "http://static.test/{platform}".into(),
        ..Settings::default()
    };
    StaticDataSource::new(&settings, Arc::new(Canned), Arc::new(UnlimitedRateLimiter))
        .expect("valid settings")
}
