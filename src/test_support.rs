//! Canned transports and payloads shared by the unit tests.

use crate::acquisition::error::AcquisitionError;
use crate::acquisition::transport::Transport;
use crate::types::location::TimeRange;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

enum Reply {
    Body(String),
    Status(u16),
}

/// Answers every request with the same reply and records what was asked.
pub(crate) struct CannedTransport {
    reply: Reply,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
}

impl CannedTransport {
    pub(crate) fn serving(body: impl Into<String>) -> Self {
        Self::with_reply(Reply::Body(body.into()))
    }

    pub(crate) fn failing(status: u16) -> Self {
        Self::with_reply(Reply::Status(status))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Transport for CannedTransport {
    fn get(&self, url: &str) -> Result<String, AcquisitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Status(status) => Err(AcquisitionError::HttpStatus {
                url: url.to_string(),
                status: *status,
                body: "Service Unavailable".to_string(),
            }),
        }
    }
}

/// A POWER-shaped JSON body with one value per day of `range` for each code.
///
/// Values are `index + offset` where the offset is 10 × the code's position,
/// so every column is distinct and predictable.
pub(crate) fn power_body(codes: &[&str], range: &TimeRange) -> String {
    let mut parameter = Map::new();
    for (position, code) in codes.iter().enumerate() {
        let series: Map<String, Value> = range
            .days()
            .enumerate()
            .map(|(index, day)| {
                let value = index as f64 + 10.0 * position as f64;
                (day.format("%Y%m%d").to_string(), json!(value))
            })
            .collect();
        parameter.insert(code.to_string(), Value::Object(series));
    }
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [-9.1393, 38.7223, 93.0]},
        "properties": {"parameter": parameter},
        "header": {"fill_value": -999.0},
        "messages": [],
    })
    .to_string()
}
