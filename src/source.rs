//! Event sources: where each refresh cycle gets its flow records from
//!
//! All strategies hand back the same `Vec<FlowRecord>`, so the render side
//! never knows which one is configured.

use crate::coords::CoordinateTable;
use crate::error::{FlowError, Result};
use crate::flow::FlowRecord;
use rand::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Default HTTP timeout, same as the upstream events backend uses
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

pub const CLOUDFLARE_RADAR_BASE: &str = "https://api.cloudflare.com/client/v4/radar";

pub trait EventSource: Send {
    /// Produce the records for one refresh cycle
    fn fetch(&mut self) -> Result<Vec<FlowRecord>>;

    /// Short human-readable label for the status line
    fn describe(&self) -> String;

    /// An independent copy that may run on a worker thread.
    /// Sources that never block return `None` and run inline.
    fn detach(&self) -> Option<Box<dyn EventSource>> {
        None
    }
}

// ============================================================================
// Remote events endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
struct EventsBody {
    arcs: Vec<FlowRecord>,
}

/// `GET /events[?dateRange=..]` returning `{ "arcs": [...] }`
#[derive(Clone, Debug)]
pub struct RemoteSource {
    endpoint: String,
    date_range: Option<String>,
    timeout: Duration,
}

impl RemoteSource {
    pub fn new(endpoint: impl Into<String>, date_range: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            date_range,
            timeout,
        }
    }
}

impl EventSource for RemoteSource {
    fn fetch(&mut self) -> Result<Vec<FlowRecord>> {
        let mut req = ureq::get(&self.endpoint).timeout(self.timeout);
        if let Some(range) = &self.date_range {
            req = req.query("dateRange", range);
        }

        let resp = req.call().map_err(|e| FlowError::from_ureq(&self.endpoint, e))?;
        let body: EventsBody = resp
            .into_json()
            .map_err(|e| FlowError::malformed(&self.endpoint, e.to_string()))?;

        Ok(body.arcs)
    }

    fn describe(&self) -> String {
        match &self.date_range {
            Some(range) => format!("{} ({})", self.endpoint, range),
            None => self.endpoint.clone(),
        }
    }

    fn detach(&self) -> Option<Box<dyn EventSource>> {
        Some(Box::new(self.clone()))
    }
}

// ============================================================================
// Cloudflare Radar layer 7 top attacks
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct RadarEnvelope {
    #[serde(default)]
    result: serde_json::Map<String, Value>,
}

/// Queries Radar directly and flattens every `result.top_*` table
#[derive(Clone, Debug)]
pub struct RadarSource {
    base_url: String,
    token: Option<String>,
    date_range: String,
    limit: u32,
    timeout: Duration,
}

impl RadarSource {
    pub fn new(base_url: impl Into<String>, token: Option<String>, date_range: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            date_range: date_range.into(),
            limit: 50,
            timeout,
        }
    }

    fn url(&self) -> String {
        format!("{}/attacks/layer7/top/attacks", self.base_url.trim_end_matches('/'))
    }
}

impl EventSource for RadarSource {
    fn fetch(&mut self) -> Result<Vec<FlowRecord>> {
        let url = self.url();
        let mut req = ureq::get(&url)
            .timeout(self.timeout)
            .query("dateRange", &self.date_range)
            .query("limit", &self.limit.to_string())
            .query("format", "json");
        if let Some(token) = &self.token {
            req = req.set("Authorization", &format!("Bearer {}", token));
        }

        let resp = req.call().map_err(|e| FlowError::from_ureq(&url, e))?;
        let envelope: RadarEnvelope = resp
            .into_json()
            .map_err(|e| FlowError::malformed(&url, e.to_string()))?;

        Ok(flatten_radar_result(&envelope.result))
    }

    fn describe(&self) -> String {
        format!("cloudflare radar ({})", self.date_range)
    }

    fn detach(&self) -> Option<Box<dyn EventSource>> {
        Some(Box::new(self.clone()))
    }
}

fn flatten_radar_result(result: &serde_json::Map<String, Value>) -> Vec<FlowRecord> {
    // top_0, top_1, ... top_10 in rank order, not string order
    let mut keys: Vec<(usize, &String)> = result
        .keys()
        .filter_map(|k| Some((k.strip_prefix("top_")?.parse::<usize>().ok()?, k)))
        .collect();
    keys.sort();
    let keys = keys.into_iter().map(|(_, k)| k);

    keys.filter_map(|k| result.get(k)?.as_array())
        .flatten()
        .filter_map(|row| {
            let origin = row.get("originCountryAlpha2")?.as_str().filter(|s| !s.is_empty())?;
            let target = row.get("targetCountryAlpha2")?.as_str().filter(|s| !s.is_empty())?;
            let value = match row.get("value") {
                Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(Value::String(s)) => s.parse().unwrap_or(0.0),
                _ => 0.0,
            };
            Some(FlowRecord::new(origin, target, value))
        })
        .collect()
}

// ============================================================================
// Synthetic
// ============================================================================

/// Random flows between known countries
pub struct SyntheticSource {
    codes: Vec<String>,
    rng: StdRng,
    count: RangeInclusive<usize>,
    value: RangeInclusive<u32>,
}

impl SyntheticSource {
    pub fn new(table: &CoordinateTable, seed: Option<u64>) -> Result<Self> {
        let codes: Vec<String> = table.codes().into_iter().map(String::from).collect();
        if codes.len() < 2 {
            return Err(FlowError::Config {
                message: format!("synthetic flows need at least two countries, table has {}", codes.len()),
            });
        }

        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            codes,
            rng,
            count: 3..=7,
            value: 50..=549,
        })
    }

    pub fn with_count(mut self, count: RangeInclusive<usize>) -> Self {
        self.count = count;
        self
    }

    fn pick_pair(&mut self) -> (String, String) {
        let origin = self.rng.gen_range(0..self.codes.len());
        let mut target = self.rng.gen_range(0..self.codes.len());
        while target == origin {
            target = self.rng.gen_range(0..self.codes.len());
        }
        (self.codes[origin].clone(), self.codes[target].clone())
    }
}

impl EventSource for SyntheticSource {
    fn fetch(&mut self) -> Result<Vec<FlowRecord>> {
        let n = self.rng.gen_range(self.count.clone());
        let mut records = Vec::with_capacity(n);
        for _ in 0..n {
            let (origin, target) = self.pick_pair();
            let value = self.rng.gen_range(self.value.clone());
            records.push(FlowRecord::new(origin, target, value as f64));
        }
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("synthetic ({} countries)", self.codes.len())
    }
}

// ============================================================================
// Map config
// ============================================================================

#[derive(Debug, Deserialize)]
struct ConfigBody {
    #[serde(rename = "mapboxToken", default)]
    mapbox_token: Option<String>,
}

/// Map style access settings served by the events backend
#[derive(Clone, Debug, PartialEq)]
pub struct MapConfig {
    pub access_token: String,
}

/// `GET /config`; a missing or empty token is an error
pub fn fetch_map_config(url: &str, timeout: Duration) -> Result<MapConfig> {
    let resp = ureq::get(url)
        .timeout(timeout)
        .call()
        .map_err(|e| FlowError::from_ureq(url, e))?;
    let body: ConfigBody = resp
        .into_json()
        .map_err(|e| FlowError::malformed(url, e.to_string()))?;

    match body.mapbox_token {
        Some(token) if !token.trim().is_empty() => Ok(MapConfig { access_token: token }),
        _ => Err(FlowError::MissingToken { url: url.to_string() }),
    }
}
