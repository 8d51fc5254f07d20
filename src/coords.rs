//! Country code -> map point lookup
//!
//! The table is filled once at startup, either from the built-in list below
//! or from a REST Countries style endpoint, and is read-only afterwards.

use crate::error::{FlowError, Result};
use crate::flow::{FlowRecord, MissingEnd, Resolution, ResolvedFlow, Unresolved};
use crate::geo::GeoPoint;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Hand-curated country centroids (lat, lon)
const BUILTIN: [(&str, f64, f64); 21] = [
    ("US", 37.0902, -95.7129),
    ("RU", 61.5240, 105.3188),
    ("CN", 35.8617, 104.1954),
    ("DE", 51.1657, 10.4515),
    ("FR", 46.2276, 2.2137),
    ("BR", -14.2350, -51.9253),
    ("IN", 20.5937, 78.9629),
    ("JP", 36.2048, 138.2529),
    ("GB", 55.3781, -3.4360),
    ("CA", 56.1304, -106.3468),
    ("AU", -25.2744, 133.7751),
    ("KR", 35.9078, 127.7669),
    ("IT", 41.8719, 12.5674),
    ("NL", 52.1326, 5.2913),
    ("SG", 1.3521, 103.8198),
    ("UA", 48.3794, 31.1656),
    ("ES", 40.4637, -3.7492),
    ("MX", 23.6345, -102.5528),
    ("ZA", -30.5595, 22.9375),
    ("TR", 38.9637, 35.2433),
    ("ID", -0.7893, 113.9213),
];

#[derive(Debug, Deserialize)]
struct BulkCountry {
    #[serde(default)]
    cca2: Option<String>,
    #[serde(default)]
    latlng: Option<Vec<f64>>,
}

#[derive(Clone, Debug, Default)]
pub struct CoordinateTable {
    points: HashMap<String, GeoPoint>,
}

impl CoordinateTable {
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN
                .iter()
                .map(|&(code, lat, lon)| (code.to_string(), GeoPoint::new(lat, lon))),
        )
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, GeoPoint)>,
    {
        Self {
            points: entries.into_iter().collect(),
        }
    }

    /// Load the whole table from a bulk endpoint returning `[{cca2, latlng}]`
    pub fn fetch_bulk(url: &str, timeout: Duration) -> Result<Self> {
        let resp = ureq::get(url)
            .timeout(timeout)
            .call()
            .map_err(|e| FlowError::from_ureq(url, e))?;
        let countries: Vec<BulkCountry> = resp
            .into_json()
            .map_err(|e| FlowError::malformed(url, e.to_string()))?;

        let table = Self::from_bulk(countries);
        if table.is_empty() {
            return Err(FlowError::malformed(url, "no usable country coordinates"));
        }
        Ok(table)
    }

    fn from_bulk(countries: Vec<BulkCountry>) -> Self {
        Self::from_entries(countries.into_iter().filter_map(|c| {
            let code = c.cca2?;
            if code.len() != 2 || !code.chars().all(|ch| ch.is_ascii_uppercase()) {
                return None;
            }
            let point = GeoPoint::from_lat_lng(c.latlng.as_deref()?)?;
            Some((code, point))
        }))
    }

    /// Case-sensitive lookup
    pub fn resolve(&self, code: &str) -> Option<GeoPoint> {
        self.points.get(code).copied()
    }

    /// Sorted key set
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.points.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Split a batch into drawable flows and records with unknown endpoints
pub fn resolve_flows(records: Vec<FlowRecord>, table: &CoordinateTable) -> Resolution {
    let mut resolution = Resolution::default();

    for record in records {
        match (table.resolve(&record.origin), table.resolve(&record.target)) {
            (Some(from), Some(to)) => resolution.drawable.push(ResolvedFlow { record, from, to }),
            (from, to) => {
                let missing = match (from, to) {
                    (None, None) => MissingEnd::Both,
                    (None, _) => MissingEnd::Origin,
                    _ => MissingEnd::Target,
                };
                resolution.unresolved.push(Unresolved { record, missing });
            }
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn builtin_table_resolves_known_codes() {
        let table = CoordinateTable::builtin();
        assert_eq!(table.len(), 21);
        assert_eq!(table.resolve("DE"), Some(GeoPoint::new(51.1657, 10.4515)));
        assert!(table.resolve("ZZ").is_none());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let table = CoordinateTable::builtin();
        assert!(table.resolve("US").is_some());
        assert!(table.resolve("us").is_none());
    }

    #[test]
    fn codes_are_sorted() {
        let table = CoordinateTable::builtin();
        let codes = table.codes();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
        assert_eq!(codes.len(), 21);
    }

    #[test]
    fn unresolved_records_are_reported_not_drawn() {
        let table = CoordinateTable::builtin();
        let records = vec![
            FlowRecord::new("US", "DE", 100.0),
            FlowRecord::new("US", "ZZ", 10.0),
            FlowRecord::new("QQ", "DE", 10.0),
            FlowRecord::new("QQ", "ZZ", 10.0),
        ];

        let resolution = resolve_flows(records, &table);

        assert_eq!(resolution.drawable.len(), 1);
        assert_eq!(resolution.drawable[0].from, table.resolve("US").unwrap());
        assert_eq!(resolution.drawable[0].to, table.resolve("DE").unwrap());
        let missing: Vec<MissingEnd> = resolution.unresolved.iter().map(|u| u.missing).collect();
        assert_eq!(missing, vec![MissingEnd::Target, MissingEnd::Origin, MissingEnd::Both]);
    }

    #[test]
    fn bulk_load_skips_bad_entries() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/all");
            then.status(200).json_body(serde_json::json!([
                {"cca2": "NO", "latlng": [62.0, 10.0], "name": {"common": "Norway"}},
                {"cca2": "XK", "latlng": [42.6]},
                {"cca2": "abc", "latlng": [1.0, 2.0]},
                {"latlng": [1.0, 2.0]},
                {"cca2": "FI", "latlng": [64.0, 26.0]}
            ]));
        });

        let table = CoordinateTable::fetch_bulk(&server.url("/all"), Duration::from_secs(5)).unwrap();

        mock.assert();
        assert_eq!(table.codes(), vec!["FI", "NO"]);
        assert_eq!(table.resolve("NO"), Some(GeoPoint::new(62.0, 10.0)));
    }

    #[test]
    fn bulk_load_errors_on_empty_table() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/all");
            then.status(200).json_body(serde_json::json!([]));
        });

        let result = CoordinateTable::fetch_bulk(&server.url("/all"), Duration::from_secs(5));
        assert!(matches!(result, Err(FlowError::Malformed { .. })));
    }

    #[test]
    fn bulk_load_reports_http_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/all");
            then.status(503);
        });

        let result = CoordinateTable::fetch_bulk(&server.url("/all"), Duration::from_secs(5));
        assert!(matches!(result, Err(FlowError::Status { code: 503, .. })));
    }
}
