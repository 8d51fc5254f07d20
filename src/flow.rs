//! Flow records: one origin -> target relationship with a magnitude

use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FlowRecord {
    pub origin: String,
    pub target: String,
    pub value: f64,
}

impl FlowRecord {
    pub fn new(origin: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            origin: origin.into(),
            target: target.into(),
            value,
        }
    }

    /// Value used for visual scaling; negative or non-finite values count as zero
    pub fn magnitude(&self) -> f64 {
        if self.value.is_finite() {
            self.value.max(0.0)
        } else {
            0.0
        }
    }
}

/// A flow whose endpoints both resolved to map points
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFlow {
    pub record: FlowRecord,
    pub from: GeoPoint,
    pub to: GeoPoint,
}

/// Which side of a record failed to resolve
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissingEnd {
    Origin,
    Target,
    Both,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Unresolved {
    pub record: FlowRecord,
    pub missing: MissingEnd,
}

/// Outcome of resolving one batch of records
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    pub drawable: Vec<ResolvedFlow>,
    pub unresolved: Vec<Unresolved>,
}

impl Resolution {
    pub fn dropped(&self) -> usize {
        self.unresolved.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_clamps_bad_values() {
        assert_eq!(FlowRecord::new("US", "DE", -4.0).magnitude(), 0.0);
        assert_eq!(FlowRecord::new("US", "DE", f64::NAN).magnitude(), 0.0);
        assert_eq!(FlowRecord::new("US", "DE", 12.5).magnitude(), 12.5);
    }

    #[test]
    fn deserializes_wire_shape() {
        let record: FlowRecord =
            serde_json::from_str(r#"{"origin":"US","target":"DE","value":100}"#).unwrap();
        assert_eq!(record, FlowRecord::new("US", "DE", 100.0));
    }
}
