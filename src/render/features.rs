//! Declarative rendering: one GeoJSON FeatureCollection per refresh cycle

use super::weight::{LINE_WIDTH, POINT_RADIUS};
use crate::flow::ResolvedFlow;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    LineString(Vec<[f64; 2]>),
    Point([f64; 2]),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowProperties {
    pub origin: String,
    pub target: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: FlowProperties,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn lines(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| matches!(f.geometry, Geometry::LineString(_)))
    }

    pub fn points(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter().filter(|f| matches!(f.geometry, Geometry::Point(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// A line from origin to target plus a point at the target, per flow
pub fn build_feature_collection(flows: &[ResolvedFlow]) -> FeatureCollection {
    let mut features = Vec::with_capacity(flows.len() * 2);

    for flow in flows {
        let value = flow.record.magnitude();
        let props = |width, radius| FlowProperties {
            origin: flow.record.origin.clone(),
            target: flow.record.target.clone(),
            value,
            width,
            radius,
        };

        features.push(Feature {
            geometry: Geometry::LineString(vec![flow.from.to_lon_lat(), flow.to.to_lon_lat()]),
            properties: props(Some(LINE_WIDTH.at(value)), None),
        });
        features.push(Feature {
            geometry: Geometry::Point(flow.to.to_lon_lat()),
            properties: props(None, Some(POINT_RADIUS.at(value))),
        });
    }

    FeatureCollection { features }
}
