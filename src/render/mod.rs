//! Render pipeline
//!
//! `features` builds the declarative GeoJSON source, `arc` the animated
//! per-flow arcs, and `weight` maps flow values to visual sizes for both.

pub mod arc;
pub mod features;
pub mod weight;

pub use arc::ArcAnimation;
pub use features::{build_feature_collection, FeatureCollection};

/// Named map source the declarative mode replaces each cycle
pub const FLOW_SOURCE: &str = "flows";
