//! Geographic primitives shared by the resolver, renderer and map
//!
//! `GeoPoint` is always latitude first, in degrees. GeoJSON wants
//! `[lon, lat]` and the map projection wants radians; both conversions
//! happen at those boundaries and nowhere else.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// GeoJSON position order
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    /// Build from a `[lat, lon]` pair as served by bulk coordinate APIs
    pub fn from_lat_lng(pair: &[f64]) -> Option<Self> {
        match pair {
            [lat, lon] if lat.is_finite() && lon.is_finite() => Some(Self::new(*lat, *lon)),
            _ => None,
        }
    }

    /// Linear interpolation, taking the short way around the antimeridian
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        let lat = self.lat + (other.lat - self.lat) * t;
        let lon = normalize_longitude(self.lon + shortest_delta(self.lon, other.lon) * t);
        GeoPoint::new(lat, lon)
    }

    /// Angular distance in degrees on the flat (lat, lon) plane
    pub fn planar_distance(self, other: GeoPoint) -> f64 {
        let dlat = other.lat - self.lat;
        let dlon = shortest_delta(self.lon, other.lon);
        (dlat * dlat + dlon * dlon).sqrt()
    }
}

/// Shortest signed longitude delta from `from` to `to`, in -180..180.
#[inline]
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let mut delta = to - from;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Normalize a longitude to the range [-180, 180].
#[inline]
pub fn normalize_longitude(lon: f64) -> f64 {
    let normalized = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if normalized == -180.0 && lon > 0.0 {
        180.0
    } else {
        normalized
    }
}
