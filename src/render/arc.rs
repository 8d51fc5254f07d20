//! Animated rendering: one self-terminating curved arc per flow
//!
//! The curve is a quadratic Bezier in the (lat, lon) plane with the target
//! longitude unwrapped so the arc takes the short way around the globe.
//! Progress is time-based and the leading marker moves by arc length, not
//! by Bezier parameter, so its speed stays even along the curve.

use crate::colors::hsl_to_rgb;
use crate::flow::ResolvedFlow;
use crate::geo::{normalize_longitude, shortest_delta, GeoPoint};
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;

const SAMPLES: usize = 48;

/// Animation length range in milliseconds
pub const DURATION_MS: RangeInclusive<u64> = 1500..=3500;

/// Largest control point offset from the midpoint, in degrees
const MAX_BEND: f64 = 20.0;

const SATURATION: f64 = 1.0;
const LIGHTNESS: f64 = 0.6;

#[derive(Clone, Debug)]
pub struct ArcAnimation {
    pub flow: ResolvedFlow,
    pub hue: u16,
    pub rgb: (u8, u8, u8),
    control: GeoPoint,
    samples: Vec<GeoPoint>,
    lengths: Vec<f64>,
    started_at: Duration,
    duration: Duration,
    cancelled: bool,
}

impl ArcAnimation {
    /// Pick bend, color and duration at random and start at `started_at`
    pub fn spawn<R: Rng + ?Sized>(flow: ResolvedFlow, started_at: Duration, rng: &mut R) -> Self {
        let span = flow.from.planar_distance(flow.to);
        let bend = (span * 0.3).min(MAX_BEND);
        let offset = (rng.gen_range(-1.0..=1.0) * bend, rng.gen_range(-1.0..=1.0) * bend);
        let hue = rng.gen_range(0..360u16);
        let duration = Duration::from_millis(rng.gen_range(DURATION_MS));

        Self::with_params(flow, offset, hue, started_at, duration)
    }

    /// Deterministic constructor; `offset` is (dlat, dlon) from the midpoint
    pub fn with_params(flow: ResolvedFlow, offset: (f64, f64), hue: u16, started_at: Duration, duration: Duration) -> Self {
        let start = flow.from;
        let end = GeoPoint::new(flow.to.lat, start.lon + shortest_delta(start.lon, flow.to.lon));
        let control = GeoPoint::new(
            ((start.lat + end.lat) / 2.0 + offset.0).clamp(-85.0, 85.0),
            (start.lon + end.lon) / 2.0 + offset.1,
        );

        let samples: Vec<GeoPoint> = (0..=SAMPLES)
            .map(|i| quadratic(start, control, end, i as f64 / SAMPLES as f64))
            .collect();

        let mut lengths = Vec::with_capacity(samples.len());
        let mut total = 0.0;
        lengths.push(0.0);
        for pair in samples.windows(2) {
            total += pair[0].planar_distance(pair[1]);
            lengths.push(total);
        }

        let hue = hue % 360;
        Self {
            flow,
            hue,
            rgb: hsl_to_rgb(hue as f64, SATURATION, LIGHTNESS),
            control,
            samples,
            lengths,
            started_at,
            duration,
            cancelled: false,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Fraction of the animation elapsed at `now`, in 0..=1
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.cancelled || self.progress(now) >= 1.0
    }

    fn total_length(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Locate `progress` along the curve: (segment index, fraction within it)
    fn locate(&self, progress: f64) -> (usize, f64) {
        let total = self.total_length();
        if total <= 0.0 {
            return (0, 0.0);
        }
        let wanted = progress.clamp(0.0, 1.0) * total;
        let idx = self.lengths.partition_point(|&l| l < wanted).max(1) - 1;
        let idx = idx.min(self.samples.len() - 2);
        let seg = self.lengths[idx + 1] - self.lengths[idx];
        let frac = if seg > 0.0 { (wanted - self.lengths[idx]) / seg } else { 0.0 };
        (idx, frac.clamp(0.0, 1.0))
    }

    /// Marker position after `progress` of the total arc length
    pub fn position_at(&self, progress: f64) -> GeoPoint {
        let (idx, frac) = self.locate(progress);
        let a = self.samples[idx];
        let b = self.samples[idx + 1];
        let lat = a.lat + (b.lat - a.lat) * frac;
        let lon = a.lon + (b.lon - a.lon) * frac;
        GeoPoint::new(lat, normalize_longitude(lon))
    }

    /// The part of the path already traced, ending at the marker
    pub fn traced_path(&self, progress: f64) -> Vec<GeoPoint> {
        let (idx, _) = self.locate(progress);
        let mut path: Vec<GeoPoint> = self.samples[..=idx]
            .iter()
            .map(|p| GeoPoint::new(p.lat, normalize_longitude(p.lon)))
            .collect();
        path.push(self.position_at(progress));
        path
    }
}

fn quadratic(p0: GeoPoint, c: GeoPoint, p2: GeoPoint, t: f64) -> GeoPoint {
    let u = 1.0 - t;
    GeoPoint::new(
        u * u * p0.lat + 2.0 * u * t * c.lat + t * t * p2.lat,
        u * u * p0.lon + 2.0 * u * t * c.lon + t * t * p2.lon,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flow(from: GeoPoint, to: GeoPoint) -> ResolvedFlow {
        ResolvedFlow {
            record: FlowRecord::new("AA", "BB", 550.0),
            from,
            to,
        }
    }

    fn close(a: GeoPoint, b: GeoPoint) -> bool {
        (a.lat - b.lat).abs() < 1e-6 && (a.lon - b.lon).abs() < 1e-6
    }

    #[test]
    fn endpoints_match_flow() {
        let f = flow(GeoPoint::new(37.0, -95.0), GeoPoint::new(51.0, 10.0));
        let arc = ArcAnimation::with_params(f.clone(), (5.0, -3.0), 10, Duration::ZERO, Duration::from_secs(2));
        assert!(close(arc.position_at(0.0), f.from));
        assert!(close(arc.position_at(1.0), f.to));
    }

    #[test]
    fn straight_arc_moves_proportionally_to_length() {
        let f = flow(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 40.0));
        let arc = ArcAnimation::with_params(f, (0.0, 0.0), 0, Duration::ZERO, Duration::from_secs(2));
        assert!(close(arc.position_at(0.25), GeoPoint::new(0.0, 10.0)));
        assert!(close(arc.position_at(0.5), GeoPoint::new(0.0, 20.0)));
    }

    #[test]
    fn arc_takes_short_way_over_antimeridian() {
        let f = flow(GeoPoint::new(0.0, 170.0), GeoPoint::new(0.0, -170.0));
        let arc = ArcAnimation::with_params(f, (0.0, 0.0), 0, Duration::ZERO, Duration::from_secs(2));
        let mid = arc.position_at(0.5);
        assert!((mid.lon.abs() - 180.0).abs() < 1e-6);
        assert!(close(arc.position_at(1.0), GeoPoint::new(0.0, -170.0)));
    }

    #[test]
    fn progress_is_time_based_and_clamped() {
        let f = flow(GeoPoint::new(0.0, 0.0), GeoPoint::new(10.0, 10.0));
        let arc = ArcAnimation::with_params(f, (0.0, 0.0), 0, Duration::from_secs(1), Duration::from_secs(2));
        assert_eq!(arc.progress(Duration::ZERO), 0.0);
        assert!((arc.progress(Duration::from_secs(2)) - 0.5).abs() < 1e-9);
        assert_eq!(arc.progress(Duration::from_secs(10)), 1.0);
        assert!(!arc.is_finished(Duration::from_secs(2)));
        assert!(arc.is_finished(Duration::from_secs(3)));
    }

    #[test]
    fn cancel_finishes_immediately() {
        let f = flow(GeoPoint::new(0.0, 0.0), GeoPoint::new(10.0, 10.0));
        let mut arc = ArcAnimation::with_params(f, (0.0, 0.0), 0, Duration::ZERO, Duration::from_secs(2));
        assert!(!arc.is_finished(Duration::ZERO));
        arc.cancel();
        assert!(arc.is_cancelled());
        assert!(arc.is_finished(Duration::ZERO));
    }

    #[test]
    fn spawn_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let f = flow(GeoPoint::new(37.0, -95.0), GeoPoint::new(51.0, 10.0));
        let mid = f.from.lerp(f.to, 0.5);
        for _ in 0..100 {
            let arc = ArcAnimation::spawn(f.clone(), Duration::ZERO, &mut rng);
            assert!(DURATION_MS.contains(&(arc.duration().as_millis() as u64)));
            assert!(arc.hue < 360);
            assert!((arc.control.lat - mid.lat).abs() <= MAX_BEND + 1e-9);
            assert!((arc.control.lon - mid.lon).abs() <= MAX_BEND + 1e-9);
        }
    }

    #[test]
    fn traced_path_grows_and_ends_at_marker() {
        let f = flow(GeoPoint::new(0.0, 0.0), GeoPoint::new(20.0, 60.0));
        let arc = ArcAnimation::with_params(f, (8.0, 0.0), 0, Duration::ZERO, Duration::from_secs(2));
        let early = arc.traced_path(0.2);
        let late = arc.traced_path(0.8);
        assert!(late.len() > early.len());
        assert!(close(*late.last().unwrap(), arc.position_at(0.8)));
    }
}
