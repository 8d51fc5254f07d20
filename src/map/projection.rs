use crate::geo::{shortest_delta, GeoPoint};

/// Equirectangular projection onto a braille pixel grid.
///
/// A braille cell is 2x4 dots and a terminal cell is about twice as tall as
/// wide, so dots come out roughly square and one scale serves both axes.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: f64,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: f64, width: usize, height: usize) -> Self {
        Self { center, zoom, width, height }
    }

    /// Dots per degree
    pub fn scale(&self) -> f64 {
        let fit = (self.width as f64 / 360.0).min(self.height as f64 / 180.0);
        fit * self.zoom.max(0.1)
    }

    pub fn project(&self, p: GeoPoint) -> (i32, i32) {
        let (x, y) = self.project_f(p);
        (x.round() as i32, y.round() as i32)
    }

    pub fn project_f(&self, p: GeoPoint) -> (f64, f64) {
        let s = self.scale();
        let x = self.width as f64 / 2.0 + shortest_delta(self.center.lon, p.lon) * s;
        let y = self.height as f64 / 2.0 - (p.lat - self.center.lat) * s;
        (x, y)
    }

    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// A segment spanning more than half the screen is wrapping around the
    /// back of the map and must not be drawn straight across
    pub fn wraps(&self, a: (i32, i32), b: (i32, i32)) -> bool {
        let span = 180.0 * self.scale();
        ((a.0 - b.0).abs() as f64) > span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_projects_to_middle() {
        let vp = Viewport::new(GeoPoint::new(20.0, 0.0), 1.0, 360, 180);
        assert_eq!(vp.project(GeoPoint::new(20.0, 0.0)), (180, 90));
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let vp = Viewport::new(GeoPoint::new(0.0, 0.0), 1.0, 360, 180);
        let (x, y) = vp.project(GeoPoint::new(10.0, 30.0));
        assert!(x > 180);
        assert!(y < 90);
    }

    #[test]
    fn zoom_scales_distance() {
        let near = Viewport::new(GeoPoint::new(0.0, 0.0), 1.0, 360, 180);
        let far = Viewport::new(GeoPoint::new(0.0, 0.0), 2.0, 360, 180);
        let p = GeoPoint::new(0.0, 40.0);
        assert_eq!(near.project(p).0 - 180, 40);
        assert_eq!(far.project(p).0 - 180, 80);
    }

    #[test]
    fn wrapping_segment_detected() {
        let vp = Viewport::new(GeoPoint::new(0.0, 0.0), 1.0, 360, 180);
        let a = vp.project(GeoPoint::new(0.0, 179.0));
        let b = vp.project(GeoPoint::new(0.0, -179.0));
        assert!(vp.wraps(a, b));
        let c = vp.project(GeoPoint::new(0.0, 10.0));
        assert!(!vp.wraps(a, c));
    }
}
