/// Piecewise-linear mapping from flow value to a visual size.
///
/// Inputs outside the first/last stop are clamped to the end values, so
/// every ramp is bounded and non-decreasing as long as its stops are.
#[derive(Clone, Copy, Debug)]
pub struct Ramp {
    stops: &'static [(f64, f64)],
}

/// Stroke width in pixels
pub const LINE_WIDTH: Ramp = Ramp::new(&[(0.0, 0.5), (10.0, 3.0)]);

/// Target point radius in pixels
pub const POINT_RADIUS: Ramp = Ramp::new(&[(0.0, 2.0), (10.0, 10.0)]);

impl Ramp {
    pub const fn new(stops: &'static [(f64, f64)]) -> Self {
        Self { stops }
    }

    pub fn at(&self, x: f64) -> f64 {
        let (Some(&(x0, y0)), Some(&(xn, yn))) = (self.stops.first(), self.stops.last()) else {
            return 0.0;
        };
        // NaN lands on the first stop
        if !(x > x0) {
            return y0;
        }
        if x >= xn {
            return yn;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.0 {
                let span = b.0 - a.0;
                if span <= 0.0 {
                    return b.1;
                }
                return a.1 + (b.1 - a.1) * (x - a.0) / span;
            }
        }
        yn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_breakpoints() {
        assert_eq!(LINE_WIDTH.at(0.0), 0.5);
        assert_eq!(LINE_WIDTH.at(10.0), 3.0);
        assert_eq!(POINT_RADIUS.at(0.0), 2.0);
        assert_eq!(POINT_RADIUS.at(10.0), 10.0);
    }

    #[test]
    fn interpolates_between_breakpoints() {
        assert!((LINE_WIDTH.at(5.0) - 1.75).abs() < 1e-9);
        assert!((POINT_RADIUS.at(2.5) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_outside_breakpoints() {
        assert_eq!(LINE_WIDTH.at(550.0), 3.0);
        assert_eq!(LINE_WIDTH.at(-3.0), 0.5);
        assert_eq!(LINE_WIDTH.at(f64::NAN), 0.5);
        assert_eq!(POINT_RADIUS.at(f64::INFINITY), 10.0);
    }

    #[test]
    fn weight_is_non_decreasing() {
        let mut prev = LINE_WIDTH.at(-1.0);
        for i in 0..=300 {
            let w = LINE_WIDTH.at(i as f64 * 0.1);
            assert!(w >= prev);
            assert!((0.5..=3.0).contains(&w));
            prev = w;
        }
    }

    #[test]
    fn multi_stop_ramp() {
        const RAMP: Ramp = Ramp::new(&[(0.0, 0.0), (10.0, 1.0), (100.0, 4.0)]);
        assert!((RAMP.at(55.0) - 2.5).abs() < 1e-9);
        assert_eq!(RAMP.at(1000.0), 4.0);
    }
}
