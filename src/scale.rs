//! Affine data-to-pixel scale transforms.

use crate::range::AxisRange;

/// An affine transform from data space to pixel space.
///
/// Both axis directions share this implementation: an inverted axis
/// (pixel origin at the top, data origin at the bottom) simply swaps
/// the pixel endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTransform {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl ScaleTransform {
    /// Build a transform from a resolved axis range onto the pixel
    /// interval `px`. With `inverted` set, `domain.min` maps to `px.1`
    /// and `domain.max` to `px.0`.
    pub fn new(domain: &AxisRange, px: (f64, f64), inverted: bool) -> Self {
        Self::with_domain((domain.min, domain.max), px, inverted)
    }

    /// Build a transform from raw domain endpoints.
    pub fn with_domain(domain: (f64, f64), px: (f64, f64), inverted: bool) -> Self {
        let (range_min, range_max) = if inverted { (px.1, px.0) } else { px };
        ScaleTransform {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min,
            range_max,
        }
    }

    /// Map a data value to a pixel coordinate. Endpoints map exactly.
    pub fn map(&self, value: f64) -> f64 {
        if value == self.domain_min {
            return self.range_min;
        }
        if value == self.domain_max {
            return self.range_max;
        }
        self.range_min
            + (value - self.domain_min) / (self.domain_max - self.domain_min)
                * (self.range_max - self.range_min)
    }

    /// Inverse mapping from pixel space back to data space. Only
    /// meaningful when the domain is non-degenerate.
    pub fn invert(&self, px: f64) -> f64 {
        self.domain_min
            + (px - self.range_min) / (self.range_max - self.range_min)
                * (self.domain_max - self.domain_min)
    }

    /// Pixels covered by one data unit (signed; negative on an
    /// inverted axis).
    pub fn pixels_per_unit(&self) -> f64 {
        (self.range_max - self.range_min) / (self.domain_max - self.domain_min)
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_exactly() {
        let range = AxisRange::new(0.0, 10.0, 1.0);
        let scale = ScaleTransform::new(&range, (50.0, 450.0), false);
        assert_eq!(scale.map(0.0), 50.0);
        assert_eq!(scale.map(10.0), 450.0);
        assert_eq!(scale.map(5.0), 250.0);
    }

    #[test]
    fn inverted_swaps_endpoints() {
        let range = AxisRange::new(0.0, 10.0, 1.0);
        let scale = ScaleTransform::new(&range, (0.0, 300.0), true);
        assert_eq!(scale.map(0.0), 300.0);
        assert_eq!(scale.map(10.0), 0.0);
    }

    #[test]
    fn invert_is_the_inverse() {
        let range = AxisRange::new(-5.0, 15.0, 5.0);
        let scale = ScaleTransform::new(&range, (100.0, 500.0), false);
        for v in [-5.0, 0.0, 7.5, 15.0] {
            let px = scale.map(v);
            assert!((scale.invert(px) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn pixels_per_unit_is_signed() {
        let range = AxisRange::new(0.0, 10.0, 1.0);
        let up = ScaleTransform::new(&range, (0.0, 100.0), false);
        let down = ScaleTransform::new(&range, (0.0, 100.0), true);
        assert_eq!(up.pixels_per_unit(), 10.0);
        assert_eq!(down.pixels_per_unit(), -10.0);
    }
}
