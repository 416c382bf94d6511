//! Height-based coloring for point clouds.

use crate::Point;

/// Min/max of the Z coordinate over one frame's points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightRange {
    pub min: f64,
    pub max: f64,
}

impl HeightRange {
    /// Scans `points` for their Z extent. Returns `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min: first.z,
            max: first.z,
        };
        Some(points.iter().fold(init, |acc, p| Self {
            min: acc.min.min(p.z),
            max: acc.max.max(p.z),
        }))
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Normalized height of `z` in `[0, 1]`. A flat cloud (zero span)
    /// divides by 1 instead.
    #[inline]
    pub fn normalize(&self, z: f64) -> f64 {
        let span = self.span();
        let denom = if span == 0.0 { 1.0 } else { span };
        ((z - self.min) / denom).clamp(0.0, 1.0)
    }

    /// Linear RGB for a point at height `z`: red rises and green falls with
    /// height, blue is fixed at 0.5.
    #[inline]
    pub fn color_for(&self, z: f64) -> [f32; 3] {
        let t = self.normalize(z) as f32;
        [t, 1.0 - t, 0.5]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cloud_has_no_range() {
        assert_eq!(HeightRange::from_points(&[]), None);
    }

    #[test]
    fn range_spans_lowest_to_highest() {
        let pts = [
            Point::new(0.0, 0.0, 2.0),
            Point::new(0.0, 0.0, -1.0),
            Point::new(0.0, 0.0, 5.0),
        ];
        let r = HeightRange::from_points(&pts).unwrap();
        assert_eq!(r, HeightRange { min: -1.0, max: 5.0 });
    }

    #[test]
    fn gradient_endpoints() {
        let r = HeightRange { min: 0.0, max: 4.0 };
        assert_eq!(r.color_for(0.0), [0.0, 1.0, 0.5]);
        assert_eq!(r.color_for(4.0), [1.0, 0.0, 0.5]);
        assert_eq!(r.color_for(1.0), [0.25, 0.75, 0.5]);
    }

    #[test]
    fn flat_cloud_does_not_divide_by_zero() {
        let r = HeightRange { min: 3.0, max: 3.0 };
        assert_eq!(r.color_for(3.0), [0.0, 1.0, 0.5]);
    }

    #[test]
    fn out_of_range_heights_are_clamped() {
        let r = HeightRange { min: 0.0, max: 1.0 };
        assert_eq!(r.color_for(-10.0), [0.0, 1.0, 0.5]);
        assert_eq!(r.color_for(10.0), [1.0, 0.0, 0.5]);
    }
}
