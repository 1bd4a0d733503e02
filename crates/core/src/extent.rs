//! Axis-aligned extents

use geo::BoundingRect;
use geo_types::{Geometry, Rect};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Extent of a geometry; `None` when it has no coordinates
    pub fn of(geom: &Geometry<f64>) -> Option<Self> {
        geom.bounding_rect().map(Self::from)
    }

    /// Degenerate or non-finite extents cannot be zoomed to.
    ///
    /// A single point has zero width and height but is still a usable
    /// extent, so only inverted or non-finite bounds count as empty.
    pub fn is_empty(&self) -> bool {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        !finite || self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Smallest extent covering both
    pub fn union(&self, other: &Extent) -> Extent {
        Extent {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

impl From<Rect<f64>> for Extent {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min_x: rect.min().x,
            min_y: rect.min().y,
            max_x: rect.max().x,
            max_y: rect.max().y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo_types::{line_string, point};

    #[test]
    fn extent_of_linestring() {
        let ls: Geometry<f64> = line_string![(x: 1.0, y: 5.0), (x: 4.0, y: -2.0)].into();
        let e = Extent::of(&ls).unwrap();
        assert_eq!(e, Extent::new(1.0, -2.0, 4.0, 5.0));
    }

    #[test]
    fn extent_keeps_computed_coordinates() {
        let ls: Geometry<f64> = line_string![
            (x: 0.1, y: 0.2),
            (x: 0.1 + 0.2, y: 0.7 * 3.0),
        ]
        .into();
        let e = Extent::of(&ls).unwrap();
        assert_relative_eq!(e.min_x, 0.1);
        assert_relative_eq!(e.max_x, 0.3, epsilon = 1e-12);
        assert_relative_eq!(e.max_y, 2.1, epsilon = 1e-12);
    }

    #[test]
    fn point_extent_is_not_empty() {
        let p: Geometry<f64> = point!(x: 3.0, y: 3.0).into();
        let e = Extent::of(&p).unwrap();
        assert_eq!(e.min_x, e.max_x);
        assert!(!e.is_empty());
    }

    #[test]
    fn union_covers_both() {
        let a = Extent::new(0.0, 0.0, 1.0, 1.0);
        let b = Extent::new(2.0, 2.0, 3.0, 4.0);
        let u = a.union(&b);
        assert_eq!(u, Extent::new(0.0, 0.0, 3.0, 4.0));
        assert_eq!(b.union(&a), u);
    }

    #[test]
    fn nan_extent_is_empty() {
        assert!(Extent::new(f64::NAN, 0.0, 1.0, 1.0).is_empty());
        assert!(Extent::new(2.0, 0.0, 1.0, 1.0).is_empty());
    }
}
