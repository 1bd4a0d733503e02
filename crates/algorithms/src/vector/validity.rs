//! Geometry classification: valid, empty or invalid

use geo::{CoordsIter, Geometry, HasDimensions, Validation};

/// Result of inspecting one geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryStatus {
    Valid,
    /// No geometry, or a geometry without coordinates
    Empty,
    Invalid,
}

/// Every coordinate is a finite number
pub fn has_finite_coords(geom: &Geometry<f64>) -> bool {
    geom.coords_iter().all(|c| c.x.is_finite() && c.y.is_finite())
}

/// OGC validity as checked by `geo`, plus finite coordinates
pub fn is_valid(geom: &Geometry<f64>) -> bool {
    has_finite_coords(geom) && geom.is_valid()
}

/// Classify a geometry. Emptiness is tested first, so an empty geometry
/// is never reported as invalid.
pub fn classify(geom: Option<&Geometry<f64>>) -> GeometryStatus {
    match geom {
        None => GeometryStatus::Empty,
        Some(g) if g.is_empty() => GeometryStatus::Empty,
        Some(g) if is_valid(g) => GeometryStatus::Valid,
        Some(_) => GeometryStatus::Invalid,
    }
}
