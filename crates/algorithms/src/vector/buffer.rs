//! Buffer operations
//!
//! A buffer is the Minkowski sum of a geometry with a disk. Disks are
//! approximated by regular polygons; every segment of a line or ring becomes
//! a capsule (the convex hull of the two end disks), and the pieces are
//! merged with a boolean union. Polygons contribute their own area as well.
//!
//! A zero-distance buffer keeps only the polygonal parts and re-nodes them
//! through the union, which resolves self-intersections.

use geo::{BooleanOps, ConvexHull, CoordsIter};
use geo::{Coord, Geometry, LineString, MultiPoint, MultiPolygon, Point, Polygon};
use layerkit_core::{Error, Result};
use std::f64::consts::PI;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Parameters for buffer operations
#[derive(Debug, Clone)]
pub struct BufferParams {
    /// Buffer distance, must be finite and non-negative
    pub distance: f64,
    /// Segments used to approximate a quarter circle (default: 8)
    pub quadrant_segments: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            distance: 1.0,
            quadrant_segments: 8,
        }
    }
}

impl BufferParams {
    pub fn new(distance: f64, quadrant_segments: usize) -> Self {
        Self {
            distance,
            quadrant_segments,
        }
    }
}

/// Run a boolean-ops closure, turning a panic inside the overlay engine
/// into a geometry error.
pub(crate) fn guarded<T>(what: &str, op: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(op))
        .map_err(|_| Error::Geometry(format!("{} failed inside the overlay engine", what)))
}

fn circle(center: Coord<f64>, radius: f64, quadrant_segments: usize) -> Polygon<f64> {
    let n = 4 * quadrant_segments.max(1);
    let mut coords = Vec::with_capacity(n + 1);
    for i in 0..n {
        let angle = 2.0 * PI * i as f64 / n as f64;
        coords.push((center.x + radius * angle.cos(), center.y + radius * angle.sin()));
    }
    // Close the ring
    coords.push(coords[0]);

    Polygon::new(LineString::from(coords), vec![])
}

fn capsule(a: Coord<f64>, b: Coord<f64>, radius: f64, quadrant_segments: usize) -> Polygon<f64> {
    if a == b {
        return circle(a, radius, quadrant_segments);
    }
    let ends = circle(a, radius, quadrant_segments)
        .exterior()
        .coords()
        .chain(circle(b, radius, quadrant_segments).exterior().coords())
        .map(|c| Point::from(*c))
        .collect::<Vec<_>>();
    MultiPoint::new(ends).convex_hull()
}

/// Create a circular buffer around a point.
///
/// Generates a regular polygon with `4 * quadrant_segments` sides inscribed
/// in the circle of radius `|distance|`.
pub fn buffer_point(point: &Point<f64>, params: &BufferParams) -> Polygon<f64> {
    circle(point.0, params.distance.abs(), params.quadrant_segments)
}

fn line_pieces(ls: &LineString<f64>, r: f64, qs: usize, out: &mut Vec<MultiPolygon<f64>>) {
    match ls.0.len() {
        0 => {}
        1 => out.push(circle(ls.0[0], r, qs).into()),
        _ => out.extend(ls.lines().map(|l| capsule(l.start, l.end, r, qs).into())),
    }
}

fn normalize(poly: &Polygon<f64>) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![poly.clone()]).union(&MultiPolygon::<f64>::new(vec![]))
}

fn polygon_pieces(poly: &Polygon<f64>, r: f64, qs: usize, out: &mut Vec<MultiPolygon<f64>>) {
    out.push(normalize(poly));
    if r > 0.0 {
        line_pieces(poly.exterior(), r, qs, out);
        for ring in poly.interiors() {
            line_pieces(ring, r, qs, out);
        }
    }
}

fn collect_pieces(geom: &Geometry<f64>, r: f64, qs: usize, out: &mut Vec<MultiPolygon<f64>>) {
    let areal_only = r == 0.0;
    match geom {
        Geometry::Point(p) if !areal_only => out.push(circle(p.0, r, qs).into()),
        Geometry::MultiPoint(mp) if !areal_only => {
            out.extend(mp.iter().map(|p| MultiPolygon::from(circle(p.0, r, qs))))
        }
        Geometry::Line(l) if !areal_only => out.push(capsule(l.start, l.end, r, qs).into()),
        Geometry::LineString(ls) if !areal_only => line_pieces(ls, r, qs, out),
        Geometry::MultiLineString(mls) if !areal_only => {
            for ls in mls {
                line_pieces(ls, r, qs, out);
            }
        }
        Geometry::Polygon(p) => polygon_pieces(p, r, qs, out),
        Geometry::MultiPolygon(mp) => {
            for p in mp {
                polygon_pieces(p, r, qs, out);
            }
        }
        Geometry::Rect(rect) => polygon_pieces(&rect.to_polygon(), r, qs, out),
        Geometry::Triangle(t) => polygon_pieces(&t.to_polygon(), r, qs, out),
        Geometry::GeometryCollection(gc) => {
            for g in gc {
                collect_pieces(g, r, qs, out);
            }
        }
        _ => {}
    }
}

/// Merge pieces with a balanced tree of pairwise unions
fn union_all(mut level: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len() / 2 + 1);
        let mut it = level.into_iter();
        while let Some(a) = it.next() {
            match it.next() {
                Some(b) => next.push(a.union(&b)),
                None => next.push(a),
            }
        }
        level = next;
    }
    level.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

/// Buffer any geometry by `params.distance`.
///
/// Points and lines produce no area at distance 0, so their zero-distance
/// buffer is empty. Negative distances are rejected.
///
/// # Errors
/// - `InvalidParameter` for a negative or non-finite distance
/// - `Geometry` for non-finite coordinates or an overlay engine failure
pub fn buffer_geometry(geom: &Geometry<f64>, params: &BufferParams) -> Result<MultiPolygon<f64>> {
    if !params.distance.is_finite() || params.distance < 0.0 {
        return Err(Error::InvalidParameter {
            name: "distance",
            value: params.distance.to_string(),
            reason: "must be finite and >= 0".into(),
        });
    }
    if !geom.coords_iter().all(|c| c.x.is_finite() && c.y.is_finite()) {
        return Err(Error::Geometry("geometry has non-finite coordinates".into()));
    }

    guarded("buffer", || {
        let mut pieces = Vec::new();
        collect_pieces(geom, params.distance, params.quadrant_segments, &mut pieces);
        union_all(pieces)
    })
}
