//! Geometry validation and repair
//!
//! A repair pass classifies every feature of a layer, tries an ordered chain
//! of [`RepairStrategy`] values on each invalid geometry, optionally deletes
//! empty features, and writes everything through one edit session so that
//! either all changes land or none do.
//!
//! The default chain is:
//! 1. [`MakeValid`]: structural cleanup (non-finite and repeated vertices,
//!    spikes, collapsed rings, holes outside their shell)
//! 2. [`ZeroBuffer`]: re-nodes polygonal geometry with a zero-distance buffer

use geo::orient::{Direction, Orient};
use geo::{Area, Contains, HasDimensions};
use geo::{Coord, Geometry, GeometryCollection, Line, LineString, MultiLineString, MultiPoint};
use geo::{MultiPolygon, Polygon};
use layerkit_core::{Algorithm, Error, FeatureId, Layer, Result};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info, warn};

use super::buffer::{buffer_geometry, BufferParams};
use super::validity::{classify, has_finite_coords, is_valid, GeometryStatus};

/// One way of turning an invalid geometry into a valid one
pub trait RepairStrategy {
    /// Short name, reported in summaries and logs
    fn name(&self) -> &'static str;

    /// Attempt a repair.
    ///
    /// `Ok(None)` means this strategy has nothing to offer for `geom`;
    /// `Err` means the geometry library itself failed.
    fn repair(&self, geom: &Geometry<f64>) -> Result<Option<Geometry<f64>>>;
}

// ─── MakeValid ──────────────────────────────────────────────────────────

/// Structural cleanup of vertices and rings
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeValid;

fn finite(c: &Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

/// Drop non-finite and consecutive repeated coordinates
fn clean_coords(coords: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(coords.len());
    for c in coords.iter().filter(|c| finite(c)) {
        if out.last() != Some(c) {
            out.push(*c);
        }
    }
    out
}

/// Clean a ring: repeated vertices and zero-width spikes go, and a ring
/// that encloses no area is dropped.
fn clean_ring(ring: &LineString<f64>) -> Option<LineString<f64>> {
    let mut pts = clean_coords(&ring.0);
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }

    // Cyclic pass: a vertex equal to its successor, or whose neighbours
    // coincide (a spike tip), is removed until nothing changes.
    loop {
        let n = pts.len();
        if n < 3 {
            return None;
        }
        let hit = (0..n).find(|&i| {
            let prev = pts[(i + n - 1) % n];
            let next = pts[(i + 1) % n];
            pts[i] == next || prev == next
        });
        match hit {
            Some(i) => {
                pts.remove(i);
            }
            None => break,
        }
    }

    pts.push(pts[0]);
    let ring = LineString::new(pts);
    if Polygon::new(ring.clone(), vec![]).unsigned_area() > 0.0 {
        Some(ring)
    } else {
        None
    }
}

fn fix_polygon(poly: &Polygon<f64>) -> Option<Polygon<f64>> {
    let exterior = clean_ring(poly.exterior())?;
    let shell = Polygon::new(exterior.clone(), vec![]);
    let holes = poly
        .interiors()
        .iter()
        .filter_map(clean_ring)
        .filter(|hole| shell.contains(hole))
        .collect();
    // shell counter-clockwise, holes clockwise
    Some(Polygon::new(exterior, holes).orient(Direction::Default))
}

fn fix_geometry(geom: &Geometry<f64>) -> Option<Geometry<f64>> {
    match geom {
        Geometry::Point(p) => finite(&p.0).then(|| Geometry::Point(*p)),
        Geometry::MultiPoint(mp) => {
            let pts: Vec<_> = mp.iter().filter(|p| finite(&p.0)).copied().collect();
            (!pts.is_empty()).then(|| MultiPoint::new(pts).into())
        }
        Geometry::Line(l) => {
            let usable = finite(&l.start) && finite(&l.end) && l.start != l.end;
            usable.then(|| Line::new(l.start, l.end).into())
        }
        Geometry::LineString(ls) => {
            let pts = clean_coords(&ls.0);
            (pts.len() >= 2).then(|| LineString::new(pts).into())
        }
        Geometry::MultiLineString(mls) => {
            let parts: Vec<_> = mls
                .iter()
                .map(|ls| clean_coords(&ls.0))
                .filter(|pts| pts.len() >= 2)
                .map(LineString::new)
                .collect();
            (!parts.is_empty()).then(|| MultiLineString::new(parts).into())
        }
        Geometry::Polygon(p) => fix_polygon(p).map(Geometry::Polygon),
        Geometry::MultiPolygon(mp) => {
            let parts: Vec<_> = mp.iter().filter_map(fix_polygon).collect();
            (!parts.is_empty()).then(|| MultiPolygon::new(parts).into())
        }
        Geometry::Rect(r) => fix_polygon(&r.to_polygon()).map(Geometry::Polygon),
        Geometry::Triangle(t) => fix_polygon(&t.to_polygon()).map(Geometry::Polygon),
        Geometry::GeometryCollection(gc) => {
            let parts: Vec<_> = gc.iter().filter_map(fix_geometry).collect();
            (!parts.is_empty()).then(|| Geometry::GeometryCollection(GeometryCollection(parts)))
        }
    }
}

impl RepairStrategy for MakeValid {
    fn name(&self) -> &'static str {
        "make_valid"
    }

    fn repair(&self, geom: &Geometry<f64>) -> Result<Option<Geometry<f64>>> {
        Ok(fix_geometry(geom))
    }
}

// ─── ZeroBuffer ─────────────────────────────────────────────────────────

/// Zero-distance buffer: rebuilds polygonal geometry through a boolean union
#[derive(Debug, Clone, Copy)]
pub struct ZeroBuffer {
    pub quadrant_segments: usize,
}

impl Default for ZeroBuffer {
    fn default() -> Self {
        Self { quadrant_segments: 5 }
    }
}

impl RepairStrategy for ZeroBuffer {
    fn name(&self) -> &'static str {
        "zero_buffer"
    }

    fn repair(&self, geom: &Geometry<f64>) -> Result<Option<Geometry<f64>>> {
        if !has_finite_coords(geom) {
            return Ok(None);
        }
        let mut mp = buffer_geometry(geom, &BufferParams::new(0.0, self.quadrant_segments))?;
        Ok(match mp.0.len() {
            0 => None,
            1 => mp.0.pop().map(Geometry::Polygon),
            _ => Some(Geometry::MultiPolygon(mp)),
        })
    }
}

// ─── Strategy chain ─────────────────────────────────────────────────────

/// Ordered list of repair strategies, tried until one yields a valid,
/// non-empty geometry
pub struct RepairChain {
    strategies: Vec<Box<dyn RepairStrategy>>,
}

impl RepairChain {
    pub fn new(strategies: Vec<Box<dyn RepairStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn push(&mut self, strategy: impl RepairStrategy + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain on one geometry.
    ///
    /// Returns the repaired geometry and the name of the strategy that
    /// produced it, or `None` if every strategy failed.
    pub fn repair(&self, geom: &Geometry<f64>) -> Result<Option<(Geometry<f64>, &'static str)>> {
        for strategy in &self.strategies {
            match strategy.repair(geom)? {
                Some(fixed) if !fixed.is_empty() && is_valid(&fixed) => {
                    return Ok(Some((fixed, strategy.name())));
                }
                Some(_) => debug!(strategy = strategy.name(), "repair result still invalid"),
                None => debug!(strategy = strategy.name(), "strategy not applicable"),
            }
        }
        Ok(None)
    }
}

impl Default for RepairChain {
    fn default() -> Self {
        Self::new(vec![Box::new(MakeValid), Box::new(ZeroBuffer::default())])
    }
}

impl fmt::Debug for RepairChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Single-geometry repair algorithm
#[derive(Debug, Clone, Default)]
pub struct GeometryRepair;

impl Algorithm for GeometryRepair {
    type Input = Geometry<f64>;
    type Output = Option<(Geometry<f64>, &'static str)>;
    type Params = RepairChain;
    type Error = Error;

    fn name(&self) -> &'static str {
        "GeometryRepair"
    }

    fn description(&self) -> &'static str {
        "Repair an invalid geometry with an ordered chain of strategies"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        if !input.is_empty() && is_valid(&input) {
            return Ok(Some((input, "unchanged")));
        }
        params.repair(&input)
    }
}

// ─── Layer pass ─────────────────────────────────────────────────────────

/// Parameters for a repair pass
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepairParams {
    /// Delete features whose geometry is empty
    pub remove_empty: bool,
}

/// Per-feature outcome of a repair pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    Valid,
    Empty,
    InvalidRepaired,
    InvalidUnrepaired,
}

/// What a repair pass found and did
#[derive(Debug, Clone, Default)]
pub struct RepairSummary {
    /// Outcome per feature, in layer order
    pub outcomes: Vec<(FeatureId, RepairOutcome)>,
    /// Strategy that fixed each repaired feature
    pub strategies: Vec<(FeatureId, &'static str)>,
    /// Empty features deleted by the commit
    pub removed: usize,
    /// Whether an edit session was committed
    pub committed: bool,
}

impl RepairSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn count(&self, outcome: RepairOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn ids(&self, outcome: RepairOutcome) -> Vec<FeatureId> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == outcome)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn valid(&self) -> usize {
        self.count(RepairOutcome::Valid)
    }

    pub fn empty(&self) -> usize {
        self.count(RepairOutcome::Empty)
    }

    /// Invalid features found, repaired or not
    pub fn invalid(&self) -> usize {
        self.repaired() + self.unrepaired()
    }

    pub fn repaired(&self) -> usize {
        self.count(RepairOutcome::InvalidRepaired)
    }

    pub fn unrepaired(&self) -> usize {
        self.count(RepairOutcome::InvalidUnrepaired)
    }

    pub fn unrepaired_ids(&self) -> Vec<FeatureId> {
        self.ids(RepairOutcome::InvalidUnrepaired)
    }

    /// No empty and no invalid geometry was found
    pub fn all_valid(&self) -> bool {
        self.valid() == self.total()
    }
}

/// Validate and repair the geometries of `layer` in one atomic edit.
///
/// No edit session is opened when every geometry is valid, or when nothing
/// needs writing (no repairs and empties kept).
///
/// # Errors
/// - `Input` if the layer is not a vector layer
/// - `Concurrency` if the layer already has an open edit session
/// - `Geometry` if a strategy fails inside the geometry library
/// - `Commit` if the edit session cannot be committed; it is rolled back
///   and the layer is left exactly as it was
pub fn repair_layer(
    layer: &mut Layer,
    params: &RepairParams,
    chain: &RepairChain,
) -> Result<RepairSummary> {
    if layer.geometry_kind().is_none() {
        return Err(Error::Input(format!("layer '{}' is not a vector layer", layer.name())));
    }
    if layer.is_editable() {
        return Err(Error::Concurrency(layer.name().to_string()));
    }

    let mut summary = RepairSummary::default();
    let mut repairs = Vec::new();
    let mut empties = Vec::new();

    for feature in layer.features() {
        let outcome = match classify(feature.geometry.as_ref()) {
            GeometryStatus::Valid => RepairOutcome::Valid,
            GeometryStatus::Empty => {
                empties.push(feature.id);
                RepairOutcome::Empty
            }
            GeometryStatus::Invalid => RepairOutcome::InvalidUnrepaired,
        };
        summary.outcomes.push((feature.id, outcome));
    }

    if summary.all_valid() {
        info!(layer = %layer.name(), features = summary.total(), "all geometries valid");
        return Ok(summary);
    }

    for (id, outcome) in summary.outcomes.iter_mut() {
        if *outcome != RepairOutcome::InvalidUnrepaired {
            continue;
        }
        let Some(geom) = layer.feature(*id).and_then(|f| f.geometry.as_ref()) else {
            continue;
        };
        match chain.repair(geom)? {
            Some((fixed, strategy)) => {
                debug!(feature = %id, strategy, "geometry repaired");
                *outcome = RepairOutcome::InvalidRepaired;
                summary.strategies.push((*id, strategy));
                repairs.push((*id, fixed));
            }
            None => debug!(feature = %id, "geometry could not be repaired"),
        }
    }

    let deletions = if params.remove_empty { empties } else { Vec::new() };
    if repairs.is_empty() && deletions.is_empty() {
        info!(
            layer = %layer.name(),
            empty = summary.empty(),
            unrepaired = summary.unrepaired(),
            "nothing to write"
        );
        return Ok(summary);
    }

    layer.start_editing()?;
    let written = apply_edits(layer, repairs, &deletions).and_then(|_| layer.commit_changes());
    match written {
        Ok(stats) => {
            summary.removed = stats.deleted;
            summary.committed = true;
            info!(
                layer = %layer.name(),
                repaired = summary.repaired(),
                unrepaired = summary.unrepaired(),
                removed = summary.removed,
                "repair pass committed"
            );
            Ok(summary)
        }
        Err(e) => {
            layer.rollback();
            warn!(layer = %layer.name(), error = %e, "repair pass rolled back");
            Err(e)
        }
    }
}

fn apply_edits(
    layer: &mut Layer,
    repairs: Vec<(FeatureId, Geometry<f64>)>,
    deletions: &[FeatureId],
) -> Result<()> {
    for (id, geom) in repairs {
        layer.change_geometry(id, geom)?;
    }
    if !deletions.is_empty() {
        layer.delete_features(deletions)?;
    }
    Ok(())
}
