//! Incremental ring buffers
//!
//! For every input geometry, builds `ring_count` concentric bands. Ring 1 is
//! the full buffer at `initial_distance`; ring `i > 1` is the buffer at
//! `initial_distance + increment * (i - 1)` minus the buffer of ring `i - 1`.

use geo::{BooleanOps, Geometry, MultiPolygon};
use layerkit_core::{Algorithm, Error, FeatureId, Result};
use serde::Deserialize;
use tracing::debug;

use super::buffer::{buffer_geometry, guarded, BufferParams};

/// Quarter-circle segments used for every ring buffer
pub const RING_QUADRANT_SEGMENTS: usize = 10;

/// Parameters for ring buffers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingParams {
    /// Distance of the first ring (> 0)
    pub initial_distance: f64,
    /// Distance added per ring (>= 0)
    pub increment: f64,
    /// Number of rings per geometry (>= 1)
    pub ring_count: u32,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            initial_distance: 100.0,
            increment: 100.0,
            ring_count: 3,
        }
    }
}

impl RingParams {
    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !self.initial_distance.is_finite() || self.initial_distance <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "initial_distance",
                value: self.initial_distance.to_string(),
                reason: "must be finite and > 0".into(),
            });
        }
        if !self.increment.is_finite() || self.increment < 0.0 {
            return Err(Error::InvalidParameter {
                name: "increment",
                value: self.increment.to_string(),
                reason: "must be finite and >= 0".into(),
            });
        }
        if self.ring_count < 1 {
            return Err(Error::InvalidParameter {
                name: "ring_count",
                value: self.ring_count.to_string(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Distance of ring `index` (1-based)
    pub fn distance(&self, index: u32) -> f64 {
        self.initial_distance + self.increment * (index.saturating_sub(1)) as f64
    }

    /// Distance of the outermost ring
    pub fn max_distance(&self) -> f64 {
        self.distance(self.ring_count)
    }
}

/// One band around one source geometry
#[derive(Debug, Clone, PartialEq)]
pub struct RingDescriptor {
    pub source_id: FeatureId,
    pub distance: f64,
    /// 1-based, innermost first
    pub ring_index: u32,
    pub geometry: MultiPolygon<f64>,
}

/// Build the rings of one geometry, innermost first.
///
/// Each buffer is computed once and reused as the inner boundary of the
/// next ring.
pub fn rings_for_geometry(
    source_id: FeatureId,
    geom: &Geometry<f64>,
    params: &RingParams,
) -> Result<Vec<RingDescriptor>> {
    params.validate()?;
    let mut rings = Vec::new();
    let mut inner: Option<MultiPolygon<f64>> = None;

    for index in 1..=params.ring_count {
        let distance = params.distance(index);
        let outer = buffer_geometry(geom, &BufferParams::new(distance, RING_QUADRANT_SEGMENTS))?;
        let band = match &inner {
            None => outer.clone(),
            Some(prev) => guarded("ring difference", || outer.difference(prev))?,
        };
        debug!(source = %source_id, ring = index, distance, parts = band.0.len(), "ring built");
        rings.push(RingDescriptor {
            source_id,
            distance,
            ring_index: index,
            geometry: band,
        });
        inner = Some(outer);
    }
    Ok(rings)
}

/// Build rings for every `(id, geometry)` pair, in input order.
///
/// Any failure aborts the whole batch; no partial output is returned.
pub fn ring_buffers<'a, I>(inputs: I, params: &RingParams) -> Result<Vec<RingDescriptor>>
where
    I: IntoIterator<Item = (FeatureId, &'a Geometry<f64>)>,
{
    params.validate()?;
    let mut out = Vec::new();
    for (id, geom) in inputs {
        out.extend(rings_for_geometry(id, geom, params)?);
    }
    Ok(out)
}

/// Ring buffer algorithm
#[derive(Debug, Clone, Default)]
pub struct RingBuffer;

impl Algorithm for RingBuffer {
    type Input = Vec<(FeatureId, Geometry<f64>)>;
    type Output = Vec<RingDescriptor>;
    type Params = RingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "RingBuffer"
    }

    fn description(&self) -> &'static str {
        "Build concentric ring buffers at increasing distances around each geometry"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        ring_buffers(input.iter().map(|(id, g)| (*id, g)), &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Area, Point};

    fn point_geom() -> Geometry<f64> {
        Point::new(0.0, 0.0).into()
    }

    #[test]
    fn distances_follow_the_increment() {
        let params = RingParams {
            initial_distance: 50.0,
            increment: 25.0,
            ring_count: 4,
        };
        let d: Vec<f64> = (1..=4).map(|i| params.distance(i)).collect();
        assert_eq!(d, vec![50.0, 75.0, 100.0, 125.0]);
        assert_eq!(params.max_distance(), 125.0);
    }

    #[test]
    fn default_params_give_three_rings() {
        let params = RingParams::default();
        let rings = rings_for_geometry(FeatureId(1), &point_geom(), &params).unwrap();
        assert_eq!(rings.len(), 3);
        assert_eq!(
            rings.iter().map(|r| r.distance).collect::<Vec<_>>(),
            vec![100.0, 200.0, 300.0]
        );
        assert_eq!(rings.iter().map(|r| r.ring_index).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn ring_areas_are_annuli() {
        let params = RingParams::default();
        let rings = rings_for_geometry(FeatureId(1), &point_geom(), &params).unwrap();
        let disk = |d: f64| {
            buffer_geometry(&point_geom(), &BufferParams::new(d, RING_QUADRANT_SEGMENTS))
                .unwrap()
                .unsigned_area()
        };
        assert_relative_eq!(rings[0].geometry.unsigned_area(), disk(100.0), max_relative = 1e-9);
        assert_relative_eq!(
            rings[1].geometry.unsigned_area(),
            disk(200.0) - disk(100.0),
            max_relative = 1e-6
        );
        assert_relative_eq!(
            rings[2].geometry.unsigned_area(),
            disk(300.0) - disk(200.0),
            max_relative = 1e-6
        );
    }

    #[test]
    fn zero_increment_gives_empty_outer_rings() {
        let params = RingParams {
            initial_distance: 10.0,
            increment: 0.0,
            ring_count: 2,
        };
        let rings = rings_for_geometry(FeatureId(1), &point_geom(), &params).unwrap();
        assert_eq!(rings.len(), 2);
        assert!(rings[1].geometry.unsigned_area() < 1e-9);
    }

    #[test]
    fn invalid_params_rejected() {
        let bad = [
            RingParams { initial_distance: 0.0, ..Default::default() },
            RingParams { increment: -1.0, ..Default::default() },
            RingParams { ring_count: 0, ..Default::default() },
            RingParams { initial_distance: f64::INFINITY, ..Default::default() },
        ];
        for p in bad {
            assert!(matches!(p.validate(), Err(Error::InvalidParameter { .. })), "{:?}", p);
        }
    }

    #[test]
    fn failure_aborts_batch() {
        let good = point_geom();
        let bad: Geometry<f64> = Point::new(f64::NAN, 0.0).into();
        let out = ring_buffers(
            vec![(FeatureId(1), &good), (FeatureId(2), &bad)],
            &RingParams::default(),
        );
        assert!(matches!(out, Err(Error::Geometry(_))));
    }

    #[test]
    fn huge_ring_count_fails_without_allocating() {
        let params = RingParams {
            ring_count: u32::MAX,
            ..Default::default()
        };
        let bad: Geometry<f64> = Point::new(f64::NAN, 0.0).into();
        let out = rings_for_geometry(FeatureId(1), &bad, &params);
        assert!(matches!(out, Err(Error::Geometry(_))));
    }

    #[test]
    fn params_from_json_use_defaults() {
        let p: RingParams = serde_json::from_str(r#"{"ring_count": 5}"#).unwrap();
        assert_eq!(p.ring_count, 5);
        assert_eq!(p.initial_distance, 100.0);
        assert_eq!(p.increment, 100.0);
    }
}
