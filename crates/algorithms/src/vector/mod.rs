//! Vector analysis algorithms
//!
//! Geometric operations on vector features:
//! - Buffer: expand geometries by a distance (and zero-distance re-noding)
//! - Validity: classify geometries as valid, empty or invalid
//! - Repair: ordered repair strategies and the transactional layer pass
//! - Rings: concentric ring buffers at increasing distances

mod buffer;
mod repair;
mod rings;
mod validity;

pub use buffer::{buffer_geometry, buffer_point, BufferParams};
pub use repair::{
    repair_layer, GeometryRepair, MakeValid, RepairChain, RepairOutcome, RepairParams,
    RepairStrategy, RepairSummary, ZeroBuffer,
};
pub use rings::{
    ring_buffers, rings_for_geometry, RingBuffer, RingDescriptor, RingParams,
    RING_QUADRANT_SEGMENTS,
};
pub use validity::{classify, has_finite_coords, is_valid, GeometryStatus};
