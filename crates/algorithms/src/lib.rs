//! # LayerKit Algorithms
//!
//! Vector algorithms and host actions for LayerKit.
//!
//! ## Modules
//!
//! - **vector**: buffer, validity classification, geometry repair, ring buffers
//! - **actions**: host-facing handlers (repair geometries, buffer rings, zoom to layer)

pub mod actions;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actions::{find_action, registry, Action, ActionResult, Status};
    pub use crate::vector::{
        buffer_geometry, classify, repair_layer, ring_buffers, BufferParams, GeometryStatus,
        RepairChain, RepairParams, RepairSummary, RingParams,
    };
    pub use layerkit_core::prelude::*;
}
