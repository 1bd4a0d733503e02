//! # LayerKit Colormap
//!
//! Color ramps and graduated renderers for LayerKit layers.
//!
//! A [`ColorRamp`] is sampled with multi-stop linear interpolation; a
//! [`GraduatedBuilder`] turns a sequence of numeric classes into a
//! [`Renderer`](layerkit_core::Renderer) with one ramp color per class.
//!
//! ## Usage
//!
//! ```ignore
//! use layerkit_colormap::{ColorRamp, GraduatedBuilder};
//!
//! let renderer = GraduatedBuilder::new("ring_index", ColorRamp::Blues)
//!     .alpha(150)
//!     .integer_classes(1, 3, |i| format!("Ring {i}"));
//! ```

mod graduated;
mod scheme;

pub use graduated::GraduatedBuilder;
pub use scheme::{evaluate, ColorRamp, ColorStop, Rgb};
