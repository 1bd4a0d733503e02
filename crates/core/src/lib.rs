//! # LayerKit Core
//!
//! Core types, traits and I/O for the LayerKit vector toolkit.
//!
//! This crate provides:
//! - `Feature`, `Schema`, `AttributeValue`: vector records and their attributes
//! - `Layer`: a feature collection with transactional edit sessions
//! - `Project` and `HostInterface`: the context every action runs in
//! - `Crs`, `Extent`, `Renderer`: layer metadata
//! - JSON project file I/O

pub mod crs;
pub mod error;
pub mod extent;
pub mod host;
pub mod io;
pub mod layer;
pub mod project;
pub mod style;
pub mod vector;

pub use crs::Crs;
pub use error::{Error, Result};
pub use extent::Extent;
pub use host::{HostInterface, MemoryHost};
pub use layer::{Capabilities, CommitStats, Layer, LayerKind};
pub use project::Project;
pub use style::{ClassRange, Renderer, Rgba};
pub use vector::{AttributeValue, Feature, FeatureId, Field, FieldKind, GeometryKind, Schema};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::extent::Extent;
    pub use crate::host::{HostInterface, MemoryHost};
    pub use crate::layer::{Capabilities, Layer, LayerKind};
    pub use crate::project::Project;
    pub use crate::vector::{AttributeValue, Feature, FeatureId, GeometryKind};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in LayerKit.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(
        &self,
        input: Self::Input,
    ) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
