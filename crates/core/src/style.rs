//! Layer style descriptions.
//!
//! LayerKit does not draw anything; a renderer here is the data a host needs
//! to symbolize a layer (which field drives it and which color each class gets).

use serde::{Deserialize, Serialize};

use crate::vector::{AttributeValue, Feature};

/// RGBA color, 0..=255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// One class of a graduated renderer, covering `[lower, upper)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRange {
    pub lower: f64,
    pub upper: f64,
    pub color: Rgba,
    pub label: String,
}

impl ClassRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value < self.upper
    }
}

/// How a host should symbolize a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Renderer {
    /// Numeric classes keyed on one field
    Graduated {
        field: String,
        ranges: Vec<ClassRange>,
    },
}

impl Renderer {
    /// Class a feature falls into, if any
    pub fn class_for<'a>(&'a self, feature: &Feature) -> Option<&'a ClassRange> {
        let Self::Graduated { field, ranges } = self;
        let value = feature.get_property(field).and_then(AttributeValue::as_f64)?;
        ranges.iter().find(|r| r.contains(value))
    }
}
