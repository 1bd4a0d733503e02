//! Graduated renderers: numeric classes colored along a ramp.

use crate::scheme::{evaluate, ColorRamp};
use layerkit_core::{ClassRange, Renderer};

/// Builds a [`Renderer::Graduated`] keyed on one numeric field.
#[derive(Debug, Clone)]
pub struct GraduatedBuilder {
    field: String,
    ramp: ColorRamp,
    alpha: u8,
    dark_first: bool,
}

impl GraduatedBuilder {
    pub fn new(field: impl Into<String>, ramp: ColorRamp) -> Self {
        Self {
            field: field.into(),
            ramp,
            alpha: 255,
            dark_first: false,
        }
    }

    /// Opacity applied to every class color
    pub fn alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    /// Give the first class the darkest color instead of the lightest
    pub fn dark_first(mut self, dark_first: bool) -> Self {
        self.dark_first = dark_first;
        self
    }

    /// One class per `(lower, upper, label)`, colored evenly along the ramp
    pub fn ranges(&self, classes: &[(f64, f64, String)]) -> Renderer {
        let n = classes.len();
        let ranges = classes
            .iter()
            .enumerate()
            .map(|(i, (lower, upper, label))| ClassRange {
                lower: *lower,
                upper: *upper,
                color: self.color_at(i, n),
                label: label.clone(),
            })
            .collect();
        Renderer::Graduated {
            field: self.field.clone(),
            ranges,
        }
    }

    /// One class per integer `first..=last`, each covering `[i - 0.5, i + 0.5)`
    pub fn integer_classes<F>(&self, first: i64, last: i64, label: F) -> Renderer
    where
        F: Fn(i64) -> String,
    {
        let classes: Vec<(f64, f64, String)> = (first..=last)
            .map(|i| (i as f64 - 0.5, i as f64 + 0.5, label(i)))
            .collect();
        self.ranges(&classes)
    }

    fn color_at(&self, index: usize, count: usize) -> layerkit_core::Rgba {
        let t = if count > 1 {
            index as f64 / (count - 1) as f64
        } else {
            0.0
        };
        let t = if self.dark_first { 1.0 - t } else { t };
        evaluate(self.ramp, t).with_alpha(self.alpha)
    }
}
