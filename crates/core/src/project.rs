//! Project: the ordered set of layers a host works on

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::layer::Layer;

/// Ordered layers with unique names and an optional active layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    layers: Vec<Layer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active: Option<String>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name() == name)
    }

    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name() == name)
    }

    /// Register a layer. Names must be unique.
    pub fn add_layer(&mut self, layer: Layer) -> Result<()> {
        if self.layer(layer.name()).is_some() {
            return Err(Error::DuplicateLayer(layer.name().to_string()));
        }
        info!(layer = %layer.name(), features = layer.feature_count(), "layer added to project");
        self.layers.push(layer);
        Ok(())
    }

    /// Remove a layer by name, clearing the active layer if it was this one
    pub fn remove_layer(&mut self, name: &str) -> Result<Layer> {
        let idx = self
            .layers
            .iter()
            .position(|l| l.name() == name)
            .ok_or_else(|| Error::LayerNotFound(name.to_string()))?;
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        Ok(self.layers.remove(idx))
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        if self.layer(name).is_none() {
            return Err(Error::LayerNotFound(name.to_string()));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.active.as_deref().and_then(|n| self.layer(n))
    }

    pub fn active_layer_mut(&mut self) -> Option<&mut Layer> {
        let name = self.active.clone()?;
        self.layer_mut(&name)
    }

    /// Check layer name uniqueness, the active reference, and every layer's data
    pub fn check_integrity(&self) -> Result<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            if self.layers[..i].iter().any(|l| l.name() == layer.name()) {
                return Err(Error::DuplicateLayer(layer.name().to_string()));
            }
            layer.check_integrity()?;
        }
        if let Some(active) = &self.active {
            if self.layer(active).is_none() {
                return Err(Error::LayerNotFound(active.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::vector::GeometryKind;

    #[test]
    fn duplicate_layer_names_rejected() {
        let mut p = Project::new();
        p.add_layer(Layer::vector("roads", GeometryKind::Line, Crs::wgs84()))
            .unwrap();
        let err = p.add_layer(Layer::vector("roads", GeometryKind::Point, Crs::wgs84()));
        assert!(matches!(err, Err(Error::DuplicateLayer(_))));
        assert_eq!(p.layer_count(), 1);
    }

    #[test]
    fn active_layer_tracks_removal() {
        let mut p = Project::new();
        p.add_layer(Layer::vector("a", GeometryKind::Point, Crs::wgs84()))
            .unwrap();
        assert!(p.active_layer().is_none());
        p.set_active("a").unwrap();
        assert_eq!(p.active_layer().map(|l| l.name()), Some("a"));
        p.remove_layer("a").unwrap();
        assert!(p.active_layer().is_none());
        assert!(p.set_active("missing").is_err());
    }
}
