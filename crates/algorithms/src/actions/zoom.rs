//! Fit the map canvas to the active layer

use layerkit_core::HostInterface;
use tracing::debug;

use super::{Action, ActionResult};

/// `zoom-to-layer` action: fit the canvas to the active layer's extent
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoomToLayer;

impl Action for ZoomToLayer {
    fn id(&self) -> &'static str {
        "zoom-to-layer"
    }

    fn description(&self) -> &'static str {
        "Zoom the map canvas to the extent of the active layer"
    }

    fn run(
        &self,
        host: &mut dyn HostInterface,
        _params: Option<&serde_json::Value>,
    ) -> ActionResult {
        let Some(layer) = host.active_layer() else {
            return ActionResult::warning("No active layer selected");
        };
        let name = layer.name().to_string();
        let extent = match layer.extent() {
            Some(e) if !e.is_empty() => e,
            _ => return ActionResult::error(format!("Layer '{}' has no valid extent", name)),
        };

        debug!(layer = %name, ?extent, "zooming");
        host.set_canvas_extent(extent);
        host.refresh_canvas();
        ActionResult::ok(format!("Zoomed to layer: {}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Status;
    use layerkit_core::{Crs, Extent, Feature, GeometryKind, Layer, MemoryHost, Project};
    use geo::Point;

    fn host_with(layer: Layer) -> MemoryHost {
        let mut project = Project::new();
        let name = layer.name().to_string();
        project.add_layer(layer).unwrap();
        project.set_active(&name).unwrap();
        MemoryHost::new(project)
    }

    #[test]
    fn zooms_to_point_extent() {
        let mut layer = Layer::vector("wells", GeometryKind::Point, Crs::wgs84());
        layer
            .insert_features(vec![
                Feature::new(1, Point::new(1.0, 2.0).into()),
                Feature::new(2, Point::new(5.0, -3.0).into()),
            ])
            .unwrap();
        let mut host = host_with(layer);

        let result = ZoomToLayer.run(&mut host, None);
        assert!(result.is_ok());
        assert_eq!(result.message, "Zoomed to layer: wells");
        assert_eq!(host.canvas_extent(), Some(Extent::new(1.0, -3.0, 5.0, 2.0)));
        assert_eq!(host.refresh_count(), 1);
    }

    #[test]
    fn no_active_layer_is_a_warning() {
        let mut host = MemoryHost::default();
        let result = ZoomToLayer.run(&mut host, None);
        assert_eq!(result.status, Status::Warning);
        assert_eq!(host.canvas_extent(), None);
    }

    #[test]
    fn empty_layer_has_no_extent() {
        let layer = Layer::vector("empty", GeometryKind::Polygon, Crs::wgs84());
        let mut host = host_with(layer);
        let result = ZoomToLayer.run(&mut host, None);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.message, "Layer 'empty' has no valid extent");
        assert_eq!(host.refresh_count(), 0);
    }
}
