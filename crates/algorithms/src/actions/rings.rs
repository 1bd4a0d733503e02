//! Concentric ring buffers around the active layer's features

use geo::{Geometry, MultiPolygon};
use layerkit_colormap::{ColorRamp, GraduatedBuilder};
use layerkit_core::{
    AttributeValue, Crs, Error, Feature, Field, FieldKind, GeometryKind, HostInterface,
    Layer, Renderer, Result, Schema,
};

use super::{parse_params, Action, ActionResult};
use crate::vector::{ring_buffers, RingDescriptor, RingParams};

/// Name of the layer that receives the rings of `source`
pub fn output_layer_name(source: &str) -> String {
    format!("Buffers_{}", source)
}

/// Graduated style on `ring_index`: ring 1 darkest, one class per ring
pub fn ring_renderer(ring_count: u32) -> Renderer {
    GraduatedBuilder::new("ring_index", ColorRamp::Blues)
        .alpha(150)
        .dark_first(true)
        .integer_classes(1, ring_count as i64, |i| format!("Ring {}", i))
}

/// Build the fully populated and styled output layer.
///
/// Features are numbered from 1 in ring order.
pub fn ring_layer(
    name: String,
    crs: Crs,
    rings: Vec<RingDescriptor>,
    ring_count: u32,
) -> Result<Layer> {
    let schema = Schema::new(vec![
        Field::new("source_id", FieldKind::Int),
        Field::new("distance", FieldKind::Float),
        Field::new("ring_index", FieldKind::Int),
    ]);
    let features = rings
        .into_iter()
        .zip(1_i64..)
        .map(|(ring, id)| {
            Feature::new(id, Geometry::MultiPolygon(ring.geometry))
                .with_property("source_id", ring.source_id.0)
                .with_property("distance", ring.distance)
                .with_property("ring_index", AttributeValue::Int(ring.ring_index as i64))
        })
        .collect();

    let mut layer = Layer::vector(name, GeometryKind::Polygon, crs).with_schema(schema);
    layer.insert_features(features)?;
    layer.set_renderer(ring_renderer(ring_count));
    Ok(layer)
}

/// `buffer-rings` action
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferRings;

impl BufferRings {
    fn build(&self, host: &mut dyn HostInterface, params: &RingParams) -> Result<String> {
        params.validate()?;
        let layer = host
            .active_layer()
            .ok_or_else(|| Error::Input("select a vector layer".into()))?;
        if layer.geometry_kind().is_none() {
            return Err(Error::Input(format!("layer '{}' is not a vector layer", layer.name())));
        }

        let (features, selection) = if layer.selected_count() > 0 {
            let selected = layer.selected_features();
            let desc = format!("{} selected features", selected.len());
            (selected, desc)
        } else {
            let desc = format!("all {} features", layer.feature_count());
            (layer.features().collect::<Vec<_>>(), desc)
        };
        if features.is_empty() {
            return Err(Error::Input(format!("layer '{}' has no features", layer.name())));
        }

        // a feature without geometry gets empty rings
        let none = Geometry::MultiPolygon(MultiPolygon::new(vec![]));
        let inputs = features
            .iter()
            .map(|f| (f.id, f.geometry.as_ref().unwrap_or(&none)));

        let rings = ring_buffers(inputs, params)?;
        let name = output_layer_name(layer.name());
        let output = ring_layer(name, layer.crs().clone(), rings, params.ring_count)?;

        host.project_mut().add_layer(output)?;
        host.refresh_canvas();

        Ok(format!(
            "Created {} buffer rings for {}\nDistances: {} to {}",
            params.ring_count,
            selection,
            params.initial_distance,
            params.max_distance()
        ))
    }
}

impl Action for BufferRings {
    fn id(&self) -> &'static str {
        "buffer-rings"
    }

    fn description(&self) -> &'static str {
        "Create concentric ring buffers at increasing distances around the selected features"
    }

    fn run(
        &self,
        host: &mut dyn HostInterface,
        params: Option<&serde_json::Value>,
    ) -> ActionResult {
        let params: RingParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return ActionResult::from_error(&e, "Error creating buffers"),
        };
        match self.build(host, &params) {
            Ok(message) => ActionResult::ok(message),
            Err(e) => ActionResult::from_error(&e, "Error creating buffers"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_prefix() {
        assert_eq!(output_layer_name("wells"), "Buffers_wells");
    }

    #[test]
    fn renderer_has_one_class_per_ring() {
        let Renderer::Graduated { field, ranges } = ring_renderer(4);
        assert_eq!(field, "ring_index");
        assert_eq!(ranges.len(), 4);
        assert_eq!(ranges[3].label, "Ring 4");
        assert!(ranges.iter().all(|r| r.color.a == 150));
    }
}
