//! End-to-end tests of the ring buffer actions

use approx::assert_relative_eq;
use geo::{Area, BooleanOps, Geometry, MultiPolygon, Point};
use layerkit_algorithms::actions::{
    find_action, output_layer_name, Action, BufferRings, Status, ZoomToLayer,
};
use layerkit_algorithms::vector::{ring_buffers, RingParams};
use layerkit_core::{
    AttributeValue, Crs, Feature, FeatureId, GeometryKind, HostInterface, Layer, MemoryHost,
    Project, Renderer,
};
use serde_json::json;

fn wells() -> Layer {
    let mut layer = Layer::vector("wells", GeometryKind::Point, Crs::from_epsg(32719));
    layer
        .insert_features(vec![
            Feature::new(1, Point::new(0.0, 0.0).into()),
            Feature::new(2, Point::new(5000.0, 0.0).into()),
        ])
        .unwrap();
    layer
}

fn host_with(layer: Layer) -> MemoryHost {
    let mut project = Project::new();
    let name = layer.name().to_string();
    project.add_layer(layer).unwrap();
    project.set_active(&name).unwrap();
    MemoryHost::new(project)
}

fn as_multipolygon(geom: &Geometry<f64>) -> MultiPolygon<f64> {
    match geom {
        Geometry::MultiPolygon(mp) => mp.clone(),
        other => panic!("expected multipolygon, got {:?}", other),
    }
}

#[test]
fn rings_partition_the_outer_buffer() {
    let origin: Geometry<f64> = Point::new(0.0, 0.0).into();
    let rings = ring_buffers(vec![(FeatureId(7), &origin)], &RingParams::default()).unwrap();
    assert_eq!(rings.len(), 3);

    for pair in rings.windows(2) {
        let overlap = pair[0].geometry.intersection(&pair[1].geometry);
        assert!(
            overlap.unsigned_area() < 1e-6,
            "rings {} and {} overlap",
            pair[0].ring_index,
            pair[1].ring_index
        );
    }
    let total: f64 = rings.iter().map(|r| r.geometry.unsigned_area()).sum();
    let outer = std::f64::consts::PI * 300.0 * 300.0;
    assert_relative_eq!(total, outer, max_relative = 0.01);
}

#[test]
fn action_adds_styled_layer_for_selection() {
    let mut layer = wells();
    layer.select([FeatureId(2)]).unwrap();
    let mut host = host_with(layer);

    let params = json!({ "initial_distance": 100.0, "increment": 100.0, "ring_count": 3 });
    let result = BufferRings.run(&mut host, Some(&params));

    assert_eq!(result.status, Status::Ok, "{}", result.message);
    assert_eq!(
        result.message,
        "Created 3 buffer rings for 1 selected features\nDistances: 100 to 300"
    );
    assert_eq!(host.refresh_count(), 1);

    let out = host.project().layer(&output_layer_name("wells")).unwrap();
    assert_eq!(out.geometry_kind(), Some(GeometryKind::Polygon));
    assert_eq!(out.crs(), &Crs::from_epsg(32719));
    assert_eq!(out.feature_count(), 3);

    let renderer = out.renderer().unwrap();
    assert!(matches!(renderer, Renderer::Graduated { field, .. } if field == "ring_index"));
    for (i, feature) in out.features().enumerate() {
        let ring = i as i64 + 1;
        assert_eq!(feature.id, FeatureId(ring));
        assert_eq!(feature.get_property("source_id"), Some(&AttributeValue::Int(2)));
        assert_eq!(feature.get_property("ring_index"), Some(&AttributeValue::Int(ring)));
        assert_eq!(
            feature.get_property("distance"),
            Some(&AttributeValue::Float(100.0 * ring as f64))
        );
        assert_eq!(renderer.class_for(feature).unwrap().label, format!("Ring {}", ring));
    }

    // first ring is centred on the selected well, not the origin
    let first = as_multipolygon(out.feature(FeatureId(1)).unwrap().geometry.as_ref().unwrap());
    assert!(first.unsigned_area() > 0.0);
    let ext = out.extent().unwrap();
    assert!(ext.min_x > 4000.0);
}

#[test]
fn no_selection_uses_every_feature() {
    let mut host = host_with(wells());
    let result = BufferRings.run(&mut host, Some(&json!({ "ring_count": 2 })));

    assert_eq!(result.status, Status::Ok, "{}", result.message);
    assert!(result.message.contains("for all 2 features"));
    let out = host.project().layer("Buffers_wells").unwrap();
    assert_eq!(out.feature_count(), 4);
}

#[test]
fn second_run_fails_on_name_clash() {
    let mut host = host_with(wells());
    assert!(BufferRings.run(&mut host, None).is_ok());
    let result = BufferRings.run(&mut host, None);
    assert_eq!(result.status, Status::Error);
    assert_eq!(host.project().layer_count(), 2);
}

#[test]
fn invalid_parameters_add_nothing() {
    let mut host = host_with(wells());
    for params in [
        json!({ "ring_count": 0 }),
        json!({ "initial_distance": -5.0 }),
        json!({ "increment": -1.0 }),
        json!({ "rings": 3 }),
    ] {
        let result = BufferRings.run(&mut host, Some(&params));
        assert_eq!(result.status, Status::Error, "{}", params);
    }
    assert_eq!(host.project().layer_count(), 1);
    assert_eq!(host.refresh_count(), 0);
}

#[test]
fn empty_or_missing_input_is_an_error() {
    let mut host = MemoryHost::default();
    assert_eq!(BufferRings.run(&mut host, None).status, Status::Error);

    let empty = Layer::vector("empty", GeometryKind::Point, Crs::wgs84());
    let mut host = host_with(empty);
    let result = BufferRings.run(&mut host, None);
    assert_eq!(result.status, Status::Error);
    assert!(result.message.contains("has no features"));
}

#[test]
fn feature_without_geometry_gets_empty_rings() {
    let mut layer = wells();
    layer.insert_features(vec![Feature::empty(3)]).unwrap();
    let mut host = host_with(layer);

    let result = BufferRings.run(&mut host, None);
    assert_eq!(result.status, Status::Ok, "{}", result.message);

    let out = host.project().layer("Buffers_wells").unwrap();
    assert_eq!(out.feature_count(), 9);
    let empty: Vec<_> = out
        .features()
        .filter(|f| f.get_property("source_id") == Some(&AttributeValue::Int(3)))
        .collect();
    assert_eq!(empty.len(), 3);
    for f in empty {
        let rings = as_multipolygon(f.geometry.as_ref().unwrap());
        assert!(rings.0.is_empty());
    }
}

#[test]
fn zoom_after_buffering() {
    let mut host = host_with(wells());
    let rings = find_action("buffer-rings").unwrap();
    assert!(rings.run(&mut host, None).is_ok());

    host.project_mut().set_active("Buffers_wells").unwrap();
    let result = ZoomToLayer.run(&mut host, None);
    assert!(result.is_ok());

    let extent = host.canvas_extent().unwrap();
    assert_relative_eq!(extent.min_x, -300.0, epsilon = 1e-3);
    assert_relative_eq!(extent.max_x, 5300.0, epsilon = 1e-3);
}
