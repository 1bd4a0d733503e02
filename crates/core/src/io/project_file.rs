//! JSON project files.
//!
//! A project file is the serde form of [`Project`]: layers with their
//! features (geometries in `geo-types` JSON form), selection, CRS,
//! provider capabilities and renderer. Open edit sessions are never written.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::project::Project;

/// Read a project file and check its integrity
pub fn read_project<P: AsRef<Path>>(path: P) -> Result<Project> {
    let file = File::open(path.as_ref())?;
    let project: Project = serde_json::from_reader(BufReader::new(file))?;
    project.check_integrity()?;
    Ok(project)
}

/// Parse a project from an in-memory JSON string
pub fn project_from_str(json: &str) -> Result<Project> {
    let project: Project = serde_json::from_str(json)?;
    project.check_integrity()?;
    Ok(project)
}

/// Write a project file (pretty-printed)
pub fn write_project<P: AsRef<Path>>(project: &Project, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, project)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Serialize a project to a JSON string
pub fn project_to_string(project: &Project) -> Result<String> {
    Ok(serde_json::to_string_pretty(project)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::layer::Layer;
    use crate::vector::{Feature, FeatureId, Field, FieldKind, GeometryKind, Schema};
    use geo_types::polygon;
    use tempfile::NamedTempFile;

    fn sample() -> Project {
        let mut layer = Layer::vector("parcels", GeometryKind::Polygon, Crs::from_epsg(32719))
            .with_schema(Schema::new(vec![Field::new("owner", FieldKind::String)]));
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ];
        layer
            .insert_features(vec![
                Feature::new(7, square.into()).with_property("owner", "city"),
                Feature::empty(8),
            ])
            .unwrap();
        layer.select([FeatureId(7)]).unwrap();
        let mut project = Project::new();
        project.add_layer(layer).unwrap();
        project.set_active("parcels").unwrap();
        project
    }

    #[test]
    fn file_roundtrip_keeps_features_and_selection() {
        let tmp = NamedTempFile::new().unwrap();
        write_project(&sample(), tmp.path()).unwrap();
        let back = read_project(tmp.path()).unwrap();

        let layer = back.active_layer().unwrap();
        assert_eq!(layer.name(), "parcels");
        assert_eq!(layer.crs().epsg(), Some(32719));
        assert_eq!(layer.feature_count(), 2);
        assert_eq!(layer.selected_count(), 1);
        assert!(layer.feature(FeatureId(8)).unwrap().has_empty_geometry());
    }

    #[test]
    fn duplicate_ids_in_file_are_rejected() {
        let json = r#"{
            "layers": [{
                "name": "pts",
                "kind": {"vector": "point"},
                "features": [
                    {"id": 1, "geometry": {"Point": {"x": 0.0, "y": 0.0}}},
                    {"id": 1, "geometry": {"Point": {"x": 1.0, "y": 1.0}}}
                ]
            }]
        }"#;
        assert!(project_from_str(json).is_err());
    }

    #[test]
    fn unknown_active_layer_is_rejected() {
        let json = r#"{"layers": [], "active": "ghost"}"#;
        assert!(project_from_str(json).is_err());
    }
}
