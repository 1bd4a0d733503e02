//! Layers and edit sessions.
//!
//! A [`Layer`] owns its features. Reads always see the committed state.
//! Mutations go through an edit session: [`Layer::start_editing`] opens it,
//! edits are buffered, and [`Layer::commit_changes`] either applies every
//! buffered edit or none of them. A failed commit leaves the session open
//! so the caller can inspect it and [`Layer::rollback`].

use geo_types::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::extent::Extent;
use crate::style::Renderer;
use crate::vector::{Feature, FeatureId, GeometryKind, Schema};

/// What kind of data a layer holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Vector(GeometryKind),
    Raster,
}

/// Edits the layer's data provider is able to persist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub change_geometries: bool,
    pub delete_features: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            change_geometries: true,
            delete_features: true,
        }
    }
}

/// Buffered edits of an open session
#[derive(Debug, Clone, Default)]
struct EditSession {
    changed: BTreeMap<FeatureId, Geometry<f64>>,
    deleted: BTreeSet<FeatureId>,
}

impl EditSession {
    fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.deleted.is_empty()
    }
}

/// Counts of edits applied by a successful commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    pub changed: usize,
    pub deleted: usize,
}

/// A named collection of features
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    name: String,
    kind: LayerKind,
    #[serde(default)]
    crs: Crs,
    #[serde(default)]
    schema: Schema,
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    selected: BTreeSet<FeatureId>,
    #[serde(default)]
    capabilities: Capabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    renderer: Option<Renderer>,
    #[serde(skip)]
    edit: Option<EditSession>,
}

impl Layer {
    /// Create an empty vector layer
    pub fn vector(name: impl Into<String>, geometry: GeometryKind, crs: Crs) -> Self {
        Self::new(name, LayerKind::Vector(geometry), crs)
    }

    pub fn new(name: impl Into<String>, kind: LayerKind, crs: Crs) -> Self {
        Self {
            name: name.into(),
            kind,
            crs,
            schema: Schema::default(),
            features: Vec::new(),
            selected: BTreeSet::new(),
            capabilities: Capabilities::default(),
            renderer: None,
            edit: None,
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn geometry_kind(&self) -> Option<GeometryKind> {
        match self.kind {
            LayerKind::Vector(g) => Some(g),
            LayerKind::Raster => None,
        }
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    pub fn renderer(&self) -> Option<&Renderer> {
        self.renderer.as_ref()
    }

    pub fn set_renderer(&mut self, renderer: Renderer) {
        self.renderer = Some(renderer);
    }

    // ─── Reading ────────────────────────────────────────────────────────

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Committed features in insertion order
    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    /// Union of the bounding rectangles of all features with geometry
    pub fn extent(&self) -> Option<Extent> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(Extent::of)
            .reduce(|acc, e| acc.union(&e))
    }

    // ─── Selection ──────────────────────────────────────────────────────

    /// Select features by id. Unknown ids are an error.
    pub fn select(&mut self, ids: impl IntoIterator<Item = FeatureId>) -> Result<()> {
        for id in ids {
            if self.feature(id).is_none() {
                return Err(Error::FeatureNotFound(id));
            }
            self.selected.insert(id);
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected features, in layer order
    pub fn selected_features(&self) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|f| self.selected.contains(&f.id))
            .collect()
    }

    // ─── Provider-level writes ──────────────────────────────────────────

    /// Append features directly, outside any edit session.
    ///
    /// Used to populate layers before they are shared. All features are
    /// checked before any is stored.
    pub fn insert_features(&mut self, features: Vec<Feature>) -> Result<()> {
        let mut seen: HashSet<FeatureId> = self.features.iter().map(|f| f.id).collect();
        for f in &features {
            if !seen.insert(f.id) {
                return Err(Error::DuplicateFeature(f.id));
            }
            self.check_feature(f)?;
        }
        self.features.extend(features);
        Ok(())
    }

    /// Verify id uniqueness, schema and geometry kinds of loaded data
    pub fn check_integrity(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for f in &self.features {
            if !seen.insert(f.id) {
                return Err(Error::DuplicateFeature(f.id));
            }
            self.check_feature(f)?;
        }
        for id in &self.selected {
            if !seen.contains(id) {
                return Err(Error::FeatureNotFound(*id));
            }
        }
        Ok(())
    }

    fn check_feature(&self, feature: &Feature) -> Result<()> {
        self.schema.check(feature)?;
        if let Some(geom) = &feature.geometry {
            self.check_geometry(geom)?;
        }
        Ok(())
    }

    fn check_geometry(&self, geom: &Geometry<f64>) -> Result<()> {
        match self.kind {
            LayerKind::Raster => Err(Error::Input(format!(
                "layer '{}' is a raster layer and holds no features",
                self.name
            ))),
            LayerKind::Vector(expected) => match GeometryKind::of(geom) {
                Some(kind) if kind == expected => Ok(()),
                other => Err(Error::Geometry(format!(
                    "layer '{}' holds {:?} geometries, got {:?}",
                    self.name, expected, other
                ))),
            },
        }
    }

    // ─── Edit session ───────────────────────────────────────────────────

    pub fn is_editable(&self) -> bool {
        self.edit.is_some()
    }

    /// Open an edit session. Fails if one is already open.
    pub fn start_editing(&mut self) -> Result<()> {
        if self.edit.is_some() {
            return Err(Error::Concurrency(self.name.clone()));
        }
        debug!(layer = %self.name, "edit session opened");
        self.edit = Some(EditSession::default());
        Ok(())
    }

    fn session_mut(&mut self) -> Result<&mut EditSession> {
        let name = &self.name;
        self.edit
            .as_mut()
            .ok_or_else(|| Error::NotEditing(name.clone()))
    }

    /// Buffer a geometry replacement
    pub fn change_geometry(&mut self, id: FeatureId, geometry: Geometry<f64>) -> Result<()> {
        self.session_mut()?.changed.insert(id, geometry);
        Ok(())
    }

    /// Buffer deletions
    pub fn delete_features(&mut self, ids: &[FeatureId]) -> Result<()> {
        self.session_mut()?.deleted.extend(ids.iter().copied());
        Ok(())
    }

    /// Number of buffered edits in the open session
    pub fn pending_edits(&self) -> usize {
        self.edit
            .as_ref()
            .map_or(0, |s| s.changed.len() + s.deleted.len())
    }

    /// Apply every buffered edit and close the session.
    ///
    /// All edits are validated first. On error nothing is applied and the
    /// session stays open.
    pub fn commit_changes(&mut self) -> Result<CommitStats> {
        let session = self
            .edit
            .as_ref()
            .ok_or_else(|| Error::NotEditing(self.name.clone()))?;
        if let Err(reason) = self.validate_session(session) {
            warn!(layer = %self.name, %reason, "commit rejected");
            return Err(Error::Commit {
                layer: self.name.clone(),
                reason,
            });
        }

        let session = self.edit.take().unwrap_or_default();
        let stats = CommitStats {
            changed: session.changed.len(),
            deleted: session.deleted.len(),
        };
        if session.is_empty() {
            return Ok(stats);
        }

        let EditSession {
            mut changed,
            deleted,
        } = session;
        self.features.retain(|f| !deleted.contains(&f.id));
        self.selected.retain(|id| !deleted.contains(id));
        for feature in &mut self.features {
            if let Some(geom) = changed.remove(&feature.id) {
                feature.geometry = Some(geom);
            }
        }
        debug!(
            layer = %self.name,
            changed = stats.changed,
            deleted = stats.deleted,
            "edit session committed"
        );
        Ok(stats)
    }

    fn validate_session(&self, session: &EditSession) -> std::result::Result<(), String> {
        let caps = self.capabilities;
        if !session.changed.is_empty() && !caps.change_geometries {
            return Err("provider cannot change geometries".into());
        }
        if !session.deleted.is_empty() && !caps.delete_features {
            return Err("provider cannot delete features".into());
        }

        let existing: HashSet<FeatureId> = self.features.iter().map(|f| f.id).collect();
        for (id, geom) in &session.changed {
            if !existing.contains(id) {
                return Err(format!("feature {} does not exist", id));
            }
            self.check_geometry(geom).map_err(|e| e.to_string())?;
        }
        for id in &session.deleted {
            if !existing.contains(id) {
                return Err(format!("feature {} does not exist", id));
            }
        }
        Ok(())
    }

    /// Discard every buffered edit and close the session.
    ///
    /// Returns `false` if no session was open.
    pub fn rollback(&mut self) -> bool {
        match self.edit.take() {
            Some(session) => {
                debug!(
                    layer = %self.name,
                    discarded = session.changed.len() + session.deleted.len(),
                    "edit session rolled back"
                );
                true
            }
            None => false,
        }
    }
}
