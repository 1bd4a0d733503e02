//! Error types for LayerKit

use thiserror::Error;

use crate::vector::FeatureId;

/// Main error type for LayerKit operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("project file error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad or missing input: no active layer, wrong layer kind, empty layer.
    #[error("{0}")]
    Input(String),

    /// The layer is already under an open edit session.
    #[error("layer '{0}' is already in edit mode; save or discard its changes first")]
    Concurrency(String),

    /// The edit session could not be committed. Nothing was written.
    #[error("commit failed on layer '{layer}': {reason}")]
    Commit { layer: String, reason: String },

    #[error("no edit session is open on layer '{0}'")]
    NotEditing(String),

    #[error("feature {0} does not exist")]
    FeatureNotFound(FeatureId),

    #[error("duplicate feature id {0}")]
    DuplicateFeature(FeatureId),

    #[error("a layer named '{0}' already exists in the project")]
    DuplicateLayer(String),

    #[error("no layer named '{0}' in the project")]
    LayerNotFound(String),

    #[error("field '{field}' expects {expected}, got {got}")]
    FieldType {
        field: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A geometry operation failed (non-finite input, numeric breakdown).
    #[error("geometry error: {0}")]
    Geometry(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Result type alias for LayerKit operations
pub type Result<T> = std::result::Result<T, Error>;
