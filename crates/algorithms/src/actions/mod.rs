//! Host-level actions
//!
//! An action is what a host binds to a button or menu entry: it receives the
//! host context and an optional JSON parameter object, does one job, and
//! always answers with an [`ActionResult`]. Errors never escape to the host.

mod repair;
mod rings;
mod zoom;

pub use repair::RepairGeometries;
pub use rings::{output_layer_name, ring_layer, ring_renderer, BufferRings};
pub use zoom::ZoomToLayer;

use layerkit_core::{Error, HostInterface, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// Outcome class reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    /// Partial success, or nothing to act on
    Warning,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Status and human-readable message returned by every action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub status: Status,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            status: Status::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }

    /// Error result carrying the underlying message
    pub fn from_error(err: &Error, context: &str) -> Self {
        Self::error(format!("{}: {}", context, err))
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// A handler the host can invoke
pub trait Action {
    /// Stable identifier, e.g. `repair-geometries`
    fn id(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn run(&self, host: &mut dyn HostInterface, params: Option<&serde_json::Value>) -> ActionResult;
}

/// Every built-in action
pub fn registry() -> Vec<Box<dyn Action>> {
    vec![
        Box::new(RepairGeometries::default()),
        Box::new(BufferRings),
        Box::new(ZoomToLayer),
    ]
}

/// Look up a built-in action by id
pub fn find_action(id: &str) -> Option<Box<dyn Action>> {
    registry().into_iter().find(|a| a.id() == id)
}

/// Parse an optional parameter object; missing or `null` means defaults
pub(crate) fn parse_params<T>(params: Option<&serde_json::Value>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match params {
        None | Some(serde_json::Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| Error::Input(format!("invalid parameters: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_are_unique_and_findable() {
        let ids: Vec<_> = registry().iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec!["repair-geometries", "buffer-rings", "zoom-to-layer"]);
        assert!(find_action("buffer-rings").is_some());
        assert!(find_action("print-pdf").is_none());
    }

    #[test]
    fn result_serializes_lowercase_status() {
        let json = serde_json::to_string(&ActionResult::warning("partial")).unwrap();
        assert_eq!(json, r#"{"status":"warning","message":"partial"}"#);
    }
}
