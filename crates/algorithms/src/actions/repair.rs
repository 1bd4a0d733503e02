//! Validate and repair the geometries of the active layer

use layerkit_core::{Error, HostInterface};

use super::{parse_params, Action, ActionResult};
use crate::vector::{repair_layer, RepairChain, RepairParams, RepairSummary};

/// How many unrepaired ids the message lists before truncating
const MAX_LISTED_IDS: usize = 10;

/// `repair-geometries` action
#[derive(Debug, Default)]
pub struct RepairGeometries {
    chain: RepairChain,
}

impl RepairGeometries {
    /// Use a custom strategy chain instead of the default one
    pub fn with_chain(chain: RepairChain) -> Self {
        Self { chain }
    }
}

fn summary_message(summary: &RepairSummary) -> String {
    if summary.all_valid() {
        return format!("All {} geometries are valid", summary.total());
    }

    let mut msg = String::from("Problems found:");
    if summary.empty() > 0 {
        msg.push_str(&format!("\n• {} empty geometries", summary.empty()));
    }
    if summary.invalid() > 0 {
        msg.push_str(&format!("\n• {} invalid geometries", summary.invalid()));
    }
    if summary.repaired() > 0 {
        msg.push_str(&format!("\n\nRepaired {} geometries", summary.repaired()));
    }
    if summary.unrepaired() > 0 {
        let ids = summary.unrepaired_ids();
        let listed: Vec<String> = ids
            .iter()
            .take(MAX_LISTED_IDS)
            .map(|id| id.to_string())
            .collect();
        msg.push_str(&format!(
            "\nCould not repair {} geometries\n\nUnrepaired IDs: [{}]",
            summary.unrepaired(),
            listed.join(", ")
        ));
        if ids.len() > MAX_LISTED_IDS {
            msg.push_str("...");
        }
    }
    if summary.removed > 0 {
        msg.push_str(&format!(
            "\n• Removed {} features with empty geometries",
            summary.removed
        ));
    }
    msg
}

impl Action for RepairGeometries {
    fn id(&self) -> &'static str {
        "repair-geometries"
    }

    fn description(&self) -> &'static str {
        "Detect and repair invalid geometries in the active layer"
    }

    fn run(
        &self,
        host: &mut dyn HostInterface,
        params: Option<&serde_json::Value>,
    ) -> ActionResult {
        let params: RepairParams = match parse_params(params) {
            Ok(p) => p,
            Err(e) => return ActionResult::from_error(&e, "Cannot validate geometries"),
        };
        let Some(layer) = host.active_layer_mut() else {
            return ActionResult::error("Select a vector layer to validate");
        };

        match repair_layer(layer, &params, &self.chain) {
            Ok(summary) => {
                if summary.committed {
                    host.refresh_canvas();
                }
                let message = summary_message(&summary);
                if summary.unrepaired() == 0 {
                    ActionResult::ok(message)
                } else {
                    ActionResult::warning(message)
                }
            }
            Err(e @ Error::Commit { .. }) => ActionResult::from_error(
                &e,
                "Error saving changes; all modifications were rolled back",
            ),
            Err(e) => ActionResult::from_error(&e, "Error processing geometries"),
        }
    }
}
