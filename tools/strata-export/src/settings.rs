//! Export settings

use serde::{Deserialize, Serialize};

/// Options for one export pass.
///
/// Deserializes from the `[settings]` table of a manifest; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Export only the selected objects (and their subtrees)
    pub selected_only: bool,
    /// Value of `asset.generator`
    pub generator: String,
    pub scene_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            selected_only: false,
            generator: format!("strata-export@{}", env!("CARGO_PKG_VERSION")),
            scene_name: "scene".to_string(),
        }
    }
}
