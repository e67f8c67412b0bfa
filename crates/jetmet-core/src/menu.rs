//! Trigger menu: module instances and the paths that sequence them
//!
//! ```yaml
//! modules:
//!   - label: hltMht
//!     type: mht_producer
//!     params:
//!       jets_label: hltAK4PFJets
//!       min_pt_jet: 20.0
//!   - label: hltMht90
//!     type: mht_filter
//!     params:
//!       mht_labels: [hltMht]
//!       min_mht: [90.0]
//! paths:
//!   - name: HLT_PFMHT90
//!     modules: [hltMht, hltMht90]
//! ```

use crate::error::RegistryError;
use crate::module::ModuleConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered list of module labels run against each event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub name: String,
    pub modules: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerMenu {
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,

    #[serde(default)]
    pub paths: Vec<PathConfig>,
}

impl TriggerMenu {
    pub fn from_yaml(contents: &str) -> Result<Self, RegistryError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Load a menu from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn path(&self, name: &str) -> Option<&PathConfig> {
        self.paths.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: &str = r#"
modules:
  - label: hltMht
    type: mht_producer
    params:
      min_pt_jet: 20.0
  - label: hltMht90
    type: mht_filter
    description: MHT above 90 GeV
paths:
  - name: HLT_PFMHT90
    modules: [hltMht, hltMht90]
"#;

    #[test]
    fn test_parse_menu() {
        let menu = TriggerMenu::from_yaml(MENU).unwrap();
        assert_eq!(menu.modules.len(), 2);
        assert_eq!(menu.modules[0].module_type, "mht_producer");
        assert_eq!(menu.modules[1].description, "MHT above 90 GeV");
        assert!(menu.modules[1].params.is_null());
        assert_eq!(menu.path("HLT_PFMHT90").unwrap().modules.len(), 2);
        assert!(menu.path("HLT_Other").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.yaml");
        std::fs::write(&path, MENU).unwrap();
        let menu = TriggerMenu::load(&path).unwrap();
        assert_eq!(menu.paths[0].name, "HLT_PFMHT90");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TriggerMenu::load("/nonexistent/menu.yaml").unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
    }
}
