//! Shared helpers for the workspace-level tests
#![allow(dead_code)]

use jetmet_trigger::core::TriggerMenu;
use jetmet_trigger::{default_registry, Registry};
use std::path::PathBuf;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Path relative to the workspace root
pub fn workspace_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

/// Registry with every module type and the given menu file loaded
pub fn registry_with_menu(menu: &str) -> Registry {
    init_logging();
    let mut registry = default_registry();
    registry
        .load_menu_file(workspace_path(menu))
        .unwrap_or_else(|e| panic!("failed to load {}: {}", menu, e));
    registry
}

pub fn registry_from_yaml(yaml: &str) -> Registry {
    init_logging();
    let mut registry = default_registry();
    registry
        .load_menu(&TriggerMenu::from_yaml(yaml).unwrap())
        .unwrap();
    registry
}
