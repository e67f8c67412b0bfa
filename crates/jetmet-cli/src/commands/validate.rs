//! Menu validation command

use anyhow::{Context as _, Result};
use clap::Args;
use jetmet_trigger::default_registry;
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateCommand {
    /// Menu YAML file
    #[arg(value_name = "MENU")]
    menu: PathBuf,
}

impl ValidateCommand {
    pub fn execute(self) -> Result<()> {
        let mut registry = default_registry();
        registry
            .load_menu_file(&self.menu)
            .with_context(|| format!("Invalid menu {}", self.menu.display()))?;

        println!(
            "{}: {} module(s), {} path(s)",
            self.menu.display(),
            registry.module_count(),
            registry.paths().len()
        );
        for path in registry.paths() {
            println!("  {} ({} modules)", path.name, path.modules.len());
        }
        Ok(())
    }
}
