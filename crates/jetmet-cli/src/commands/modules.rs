//! Module type listing command

use anyhow::Result;
use jetmet_trigger::default_registry;

pub fn list_modules() -> Result<()> {
    println!("Available module types:");
    for module_type in default_registry().module_types() {
        println!("  {}", module_type);
    }
    Ok(())
}
