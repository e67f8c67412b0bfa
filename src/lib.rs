//! JetMET trigger modules
//!
//! Umbrella crate tying the module crates to the framework. Most callers
//! only need [`default_registry`] and a menu:
//!
//! ```no_run
//! use jetmet_trigger::{default_registry, read_events_file, PathExecutor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut registry = default_registry();
//! registry.load_menu_file("config/menus/jetmet.yaml")?;
//! let executor = PathExecutor::new(&registry);
//! for event in read_events_file("events.jsonl")? {
//!     let result = executor.run_event(&event);
//!     for path in &result.paths {
//!         println!("{} {}: {}", event.id, path.name, path.accept);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub use jetmet_common as common;
pub use jetmet_core as core;
pub use jetmet_diff_checker as diff_checker;
pub use jetmet_dijet_topology as dijet_topology;
pub use jetmet_energy_sum as energy_sum;
pub use jetmet_min_dphi as min_dphi;
pub use jetmet_top_projection as top_projection;

pub use jetmet_core::{
    read_events, read_events_file, BulkExecutor, Context, Event, PathExecutor, Registry,
};

use jetmet_core::ModuleFactory;

/// Every module type shipped with the workspace, by menu type name
pub const MODULE_TYPES: &[(&str, ModuleFactory)] = &[
    (
        energy_sum::MhtProducer::TYPE,
        energy_sum::MhtProducer::factory,
    ),
    (
        energy_sum::HtMhtProducer::TYPE,
        energy_sum::HtMhtProducer::factory,
    ),
    (
        energy_sum::TrackMetProducer::TYPE,
        energy_sum::TrackMetProducer::factory,
    ),
    (energy_sum::MhtFilter::TYPE, energy_sum::MhtFilter::factory),
    (
        top_projection::TopProjectionMetCleaner::TYPE,
        top_projection::TopProjectionMetCleaner::factory,
    ),
    (
        top_projection::MetCleanerUsingJetId::TYPE,
        top_projection::MetCleanerUsingJetId::factory,
    ),
    (
        dijet_topology::DijetTopologyFilter::TYPE,
        dijet_topology::DijetTopologyFilter::factory,
    ),
    (min_dphi::MinDPhiFilter::TYPE, min_dphi::MinDPhiFilter::factory),
    (diff_checker::DiffChecker::TYPE, diff_checker::DiffChecker::factory),
];

/// Register all module types into `registry`
pub fn register_all_modules(registry: &mut Registry) {
    for (name, factory) in MODULE_TYPES {
        registry.register_type(*name, *factory);
    }
}

/// Empty registry that knows every module type
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    register_all_modules(&mut registry);
    registry
}
