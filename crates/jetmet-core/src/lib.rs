//! JetMET Core - module framework for per-event trigger decisions
//!
//! Modules are configured from a YAML menu, grouped into paths, and run over
//! events holding named object collections. Producers store derived
//! collections back into the event; filters return accept/reject decisions.

pub mod context;
pub mod error;
pub mod event;
pub mod executor;
pub mod menu;
pub mod module;
pub mod registry;

pub use context::{Context, ExecutionMode};
pub use error::{EventError, ExecutorError, ModuleError, RegistryError};
pub use event::{read_events, read_events_file, Collection, Event};
pub use executor::{BulkExecutor, BulkResult, EventResult, PathExecutor, PathOutcome, PathSummary};
pub use menu::{PathConfig, TriggerMenu};
pub use module::{
    FilterDecision, ModuleConfig, ModuleKind, ModuleOutput, TriggerModule, TriggerObjectRef,
};
pub use registry::{ModuleFactory, Registry, TriggerPath};
