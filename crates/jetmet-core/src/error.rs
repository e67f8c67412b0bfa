//! Error types for the trigger module system

use jetmet_common::KinematicsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModuleError {
    #[error("Invalid configuration for '{label}': {message}")]
    InvalidConfig { label: String, message: String },

    #[error("Collection '{label}' holds {found}, expected {expected}")]
    CollectionType {
        label: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Kinematics error: {0}")]
    Kinematics(#[from] KinematicsError),
}

impl ModuleError {
    pub fn invalid_config(label: impl Into<String>, message: impl Into<String>) -> Self {
        ModuleError::InvalidConfig {
            label: label.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unknown module type: {0}")]
    UnknownModuleType(String),

    #[error("Path '{path}' references unknown module '{label}'")]
    UnknownModule { path: String, label: String },

    #[error("Duplicate module label: {0}")]
    DuplicateLabel(String),

    #[error("Duplicate path name: {0}")]
    DuplicatePath(String),

    #[error("Module error: {0}")]
    ModuleError(#[from] ModuleError),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Malformed event on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Event error: {0}")]
    Event(#[from] EventError),
}
