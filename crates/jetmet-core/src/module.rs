//! Trigger module trait and related types

use crate::error::ModuleError;
use crate::event::{Collection, Event};
use crate::Context;
use jetmet_common::{ObjectRef, TriggerType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Core module trait - every producer and filter implements this
pub trait TriggerModule: Send + Sync {
    /// Instance label, unique within a menu
    fn label(&self) -> &str;

    /// Producer or filter
    fn kind(&self) -> ModuleKind;

    /// Configuration this instance was built from
    fn config(&self) -> &ModuleConfig;

    /// Process one event. Inputs are read-only; producers return a
    /// collection that the executor stores under [`Self::label`].
    fn process(&self, ctx: &Context, event: &Event) -> Result<ModuleOutput, ModuleError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Producer,
    Filter,
}

/// One module instance as declared in a trigger menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Instance label
    pub label: String,

    /// Registered module type name
    #[serde(rename = "type")]
    pub module_type: String,

    #[serde(default)]
    pub description: String,

    /// Type-specific parameters
    #[serde(default)]
    pub params: serde_yaml::Value,
}

impl ModuleConfig {
    pub fn new(label: impl Into<String>, module_type: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            module_type: module_type.into(),
            description: String::new(),
            params: serde_yaml::Value::Null,
        }
    }

    /// Attach parameters, serialized from any typed params struct
    pub fn with_params<P: Serialize>(mut self, params: &P) -> Result<Self, ModuleError> {
        self.params = serde_yaml::to_value(params)
            .map_err(|e| ModuleError::invalid_config(&self.label, e.to_string()))?;
        Ok(self)
    }

    /// Decode the parameter block; an absent block yields the defaults
    pub fn params<P: DeserializeOwned + Default>(&self) -> Result<P, ModuleError> {
        if self.params.is_null() {
            return Ok(P::default());
        }
        serde_yaml::from_value(self.params.clone())
            .map_err(|e| ModuleError::invalid_config(&self.label, e.to_string()))
    }
}

/// Result of processing one event
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleOutput {
    /// Derived collection, stored back into the event
    Product(Collection),

    /// Producer ran but had nothing to store
    Nothing,

    /// Accept/reject decision of a filter
    Decision(FilterDecision),
}

impl ModuleOutput {
    pub fn accepted(&self) -> bool {
        match self {
            ModuleOutput::Decision(decision) => decision.accept,
            ModuleOutput::Product(_) | ModuleOutput::Nothing => true,
        }
    }
}

/// Reference to a trigger object that fired a filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerObjectRef {
    pub trigger_type: TriggerType,
    pub collection: String,
    pub index: ObjectRef,
}

/// Filter result: accept flag, input tags and the objects that fired
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterDecision {
    pub accept: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collection_tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<TriggerObjectRef>,
}

impl FilterDecision {
    pub fn new(accept: bool) -> Self {
        Self {
            accept,
            ..Default::default()
        }
    }

    pub fn accept() -> Self {
        Self::new(true)
    }

    pub fn reject() -> Self {
        Self::new(false)
    }

    /// Record an input collection tag
    pub fn tag(&mut self, label: impl Into<String>) {
        self.collection_tags.push(label.into());
    }

    /// Record an object that contributed to the decision
    pub fn add_object(&mut self, trigger_type: TriggerType, collection: &str, index: ObjectRef) {
        self.objects.push(TriggerObjectRef {
            trigger_type,
            collection: collection.to_string(),
            index,
        });
    }
}
