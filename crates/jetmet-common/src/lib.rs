/// Common physics types and utilities for JetMET trigger modules
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod kinematics;
pub mod objects;
pub mod selection;

pub use kinematics::{delta_phi, delta_r2, FourMomentum};
pub use objects::{EnergySum, Jet, PfCandidate, PfRecTrack, PhysicsObject, Track, MUON_PDG_ID};
pub use selection::{select_first_enabled, CutPolicy, ObjectSource, SourceFlags, SumEtPolicy};

/// Kinematics errors
#[derive(Debug, Error)]
pub enum KinematicsError {
    #[error("Invalid cut policy: {0}")]
    InvalidCut(String),

    #[error("Input not sorted by descending pt at index {index}: {pt} follows {previous_pt}")]
    UnsortedInput {
        index: usize,
        previous_pt: f64,
        pt: f64,
    },

    #[error("Invalid threshold '{name}': {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

/// Result type for kinematics operations
pub type Result<T> = std::result::Result<T, KinematicsError>;

/// Index of an object inside one event collection.
///
/// Only meaningful together with the collection it was taken from, and only
/// within the same event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(pub usize);

impl ObjectRef {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    /// Resolve the reference against its collection
    #[must_use]
    pub fn get<T>(self, collection: &[T]) -> Option<&T> {
        collection.get(self.0)
    }
}

/// Trigger object type recorded with filter decisions.
///
/// Codes follow the HLT trigger type numbering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    #[default]
    Jet,
    BJet,
    Met,
    Tet,
    Tht,
    Mht,
    Track,
}

impl TriggerType {
    /// Numeric HLT code
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            TriggerType::Jet => 85,
            TriggerType::BJet => 86,
            TriggerType::Met => 87,
            TriggerType::Tet => 88,
            TriggerType::Tht => 89,
            TriggerType::Mht => 90,
            TriggerType::Track => 91,
        }
    }
}
