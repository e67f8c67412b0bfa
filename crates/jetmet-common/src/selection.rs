//! Object selection: kinematic cuts and input source resolution

use crate::objects::PhysicsObject;
use crate::{KinematicsError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Kinematic cut applied to each input object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutPolicy {
    /// Cut on (and sum) pt; otherwise use et
    pub use_pt: bool,
    /// Strict lower bound on pt (or et)
    pub min_pt: f64,
    /// Strict upper bound on |η|
    pub max_eta: f64,
}

impl Default for CutPolicy {
    fn default() -> Self {
        Self {
            use_pt: true,
            min_pt: 0.0,
            max_eta: 999.0,
        }
    }
}

impl CutPolicy {
    pub fn new(use_pt: bool, min_pt: f64, max_eta: f64) -> Self {
        Self {
            use_pt,
            min_pt,
            max_eta,
        }
    }

    /// Reject NaN bounds and non-positive eta windows
    pub fn validate(&self) -> Result<()> {
        if self.min_pt.is_nan() {
            return Err(KinematicsError::InvalidCut("min_pt is NaN".to_string()));
        }
        if self.max_eta.is_nan() || self.max_eta <= 0.0 {
            return Err(KinematicsError::InvalidCut(format!(
                "max_eta must be positive, got {}",
                self.max_eta
            )));
        }
        Ok(())
    }

    /// Scalar used for the cut and for scalar sums: pt or et
    #[inline]
    pub fn scalar<T: PhysicsObject + ?Sized>(&self, obj: &T) -> f64 {
        if self.use_pt {
            obj.pt()
        } else {
            obj.et()
        }
    }

    /// Transverse vector matching [`Self::scalar`]; the et variant treats
    /// the object as massless.
    #[inline]
    pub fn transverse_vector<T: PhysicsObject + ?Sized>(&self, obj: &T) -> (f64, f64) {
        if self.use_pt {
            (obj.px(), obj.py())
        } else {
            let et = obj.et();
            let phi = obj.phi();
            (et * phi.cos(), et * phi.sin())
        }
    }

    /// Pass/fail decision for a single object
    #[inline]
    pub fn passes<T: PhysicsObject + ?Sized>(&self, obj: &T) -> bool {
        self.scalar(obj) > self.min_pt && obj.eta().abs() < self.max_eta
    }
}

/// Alternative input streams for energy-sum producers, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectSource {
    Jets,
    Tracks,
    PfRecTracks,
    PfCandidatesCharged,
    PfCandidates,
}

impl ObjectSource {
    /// Resolution priority, highest first
    pub const PRIORITY: [ObjectSource; 5] = [
        ObjectSource::Jets,
        ObjectSource::Tracks,
        ObjectSource::PfRecTracks,
        ObjectSource::PfCandidatesCharged,
        ObjectSource::PfCandidates,
    ];

    #[must_use]
    pub fn is_jets(self) -> bool {
        self == ObjectSource::Jets
    }

    /// Whether the source reads the particle-flow candidate collection
    #[must_use]
    pub fn uses_pf_candidates(self) -> bool {
        matches!(
            self,
            ObjectSource::PfCandidatesCharged | ObjectSource::PfCandidates
        )
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ObjectSource::Jets => "jets",
            ObjectSource::Tracks => "tracks",
            ObjectSource::PfRecTracks => "pf_rec_tracks",
            ObjectSource::PfCandidatesCharged => "pf_candidates_charged",
            ObjectSource::PfCandidates => "pf_candidates",
        }
    }
}

/// Return the first enabled entry, or `fallback` if none is enabled
pub fn select_first_enabled<T, I>(candidates: I, fallback: T) -> T
where
    I: IntoIterator<Item = (bool, T)>,
{
    candidates
        .into_iter()
        .find_map(|(enabled, value)| enabled.then_some(value))
        .unwrap_or(fallback)
}

/// Legacy `use*` flags; an earlier true flag overrides every later one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFlags {
    pub use_jets: bool,
    pub use_tracks: bool,
    pub use_pf_rec_tracks: bool,
    pub use_pf_candidates_charged: bool,
    pub use_pf_candidates: bool,
}

impl SourceFlags {
    /// Resolve to exactly one source; all-false falls back to jets
    #[must_use]
    pub fn resolve(&self) -> ObjectSource {
        let enabled = [
            self.use_jets,
            self.use_tracks,
            self.use_pf_rec_tracks,
            self.use_pf_candidates_charged,
            self.use_pf_candidates,
        ];
        select_first_enabled(
            enabled.into_iter().zip(ObjectSource::PRIORITY),
            ObjectSource::Jets,
        )
    }
}

/// Handling of a negative scalar sum after a correction term is applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SumEtPolicy {
    /// Keep the value as computed
    #[default]
    Allow,
    /// Clamp at zero
    Clamp,
    /// Keep the value and log a warning
    Warn,
}

impl SumEtPolicy {
    pub fn apply(self, sum_et: f64, module: &str) -> f64 {
        if sum_et >= 0.0 {
            return sum_et;
        }
        match self {
            SumEtPolicy::Allow => sum_et,
            SumEtPolicy::Clamp => 0.0,
            SumEtPolicy::Warn => {
                warn!("{}: negative scalar sum after correction: {}", module, sum_et);
                sum_et
            }
        }
    }
}
