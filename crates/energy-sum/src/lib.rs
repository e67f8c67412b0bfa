//! Transverse energy sums over reconstructed objects
//!
//! The accumulator builds the recoil of everything that passes a
//! [`CutPolicy`]: each passing object's transverse vector is *subtracted*
//! from `(px, py)` and its scalar (pt or et) is added to `sum_et`. An
//! optional correction adds the momentum of particle-flow muons back, so
//! that muons do not count towards the missing momentum.
//!
//! # Example
//! ```
//! use jetmet_common::{CutPolicy, Jet};
//! use jetmet_energy_sum::accumulate;
//!
//! let jets = vec![Jet::new(50.0, 0.0, 0.0)];
//! let mht = accumulate(&jets, &CutPolicy::default());
//! assert_eq!((mht.px, mht.sum_et), (-50.0, 50.0));
//! ```

pub mod module;

use jetmet_common::{CutPolicy, EnergySum, PfCandidate, PhysicsObject};

pub use module::{
    HtMhtProducer, HtMhtProducerParams, MhtFilter, MhtFilterParams, MhtProducer,
    MhtProducerParams, SourceLabels, TrackMetProducer, TrackMetProducerParams,
};

/// Running vector and scalar sum
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    sum: EnergySum,
    passed: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one object if it passes the cut; returns whether it did
    pub fn add<T: PhysicsObject + ?Sized>(&mut self, obj: &T, policy: &CutPolicy) -> bool {
        if !policy.passes(obj) {
            return false;
        }
        let (px, py) = policy.transverse_vector(obj);
        self.sum.px -= px;
        self.sum.py -= py;
        self.sum.sum_et += policy.scalar(obj);
        self.passed += 1;
        true
    }

    /// Add an object's momentum back into the recoil, without cuts
    pub fn add_back<T: PhysicsObject + ?Sized>(&mut self, obj: &T) {
        self.sum.px += obj.px();
        self.sum.py += obj.py();
    }

    /// Number of objects that passed the cut
    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn finish(self) -> EnergySum {
        self.sum
    }
}

/// Recoil sum of every object passing `policy`
pub fn accumulate<T: PhysicsObject>(objects: &[T], policy: &CutPolicy) -> EnergySum {
    let mut acc = Accumulator::new();
    for obj in objects {
        acc.add(obj, policy);
    }
    acc.finish()
}

/// Add the momentum of every muon candidate back into `acc`
pub fn add_back_muons(acc: &mut Accumulator, candidates: &[PfCandidate]) {
    for muon in candidates.iter().filter(|c| c.is_muon()) {
        acc.add_back(muon);
    }
}

/// [`accumulate`] with the muon correction applied when candidates are given.
///
/// `None` means no particle-flow collection is configured: the correction is
/// skipped silently.
pub fn accumulate_excluding_muons<T: PhysicsObject>(
    objects: &[T],
    policy: &CutPolicy,
    pf_candidates: Option<&[PfCandidate]>,
) -> EnergySum {
    let mut acc = Accumulator::new();
    for obj in objects {
        acc.add(obj, policy);
    }
    if let Some(candidates) = pf_candidates {
        add_back_muons(&mut acc, candidates);
    }
    acc.finish()
}
