//! Top projection: greedy one-to-one de-duplication of overlapping collections
//!
//! Two collections often describe the same physics twice: a "top" set (for
//! example jets passing an identification requirement) and a "bottom" set it
//! was derived from. Projecting the top set out of the bottom set removes the
//! double counting: every bottom object that has a spatial partner in the top
//! set is masked, and the rest are folded into a MET seed.
//!
//! Matching is greedy and one-to-one. Bottom objects are visited in input
//! order; each consumes at most one top object, and a consumed top object can
//! never be matched again.
//!
//! # Example
//! ```
//! use jetmet_common::{CutPolicy, EnergySum, Jet};
//! use jetmet_top_projection::clean;
//!
//! let top = vec![Jet::new(40.0, 1.0, 0.5)];
//! let bottom = vec![Jet::new(40.0, 1.0, 0.5), Jet::new(25.0, -2.0, 0.0)];
//! let cut = CutPolicy::default();
//! let met = clean(&top, &bottom, EnergySum::zero(), &cut, &cut, 0.1);
//! // Only the unmatched 25 GeV jet is folded in
//! assert!((met.px - 25.0).abs() < 1e-9);
//! assert!((met.sum_et + 25.0).abs() < 1e-9);
//! ```

pub mod jet_id;
pub mod module;

use jetmet_common::{delta_r2, CutPolicy, EnergySum, KinematicsError, ObjectRef, PhysicsObject};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use jet_id::clean_with_jet_id;
pub use module::{
    MetCleanerUsingJetId, MetCleanerUsingJetIdParams, TopProjectionMetCleaner,
    TopProjectionParams,
};

/// How a bottom object picks its partner among the unconsumed top objects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// First top object in input order inside the cone
    #[default]
    FirstFound,
    /// Closest top object inside the cone; ties go to the earlier one
    Nearest,
}

/// Matching configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopProjection {
    pub cut_top: CutPolicy,
    pub cut_bottom: CutPolicy,
    /// Matching cone; a pair matches when ΔR² < delta_r²
    pub delta_r: f64,
    pub strategy: MatchStrategy,
}

/// Outcome of one projection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// Seed with every unmatched bottom object folded in
    pub met: EnergySum,
    /// `(bottom, top)` index pairs that were masked
    pub matches: Vec<(ObjectRef, ObjectRef)>,
    /// Passing bottom objects without a partner
    pub unmatched: Vec<ObjectRef>,
}

impl TopProjection {
    pub fn new(cut_top: CutPolicy, cut_bottom: CutPolicy, delta_r: f64) -> Self {
        Self {
            cut_top,
            cut_bottom,
            delta_r,
            strategy: MatchStrategy::FirstFound,
        }
    }

    pub fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<(), KinematicsError> {
        self.cut_top.validate()?;
        self.cut_bottom.validate()?;
        if self.delta_r.is_nan() || self.delta_r < 0.0 {
            return Err(KinematicsError::InvalidThreshold {
                name: "delta_r",
                value: self.delta_r,
            });
        }
        Ok(())
    }

    /// Mask `bottom` against `top` and fold the survivors into `seed`.
    ///
    /// Survivors add their transverse vector to `(px, py)` and subtract their
    /// scalar from `sum_et`; masked objects leave the seed untouched. Top
    /// objects left over at the end are discarded.
    pub fn project<T, B>(&self, top: &[T], bottom: &[B], seed: EnergySum) -> Projection
    where
        T: PhysicsObject,
        B: PhysicsObject,
    {
        let max_dr2 = self.delta_r * self.delta_r;

        // Working set of passing top objects; entries flip to consumed, never removed
        let candidates: Vec<usize> = top
            .iter()
            .enumerate()
            .filter(|(_, t)| self.cut_top.passes(*t))
            .map(|(i, _)| i)
            .collect();
        let mut consumed = vec![false; candidates.len()];

        let mut projection = Projection {
            met: seed,
            ..Default::default()
        };

        for (b_idx, b) in bottom.iter().enumerate() {
            if !self.cut_bottom.passes(b) {
                continue;
            }

            let within = |slot: &usize| {
                let t = &top[candidates[*slot]];
                delta_r2(t.eta(), t.phi(), b.eta(), b.phi()) < max_dr2
            };
            let found = match self.strategy {
                MatchStrategy::FirstFound => (0..candidates.len())
                    .filter(|slot| !consumed[*slot])
                    .find(|slot| within(slot)),
                MatchStrategy::Nearest => (0..candidates.len())
                    .filter(|slot| !consumed[*slot] && within(slot))
                    .map(|slot| {
                        let t = &top[candidates[slot]];
                        (slot, delta_r2(t.eta(), t.phi(), b.eta(), b.phi()))
                    })
                    .fold(None, |best: Option<(usize, f64)>, (slot, dr2)| match best {
                        Some((_, best_dr2)) if best_dr2 <= dr2 => best,
                        _ => Some((slot, dr2)),
                    })
                    .map(|(slot, _)| slot),
            };

            match found {
                Some(slot) => {
                    consumed[slot] = true;
                    projection
                        .matches
                        .push((ObjectRef(b_idx), ObjectRef(candidates[slot])));
                }
                None => {
                    let (px, py) = self.cut_bottom.transverse_vector(b);
                    projection.met.px += px;
                    projection.met.py += py;
                    projection.met.sum_et -= self.cut_bottom.scalar(b);
                    projection.unmatched.push(ObjectRef(b_idx));
                }
            }
        }

        debug!(
            "Top projection: {} masked, {} folded in, {} top objects left over",
            projection.matches.len(),
            projection.unmatched.len(),
            consumed.iter().filter(|c| !**c).count()
        );

        projection
    }

    pub fn clean<T, B>(&self, top: &[T], bottom: &[B], seed: EnergySum) -> EnergySum
    where
        T: PhysicsObject,
        B: PhysicsObject,
    {
        self.project(top, bottom, seed).met
    }
}

/// First-found top projection of `bottom` against `top`, folded into `seed`
pub fn clean<T, B>(
    top: &[T],
    bottom: &[B],
    seed: EnergySum,
    cut_top: &CutPolicy,
    cut_bottom: &CutPolicy,
    delta_r: f64,
) -> EnergySum
where
    T: PhysicsObject,
    B: PhysicsObject,
{
    TopProjection::new(*cut_top, *cut_bottom, delta_r).clean(top, bottom, seed)
}
