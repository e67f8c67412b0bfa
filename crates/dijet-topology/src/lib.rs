//! Dijet topology search over pt-ordered jets
//!
//! Finds every jet pair with a vector-boson-fusion signature: two hard jets
//! far apart in pseudorapidity with a large invariant mass. Input must be
//! sorted by descending pt, which lets both loops stop at the first jet
//! below threshold.

pub mod module;

use jetmet_common::{KinematicsError, ObjectRef, PhysicsObject, Result};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

pub use module::{DijetTopologyFilter, DijetTopologyParams};

/// A slice verified to be sorted by descending pt
#[derive(Debug, Clone, Copy)]
pub struct PtSorted<'a, T> {
    objects: &'a [T],
}

impl<'a, T: PhysicsObject> PtSorted<'a, T> {
    /// Check the ordering; equal pt values are allowed in any order
    pub fn try_new(objects: &'a [T]) -> Result<Self> {
        if let Some(index) = first_unsorted(objects) {
            return Err(KinematicsError::UnsortedInput {
                index,
                previous_pt: objects[index - 1].pt(),
                pt: objects[index].pt(),
            });
        }
        Ok(Self { objects })
    }

    /// Trust the producer's ordering. Checked in debug builds only.
    pub fn assume_sorted(objects: &'a [T]) -> Self {
        debug_assert!(
            first_unsorted(objects).is_none(),
            "input not sorted by descending pt"
        );
        Self { objects }
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.objects
    }
}

impl<T> Deref for PtSorted<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.objects
    }
}

fn first_unsorted<T: PhysicsObject>(objects: &[T]) -> Option<usize> {
    objects
        .windows(2)
        .position(|w| w[1].pt() > w[0].pt())
        .map(|i| i + 1)
}

/// Pair requirements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyPolicy {
    /// Threshold for the second jet of a pair
    pub min_pt_low: f64,
    /// Threshold for the first jet of a pair
    pub min_pt_high: f64,
    pub max_eta: f64,
    pub min_delta_eta: f64,
    pub min_inv_mass: f64,
    /// Require the jets in opposite hemispheres
    pub eta_opposite: bool,
    /// Only consider the two leading jets
    pub leading_only: bool,
}

impl Default for TopologyPolicy {
    fn default() -> Self {
        Self {
            min_pt_low: 40.0,
            min_pt_high: 40.0,
            max_eta: 5.0,
            min_delta_eta: 4.0,
            min_inv_mass: 1000.0,
            eta_opposite: false,
            leading_only: false,
        }
    }
}

impl TopologyPolicy {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("min_pt_low", self.min_pt_low),
            ("min_pt_high", self.min_pt_high),
            ("max_eta", self.max_eta),
            ("min_delta_eta", self.min_delta_eta),
            ("min_inv_mass", self.min_inv_mass),
        ] {
            if value.is_nan() {
                return Err(KinematicsError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }

    fn qualifies<T: PhysicsObject>(&self, j1: &T, j2: &T) -> bool {
        let (eta1, eta2) = (j1.eta(), j2.eta());
        j1.pt() > self.min_pt_high
            && j2.pt() > self.min_pt_low
            && (!self.eta_opposite || eta1 * eta2 < 0.0)
            && (eta1 - eta2).abs() > self.min_delta_eta
            && (j1.p4() + j2.p4()).mass() > self.min_inv_mass
    }
}

/// Every qualifying pair `(i, j)`, `i < j`, in loop order.
///
/// A jet outside the eta window is skipped, but one below threshold ends the
/// loop it is in: every later jet is softer.
pub fn find_pairs<T: PhysicsObject>(
    jets: &PtSorted<'_, T>,
    policy: &TopologyPolicy,
) -> Vec<(ObjectRef, ObjectRef)> {
    let mut pairs = Vec::new();
    if jets.len() < 2 {
        return pairs;
    }

    for (i, j1) in jets.iter().enumerate() {
        if policy.leading_only && i + 1 > 2 {
            break;
        }
        if j1.pt() < policy.min_pt_high {
            break;
        }
        if j1.eta().abs() > policy.max_eta {
            continue;
        }

        for (j, j2) in jets.iter().enumerate().skip(i + 1) {
            if policy.leading_only && j + 1 > 2 {
                break;
            }
            if j2.pt() < policy.min_pt_low {
                break;
            }
            if j2.eta().abs() > policy.max_eta {
                continue;
            }
            if policy.qualifies(j1, j2) {
                pairs.push((ObjectRef(i), ObjectRef(j)));
            }
        }
    }

    pairs
}
