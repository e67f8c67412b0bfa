//! Side-by-side comparison of two candidate collections
//!
//! A diagnostic for validating a new producer against a reference one:
//! both collections are compared element by element within a fixed
//! tolerance and every disagreement is reported.

pub mod module;

use jetmet_common::{delta_phi, EnergySum, Jet, PhysicsObject};
use serde::{Deserialize, Serialize};

pub use module::{DiffChecker, DiffCheckerParams};

/// Absolute tolerance on every compared quantity
pub const TOLERANCE: f64 = 1e-3;

/// Compared quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Pt,
    Eta,
    Phi,
    SumEt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mismatch {
    pub index: usize,
    pub field: Field,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    pub left_len: usize,
    pub right_len: usize,
    pub mismatches: Vec<Mismatch>,
}

impl DiffReport {
    /// Collections of different length are not compared element-wise
    pub fn size_mismatch(&self) -> bool {
        self.left_len != self.right_len
    }

    pub fn is_clean(&self) -> bool {
        !self.size_mismatch() && self.mismatches.is_empty()
    }
}

struct Differ<'a> {
    report: &'a mut DiffReport,
    index: usize,
}

impl Differ<'_> {
    fn value(&mut self, field: Field, left: f64, right: f64) {
        if (left - right).abs() > TOLERANCE {
            self.push(field, left, right);
        }
    }

    fn angle(&mut self, left: f64, right: f64) {
        if delta_phi(left, right).abs() > TOLERANCE {
            self.push(Field::Phi, left, right);
        }
    }

    fn push(&mut self, field: Field, left: f64, right: f64) {
        self.report.mismatches.push(Mismatch {
            index: self.index,
            field,
            left,
            right,
        });
    }
}

/// Compare jets pairwise on eta and phi, and on pt when `check_pt`
pub fn compare_jets(left: &[Jet], right: &[Jet], check_pt: bool) -> DiffReport {
    let mut report = DiffReport {
        left_len: left.len(),
        right_len: right.len(),
        ..Default::default()
    };
    if report.size_mismatch() {
        return report;
    }

    for (index, (l, r)) in left.iter().zip(right).enumerate() {
        let mut differ = Differ {
            report: &mut report,
            index,
        };
        if check_pt {
            differ.value(Field::Pt, l.pt(), r.pt());
        }
        differ.value(Field::Eta, l.eta(), r.eta());
        differ.angle(l.phi(), r.phi());
    }
    report
}

/// Compare the leading MET-like objects on magnitude and azimuth, and on
/// the scalar sum when `check_sum_et`
pub fn compare_sums(left: &[EnergySum], right: &[EnergySum], check_sum_et: bool) -> DiffReport {
    let mut report = DiffReport {
        left_len: left.len(),
        right_len: right.len(),
        ..Default::default()
    };
    if report.size_mismatch() {
        return report;
    }

    if let (Some(l), Some(r)) = (left.first(), right.first()) {
        let mut differ = Differ {
            report: &mut report,
            index: 0,
        };
        differ.value(Field::Pt, l.magnitude(), r.magnitude());
        differ.angle(l.azimuth(), r.azimuth());
        if check_sum_et {
            differ.value(Field::SumEt, l.sum_et, r.sum_et);
        }
    }
    report
}
