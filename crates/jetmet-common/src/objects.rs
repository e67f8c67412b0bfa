//! Reconstructed physics objects consumed by trigger modules
//!
//! Every object kind exposes the same minimal capability set through
//! [`PhysicsObject`], so the aggregation and matching algorithms are written
//! once and instantiated per object kind.

use crate::kinematics::FourMomentum;
use serde::{Deserialize, Serialize};

/// Absolute PDG id of the muon
pub const MUON_PDG_ID: i32 = 13;

/// Kinematic accessors shared by all reconstructed objects
pub trait PhysicsObject {
    /// Transverse momentum
    fn pt(&self) -> f64;

    /// Pseudorapidity
    fn eta(&self) -> f64;

    /// Azimuthal angle
    fn phi(&self) -> f64;

    fn mass(&self) -> f64 {
        0.0
    }

    fn px(&self) -> f64 {
        self.pt() * self.phi().cos()
    }

    fn py(&self) -> f64 {
        self.pt() * self.phi().sin()
    }

    /// Full four-momentum
    fn p4(&self) -> FourMomentum {
        FourMomentum::from_pt_eta_phi_m(self.pt(), self.eta(), self.phi(), self.mass())
    }

    /// Transverse energy: E·sin θ = E / cosh η
    fn et(&self) -> f64 {
        self.p4().e / self.eta().cosh()
    }

    /// Electric charge sign, zero for neutral objects
    fn charge(&self) -> i32 {
        0
    }

    /// Particle type code (PDG id), zero when unknown
    fn pdg_id(&self) -> i32 {
        0
    }
}

/// Reconstructed jet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    #[serde(default)]
    pub mass: f64,
}

impl Jet {
    /// Massless jet
    pub fn new(pt: f64, eta: f64, phi: f64) -> Self {
        Self {
            pt,
            eta,
            phi,
            mass: 0.0,
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }
}

impl PhysicsObject for Jet {
    fn pt(&self) -> f64 {
        self.pt
    }
    fn eta(&self) -> f64 {
        self.eta
    }
    fn phi(&self) -> f64 {
        self.phi
    }
    fn mass(&self) -> f64 {
        self.mass
    }
}

/// Reconstructed charged-particle track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    #[serde(default)]
    pub charge: i32,
}

impl Track {
    pub fn new(pt: f64, eta: f64, phi: f64, charge: i32) -> Self {
        Self {
            pt,
            eta,
            phi,
            charge,
        }
    }
}

impl PhysicsObject for Track {
    fn pt(&self) -> f64 {
        self.pt
    }
    fn eta(&self) -> f64 {
        self.eta
    }
    fn phi(&self) -> f64 {
        self.phi
    }
    fn charge(&self) -> i32 {
        self.charge
    }
}

/// Particle-flow track: kinematics come from the underlying track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfRecTrack {
    pub track: Track,
}

impl PhysicsObject for PfRecTrack {
    fn pt(&self) -> f64 {
        self.track.pt
    }
    fn eta(&self) -> f64 {
        self.track.eta
    }
    fn phi(&self) -> f64 {
        self.track.phi
    }
    fn charge(&self) -> i32 {
        self.track.charge
    }
}

/// Particle-flow candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PfCandidate {
    pub pt: f64,
    pub eta: f64,
    pub phi: f64,
    #[serde(default)]
    pub mass: f64,
    #[serde(default)]
    pub charge: i32,
    #[serde(default)]
    pub pdg_id: i32,
}

impl PfCandidate {
    pub fn new(pt: f64, eta: f64, phi: f64, charge: i32, pdg_id: i32) -> Self {
        Self {
            pt,
            eta,
            phi,
            mass: 0.0,
            charge,
            pdg_id,
        }
    }

    #[must_use]
    pub fn is_muon(&self) -> bool {
        self.pdg_id.abs() == MUON_PDG_ID
    }
}

impl PhysicsObject for PfCandidate {
    fn pt(&self) -> f64 {
        self.pt
    }
    fn eta(&self) -> f64 {
        self.eta
    }
    fn phi(&self) -> f64 {
        self.phi
    }
    fn mass(&self) -> f64 {
        self.mass
    }
    fn charge(&self) -> i32 {
        self.charge
    }
    fn pdg_id(&self) -> i32 {
        self.pdg_id
    }
}

/// Transverse energy sum: a MET/MHT-like object.
///
/// `(px, py)` is the recoil vector; `sum_et` is an independent scalar sum
/// (HT when built from jets).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergySum {
    pub px: f64,
    pub py: f64,
    #[serde(default)]
    pub sum_et: f64,
}

impl EnergySum {
    pub fn new(px: f64, py: f64, sum_et: f64) -> Self {
        Self { px, py, sum_et }
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Magnitude of the vector part, never negative
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Azimuth of the vector part
    #[must_use]
    pub fn azimuth(&self) -> f64 {
        self.py.atan2(self.px)
    }

    /// Component-wise difference `self - other`
    #[must_use]
    pub fn difference(&self, other: &EnergySum) -> EnergySum {
        EnergySum::new(
            self.px - other.px,
            self.py - other.py,
            self.sum_et - other.sum_et,
        )
    }

    /// Component-wise sum `self + other`
    #[must_use]
    pub fn combined(&self, other: &EnergySum) -> EnergySum {
        EnergySum::new(
            self.px + other.px,
            self.py + other.py,
            self.sum_et + other.sum_et,
        )
    }
}

impl PhysicsObject for EnergySum {
    fn pt(&self) -> f64 {
        self.magnitude()
    }
    fn eta(&self) -> f64 {
        0.0
    }
    fn phi(&self) -> f64 {
        self.azimuth()
    }
    fn px(&self) -> f64 {
        self.px
    }
    fn py(&self) -> f64 {
        self.py
    }
    fn et(&self) -> f64 {
        self.magnitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_cartesian_components() {
        let jet = Jet::new(50.0, 0.0, 0.0);
        assert!((jet.px() - 50.0).abs() < 1e-12);
        assert!(jet.py().abs() < 1e-12);
    }

    #[test]
    fn test_massless_et_equals_pt() {
        let jet = Jet::new(40.0, 2.1, 1.0);
        assert!((jet.et() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_massive_et_exceeds_pt() {
        let jet = Jet::new(40.0, 0.0, 1.0).with_mass(30.0);
        // At η = 0: Et = E = sqrt(pt² + m²)
        assert!((jet.et() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_pf_rec_track_delegates_to_track() {
        let t = PfRecTrack {
            track: Track::new(12.0, -0.3, 2.0, -1),
        };
        assert_eq!(t.pt(), 12.0);
        assert_eq!(t.charge(), -1);
    }

    #[test]
    fn test_muon_identification() {
        assert!(PfCandidate::new(10.0, 0.0, 0.0, -1, 13).is_muon());
        assert!(PfCandidate::new(10.0, 0.0, 0.0, 1, -13).is_muon());
        assert!(!PfCandidate::new(10.0, 0.0, 0.0, 1, 211).is_muon());
    }

    #[test]
    fn test_energy_sum_magnitude_and_azimuth() {
        let sum = EnergySum::new(-3.0, 4.0, 12.0);
        assert_eq!(sum.magnitude(), 5.0);
        assert!((sum.azimuth() - 4.0_f64.atan2(-3.0)).abs() < 1e-12);
        assert_eq!(sum.pt(), 5.0);
    }

    #[test]
    fn test_energy_sum_deserializes_without_sum_et() {
        let sum: EnergySum = serde_json::from_str(r#"{"px": 1.0, "py": 2.0}"#).unwrap();
        assert_eq!(sum, EnergySum::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_candidate_defaults() {
        let c: PfCandidate = serde_json::from_str(r#"{"pt": 5.0, "eta": 0.1, "phi": 0.2}"#).unwrap();
        assert_eq!(c.charge, 0);
        assert_eq!(c.pdg_id, 0);
        assert_eq!(c.mass, 0.0);
    }
}
