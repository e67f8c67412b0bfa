//! Minimum azimuthal separation between a reference direction and objects
//!
//! Used to veto events where the missing momentum points along a jet, a
//! typical sign of a mismeasured jet rather than genuine missing energy.

pub mod module;

use jetmet_common::{delta_phi, CutPolicy, ObjectRef, PhysicsObject};

pub use module::{MinDPhiFilter, MinDPhiParams};

/// Result of one scan
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    /// Smallest |Δφ| among passing objects; infinite when none passed
    pub min_delta_phi: f64,
    /// Passing objects, in input order
    pub consumed: Vec<ObjectRef>,
}

impl Scan {
    /// Strictly above `threshold`; a scan with no passing objects always clears it
    pub fn clears(&self, threshold: f64) -> bool {
        self.min_delta_phi > threshold
    }
}

/// Scan the first `max_count` objects against `reference_phi`.
///
/// The count includes objects failing `policy`, so `max_count` bounds how
/// far into the collection the scan looks, not how many objects it uses.
pub fn scan<T: PhysicsObject>(
    reference_phi: f64,
    objects: &[T],
    policy: &CutPolicy,
    max_count: usize,
) -> Scan {
    let mut result = Scan {
        min_delta_phi: f64::INFINITY,
        consumed: Vec::new(),
    };

    for (i, obj) in objects.iter().take(max_count).enumerate() {
        if !policy.passes(obj) {
            continue;
        }
        let dphi = delta_phi(reference_phi, obj.phi()).abs();
        if dphi < result.min_delta_phi {
            result.min_delta_phi = dphi;
        }
        result.consumed.push(ObjectRef(i));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetmet_common::Jet;
    use std::f64::consts::PI;

    #[test]
    fn test_nearly_back_to_back_jet_clears() {
        let jets = vec![Jet::new(50.0, 0.0, 3.0)];
        let policy = CutPolicy::new(true, 10.0, 5.0);
        let result = scan(0.0, &jets, &policy, 10);
        assert!((result.min_delta_phi - 3.0).abs() < 1e-12);
        assert!(result.clears(0.5));
        assert_eq!(result.consumed, vec![ObjectRef(0)]);
    }

    #[test]
    fn test_jet_near_reference_fails() {
        let jets = vec![Jet::new(50.0, 0.0, 3.0)];
        let policy = CutPolicy::new(true, 10.0, 5.0);
        let result = scan(PI, &jets, &policy, 10);
        assert!((result.min_delta_phi - (PI - 3.0)).abs() < 1e-12);
        assert!(!result.clears(0.5));
    }

    #[test]
    fn test_empty_scan_is_unbounded() {
        let jets: Vec<Jet> = vec![];
        let result = scan(1.0, &jets, &CutPolicy::default(), 999);
        assert!(result.min_delta_phi.is_infinite());
        assert!(result.clears(3.2));
    }

    #[test]
    fn test_wraps_across_pi() {
        let jets = vec![Jet::new(50.0, 0.0, -3.0)];
        let result = scan(3.0, &jets, &CutPolicy::default(), 999);
        assert!((result.min_delta_phi - (2.0 * PI - 6.0)).abs() < 1e-12);
    }

    #[test]
    fn test_count_includes_failing_objects() {
        let jets = vec![
            Jet::new(10.0, 0.0, 2.0),
            Jet::new(50.0, 0.0, 1.0),
            Jet::new(40.0, 0.0, 0.1),
        ];
        let policy = CutPolicy::new(true, 20.0, 5.0);

        // Only the first two objects are inspected; the soft one still counts
        let result = scan(0.0, &jets, &policy, 2);
        assert!((result.min_delta_phi - 1.0).abs() < 1e-12);
        assert_eq!(result.consumed, vec![ObjectRef(1)]);

        let result = scan(0.0, &jets, &policy, 3);
        assert!((result.min_delta_phi - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_count_inspects_nothing() {
        let jets = vec![Jet::new(50.0, 0.0, 0.0)];
        let result = scan(0.0, &jets, &CutPolicy::default(), 0);
        assert!(result.consumed.is_empty());
        assert!(result.clears(0.5));
    }
}
