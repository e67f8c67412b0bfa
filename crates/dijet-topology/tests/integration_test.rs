//! Integration tests for the dijet topology search

use jetmet_common::{Jet, ObjectRef, PhysicsObject};
use jetmet_dijet_topology::{find_pairs, PtSorted, TopologyPolicy};

/// Jets sorted by descending pt with a spread of eta values
fn event_jets() -> Vec<Jet> {
    let mut jets = vec![
        Jet::new(210.0, 3.9, 0.2),
        Jet::new(55.0, -1.1, 1.4),
        Jet::new(160.0, -2.8, -2.9),
        Jet::new(95.0, 5.3, 2.0),
        Jet::new(41.0, -4.4, 0.9),
        Jet::new(35.0, 0.3, -0.4),
    ];
    jets.sort_by(|a, b| b.pt().total_cmp(&a.pt()));
    jets
}

/// Exhaustive reference: every pair checked independently, no pruning
fn brute_force(jets: &[Jet], policy: &TopologyPolicy) -> Vec<(ObjectRef, ObjectRef)> {
    let mut pairs = Vec::new();
    for i in 0..jets.len() {
        for j in (i + 1)..jets.len() {
            let (a, b) = (&jets[i], &jets[j]);
            if a.eta().abs() > policy.max_eta || b.eta().abs() > policy.max_eta {
                continue;
            }
            if a.pt() > policy.min_pt_high
                && b.pt() > policy.min_pt_low
                && (!policy.eta_opposite || a.eta() * b.eta() < 0.0)
                && (a.eta() - b.eta()).abs() > policy.min_delta_eta
                && (a.p4() + b.p4()).mass() > policy.min_inv_mass
            {
                pairs.push((ObjectRef(i), ObjectRef(j)));
            }
        }
    }
    pairs
}

#[test]
fn test_pruned_search_matches_exhaustive_search() {
    let jets = event_jets();
    let sorted = PtSorted::try_new(&jets).unwrap();

    for policy in [
        TopologyPolicy::default(),
        TopologyPolicy {
            min_pt_low: 30.0,
            min_pt_high: 50.0,
            min_inv_mass: 300.0,
            min_delta_eta: 2.0,
            ..Default::default()
        },
        TopologyPolicy {
            min_pt_low: 30.0,
            eta_opposite: true,
            min_delta_eta: 1.0,
            min_inv_mass: 100.0,
            ..Default::default()
        },
    ] {
        assert_eq!(find_pairs(&sorted, &policy), brute_force(&jets, &policy));
    }
}

#[test]
fn test_forward_jet_beyond_window_is_skipped() {
    let jets = event_jets();
    let sorted = PtSorted::try_new(&jets).unwrap();
    let pairs = find_pairs(
        &sorted,
        &TopologyPolicy {
            min_pt_low: 30.0,
            min_delta_eta: 0.0,
            min_inv_mass: 0.0,
            ..Default::default()
        },
    );

    // The 95 GeV jet at eta 5.3 is never paired, but softer jets still are
    let forward = jets.iter().position(|j| j.eta > 5.0).unwrap();
    assert!(pairs
        .iter()
        .all(|(a, b)| a.index() != forward && b.index() != forward));
    assert!(pairs.iter().any(|(_, b)| b.index() > forward));
}
