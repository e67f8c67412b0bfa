//! Integration tests for top projection

use jetmet_common::{CutPolicy, EnergySum, Jet};
use jetmet_energy_sum::accumulate;
use jetmet_top_projection::{clean, MatchStrategy, TopProjection};

fn jets() -> Vec<Jet> {
    vec![
        Jet::new(120.0, 0.4, 0.1),
        Jet::new(85.0, -1.3, 2.9),
        Jet::new(60.0, 2.2, -1.7),
        Jet::new(42.0, 0.0, 1.0),
        Jet::new(18.0, -3.1, -2.5),
    ]
}

#[test]
fn test_self_projection_masks_everything() {
    let jets = jets();
    let seed = EnergySum::new(12.0, -7.5, 410.0);
    for cut in [CutPolicy::default(), CutPolicy::new(true, 50.0, 2.5), CutPolicy::new(false, 20.0, 3.0)] {
        for strategy in [MatchStrategy::FirstFound, MatchStrategy::Nearest] {
            let projection = TopProjection::new(cut, cut, 0.001)
                .with_strategy(strategy)
                .project(&jets, &jets, seed);
            assert_eq!(projection.met, seed);
            assert!(projection.unmatched.is_empty());
        }
    }
}

#[test]
fn test_empty_top_undoes_direct_accumulation() {
    let bottom = jets();
    let cut = CutPolicy::new(true, 20.0, 4.7);
    let direct = accumulate(&bottom, &cut);

    let empty: Vec<Jet> = vec![];
    let folded = clean(&empty, &bottom, direct, &cut, &cut, 0.4);

    assert!(folded.px.abs() < 1e-9);
    assert!(folded.py.abs() < 1e-9);
    assert!(folded.sum_et.abs() < 1e-9);
}

#[test]
fn test_partial_overlap() {
    let bottom = jets();
    // Identified jets: slightly shifted copies of the first two
    let top = vec![Jet::new(118.0, 0.41, 0.11), Jet::new(86.0, -1.31, 2.91)];
    let cut = CutPolicy::default();

    let projection = TopProjection::new(cut, cut, 0.1).project(&top, &bottom, EnergySum::zero());

    assert_eq!(projection.matches.len(), 2);
    assert_eq!(projection.unmatched.len(), 3);
    let expected_sum_et: f64 = -(60.0 + 42.0 + 18.0);
    assert!((projection.met.sum_et - expected_sum_et).abs() < 1e-9);
}

#[test]
fn test_leftover_top_objects_are_discarded() {
    let bottom = vec![Jet::new(50.0, 0.0, 0.0)];
    let top = vec![Jet::new(50.0, 0.0, 0.0), Jet::new(70.0, 2.0, 2.0)];
    let cut = CutPolicy::default();
    let met = clean(&top, &bottom, EnergySum::zero(), &cut, &cut, 0.1);
    assert_eq!(met, EnergySum::zero());
}
