//! MET correction for jets failing identification

use jetmet_common::{CutPolicy, EnergySum, PhysicsObject, SumEtPolicy};
use jetmet_energy_sum::accumulate;
use tracing::warn;

/// `met + MET(good) - MET(all)`.
///
/// `good` is expected to be a subset of `all`, so the scalar difference is
/// normally non-positive. A positive difference is logged; the resulting
/// `sum_et` then goes through `sum_et_policy`.
pub fn clean_with_jet_id<J: PhysicsObject>(
    met: &EnergySum,
    all_jets: &[J],
    good_jets: &[J],
    policy: &CutPolicy,
    sum_et_policy: SumEtPolicy,
    module: &str,
) -> EnergySum {
    let all = accumulate(all_jets, policy);
    let good = accumulate(good_jets, policy);
    let diff = good.difference(&all);

    if diff.sum_et > 0.0 {
        warn!(
            "{}: identified jets carry more scalar sum than all jets ({:+.3})",
            module, diff.sum_et
        );
    }

    let mut cleaned = met.combined(&diff);
    cleaned.sum_et = sum_et_policy.apply(cleaned.sum_et, module);
    cleaned
}
