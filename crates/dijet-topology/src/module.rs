//! Module wrapper for the dijet topology (VBF) filter

use crate::{find_pairs, PtSorted, TopologyPolicy};
use jetmet_common::TriggerType;
use jetmet_core::{
    Context, Event, FilterDecision, ModuleConfig, ModuleError, ModuleKind, ModuleOutput,
    TriggerModule,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// VBF filter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DijetTopologyParams {
    /// Jet collection, sorted by descending pt
    pub input_tag: String,
    #[serde(flatten)]
    pub policy: TopologyPolicy,
    pub trigger_type: TriggerType,
}

impl Default for DijetTopologyParams {
    fn default() -> Self {
        Self {
            input_tag: "hltAK5PFJetL1FastL2L3Corrected".to_string(),
            policy: TopologyPolicy::default(),
            trigger_type: TriggerType::Jet,
        }
    }
}

/// Accepts events with at least one VBF-like jet pair
pub struct DijetTopologyFilter {
    config: ModuleConfig,
    params: DijetTopologyParams,
}

impl DijetTopologyFilter {
    pub const TYPE: &'static str = "dijet_topology_filter";

    pub fn new(config: ModuleConfig) -> Result<Self, ModuleError> {
        let params: DijetTopologyParams = config.params()?;
        params
            .policy
            .validate()
            .map_err(|e| ModuleError::invalid_config(&config.label, e.to_string()))?;

        let p = &params.policy;
        info!(
            "{}: input={} pt>({}, {}) |eta|<{} deta>{} mjj>{} opposite={} leading_only={}",
            config.label,
            params.input_tag,
            p.min_pt_high,
            p.min_pt_low,
            p.max_eta,
            p.min_delta_eta,
            p.min_inv_mass,
            p.eta_opposite,
            p.leading_only
        );

        Ok(Self { config, params })
    }

    pub fn factory(config: ModuleConfig) -> Result<Arc<dyn TriggerModule>, ModuleError> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn decide(&self, event: &Event) -> Result<FilterDecision, ModuleError> {
        let jets = event.jets(&self.params.input_tag)?;
        let sorted = PtSorted::try_new(jets)?;
        let pairs = find_pairs(&sorted, &self.params.policy);

        let mut decision = FilterDecision::new(!pairs.is_empty());
        decision.tag(self.params.input_tag.as_str());
        for (first, second) in &pairs {
            decision.add_object(self.params.trigger_type, &self.params.input_tag, *first);
            decision.add_object(self.params.trigger_type, &self.params.input_tag, *second);
        }

        debug!("{}: {} qualifying pair(s)", self.label(), pairs.len());
        Ok(decision)
    }
}

impl TriggerModule for DijetTopologyFilter {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::Filter
    }

    fn config(&self) -> &ModuleConfig {
        &self.config
    }

    fn process(&self, _ctx: &Context, event: &Event) -> Result<ModuleOutput, ModuleError> {
        Ok(ModuleOutput::Decision(self.decide(event)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jetmet_common::{Jet, ObjectRef};
    use jetmet_core::Collection;

    fn filter(yaml: &str) -> DijetTopologyFilter {
        let mut config = ModuleConfig::new("hltVBF", DijetTopologyFilter::TYPE);
        config.params = serde_yaml::from_str(yaml).unwrap();
        DijetTopologyFilter::new(config).unwrap()
    }

    #[test]
    fn test_filter_records_both_jets_of_each_pair() {
        let filter = filter("input_tag: jets\ntrigger_type: b_jet\n");
        let event = Event::new(1).with(
            "jets",
            Collection::Jets(vec![Jet::new(200.0, 1.0, 0.0), Jet::new(150.0, -4.5, 3.0)]),
        );
        let decision = filter.decide(&event).unwrap();

        assert!(decision.accept);
        assert_eq!(decision.collection_tags, vec!["jets".to_string()]);
        let refs: Vec<ObjectRef> = decision.objects.iter().map(|o| o.index).collect();
        assert_eq!(refs, vec![ObjectRef(0), ObjectRef(1)]);
        assert!(decision
            .objects
            .iter()
            .all(|o| o.trigger_type == TriggerType::BJet));
    }

    #[test]
    fn test_flattened_policy_params() {
        let filter = filter("min_inv_mass: 500\nleading_only: true\n");
        assert_eq!(filter.params.policy.min_inv_mass, 500.0);
        assert!(filter.params.policy.leading_only);
        assert_eq!(filter.params.policy.min_delta_eta, 4.0);
    }

    #[test]
    fn test_unsorted_jets_are_an_event_error() {
        let filter = filter("input_tag: jets\n");
        let event = Event::new(1).with(
            "jets",
            Collection::Jets(vec![Jet::new(50.0, 1.0, 0.0), Jet::new(150.0, -4.5, 3.0)]),
        );
        assert!(matches!(
            filter.decide(&event),
            Err(ModuleError::Kinematics(_))
        ));
    }

    #[test]
    fn test_missing_collection_rejects() {
        let filter = filter("{}");
        assert!(!filter.decide(&Event::new(1)).unwrap().accept);
    }
}
