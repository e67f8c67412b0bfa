//! Module wrapper for the min delta-phi filter

use crate::scan;
use jetmet_common::{CutPolicy, TriggerType};
use jetmet_core::{
    Context, Event, FilterDecision, ModuleConfig, ModuleError, ModuleKind, ModuleOutput,
    TriggerModule,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Min delta-phi filter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinDPhiParams {
    pub use_pt: bool,
    pub trigger_type: TriggerType,
    /// Leading objects inspected, passing or not
    pub max_n_jets: usize,
    pub min_pt: f64,
    pub max_eta: f64,
    /// Accept when every inspected jet is further than this from the MET
    pub min_dphi: f64,
    pub met_label: String,
    pub jets_label: String,
}

impl Default for MinDPhiParams {
    fn default() -> Self {
        Self {
            use_pt: true,
            trigger_type: TriggerType::Jet,
            max_n_jets: 999,
            min_pt: 0.0,
            max_eta: 9999.0,
            min_dphi: 0.5,
            met_label: "hltPFMETProducer".to_string(),
            jets_label: "hltAK5PFJetL1FastL2L3Corrected".to_string(),
        }
    }
}

pub struct MinDPhiFilter {
    config: ModuleConfig,
    params: MinDPhiParams,
    policy: CutPolicy,
}

impl MinDPhiFilter {
    pub const TYPE: &'static str = "min_dphi_filter";

    pub fn new(config: ModuleConfig) -> Result<Self, ModuleError> {
        let params: MinDPhiParams = config.params()?;
        let policy = CutPolicy::new(params.use_pt, params.min_pt, params.max_eta);
        policy
            .validate()
            .map_err(|e| ModuleError::invalid_config(&config.label, e.to_string()))?;
        if params.min_dphi.is_nan() {
            return Err(ModuleError::invalid_config(&config.label, "min_dphi is NaN"));
        }

        info!(
            "{}: met={} jets={} max_n_jets={} min_dphi={}",
            config.label, params.met_label, params.jets_label, params.max_n_jets, params.min_dphi
        );

        Ok(Self {
            config,
            params,
            policy,
        })
    }

    pub fn factory(config: ModuleConfig) -> Result<Arc<dyn TriggerModule>, ModuleError> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn decide(&self, event: &Event) -> Result<FilterDecision, ModuleError> {
        let mut decision = FilterDecision::reject();
        decision.tag(self.params.jets_label.as_str());

        let jets = event.jets(&self.params.jets_label)?;
        let Some(met) = event.first_met(&self.params.met_label)? else {
            debug!("{}: no MET, nothing to compare against", self.label());
            decision.accept = true;
            return Ok(decision);
        };

        let result = scan(met.azimuth(), jets, &self.policy, self.params.max_n_jets);
        for index in &result.consumed {
            decision.add_object(self.params.trigger_type, &self.params.jets_label, *index);
        }
        decision.accept = result.clears(self.params.min_dphi);

        debug!(
            "{}: min dphi {:.3} over {} jets",
            self.label(),
            result.min_delta_phi,
            result.consumed.len()
        );
        Ok(decision)
    }
}

impl TriggerModule for MinDPhiFilter {
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
