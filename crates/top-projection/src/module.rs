//! Module wrappers for the MET cleaners

use crate::{clean_with_jet_id, MatchStrategy, TopProjection};
use jetmet_common::{CutPolicy, EnergySum, SumEtPolicy};
use jetmet_core::{
    Collection, Context, Event, ModuleConfig, ModuleError, ModuleKind, ModuleOutput,
    TriggerModule,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Top projection cleaner parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopProjectionParams {
    /// Masking collection
    pub top_collection: String,
    /// Collection masked by the top one
    pub bottom_collection: String,
    /// Seed MET
    pub met_label: String,
    pub use_pt: bool,
    pub min_et: f64,
    pub max_eta: f64,
    pub delta_r: f64,
    pub match_strategy: MatchStrategy,
}

impl Default for TopProjectionParams {
    fn default() -> Self {
        Self {
            top_collection: "hltCaloJetIDPassed".to_string(),
            bottom_collection: "hltAntiKT5CaloJets".to_string(),
            met_label: "hltMet".to_string(),
            use_pt: false,
            min_et: 0.0,
            max_eta: 9999.0,
            delta_r: 0.001,
            match_strategy: MatchStrategy::FirstFound,
        }
    }
}

/// Folds bottom jets without a top partner into the seed MET
pub struct TopProjectionMetCleaner {
    config: ModuleConfig,
    params: TopProjectionParams,
    projection: TopProjection,
}

impl TopProjectionMetCleaner {
    pub const TYPE: &'static str = "top_projection_met_cleaner";

    pub fn new(config: ModuleConfig) -> Result<Self, ModuleError> {
        let params: TopProjectionParams = config.params()?;
        let cut = CutPolicy::new(params.use_pt, params.min_et, params.max_eta);
        let projection =
            TopProjection::new(cut, cut, params.delta_r).with_strategy(params.match_strategy);
        projection
            .validate()
            .map_err(|e| ModuleError::invalid_config(&config.label, e.to_string()))?;

        info!(
            "{}: top={} bottom={} met={} delta_r={} strategy={:?}",
            config.label,
            params.top_collection,
            params.bottom_collection,
            params.met_label,
            params.delta_r,
            params.match_strategy
        );

        Ok(Self {
            config,
            params,
            projection,
        })
    }

    pub fn factory(config: ModuleConfig) -> Result<Arc<dyn TriggerModule>, ModuleError> {
        Ok(Arc::new(Self::new(config)?))
    }

    /// Cleaned MET of one event; an absent seed starts from zero
    pub fn compute(&self, event: &Event) -> Result<EnergySum, ModuleError> {
        let seed = event
            .first_met(&self.params.met_label)?
            .copied()
            .unwrap_or_default();
        let top = event.jets(&self.params.top_collection)?;
        let bottom = event.jets(&self.params.bottom_collection)?;

        let projection = self.projection.project(top, bottom, seed);
        debug!(
            "{}: {} of {} bottom jets masked",
            self.label(),
            projection.matches.len(),
            bottom.len()
        );
        Ok(projection.met)
    }
}

impl TriggerModule for TopProjectionMetCleaner {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::Producer
    }

    fn config(&self) -> &ModuleConfig {
        &self.config
    }

    fn process(&self, _ctx: &Context, event: &Event) -> Result<ModuleOutput, ModuleError> {
        let met = self.compute(event)?;
        Ok(ModuleOutput::Product(Collection::Mets(vec![met])))
    }
}

/// Jet-ID cleaner parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetCleanerUsingJetIdParams {
    pub use_pt: bool,
    pub min_pt: f64,
    pub max_eta: f64,
    pub met_label: String,
    /// All jets
    pub jets_label: String,
    /// Jets passing identification
    pub good_jets_label: String,
    pub sum_et_policy: SumEtPolicy,
}

impl Default for MetCleanerUsingJetIdParams {
    fn default() -> Self {
        Self {
            use_pt: false,
            min_pt: 0.0,
            max_eta: 9999.0,
            met_label: "hltMet".to_string(),
            jets_label: "hltAntiKT5CaloJets".to_string(),
            good_jets_label: "hltCaloJetIDPassed".to_string(),
            sum_et_policy: SumEtPolicy::Allow,
        }
    }
}

/// Removes the contribution of jets failing identification from a MET
pub struct MetCleanerUsingJetId {
    config: ModuleConfig,
    params: MetCleanerUsingJetIdParams,
    policy: CutPolicy,
}

impl MetCleanerUsingJetId {
    pub const TYPE: &'static str = "met_cleaner_using_jet_id";

    pub fn new(config: ModuleConfig) -> Result<Self, ModuleError> {
        let params: MetCleanerUsingJetIdParams = config.params()?;
        let policy = CutPolicy::new(params.use_pt, params.min_pt, params.max_eta);
        policy
            .validate()
            .map_err(|e| ModuleError::invalid_config(&config.label, e.to_string()))?;

        info!(
            "{}: met={} jets={} good_jets={} sum_et_policy={:?}",
            config.label,
            params.met_label,
            params.jets_label,
            params.good_jets_label,
            params.sum_et_policy
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

    /// `None` when the event has no input MET
    pub fn compute(&self, event: &Event) -> Result<Option<EnergySum>, ModuleError> {
        let Some(met) = event.first_met(&self.params.met_label)? else {
            return Ok(None);
        };
        let all = event.jets(&self.params.jets_label)?;
        let good = event.jets(&self.params.good_jets_label)?;
        Ok(Some(clean_with_jet_id(
            met,
            all,
            good,
            &self.policy,
            self.params.sum_et_policy,
            self.label(),
        )))
    }
}

impl TriggerModule for MetCleanerUsingJetId {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::Producer
    }

    fn config(&self) -> &ModuleConfig {
        &self.config
    }

    fn process(&self, _ctx: &Context, event: &Event) -> Result<ModuleOutput, ModuleError> {
        match self.compute(event)? {
            Some(met) => Ok(ModuleOutput::Product(Collection::Mets(vec![met]))),
            None => Ok(ModuleOutput::Nothing),
        }
    }
}
