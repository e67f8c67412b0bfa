//! Module wrapper for the candidate diff checker

use crate::{compare_jets, compare_sums, DiffReport};
use jetmet_common::TriggerType;
use jetmet_core::{
    Context, Event, FilterDecision, ModuleConfig, ModuleError, ModuleKind, ModuleOutput,
    TriggerModule,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Diff checker parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffCheckerParams {
    /// Jets only; MET and MHT always compare magnitudes
    pub check_pt: bool,
    /// Selects the comparison: jet, met or mht
    pub trigger_type: TriggerType,
    pub input_tag1: String,
    pub input_tag2: String,
}

impl Default for DiffCheckerParams {
    fn default() -> Self {
        Self {
            check_pt: true,
            trigger_type: TriggerType::Mht,
            input_tag1: "hltPFMETProducer".to_string(),
            input_tag2: "hltPFMETProducer2".to_string(),
        }
    }
}

/// Logs every disagreement between two collections and always accepts
pub struct DiffChecker {
    config: ModuleConfig,
    params: DiffCheckerParams,
}

impl DiffChecker {
    pub const TYPE: &'static str = "candidate_diff_checker";

    pub fn new(config: ModuleConfig) -> Result<Self, ModuleError> {
        let params: DiffCheckerParams = config.params()?;
        match params.trigger_type {
            TriggerType::Jet | TriggerType::Met | TriggerType::Mht => {}
            other => {
                return Err(ModuleError::invalid_config(
                    &config.label,
                    format!("cannot compare candidates of type {:?}", other),
                ))
            }
        }

        info!(
            "{}: comparing {} against {} as {:?}",
            config.label, params.input_tag1, params.input_tag2, params.trigger_type
        );
        Ok(Self { config, params })
    }

    pub fn factory(config: ModuleConfig) -> Result<Arc<dyn TriggerModule>, ModuleError> {
        Ok(Arc::new(Self::new(config)?))
    }

    /// Compare the two configured collections in `event`
    pub fn check(&self, event: &Event) -> Result<DiffReport, ModuleError> {
        let (left, right) = (&self.params.input_tag1, &self.params.input_tag2);
        let report = match self.params.trigger_type {
            TriggerType::Jet => compare_jets(
                event.jets(left)?,
                event.jets(right)?,
                self.params.check_pt,
            ),
            TriggerType::Met => compare_sums(event.mets(left)?, event.mets(right)?, false),
            _ => compare_sums(event.mets(left)?, event.mets(right)?, true),
        };
        Ok(report)
    }

    fn log(&self, event: &Event, report: &DiffReport) {
        if report.size_mismatch() {
            error!(
                "{}: event {} size mismatch: {} has {}, {} has {}",
                self.label(),
                event.id,
                self.params.input_tag1,
                report.left_len,
                self.params.input_tag2,
                report.right_len
            );
            return;
        }
        for m in &report.mismatches {
            error!(
                "{}: event {} object {} {:?} differs: {} vs {}",
                self.label(),
                event.id,
                m.index,
                m.field,
                m.left,
                m.right
            );
        }
    }
}

impl TriggerModule for DiffChecker {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::Filter
    }

    fn config(&self) -> &ModuleConfig {
        &self.config
    }

    fn process(&self, ctx: &Context, event: &Event) -> Result<ModuleOutput, ModuleError> {
        let report = self.check(event)?;
        self.log(event, &report);
        if ctx.verbose && !report.is_clean() {
            if let Ok(json) = serde_json::to_string(&report) {
                info!("{}: {}", self.label(), json);
            }
        }

        let mut decision = FilterDecision::accept();
        decision.tag(self.label());
        Ok(ModuleOutput::Decision(decision))
    }
}
