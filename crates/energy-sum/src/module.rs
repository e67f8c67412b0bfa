//! Module wrappers for the energy-sum producers and the MHT filter

use crate::{add_back_muons, Accumulator};
use jetmet_common::{CutPolicy, EnergySum, ObjectRef, ObjectSource, SourceFlags, TriggerType};
use jetmet_core::{
    Collection, Context, Event, FilterDecision, ModuleConfig, ModuleError, ModuleKind,
    ModuleOutput, TriggerModule,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Collection labels for every alternative input stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceLabels {
    pub jets_label: String,
    pub tracks_label: String,
    pub pf_rec_tracks_label: String,
    pub pf_candidates_label: String,
}

impl Default for SourceLabels {
    fn default() -> Self {
        Self {
            jets_label: "hltAntiKT5PFJets".to_string(),
            tracks_label: String::new(),
            pf_rec_tracks_label: String::new(),
            pf_candidates_label: String::new(),
        }
    }
}

impl SourceLabels {
    /// Label read for `source`
    pub fn for_source(&self, source: ObjectSource) -> &str {
        match source {
            ObjectSource::Jets => &self.jets_label,
            ObjectSource::Tracks => &self.tracks_label,
            ObjectSource::PfRecTracks => &self.pf_rec_tracks_label,
            ObjectSource::PfCandidatesCharged | ObjectSource::PfCandidates => {
                &self.pf_candidates_label
            }
        }
    }
}

/// Explicit `source` wins over the legacy `use_*` flags
fn resolve_source(explicit: Option<ObjectSource>, flags: &SourceFlags) -> ObjectSource {
    explicit.unwrap_or_else(|| flags.resolve())
}

fn check_label(label: &str, source: ObjectSource, labels: &SourceLabels) -> Result<(), ModuleError> {
    if labels.for_source(source).is_empty() {
        return Err(ModuleError::invalid_config(
            label,
            format!("source '{}' selected but its collection label is empty", source.name()),
        ));
    }
    Ok(())
}

fn check_cut(label: &str, policy: &CutPolicy) -> Result<(), ModuleError> {
    policy
        .validate()
        .map_err(|e| ModuleError::invalid_config(label, e.to_string()))
}

/// Fold every passing object of the selected source into `acc`.
///
/// Only jets honour `use_pt = false`; the other streams always cut on pt.
fn accumulate_source(
    acc: &mut Accumulator,
    event: &Event,
    source: ObjectSource,
    labels: &SourceLabels,
    policy: &CutPolicy,
) -> Result<(), ModuleError> {
    let label = labels.for_source(source);
    let pt_policy = CutPolicy {
        use_pt: true,
        ..*policy
    };
    match source {
        ObjectSource::Jets => {
            for jet in event.jets(label)? {
                acc.add(jet, policy);
            }
        }
        ObjectSource::Tracks => {
            for track in event.tracks(label)? {
                acc.add(track, &pt_policy);
            }
        }
        ObjectSource::PfRecTracks => {
            for track in event.pf_rec_tracks(label)? {
                acc.add(track, &pt_policy);
            }
        }
        ObjectSource::PfCandidatesCharged => {
            for cand in event.pf_candidates(label)?.iter().filter(|c| c.charge != 0) {
                acc.add(cand, &pt_policy);
            }
        }
        ObjectSource::PfCandidates => {
            for cand in event.pf_candidates(label)? {
                acc.add(cand, &pt_policy);
            }
        }
    }
    Ok(())
}

/// Muon exclusion needs a particle-flow candidate collection
fn muon_exclusion(label: &str, requested: bool, labels: &SourceLabels) -> bool {
    if requested && labels.pf_candidates_label.is_empty() {
        info!("{}: no pf_candidates_label configured, muon exclusion disabled", label);
        return false;
    }
    requested
}

fn product(sum: EnergySum) -> ModuleOutput {
    ModuleOutput::Product(Collection::Mets(vec![sum]))
}

/// MHT producer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MhtProducerParams {
    /// Explicit input stream; overrides the `use_*` flags
    pub source: Option<ObjectSource>,
    #[serde(flatten)]
    pub flags: SourceFlags,
    pub use_pt: bool,
    pub exclude_pf_muons: bool,
    pub min_pt_jet: f64,
    pub max_eta_jet: f64,
    #[serde(flatten)]
    pub labels: SourceLabels,
}

impl Default for MhtProducerParams {
    fn default() -> Self {
        Self {
            source: None,
            flags: SourceFlags::default(),
            use_pt: true,
            exclude_pf_muons: false,
            min_pt_jet: 0.0,
            max_eta_jet: 999.0,
            labels: SourceLabels::default(),
        }
    }
}

/// Missing transverse momentum of the selected objects
pub struct MhtProducer {
    config: ModuleConfig,
    source: ObjectSource,
    policy: CutPolicy,
    exclude_pf_muons: bool,
    labels: SourceLabels,
}

impl MhtProducer {
    pub const TYPE: &'static str = "mht_producer";

    pub fn new(config: ModuleConfig) -> Result<Self, ModuleError> {
        let params: MhtProducerParams = config.params()?;
        let source = resolve_source(params.source, &params.flags);
        let policy = CutPolicy::new(params.use_pt, params.min_pt_jet, params.max_eta_jet);
        check_cut(&config.label, &policy)?;
        check_label(&config.label, source, &params.labels)?;
        let exclude_pf_muons =
            muon_exclusion(&config.label, params.exclude_pf_muons, &params.labels);

        info!(
            "{}: source={} min_pt={} max_eta={} use_pt={} exclude_pf_muons={}",
            config.label,
            source.name(),
            policy.min_pt,
            policy.max_eta,
            policy.use_pt,
            exclude_pf_muons
        );

        Ok(Self {
            config,
            source,
            policy,
            exclude_pf_muons,
            labels: params.labels,
        })
    }

    pub fn factory(config: ModuleConfig) -> Result<Arc<dyn TriggerModule>, ModuleError> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn source(&self) -> ObjectSource {
        self.source
    }

    /// MHT of one event
    pub fn compute(&self, event: &Event) -> Result<EnergySum, ModuleError> {
        let mut acc = Accumulator::new();
        accumulate_source(&mut acc, event, self.source, &self.labels, &self.policy)?;
        if self.exclude_pf_muons {
            add_back_muons(&mut acc, event.pf_candidates(&self.labels.pf_candidates_label)?);
        }
        Ok(acc.finish())
    }
}

impl TriggerModule for MhtProducer {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::Producer
    }

    fn config(&self) -> &ModuleConfig {
        &self.config
    }

    fn process(&self, ctx: &Context, event: &Event) -> Result<ModuleOutput, ModuleError> {
        let mht = self.compute(event)?;
        if ctx.verbose {
            info!("{}: mht={:.3} sum_et={:.3}", self.label(), mht.magnitude(), mht.sum_et);
        }
        Ok(product(mht))
    }
}

/// HT/MHT producer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HtMhtProducerParams {
    pub source: Option<ObjectSource>,
    #[serde(flatten)]
    pub flags: SourceFlags,
    pub use_pt: bool,
    pub exclude_pf_muons: bool,
    /// Fewer passing jets than this zeroes HT
    pub min_n_jet_ht: usize,
    /// Fewer passing jets than this zeroes MHT
    pub min_n_jet_mht: usize,
    pub min_pt_jet_ht: f64,
    pub min_pt_jet_mht: f64,
    pub max_eta_jet_ht: f64,
    pub max_eta_jet_mht: f64,
    #[serde(flatten)]
    pub labels: SourceLabels,
}

impl Default for HtMhtProducerParams {
    fn default() -> Self {
        Self {
            source: None,
            flags: SourceFlags::default(),
            use_pt: false,
            exclude_pf_muons: false,
            min_n_jet_ht: 0,
            min_n_jet_mht: 0,
            min_pt_jet_ht: 40.0,
            min_pt_jet_mht: 30.0,
            max_eta_jet_ht: 3.0,
            max_eta_jet_mht: 5.0,
            labels: SourceLabels::default(),
        }
    }
}

/// HT in `sum_et` and MHT in `(px, py)`, each with its own cut
pub struct HtMhtProducer {
    config: ModuleConfig,
    source: ObjectSource,
    ht_policy: CutPolicy,
    mht_policy: CutPolicy,
    min_n_jet_ht: usize,
    min_n_jet_mht: usize,
    exclude_pf_muons: bool,
    labels: SourceLabels,
}

impl HtMhtProducer {
    pub const TYPE: &'static str = "ht_mht_producer";

    pub fn new(config: ModuleConfig) -> Result<Self, ModuleError> {
        let params: HtMhtProducerParams = config.params()?;
        let source = resolve_source(params.source, &params.flags);
        let ht_policy = CutPolicy::new(params.use_pt, params.min_pt_jet_ht, params.max_eta_jet_ht);
        let mht_policy =
            CutPolicy::new(params.use_pt, params.min_pt_jet_mht, params.max_eta_jet_mht);
        check_cut(&config.label, &ht_policy)?;
        check_cut(&config.label, &mht_policy)?;
        check_label(&config.label, source, &params.labels)?;
        let exclude_pf_muons =
            muon_exclusion(&config.label, params.exclude_pf_muons, &params.labels);

        info!(
            "{}: source={} ht cut=({}, {}) mht cut=({}, {}) min_n_jet=({}, {})",
            config.label,
            source.name(),
            ht_policy.min_pt,
            ht_policy.max_eta,
            mht_policy.min_pt,
            mht_policy.max_eta,
            params.min_n_jet_ht,
            params.min_n_jet_mht
        );

        Ok(Self {
            config,
            source,
            ht_policy,
            mht_policy,
            min_n_jet_ht: params.min_n_jet_ht,
            min_n_jet_mht: params.min_n_jet_mht,
            exclude_pf_muons,
            labels: params.labels,
        })
    }

    pub fn factory(config: ModuleConfig) -> Result<Arc<dyn TriggerModule>, ModuleError> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn compute(&self, event: &Event) -> Result<EnergySum, ModuleError> {
        let mut ht = Accumulator::new();
        accumulate_source(&mut ht, event, self.source, &self.labels, &self.ht_policy)?;
        let mut mht = Accumulator::new();
        accumulate_source(&mut mht, event, self.source, &self.labels, &self.mht_policy)?;

        let mut ht_value = ht.finish().sum_et;
        let mut mht_vector = if self.source.is_jets() && mht.passed() < self.min_n_jet_mht {
            debug!(
                "{}: {} jets for MHT, {} required",
                self.label(),
                mht.passed(),
                self.min_n_jet_mht
            );
            (0.0, 0.0)
        } else {
            let sum = mht.finish();
            (sum.px, sum.py)
        };
        if self.source.is_jets() && ht.passed() < self.min_n_jet_ht {
            debug!(
                "{}: {} jets for HT, {} required",
                self.label(),
                ht.passed(),
                self.min_n_jet_ht
            );
            ht_value = 0.0;
        }

        if self.exclude_pf_muons {
            let mut correction = Accumulator::new();
            add_back_muons(
                &mut correction,
                event.pf_candidates(&self.labels.pf_candidates_label)?,
            );
            let correction = correction.finish();
            mht_vector.0 += correction.px;
            mht_vector.1 += correction.py;
        }

        Ok(EnergySum::new(mht_vector.0, mht_vector.1, ht_value))
    }
}

impl TriggerModule for HtMhtProducer {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn kind(&self) -> ModuleKind {
        ModuleKind::Producer
    }

    fn config(&self) -> &ModuleConfig {
        &self.config
    }

    fn process(&self, ctx: &Context, event: &Event) -> Result<ModuleOutput, ModuleError> {
        let sum = self.compute(event)?;
        if ctx.verbose {
            info!("{}: ht={:.3} mht={:.3}", self.label(), sum.sum_et, sum.magnitude());
        }
        Ok(product(sum))
    }
}

/// Track MET producer parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackMetProducerParams {
    /// Particle-flow tracks instead of charged candidates
    pub use_tracks: bool,
    pub min_pt: f64,
    pub max_eta: f64,
    pub pf_candidates_label: String,
    pub pf_rec_tracks_label: String,
}

impl Default for TrackMetProducerParams {
    fn default() -> Self {
        Self {
            use_tracks: false,
            min_pt: 0.0,
            max_eta: 9999.0,
            pf_candidates_label: "hltPFNoPileUp".to_string(),
            pf_rec_tracks_label: "hltLightPFTracks".to_string(),
        }
    }
}

/// Missing momentum of charged particles only
pub struct TrackMetProducer {
    config: ModuleConfig,
    source: ObjectSource,
    policy: CutPolicy,
    labels: SourceLabels,
}

impl TrackMetProducer {
    pub const TYPE: &'static str = "track_met_producer";

    pub fn new(config: ModuleConfig) -> Result<Self, ModuleError> {
        let params: TrackMetProducerParams = config.params()?;
        let source = if params.use_tracks {
            ObjectSource::PfRecTracks
        } else {
            ObjectSource::PfCandidatesCharged
        };
        let policy = CutPolicy::new(true, params.min_pt, params.max_eta);
        check_cut(&config.label, &policy)?;
        let labels = SourceLabels {
            jets_label: String::new(),
            tracks_label: String::new(),
            pf_rec_tracks_label: params.pf_rec_tracks_label,
            pf_candidates_label: params.pf_candidates_label,
        };
        check_label(&config.label, source, &labels)?;

        info!(
            "{}: source={} min_pt={} max_eta={}",
            config.label,
            source.name(),
            policy.min_pt,
            policy.max_eta
        );

        Ok(Self {
            config,
            source,
            policy,
            labels,
        })
    }

    pub fn factory(config: ModuleConfig) -> Result<Arc<dyn TriggerModule>, ModuleError> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn compute(&self, event: &Event) -> Result<EnergySum, ModuleError> {
        let mut acc = Accumulator::new();
        accumulate_source(&mut acc, event, self.source, &self.labels, &self.policy)?;
        Ok(acc.finish())
    }
}

impl TriggerModule for TrackMetProducer {
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
        Ok(product(self.compute(event)?))
    }
}

/// MHT filter parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MhtFilterParams {
    /// MET-like inputs, one threshold each
    pub mht_labels: Vec<String>,
    pub min_mht: Vec<f64>,
}

/// Accepts when any input exceeds its own MHT threshold
pub struct MhtFilter {
    config: ModuleConfig,
    requirements: Vec<(String, f64)>,
}

impl MhtFilter {
    pub const TYPE: &'static str = "mht_filter";

    pub fn new(config: ModuleConfig) -> Result<Self, ModuleError> {
        let params: MhtFilterParams = config.params()?;
        if params.mht_labels.len() != params.min_mht.len() {
            return Err(ModuleError::invalid_config(
                &config.label,
                format!(
                    "mht_labels has {} entries but min_mht has {}",
                    params.mht_labels.len(),
                    params.min_mht.len()
                ),
            ));
        }
        if params.mht_labels.is_empty() {
            return Err(ModuleError::invalid_config(&config.label, "no MHT inputs configured"));
        }

        let requirements: Vec<(String, f64)> =
            params.mht_labels.into_iter().zip(params.min_mht).collect();
        info!("{}: {} MHT requirement(s)", config.label, requirements.len());

        Ok(Self {
            config,
            requirements,
        })
    }

    pub fn factory(config: ModuleConfig) -> Result<Arc<dyn TriggerModule>, ModuleError> {
        Ok(Arc::new(Self::new(config)?))
    }

    pub fn decide(&self, event: &Event) -> Result<FilterDecision, ModuleError> {
        let mut decision = FilterDecision::reject();
        for (label, min_mht) in &self.requirements {
            decision.tag(label.as_str());
            if let Some(mht) = event.first_met(label)? {
                if mht.magnitude() > *min_mht {
                    decision.accept = true;
                    decision.add_object(TriggerType::Mht, label, ObjectRef(0));
                }
            }
        }
        Ok(decision)
    }
}

impl TriggerModule for MhtFilter {
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
    use jetmet_common::{Jet, PfCandidate, PfRecTrack, Track};

    fn config<P: Serialize>(module_type: &str, params: &P) -> ModuleConfig {
        ModuleConfig::new("hltTest", module_type)
            .with_params(params)
            .unwrap()
    }

    fn jets_event() -> Event {
        Event::new(1).with(
            "hltAntiKT5PFJets",
            Collection::Jets(vec![
                Jet::new(100.0, 0.0, 0.0),
                Jet::new(40.0, 1.0, std::f64::consts::FRAC_PI_2),
                Jet::new(25.0, 4.0, 0.0),
            ]),
        )
    }

    #[test]
    fn test_mht_producer_defaults_read_jets() {
        let producer = MhtProducer::new(ModuleConfig::new("hltMht", MhtProducer::TYPE)).unwrap();
        assert_eq!(producer.source(), ObjectSource::Jets);

        let mht = producer.compute(&jets_event()).unwrap();
        assert!((mht.px + 125.0).abs() < 1e-9);
        assert!((mht.py + 40.0).abs() < 1e-9);
        assert!((mht.sum_et - 165.0).abs() < 1e-9);
    }

    #[test]
    fn test_mht_producer_cut() {
        let params = MhtProducerParams {
            min_pt_jet: 30.0,
            max_eta_jet: 3.0,
            ..Default::default()
        };
        let producer = MhtProducer::new(config(MhtProducer::TYPE, &params)).unwrap();
        let mht = producer.compute(&jets_event()).unwrap();
        assert!((mht.px + 100.0).abs() < 1e-9);
        assert!((mht.sum_et - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_charged_candidates_skip_neutrals_and_exclude_muons() {
        let params = MhtProducerParams {
            flags: SourceFlags {
                use_pf_candidates_charged: true,
                ..Default::default()
            },
            exclude_pf_muons: true,
            labels: SourceLabels {
                pf_candidates_label: "pf".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let producer = MhtProducer::new(config(MhtProducer::TYPE, &params)).unwrap();
        assert_eq!(producer.source(), ObjectSource::PfCandidatesCharged);

        let event = Event::new(1).with(
            "pf",
            Collection::PfCandidates(vec![
                PfCandidate::new(10.0, 0.0, 0.0, 1, 211),
                PfCandidate::new(50.0, 0.0, 0.0, 0, 22),
                PfCandidate::new(15.0, 0.0, 0.0, -1, 13),
            ]),
        );
        let mht = producer.compute(&event).unwrap();
        // pion and muon subtracted, muon added back, photon skipped
        assert!((mht.px + 10.0).abs() < 1e-9);
        assert!((mht.sum_et - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_muon_exclusion_without_candidates_is_noop() {
        let params = MhtProducerParams {
            exclude_pf_muons: true,
            ..Default::default()
        };
        let producer = MhtProducer::new(config(MhtProducer::TYPE, &params)).unwrap();
        let plain = MhtProducer::new(ModuleConfig::new("p", MhtProducer::TYPE)).unwrap();
        assert_eq!(
            producer.compute(&jets_event()).unwrap(),
            plain.compute(&jets_event()).unwrap()
        );
    }

    #[test]
    fn test_explicit_source_overrides_flags() {
        let params = MhtProducerParams {
            source: Some(ObjectSource::Tracks),
            flags: SourceFlags {
                use_pf_rec_tracks: true,
                ..Default::default()
            },
            labels: SourceLabels {
                tracks_label: "tracks".into(),
                pf_rec_tracks_label: "pftracks".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let producer = MhtProducer::new(config(MhtProducer::TYPE, &params)).unwrap();
        assert_eq!(producer.source(), ObjectSource::Tracks);
    }

    #[test]
    fn test_selected_source_without_label_is_config_error() {
        let params = MhtProducerParams {
            flags: SourceFlags {
                use_tracks: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = MhtProducer::new(config(MhtProducer::TYPE, &params)).err();
        assert!(matches!(err, Some(ModuleError::InvalidConfig { .. })));
    }

    #[test]
    fn test_tracks_always_cut_on_pt() {
        let params = MhtProducerParams {
            source: Some(ObjectSource::Tracks),
            use_pt: false,
            min_pt_jet: 5.0,
            labels: SourceLabels {
                tracks_label: "tracks".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let producer = MhtProducer::new(config(MhtProducer::TYPE, &params)).unwrap();
        let event = Event::new(1).with(
            "tracks",
            Collection::Tracks(vec![Track::new(6.0, 0.0, 0.0, 1), Track::new(4.0, 0.0, 0.0, -1)]),
        );
        let mht = producer.compute(&event).unwrap();
        assert!((mht.px + 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_params_from_yaml_flags() {
        let mut cfg = ModuleConfig::new("hltMht", MhtProducer::TYPE);
        cfg.params = serde_yaml::from_str(
            "use_pf_rec_tracks: true\npf_rec_tracks_label: hltLightPFTracks\nmin_pt_jet: 1.5\n",
        )
        .unwrap();
        let params: MhtProducerParams = cfg.params().unwrap();
        assert!(params.flags.use_pf_rec_tracks);
        assert_eq!(params.labels.jets_label, "hltAntiKT5PFJets");
        assert_eq!(params.min_pt_jet, 1.5);
        assert_eq!(MhtProducer::new(cfg).unwrap().source(), ObjectSource::PfRecTracks);
    }

    #[test]
    fn test_ht_mht_separate_cuts() {
        let params = HtMhtProducerParams {
            use_pt: true,
            min_pt_jet_ht: 50.0,
            min_pt_jet_mht: 30.0,
            max_eta_jet_ht: 3.0,
            max_eta_jet_mht: 5.0,
            ..Default::default()
        };
        let producer = HtMhtProducer::new(config(HtMhtProducer::TYPE, &params)).unwrap();
        let sum = producer.compute(&jets_event()).unwrap();
        assert!((sum.sum_et - 100.0).abs() < 1e-9);
        assert!((sum.px + 100.0).abs() < 1e-9);
        assert!((sum.py + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_ht_mht_multiplicity_zeroes_quantities() {
        let params = HtMhtProducerParams {
            use_pt: true,
            min_n_jet_ht: 2,
            min_n_jet_mht: 4,
            min_pt_jet_ht: 30.0,
            min_pt_jet_mht: 20.0,
            ..Default::default()
        };
        let producer = HtMhtProducer::new(config(HtMhtProducer::TYPE, &params)).unwrap();
        let sum = producer.compute(&jets_event()).unwrap();
        // two jets pass the HT cut, three the MHT cut
        assert!((sum.sum_et - 140.0).abs() < 1e-9);
        assert_eq!((sum.px, sum.py), (0.0, 0.0));
    }

    #[test]
    fn test_track_met_uses_pf_rec_tracks() {
        let params = TrackMetProducerParams {
            use_tracks: true,
            min_pt: 1.0,
            max_eta: 2.5,
            ..Default::default()
        };
        let producer = TrackMetProducer::new(config(TrackMetProducer::TYPE, &params)).unwrap();
        let event = Event::new(1).with(
            "hltLightPFTracks",
            Collection::PfRecTracks(vec![
                PfRecTrack {
                    track: Track::new(3.0, 0.0, 0.0, 1),
                },
                PfRecTrack {
                    track: Track::new(3.0, 2.6, 0.0, 1),
                },
            ]),
        );
        let met = producer.compute(&event).unwrap();
        assert!((met.px + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_track_met_charged_candidates_by_default() {
        let producer =
            TrackMetProducer::new(ModuleConfig::new("hltTrackMet", TrackMetProducer::TYPE))
                .unwrap();
        let event = Event::new(1).with(
            "hltPFNoPileUp",
            Collection::PfCandidates(vec![
                PfCandidate::new(8.0, 0.0, 0.0, -1, 211),
                PfCandidate::new(20.0, 0.0, 0.0, 0, 130),
            ]),
        );
        let met = producer.compute(&event).unwrap();
        assert!((met.px + 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_mht_filter_any_input_accepts() {
        let params = MhtFilterParams {
            mht_labels: vec!["a".into(), "b".into()],
            min_mht: vec![100.0, 50.0],
        };
        let filter = MhtFilter::new(config(MhtFilter::TYPE, &params)).unwrap();

        let event = Event::new(1)
            .with("a", Collection::Mets(vec![EnergySum::new(60.0, 0.0, 0.0)]))
            .with("b", Collection::Mets(vec![EnergySum::new(0.0, 60.0, 0.0)]));
        let decision = filter.decide(&event).unwrap();
        assert!(decision.accept);
        assert_eq!(decision.collection_tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(decision.objects.len(), 1);
        assert_eq!(decision.objects[0].collection, "b");
        assert_eq!(decision.objects[0].trigger_type, TriggerType::Mht);

        let event = Event::new(2).with("a", Collection::Mets(vec![EnergySum::new(60.0, 0.0, 0.0)]));
        assert!(!filter.decide(&event).unwrap().accept);
    }

    #[test]
    fn test_mht_filter_length_mismatch_is_config_error() {
        let params = MhtFilterParams {
            mht_labels: vec!["a".into()],
            min_mht: vec![100.0, 50.0],
        };
        assert!(MhtFilter::new(config(MhtFilter::TYPE, &params)).is_err());
    }
}
