//! Per-event object store
//!
//! An [`Event`] holds named, typed, ordered collections. Modules read their
//! inputs by label; an absent collection (or an empty label) reads as an
//! empty sequence, while a collection of the wrong kind is an error.
//!
//! Events are read from JSON lines, one event per line:
//!
//! ```text
//! {"id": 1, "collections": {"hltAK4PFJets": {"type": "jets", "objects": [{"pt": 80.0, "eta": 1.1, "phi": 0.3}]}}}
//! ```

use crate::error::{EventError, ModuleError};
use jetmet_common::{EnergySum, Jet, PfCandidate, PfRecTrack, Track};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

/// A typed collection of reconstructed objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "objects", rename_all = "snake_case")]
pub enum Collection {
    Jets(Vec<Jet>),
    Tracks(Vec<Track>),
    PfRecTracks(Vec<PfRecTrack>),
    PfCandidates(Vec<PfCandidate>),
    Mets(Vec<EnergySum>),
}

impl Collection {
    pub fn kind(&self) -> &'static str {
        match self {
            Collection::Jets(_) => "jets",
            Collection::Tracks(_) => "tracks",
            Collection::PfRecTracks(_) => "pf_rec_tracks",
            Collection::PfCandidates(_) => "pf_candidates",
            Collection::Mets(_) => "mets",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Collection::Jets(v) => v.len(),
            Collection::Tracks(v) => v.len(),
            Collection::PfRecTracks(v) => v.len(),
            Collection::PfCandidates(v) => v.len(),
            Collection::Mets(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One collision event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,

    #[serde(default)]
    pub collections: BTreeMap<String, Collection>,
}

macro_rules! typed_accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty, $kind:literal) => {
        $(#[$doc])*
        pub fn $name(&self, label: &str) -> Result<&[$ty], ModuleError> {
            match self.lookup(label) {
                None => Ok(&[]),
                Some(Collection::$variant(objects)) => Ok(objects.as_slice()),
                Some(other) => Err(ModuleError::CollectionType {
                    label: label.to_string(),
                    expected: $kind,
                    found: other.kind(),
                }),
            }
        }
    };
}

impl Event {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            collections: BTreeMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, label: impl Into<String>, collection: Collection) -> Self {
        self.insert(label, collection);
        self
    }

    /// Store a collection, replacing any previous one with the same label
    pub fn insert(&mut self, label: impl Into<String>, collection: Collection) {
        self.collections.insert(label.into(), collection);
    }

    pub fn contains(&self, label: &str) -> bool {
        self.collections.contains_key(label)
    }

    /// Raw lookup; empty labels never match
    pub fn lookup(&self, label: &str) -> Option<&Collection> {
        if label.is_empty() {
            return None;
        }
        self.collections.get(label)
    }

    typed_accessor!(
        /// Jets stored under `label`
        jets, Jets, Jet, "jets"
    );
    typed_accessor!(tracks, Tracks, Track, "tracks");
    typed_accessor!(pf_rec_tracks, PfRecTracks, PfRecTrack, "pf_rec_tracks");
    typed_accessor!(pf_candidates, PfCandidates, PfCandidate, "pf_candidates");
    typed_accessor!(
        /// MET-like objects stored under `label`
        mets, Mets, EnergySum, "mets"
    );

    /// First MET-like object of a collection, if any
    pub fn first_met(&self, label: &str) -> Result<Option<&EnergySum>, ModuleError> {
        Ok(self.mets(label)?.first())
    }
}

/// Parse events from JSON lines; blank lines are skipped
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<Event>, EventError> {
    let mut events = Vec::with_capacity(1024);
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let event: Event = serde_json::from_str(trimmed).map_err(|source| EventError::Malformed {
            line: idx + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}

/// Read a JSON-lines event file
pub fn read_events_file(path: impl AsRef<Path>) -> Result<Vec<Event>, EventError> {
    let file = std::fs::File::open(path)?;
    read_events(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event::new(7)
            .with(
                "jets",
                Collection::Jets(vec![Jet::new(80.0, 1.0, 0.5), Jet::new(40.0, -2.0, 2.5)]),
            )
            .with("met", Collection::Mets(vec![EnergySum::new(10.0, -5.0, 200.0)]))
    }

    #[test]
    fn test_typed_access() {
        let event = sample_event();
        assert_eq!(event.jets("jets").unwrap().len(), 2);
        assert_eq!(event.first_met("met").unwrap().map(|m| m.sum_et), Some(200.0));
    }

    #[test]
    fn test_missing_and_empty_labels_read_as_empty() {
        let event = sample_event();
        assert!(event.jets("absent").unwrap().is_empty());
        assert!(event.pf_candidates("").unwrap().is_empty());
        assert!(event.first_met("absent").unwrap().is_none());
    }

    #[test]
    fn test_wrong_collection_kind_is_an_error() {
        let event = sample_event();
        let err = event.tracks("jets").unwrap_err();
        match err {
            ModuleError::CollectionType {
                expected, found, ..
            } => {
                assert_eq!(expected, "tracks");
                assert_eq!(found, "jets");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_events_json_lines() {
        let input = r#"{"id": 1, "collections": {"j": {"type": "jets", "objects": [{"pt": 30.0, "eta": 0.0, "phi": 1.0}]}}}

{"id": 2}
"#;
        let events = read_events(input.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].jets("j").unwrap()[0].pt, 30.0);
        assert!(events[1].collections.is_empty());
    }

    #[test]
    fn test_read_events_reports_line_number() {
        let input = "{\"id\": 1}\n{not json}\n";
        match read_events(input.as_bytes()) {
            Err(EventError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_collection_round_trip_tagging() {
        let c = Collection::PfCandidates(vec![PfCandidate::new(5.0, 0.0, 0.0, 1, 13)]);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "pf_candidates");
        assert_eq!(c.kind(), "pf_candidates");
        assert_eq!(c.len(), 1);
    }
}
