//! JSON dataset format
//!
//! A dataset bundles code tables and records so that a store and a lookup can
//! be built from a single file:
//!
//! ```json
//! {
//!   "concepts": { "POSITIVE": 703 },
//!   "visit_types": { "ADULTINITIAL": 1 },
//!   "patients": [{ "id": 1, "birth_date": "2001-04-02" }],
//!   "visits": [{ "id": 1, "patient_id": 1, "visit_type": 1, "started_at": "2024-01-05T09:00:00" }],
//!   "events": []
//! }
//! ```

use crate::memory::{InMemoryStore, StaticLookup};
use indexmap::IndexMap;
use octofhir_cohort_types::{ClinicalEvent, ConceptId, Patient, PatientId, Visit, VisitTypeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u64 },

    #[error("{kind} {id} references unknown patient {patient}")]
    UnknownPatient {
        kind: &'static str,
        id: u64,
        patient: PatientId,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub concepts: IndexMap<String, ConceptId>,
    #[serde(default)]
    pub visit_types: IndexMap<String, VisitTypeId>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub visits: Vec<Visit>,
    #[serde(default)]
    pub events: Vec<ClinicalEvent>,
}

impl Dataset {
    /// Parse and validate a dataset from JSON text
    pub fn from_json(text: &str) -> Result<Self, DatasetError> {
        let dataset: Dataset = serde_json::from_str(text)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Read, parse and validate a dataset file
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Check id uniqueness and that every record belongs to a known patient
    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut patients = HashSet::new();
        for patient in &self.patients {
            if !patients.insert(patient.id) {
                return Err(DatasetError::DuplicateId {
                    kind: "patient",
                    id: patient.id.get(),
                });
            }
        }

        let mut visits = HashSet::new();
        for visit in &self.visits {
            if !visits.insert(visit.id) {
                return Err(DatasetError::DuplicateId {
                    kind: "visit",
                    id: visit.id.get(),
                });
            }
            if !patients.contains(&visit.patient_id) {
                return Err(DatasetError::UnknownPatient {
                    kind: "Visit",
                    id: visit.id.get(),
                    patient: visit.patient_id,
                });
            }
        }

        let mut events = HashSet::new();
        for event in &self.events {
            if !events.insert(event.id) {
                return Err(DatasetError::DuplicateId {
                    kind: "event",
                    id: event.id.get(),
                });
            }
            if !patients.contains(&event.patient_id) {
                return Err(DatasetError::UnknownPatient {
                    kind: "Event",
                    id: event.id.get(),
                    patient: event.patient_id,
                });
            }
        }

        tracing::debug!(
            patients = self.patients.len(),
            visits = self.visits.len(),
            events = self.events.len(),
            "dataset validated"
        );
        Ok(())
    }

    /// Split into a store and a lookup
    pub fn into_parts(self) -> (InMemoryStore, StaticLookup) {
        let store = InMemoryStore::new();
        for patient in self.patients {
            store.add_patient(patient);
        }
        for visit in self.visits {
            store.add_visit(visit);
        }
        for event in self.events {
            store.add_event(event);
        }
        (store, StaticLookup::from_tables(self.concepts, self.visit_types))
    }
}
