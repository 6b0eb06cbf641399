//! In-memory store and lookup
//!
//! Used by the CLI (loaded from a `Dataset`) and by tests.

use crate::provider::{ClinicalStore, DataAccessResult, LookupService};
use indexmap::IndexMap;
use octofhir_cohort_types::{ClinicalEvent, ConceptId, Patient, PatientId, Visit, VisitTypeId};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Records {
    patients: Vec<Patient>,
    visits: Vec<Visit>,
    events: Vec<ClinicalEvent>,
}

/// Store keeping every record in memory.
///
/// Cloning is cheap and clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a patient
    pub fn add_patient(&self, patient: Patient) {
        self.records.write().patients.push(patient);
    }

    /// Add a visit
    pub fn add_visit(&self, visit: Visit) {
        self.records.write().visits.push(visit);
    }

    /// Add a clinical event
    pub fn add_event(&self, event: ClinicalEvent) {
        self.records.write().events.push(event);
    }

    /// Remove every record
    pub fn clear(&self) {
        *self.records.write() = Records::default();
    }

    pub fn patient_count(&self) -> usize {
        self.records.read().patients.len()
    }
}

impl ClinicalStore for InMemoryStore {
    fn patients(&self) -> DataAccessResult<Vec<Patient>> {
        Ok(self.records.read().patients.clone())
    }

    fn visits(&self) -> DataAccessResult<Vec<Visit>> {
        Ok(self.records.read().visits.clone())
    }

    fn events(&self) -> DataAccessResult<Vec<ClinicalEvent>> {
        Ok(self.records.read().events.clone())
    }

    fn visits_for(&self, patient: PatientId) -> DataAccessResult<Vec<Visit>> {
        Ok(self
            .records
            .read()
            .visits
            .iter()
            .filter(|visit| visit.patient_id == patient)
            .cloned()
            .collect())
    }

    fn events_for(&self, patient: PatientId) -> DataAccessResult<Vec<ClinicalEvent>> {
        Ok(self
            .records
            .read()
            .events
            .iter()
            .filter(|event| event.patient_id == patient)
            .cloned()
            .collect())
    }
}

/// Lookup answering from fixed code tables
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    concepts: IndexMap<String, ConceptId>,
    visit_types: IndexMap<String, VisitTypeId>,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(
        concepts: IndexMap<String, ConceptId>,
        visit_types: IndexMap<String, VisitTypeId>,
    ) -> Self {
        Self {
            concepts,
            visit_types,
        }
    }

    pub fn with_concept(mut self, code: impl Into<String>, id: ConceptId) -> Self {
        self.concepts.insert(code.into(), id);
        self
    }

    pub fn with_visit_type(mut self, code: impl Into<String>, id: VisitTypeId) -> Self {
        self.visit_types.insert(code.into(), id);
        self
    }
}

impl LookupService for StaticLookup {
    fn resolve_concept(&self, code: &str) -> Option<ConceptId> {
        self.concepts.get(code).copied()
    }

    fn resolve_visit_type(&self, code: &str) -> Option<VisitTypeId> {
        self.visit_types.get(code).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use octofhir_cohort_types::{EventId, VisitId};

    fn at(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(9, 0, 0).unwrap()
    }

    #[test]
    fn test_store_scopes_by_patient() {
        let store = InMemoryStore::new();
        store.add_patient(Patient::new(PatientId(1), None));
        store.add_patient(Patient::new(PatientId(2), None));
        for (id, patient) in [(1, 1), (2, 2), (3, 1)] {
            store.add_visit(Visit {
                id: VisitId(id),
                patient_id: PatientId(patient),
                visit_type: VisitTypeId(1),
                location: None,
                provider: None,
                started_at: at(2024, 1, id as u32),
                voided: false,
            });
        }
        store.add_event(ClinicalEvent {
            id: EventId(1),
            patient_id: PatientId(2),
            concept: ConceptId(10),
            value_coded: None,
            visit: None,
            location: None,
            observed_at: at(2024, 1, 1),
            voided: true,
        });

        assert_eq!(store.visits_for(PatientId(1)).unwrap().len(), 2);
        assert_eq!(store.visits_for(PatientId(3)).unwrap().len(), 0);
        // voided rows are still listed
        assert_eq!(store.events_for(PatientId(2)).unwrap().len(), 1);
    }

    #[test]
    fn test_clones_share_records() {
        let store = InMemoryStore::new();
        let other = store.clone();
        other.add_patient(Patient::new(PatientId(5), None));
        assert_eq!(store.patient_count(), 1);
        store.clear();
        assert_eq!(other.patient_count(), 0);
    }

    #[test]
    fn test_static_lookup() {
        let lookup = StaticLookup::new()
            .with_concept("POSITIVE", ConceptId(703))
            .with_visit_type("ADULTINITIAL", VisitTypeId(1));

        assert_eq!(lookup.resolve_concept("POSITIVE"), Some(ConceptId(703)));
        assert_eq!(lookup.resolve_concept("positive"), None);
        assert_eq!(lookup.resolve_visit_type("ADULTINITIAL"), Some(VisitTypeId(1)));
        assert_eq!(lookup.resolve_visit_type("ADULTRETURN"), None);
    }
}
