//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use octofhir_cohort::prelude::*;
use octofhir_cohort::eval::register::{
    ADULT_INITIAL_VISIT, ADULT_RETURN_VISIT, CONFIRMATORY_TEST, FIRST_RAPID_TEST, POSITIVE,
    SECOND_RAPID_TEST,
};
use octofhir_cohort::model::DataAccessResult;
use octofhir_cohort::types::{EventId, LocationId, ProviderId, VisitId};
use parking_lot::Mutex;
use std::sync::Arc;

pub const ADULT_INITIAL: VisitTypeId = VisitTypeId(1);
pub const ADULT_RETURN: VisitTypeId = VisitTypeId(2);
pub const PEDIATRIC: VisitTypeId = VisitTypeId(3);

pub const RAPID_1: ConceptId = ConceptId(1040);
pub const RAPID_2: ConceptId = ConceptId(1047);
pub const ELISA: ConceptId = ConceptId(1042);
pub const POSITIVE_ANSWER: ConceptId = ConceptId(703);
pub const NEGATIVE_ANSWER: ConceptId = ConceptId(664);
pub const WEIGHT: ConceptId = ConceptId(5089);

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(9, 0, 0).unwrap()
}

/// Evaluation date used throughout the scenarios
pub fn evaluation_date() -> NaiveDate {
    date(2024, 6, 1)
}

/// Lookup with every code the register criteria needs
pub fn full_lookup() -> StaticLookup {
    StaticLookup::new()
        .with_visit_type(ADULT_INITIAL_VISIT, ADULT_INITIAL)
        .with_visit_type(ADULT_RETURN_VISIT, ADULT_RETURN)
        .with_visit_type("PEDSINITIAL", PEDIATRIC)
        .with_concept(FIRST_RAPID_TEST, RAPID_1)
        .with_concept(SECOND_RAPID_TEST, RAPID_2)
        .with_concept(CONFIRMATORY_TEST, ELISA)
        .with_concept(POSITIVE, POSITIVE_ANSWER)
}

/// Builder for an in-memory store with sequential record ids
#[derive(Default)]
pub struct Records {
    store: InMemoryStore,
    next_visit: u64,
    next_event: u64,
}

impl Records {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patient(self, id: u64, birth_date: Option<NaiveDate>) -> Self {
        self.store.add_patient(Patient::new(PatientId(id), birth_date));
        self
    }

    pub fn visit(self, patient: u64, visit_type: VisitTypeId, started_at: NaiveDateTime) -> Self {
        self.visit_with(patient, visit_type, started_at, None, false)
    }

    pub fn voided_visit(self, patient: u64, visit_type: VisitTypeId, started_at: NaiveDateTime) -> Self {
        self.visit_with(patient, visit_type, started_at, None, true)
    }

    pub fn visit_with(
        mut self,
        patient: u64,
        visit_type: VisitTypeId,
        started_at: NaiveDateTime,
        location: Option<u64>,
        voided: bool,
    ) -> Self {
        self.next_visit += 1;
        self.store.add_visit(Visit {
            id: VisitId(self.next_visit),
            patient_id: PatientId(patient),
            visit_type,
            location: location.map(LocationId),
            provider: Some(ProviderId(1)),
            started_at,
            voided,
        });
        self
    }

    pub fn coded(self, patient: u64, concept: ConceptId, value: ConceptId, observed_at: NaiveDateTime) -> Self {
        self.event(patient, concept, Some(value), observed_at, false)
    }

    pub fn voided_coded(
        self,
        patient: u64,
        concept: ConceptId,
        value: ConceptId,
        observed_at: NaiveDateTime,
    ) -> Self {
        self.event(patient, concept, Some(value), observed_at, true)
    }

    pub fn event(
        mut self,
        patient: u64,
        concept: ConceptId,
        value_coded: Option<ConceptId>,
        observed_at: NaiveDateTime,
        voided: bool,
    ) -> Self {
        self.next_event += 1;
        self.store.add_event(ClinicalEvent {
            id: EventId(self.next_event),
            patient_id: PatientId(patient),
            concept,
            value_coded,
            visit: None,
            location: None,
            observed_at,
            voided,
        });
        self
    }

    pub fn build(self) -> Arc<InMemoryStore> {
        Arc::new(self.store)
    }
}

/// The four reference patients:
/// - P has an adult initial visit and nothing else
/// - Q has a positive second rapid test and no qualifying visit
/// - R has a positive ELISA and is 15 at the evaluation date
/// - S has only voided qualifying records
pub const P: u64 = 1;
pub const Q: u64 = 2;
pub const R: u64 = 3;
pub const S: u64 = 4;

pub fn reference_records() -> Records {
    Records::new()
        .patient(P, Some(date(1990, 1, 1)))
        .patient(Q, Some(date(1985, 3, 10)))
        .patient(R, Some(date(2009, 1, 15)))
        .patient(S, Some(date(1970, 7, 7)))
        .visit(P, ADULT_INITIAL, at(2024, 1, 5))
        .coded(Q, RAPID_2, POSITIVE_ANSWER, at(2024, 2, 1))
        .coded(R, ELISA, POSITIVE_ANSWER, at(2024, 3, 1))
        .voided_visit(S, ADULT_RETURN, at(2024, 1, 9))
        .voided_coded(S, RAPID_1, POSITIVE_ANSWER, at(2024, 1, 9))
}

pub fn cohort(ids: &[u64]) -> Cohort {
    Cohort::from_ids(ids.iter().copied().map(PatientId))
}

/// Store whose every read fails
#[derive(Debug, Default)]
pub struct FailingStore;

impl ClinicalStore for FailingStore {
    fn patients(&self) -> DataAccessResult<Vec<Patient>> {
        Err(DataAccessError::unavailable("connection refused"))
    }

    fn visits(&self) -> DataAccessResult<Vec<Visit>> {
        Err(DataAccessError::unavailable("connection refused"))
    }

    fn events(&self) -> DataAccessResult<Vec<ClinicalEvent>> {
        Err(DataAccessError::unavailable("connection refused"))
    }
}

/// Lookup that records every code it is asked for
pub struct RecordingLookup {
    inner: StaticLookup,
    requests: Mutex<Vec<String>>,
}

impl RecordingLookup {
    pub fn new(inner: StaticLookup) -> Self {
        Self {
            inner,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl LookupService for RecordingLookup {
    fn resolve_concept(&self, code: &str) -> Option<ConceptId> {
        self.requests.lock().push(code.to_string());
        self.inner.resolve_concept(code)
    }

    fn resolve_visit_type(&self, code: &str) -> Option<VisitTypeId> {
        self.requests.lock().push(code.to_string());
        self.inner.resolve_visit_type(code)
    }
}
