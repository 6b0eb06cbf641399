//! Collaborator traits for cohort evaluation and record queries

use octofhir_cohort_types::{ClinicalEvent, ConceptId, Patient, PatientId, Visit, VisitTypeId};
use thiserror::Error;

/// Result type for store access
pub type DataAccessResult<T> = Result<T, DataAccessError>;

/// Failure of the underlying patient-records store.
///
/// Never retried at this layer; retry policy belongs to the store owner.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataAccessError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt record {record}: {message}")]
    Corrupt { record: String, message: String },

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl DataAccessError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn corrupt(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupt {
            record: record.into(),
            message: message.into(),
        }
    }
}

/// Read-only access to the patient-records store.
///
/// Record listings include voided rows; filtering them out is the caller's
/// job so that every query applies the rule in one place. Implementations
/// are expected to give snapshot-consistent reads for the duration of one
/// evaluation.
pub trait ClinicalStore: Send + Sync {
    /// Every patient known to the store
    fn patients(&self) -> DataAccessResult<Vec<Patient>>;

    /// Every visit, for all patients
    fn visits(&self) -> DataAccessResult<Vec<Visit>>;

    /// Every clinical event, for all patients
    fn events(&self) -> DataAccessResult<Vec<ClinicalEvent>>;

    /// Visits of a single patient
    fn visits_for(&self, patient: PatientId) -> DataAccessResult<Vec<Visit>> {
        Ok(self
            .visits()?
            .into_iter()
            .filter(|visit| visit.patient_id == patient)
            .collect())
    }

    /// Clinical events of a single patient
    fn events_for(&self, patient: PatientId) -> DataAccessResult<Vec<ClinicalEvent>> {
        Ok(self
            .events()?
            .into_iter()
            .filter(|event| event.patient_id == patient)
            .collect())
    }
}

/// Keyed lookup of master data codes.
///
/// A `None` result means the code is unknown; callers decide whether that is
/// fatal.
pub trait LookupService: Send + Sync {
    /// Resolve a concept name such as `"POSITIVE"`
    fn resolve_concept(&self, code: &str) -> Option<ConceptId>;

    /// Resolve a visit type name such as `"ADULTINITIAL"`
    fn resolve_visit_type(&self, code: &str) -> Option<VisitTypeId>;
}

/// Store that holds nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyStore;

impl ClinicalStore for EmptyStore {
    fn patients(&self) -> DataAccessResult<Vec<Patient>> {
        Ok(vec![])
    }

    fn visits(&self) -> DataAccessResult<Vec<Visit>> {
        Ok(vec![])
    }

    fn events(&self) -> DataAccessResult<Vec<ClinicalEvent>> {
        Ok(vec![])
    }
}

/// Lookup that resolves nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpLookup;

impl LookupService for NoOpLookup {
    fn resolve_concept(&self, _code: &str) -> Option<ConceptId> {
        None
    }

    fn resolve_visit_type(&self, _code: &str) -> Option<VisitTypeId> {
        None
    }
}
