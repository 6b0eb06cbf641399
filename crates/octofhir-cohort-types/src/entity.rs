//! Clinical entities held by a patient-records store

use crate::ids::{ConceptId, EventId, LocationId, PatientId, ProviderId, VisitId, VisitTypeId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Demographic record of a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

impl Patient {
    pub fn new(id: PatientId, birth_date: Option<NaiveDate>) -> Self {
        Self { id, birth_date }
    }
}

/// A clinical visit (encounter) of a patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub id: VisitId,
    pub patient_id: PatientId,
    pub visit_type: VisitTypeId,
    #[serde(default)]
    pub location: Option<LocationId>,
    #[serde(default)]
    pub provider: Option<ProviderId>,
    pub started_at: NaiveDateTime,
    #[serde(default)]
    pub voided: bool,
}

/// A time-stamped clinical event (observation), optionally carrying a coded value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalEvent {
    pub id: EventId,
    pub patient_id: PatientId,
    /// The question this event answers
    pub concept: ConceptId,
    #[serde(default)]
    pub value_coded: Option<ConceptId>,
    #[serde(default)]
    pub visit: Option<VisitId>,
    #[serde(default)]
    pub location: Option<LocationId>,
    pub observed_at: NaiveDateTime,
    #[serde(default)]
    pub voided: bool,
}

impl ClinicalEvent {
    /// Whether the event is recorded for `question`, whatever its value
    pub fn answers(&self, question: ConceptId) -> bool {
        self.concept == question
    }
}
