//! Query engine entry points

use crate::restriction::{RestrictionMap, RestrictionPlan};
use octofhir_cohort_model::{ClinicalStore, DataAccessResult};
use octofhir_cohort_types::{ClinicalEvent, PatientId, Visit};
use std::sync::Arc;

/// Runs restriction queries against a store.
///
/// The engine holds no state besides its store handle and is safe to share
/// between threads. Access control is the caller's concern.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn ClinicalStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn ClinicalStore>) -> Self {
        Self { store }
    }

    /// Non-voided clinical events of `patient` matching `restrictions`
    pub fn query_events(
        &self,
        patient: PatientId,
        restrictions: &RestrictionMap,
    ) -> DataAccessResult<Vec<ClinicalEvent>> {
        let plan = RestrictionPlan::<ClinicalEvent>::compile(restrictions);
        let records = self.store.events_for(patient)?;
        Ok(plan.apply(patient, records))
    }

    /// Non-voided visits of `patient` matching `restrictions`
    pub fn query_visits(
        &self,
        patient: PatientId,
        restrictions: &RestrictionMap,
    ) -> DataAccessResult<Vec<Visit>> {
        let plan = RestrictionPlan::<Visit>::compile(restrictions);
        let records = self.store.visits_for(patient)?;
        Ok(plan.apply(patient, records))
    }
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine").finish_non_exhaustive()
    }
}
