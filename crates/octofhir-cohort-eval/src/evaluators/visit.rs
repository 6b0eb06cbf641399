//! Visit type cohorts

use super::mismatch;
use crate::context::EvaluationContext;
use crate::definition::{CohortDefinition, DefinitionKind};
use crate::engine::CohortEngine;
use crate::error::EvalResult;
use crate::registry::CohortEvaluator;
use octofhir_cohort_types::Cohort;

/// Patients with at least one non-voided visit of a listed type
#[derive(Debug, Default, Clone, Copy)]
pub struct VisitTypeEvaluator;

impl CohortEvaluator for VisitTypeEvaluator {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::VisitType
    }

    fn evaluate(
        &self,
        definition: &CohortDefinition,
        _ctx: &EvaluationContext,
        engine: &CohortEngine,
    ) -> EvalResult<Cohort> {
        let CohortDefinition::VisitType { visit_types } = definition else {
            return Err(mismatch(DefinitionKind::VisitType, definition));
        };
        if visit_types.is_empty() {
            return Ok(Cohort::empty());
        }

        Ok(engine
            .store()
            .visits()?
            .into_iter()
            .filter(|visit| !visit.voided && visit_types.contains(&visit.visit_type))
            .map(|visit| visit.patient_id)
            .collect())
    }
}
