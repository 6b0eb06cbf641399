//! Age cohorts

use super::mismatch;
use crate::context::EvaluationContext;
use crate::definition::{CohortDefinition, DefinitionKind};
use crate::engine::CohortEngine;
use crate::error::EvalResult;
use crate::registry::CohortEvaluator;
use octofhir_cohort_types::Cohort;

/// Patients whose age at the evaluation date lies within the bounds.
///
/// Patients without a birth date, or born after the evaluation date, never
/// match.
#[derive(Debug, Default, Clone, Copy)]
pub struct AgeEvaluator;

impl CohortEvaluator for AgeEvaluator {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Age
    }

    fn evaluate(
        &self,
        definition: &CohortDefinition,
        ctx: &EvaluationContext,
        engine: &CohortEngine,
    ) -> EvalResult<Cohort> {
        let CohortDefinition::Age(criteria) = definition else {
            return Err(mismatch(DefinitionKind::Age, definition));
        };
        let at = ctx.evaluation_date();

        Ok(engine
            .store()
            .patients()?
            .into_iter()
            .filter_map(|patient| {
                let birth = patient.birth_date.filter(|birth| *birth <= at)?;
                let old_enough = criteria.min_age.is_none_or(|min| min.is_reached(birth, at));
                let young_enough = criteria.max_age.is_none_or(|max| max.is_not_exceeded(birth, at));
                (old_enough && young_enough).then_some(patient.id)
            })
            .collect())
    }
}
