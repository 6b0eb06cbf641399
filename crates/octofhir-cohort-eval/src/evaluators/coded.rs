//! Coded event value cohorts

use super::mismatch;
use crate::context::EvaluationContext;
use crate::definition::{CodedValueCriteria, CohortDefinition, DefinitionKind, TimeModifier};
use crate::engine::CohortEngine;
use crate::error::EvalResult;
use crate::registry::CohortEvaluator;
use octofhir_cohort_types::{ClinicalEvent, Cohort, PatientId};
use std::collections::BTreeMap;

/// Patients whose non-voided events for the question concept satisfy the
/// operator under the time modifier
#[derive(Debug, Default, Clone, Copy)]
pub struct CodedValueEvaluator;

impl CohortEvaluator for CodedValueEvaluator {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::CodedEventValue
    }

    fn evaluate(
        &self,
        definition: &CohortDefinition,
        ctx: &EvaluationContext,
        engine: &CohortEngine,
    ) -> EvalResult<Cohort> {
        let CohortDefinition::CodedEventValue(criteria) = definition else {
            return Err(mismatch(DefinitionKind::CodedEventValue, definition));
        };

        let mut by_patient: BTreeMap<PatientId, Vec<ClinicalEvent>> = BTreeMap::new();
        for event in engine.store().events()? {
            if !event.voided && event.answers(criteria.question) {
                by_patient.entry(event.patient_id).or_default().push(event);
            }
        }

        let cohort = match criteria.time_modifier {
            TimeModifier::No => {
                let answered: Cohort = by_patient.into_keys().collect();
                engine.population(ctx)?.subtract(&answered)
            }
            modifier => by_patient
                .into_iter()
                .filter(|(_, events)| satisfies(criteria, modifier, events))
                .map(|(patient, _)| patient)
                .collect(),
        };
        Ok(cohort)
    }
}

fn satisfies(criteria: &CodedValueCriteria, modifier: TimeModifier, events: &[ClinicalEvent]) -> bool {
    // equal timestamps are ordered by event id
    let key = |event: &&ClinicalEvent| (event.observed_at, event.id);
    match modifier {
        TimeModifier::Any => events.iter().any(|event| criteria.accepts(event.value_coded)),
        TimeModifier::First => events
            .iter()
            .min_by_key(key)
            .is_some_and(|event| criteria.accepts(event.value_coded)),
        TimeModifier::Last => events
            .iter()
            .max_by_key(key)
            .is_some_and(|event| criteria.accepts(event.value_coded)),
        TimeModifier::No => false,
    }
}
