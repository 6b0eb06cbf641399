//! Cohort Evaluation Engine
//!
//! The engine dispatches definitions to registered evaluators and gives them
//! access to the store.

use crate::context::EvaluationContext;
use crate::definition::CohortDefinition;
use crate::error::{EvalError, EvalResult};
use crate::registry::{CohortEvaluator, EvaluatorRegistry};
use octofhir_cohort_model::ClinicalStore;
use octofhir_cohort_types::Cohort;
use std::sync::Arc;

/// A cohort together with the definition and context that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedCohort {
    pub cohort: Cohort,
    pub definition: CohortDefinition,
    pub context: EvaluationContext,
}

impl EvaluatedCohort {
    pub fn new(cohort: Cohort, definition: CohortDefinition, context: EvaluationContext) -> Self {
        Self {
            cohort,
            definition,
            context,
        }
    }

    pub fn into_cohort(self) -> Cohort {
        self.cohort
    }
}

/// The main cohort evaluation engine.
///
/// Holds no per-call state; one engine can serve any number of concurrent
/// evaluations.
pub struct CohortEngine {
    store: Arc<dyn ClinicalStore>,
    registry: EvaluatorRegistry,
}

impl CohortEngine {
    /// Create an engine with the standard evaluators
    pub fn new(store: Arc<dyn ClinicalStore>) -> Self {
        Self::with_registry(store, EvaluatorRegistry::with_standard_evaluators())
    }

    /// Create an engine with a custom registry
    pub fn with_registry(store: Arc<dyn ClinicalStore>, registry: EvaluatorRegistry) -> Self {
        Self { store, registry }
    }

    /// Register an additional evaluator
    pub fn register(&mut self, evaluator: impl CohortEvaluator + 'static) {
        self.registry.register(evaluator);
    }

    pub fn registry(&self) -> &EvaluatorRegistry {
        &self.registry
    }

    pub fn store(&self) -> &dyn ClinicalStore {
        self.store.as_ref()
    }

    /// Evaluate `definition` against `ctx`.
    ///
    /// The result is restricted to the context's base cohort when one is set.
    pub fn evaluate(
        &self,
        definition: &CohortDefinition,
        ctx: &EvaluationContext,
    ) -> EvalResult<EvaluatedCohort> {
        let kind = definition.kind();
        let evaluator = self
            .registry
            .get(kind)
            .ok_or_else(|| EvalError::no_evaluator(kind))?;

        let mut cohort = evaluator.evaluate(definition, ctx, self)?;
        if let Some(base) = ctx.base_cohort() {
            cohort = cohort.intersect(base);
        }

        tracing::debug!(%kind, size = cohort.len(), "cohort evaluated");
        Ok(EvaluatedCohort::new(cohort, definition.clone(), ctx.clone()))
    }

    /// Every patient the evaluation may consider: the base cohort if set,
    /// otherwise every patient in the store
    pub fn population(&self, ctx: &EvaluationContext) -> EvalResult<Cohort> {
        match ctx.base_cohort() {
            Some(base) => Ok(base.clone()),
            None => Ok(self
                .store
                .patients()?
                .into_iter()
                .map(|patient| patient.id)
                .collect()),
        }
    }
}

impl std::fmt::Debug for CohortEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohortEngine")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DefinitionKind;
    use chrono::NaiveDate;
    use octofhir_cohort_model::{EmptyStore, InMemoryStore};
    use octofhir_cohort_types::{Patient, PatientId};

    fn ctx() -> EvaluationContext {
        EvaluationContext::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    #[test]
    fn test_missing_evaluator() {
        let engine = CohortEngine::new(Arc::new(EmptyStore));
        let err = engine.evaluate(&CohortDefinition::RegisterCriteria, &ctx()).unwrap_err();
        assert_eq!(err, EvalError::no_evaluator(DefinitionKind::RegisterCriteria));
    }

    #[test]
    fn test_population() {
        let store = InMemoryStore::new();
        store.add_patient(Patient::new(PatientId(1), None));
        store.add_patient(Patient::new(PatientId(2), None));
        let engine = CohortEngine::new(Arc::new(store));

        assert_eq!(engine.population(&ctx()).unwrap().len(), 2);

        let base = Cohort::from_ids([PatientId(2), PatientId(9)]);
        let scoped = ctx().with_base_cohort(base.clone());
        assert_eq!(engine.population(&scoped).unwrap(), base);
    }

    #[test]
    fn test_result_carries_provenance() {
        let engine = CohortEngine::new(Arc::new(EmptyStore));
        let result = engine.evaluate(&CohortDefinition::Empty, &ctx()).unwrap();
        assert!(result.cohort.is_empty());
        assert_eq!(result.definition, CohortDefinition::Empty);
        assert_eq!(result.context, ctx());
    }
}
