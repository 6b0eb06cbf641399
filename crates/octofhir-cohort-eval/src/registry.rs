//! Evaluator registry
//!
//! Maps each definition kind to the evaluator that handles it. The standard
//! registry covers every kind except register criteria, whose evaluator
//! needs a lookup service and is registered by the caller.

use crate::context::EvaluationContext;
use crate::definition::{CohortDefinition, DefinitionKind};
use crate::engine::CohortEngine;
use crate::error::EvalResult;
use crate::evaluators::{
    AgeEvaluator, CodedValueEvaluator, CompositionEvaluator, EmptyEvaluator, VisitTypeEvaluator,
};
use octofhir_cohort_types::Cohort;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler for one kind of cohort definition.
///
/// Evaluators receive the engine so that they can evaluate nested
/// definitions through it.
pub trait CohortEvaluator: Send + Sync {
    /// The definition kind this evaluator handles
    fn kind(&self) -> DefinitionKind;

    fn evaluate(
        &self,
        definition: &CohortDefinition,
        ctx: &EvaluationContext,
        engine: &CohortEngine,
    ) -> EvalResult<Cohort>;
}

/// Registry of evaluators keyed by definition kind
#[derive(Default, Clone)]
pub struct EvaluatorRegistry {
    evaluators: HashMap<DefinitionKind, Arc<dyn CohortEvaluator>>,
}

impl EvaluatorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in evaluators
    pub fn with_standard_evaluators() -> Self {
        let mut registry = Self::new();
        registry.register(VisitTypeEvaluator);
        registry.register(CodedValueEvaluator);
        registry.register(AgeEvaluator);
        registry.register(CompositionEvaluator);
        registry.register(EmptyEvaluator);
        registry
    }

    /// Register an evaluator, replacing any previous one for its kind
    pub fn register(&mut self, evaluator: impl CohortEvaluator + 'static) {
        self.evaluators.insert(evaluator.kind(), Arc::new(evaluator));
    }

    pub fn get(&self, kind: DefinitionKind) -> Option<&Arc<dyn CohortEvaluator>> {
        self.evaluators.get(&kind)
    }

    pub fn contains(&self, kind: DefinitionKind) -> bool {
        self.evaluators.contains_key(&kind)
    }
}

impl std::fmt::Debug for EvaluatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluatorRegistry")
            .field("kinds", &self.evaluators.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let registry = EvaluatorRegistry::with_standard_evaluators();
        for kind in [
            DefinitionKind::VisitType,
            DefinitionKind::CodedEventValue,
            DefinitionKind::Age,
            DefinitionKind::Composition,
            DefinitionKind::Empty,
        ] {
            assert!(registry.contains(kind), "missing evaluator for {kind}");
        }
        assert!(!registry.contains(DefinitionKind::RegisterCriteria));
    }

    #[test]
    fn test_register_replaces() {
        struct Everyone;

        impl CohortEvaluator for Everyone {
            fn kind(&self) -> DefinitionKind {
                DefinitionKind::Empty
            }

            fn evaluate(
                &self,
                _definition: &CohortDefinition,
                ctx: &EvaluationContext,
                engine: &CohortEngine,
            ) -> EvalResult<Cohort> {
                engine.population(ctx)
            }
        }

        let mut registry = EvaluatorRegistry::with_standard_evaluators();
        registry.register(Everyone);
        assert!(registry.contains(DefinitionKind::Empty));
    }
}
