//! Standard evaluators
//!
//! One evaluator per built-in definition kind:
//! - Visit type
//! - Coded event value
//! - Age
//! - Composition
//! - Empty

pub mod age;
pub mod coded;
pub mod composition;
pub mod visit;

pub use age::AgeEvaluator;
pub use coded::CodedValueEvaluator;
pub use composition::CompositionEvaluator;
pub use visit::VisitTypeEvaluator;

use crate::context::EvaluationContext;
use crate::definition::{CohortDefinition, DefinitionKind};
use crate::engine::CohortEngine;
use crate::error::{EvalError, EvalResult};
use crate::registry::CohortEvaluator;
use octofhir_cohort_types::Cohort;

/// Evaluator for [`CohortDefinition::Empty`]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyEvaluator;

impl CohortEvaluator for EmptyEvaluator {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Empty
    }

    fn evaluate(
        &self,
        definition: &CohortDefinition,
        _ctx: &EvaluationContext,
        _engine: &CohortEngine,
    ) -> EvalResult<Cohort> {
        match definition {
            CohortDefinition::Empty => Ok(Cohort::empty()),
            other => Err(mismatch(DefinitionKind::Empty, other)),
        }
    }
}

/// Error for a definition routed to the wrong evaluator
pub(crate) fn mismatch(expected: DefinitionKind, found: &CohortDefinition) -> EvalError {
    EvalError::invalid_definition(format!(
        "{expected} evaluator cannot handle {} definitions",
        found.kind()
    ))
}
