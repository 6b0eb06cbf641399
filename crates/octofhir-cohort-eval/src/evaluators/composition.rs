//! Composition cohorts

use super::mismatch;
use crate::context::EvaluationContext;
use crate::definition::{CohortDefinition, DefinitionKind};
use crate::engine::CohortEngine;
use crate::error::{EvalError, EvalResult};
use crate::expression::CompositionExpr;
use crate::registry::CohortEvaluator;
use octofhir_cohort_types::Cohort;
use std::collections::HashMap;

/// Evaluates each referenced search once and combines the results through
/// the composition expression
#[derive(Debug, Default, Clone, Copy)]
pub struct CompositionEvaluator;

impl CohortEvaluator for CompositionEvaluator {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::Composition
    }

    fn evaluate(
        &self,
        definition: &CohortDefinition,
        ctx: &EvaluationContext,
        engine: &CohortEngine,
    ) -> EvalResult<Cohort> {
        let CohortDefinition::Composition(criteria) = definition else {
            return Err(mismatch(DefinitionKind::Composition, definition));
        };

        let mut results: HashMap<&str, Cohort> = HashMap::new();
        for label in criteria.expression.labels() {
            let search = criteria
                .searches
                .get(label)
                .ok_or_else(|| EvalError::unknown_search(label))?;
            let mut cohort = engine.evaluate(&search.definition, ctx)?.into_cohort();
            if let Some(filter) = &search.filter {
                cohort = cohort.intersect(filter);
            }
            tracing::debug!(label, size = cohort.len(), "composition search evaluated");
            results.insert(label, cohort);
        }

        let population = if needs_population(&criteria.expression) {
            engine.population(ctx)?
        } else {
            Cohort::empty()
        };

        criteria.expression.combine(
            &mut |label: &str| {
                results
                    .get(label)
                    .cloned()
                    .ok_or_else(|| EvalError::unknown_search(label))
            },
            &population,
        )
    }
}

/// Only `NOT` needs the population; skip loading it otherwise
fn needs_population(expression: &CompositionExpr) -> bool {
    match expression {
        CompositionExpr::Search(_) => false,
        CompositionExpr::Not(_) => true,
        CompositionExpr::And(left, right) | CompositionExpr::Or(left, right) => {
            needs_population(left) || needs_population(right)
        }
    }
}
