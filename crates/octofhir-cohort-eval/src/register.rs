//! Register criteria composer
//!
//! A patient meets the register criteria when any of these holds:
//! 1. they have an adult initial or adult return visit;
//! 2. their first or second HIV rapid test was ever recorded positive;
//! 3. they are at least 14 years old at the evaluation date and their HIV
//!    enzyme immunoassay (ELISA) was ever recorded positive.
//!
//! The three sub-cohorts are independent; the result is their union.
//!
//! The minimum age for the confirmatory branch is 14 years. An earlier
//! 18 month threshold was never in effect and is not applied.

use crate::context::EvaluationContext;
use crate::definition::{CohortDefinition, DefinitionKind};
use crate::engine::CohortEngine;
use crate::error::{EvalError, EvalResult, LookupKind};
use crate::evaluators::mismatch;
use crate::expression::CompositionExpr;
use crate::registry::CohortEvaluator;
use octofhir_cohort_model::{ClinicalStore, LookupService};
use octofhir_cohort_types::{Age, Cohort, ConceptId};
use std::sync::Arc;

pub const ADULT_INITIAL_VISIT: &str = "ADULTINITIAL";
pub const ADULT_RETURN_VISIT: &str = "ADULTRETURN";
pub const FIRST_RAPID_TEST: &str = "HIV RAPID TEST, QUALITATIVE";
pub const SECOND_RAPID_TEST: &str = "HIV RAPID TEST 2, QUALITATIVE";
pub const CONFIRMATORY_TEST: &str = "HIV ENZYME IMMUNOASSAY, QUALITATIVE";
pub const POSITIVE: &str = "POSITIVE";

/// Minimum age for the confirmatory-test branch
pub const MINIMUM_CONFIRMATORY_AGE: Age = Age::years(14);

const POSITIVE_FIRST_RAPID: &str = "PositiveFirstRapid";
const POSITIVE_SECOND_RAPID: &str = "PositiveSecondRapid";
const MINIMUM_AGE: &str = "MinimumAge";
const POSITIVE_CONFIRMATORY: &str = "PositiveConfirmatory";

/// What to do when a code does not resolve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupPolicy {
    /// Fail the evaluation with [`EvalError::LookupNotFound`]
    #[default]
    FailFast,
    /// Log a warning and let the affected definition match nobody
    DegradeToEmpty,
}

/// Evaluator for [`CohortDefinition::RegisterCriteria`]
#[derive(Clone)]
pub struct RegisterCriteriaEvaluator {
    lookup: Arc<dyn LookupService>,
    policy: LookupPolicy,
}

impl RegisterCriteriaEvaluator {
    pub fn new(lookup: Arc<dyn LookupService>) -> Self {
        Self {
            lookup,
            policy: LookupPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: LookupPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> LookupPolicy {
        self.policy
    }

    /// Build the three sub-definitions: qualifying visits, positive rapid
    /// test, confirmatory positive at minimum age
    pub fn sub_definitions(&self) -> EvalResult<[CohortDefinition; 3]> {
        let mut visit_types = Vec::new();
        for code in [ADULT_INITIAL_VISIT, ADULT_RETURN_VISIT] {
            let found = self.lookup.resolve_visit_type(code);
            if let Some(id) = self.require(LookupKind::VisitType, code, found)? {
                visit_types.push(id);
            }
        }
        let qualifying_visits = CohortDefinition::visit_types(visit_types);

        let positive = self.concept(POSITIVE)?;

        let positive_rapid_test = CohortDefinition::composition(CompositionExpr::or(
            POSITIVE_FIRST_RAPID,
            POSITIVE_SECOND_RAPID,
        ))
        .search(POSITIVE_FIRST_RAPID, self.positive_answer(FIRST_RAPID_TEST, positive)?)
        .search(POSITIVE_SECOND_RAPID, self.positive_answer(SECOND_RAPID_TEST, positive)?)
        .build();

        let confirmed_at_minimum_age =
            CohortDefinition::composition(CompositionExpr::and(MINIMUM_AGE, POSITIVE_CONFIRMATORY))
                .search(MINIMUM_AGE, CohortDefinition::min_age(MINIMUM_CONFIRMATORY_AGE))
                .search(POSITIVE_CONFIRMATORY, self.positive_answer(CONFIRMATORY_TEST, positive)?)
                .build();

        Ok([qualifying_visits, positive_rapid_test, confirmed_at_minimum_age])
    }

    /// Any event for `question_code` answered positive
    fn positive_answer(
        &self,
        question_code: &str,
        positive: Option<ConceptId>,
    ) -> EvalResult<CohortDefinition> {
        let question = self.concept(question_code)?;
        Ok(match (question, positive) {
            (Some(question), Some(positive)) => CohortDefinition::any_coded_value_in(question, [positive]),
            _ => CohortDefinition::Empty,
        })
    }

    fn concept(&self, code: &str) -> EvalResult<Option<ConceptId>> {
        let found = self.lookup.resolve_concept(code);
        self.require(LookupKind::Concept, code, found)
    }

    fn require<T>(&self, kind: LookupKind, code: &str, found: Option<T>) -> EvalResult<Option<T>> {
        match (found, self.policy) {
            (Some(id), _) => Ok(Some(id)),
            (None, LookupPolicy::FailFast) => Err(EvalError::lookup_not_found(kind, code)),
            (None, LookupPolicy::DegradeToEmpty) => {
                tracing::warn!(%kind, code, "unresolved code; dependent criteria match no patients");
                Ok(None)
            }
        }
    }
}

/// Engine with the standard evaluators plus the register criteria evaluator
pub fn register_engine(
    store: Arc<dyn ClinicalStore>,
    lookup: Arc<dyn LookupService>,
    policy: LookupPolicy,
) -> CohortEngine {
    let mut engine = CohortEngine::new(store);
    engine.register(RegisterCriteriaEvaluator::new(lookup).with_policy(policy));
    engine
}

impl CohortEvaluator for RegisterCriteriaEvaluator {
    fn kind(&self) -> DefinitionKind {
        DefinitionKind::RegisterCriteria
    }

    fn evaluate(
        &self,
        definition: &CohortDefinition,
        ctx: &EvaluationContext,
        engine: &CohortEngine,
    ) -> EvalResult<Cohort> {
        if definition != &CohortDefinition::RegisterCriteria {
            return Err(mismatch(DefinitionKind::RegisterCriteria, definition));
        }

        let [visits, rapid, confirmatory] = self.sub_definitions()?;
        let visits = engine.evaluate(&visits, ctx)?.into_cohort();
        let rapid = engine.evaluate(&rapid, ctx)?.into_cohort();
        let confirmatory = engine.evaluate(&confirmatory, ctx)?.into_cohort();

        tracing::debug!(
            visits = visits.len(),
            rapid = rapid.len(),
            confirmatory = confirmatory.len(),
            "register sub-cohorts evaluated"
        );
        Ok(Cohort::union_all([&visits, &rapid, &confirmatory]))
    }
}

impl std::fmt::Debug for RegisterCriteriaEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterCriteriaEvaluator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
