//! Cohort Evaluation Engine
//!
//! This crate evaluates typed cohort definitions against a patient-records
//! store and returns the matching patient sets.
//!
//! - **Visit type**: patients with a non-voided visit of a listed type
//! - **Coded event value**: patients whose events for a question concept
//!   carry (or lack) a coded answer, with any/first/last/no time modifiers
//! - **Age**: patients within an age range at the context's reference date
//! - **Composition**: named sub-definitions combined by an AND/OR/NOT tree
//! - **Register criteria**: the fixed rule combining a qualifying visit, a
//!   positive rapid test, and age-gated positive confirmatory testing
//!
//! # Example
//!
//! ```ignore
//! use octofhir_cohort_eval::{CohortDefinition, CohortEngine, EvaluationContext};
//! use octofhir_cohort_eval::register::{LookupPolicy, RegisterCriteriaEvaluator};
//!
//! let mut engine = CohortEngine::new(store);
//! engine.register(RegisterCriteriaEvaluator::new(lookup).with_policy(LookupPolicy::FailFast));
//!
//! let ctx = EvaluationContext::new(reference_date);
//! let result = engine.evaluate(&CohortDefinition::RegisterCriteria, &ctx)?;
//! ```
//!
//! # Architecture
//!
//! - `CohortEngine`: dispatches a definition to the evaluator registered for
//!   its kind and applies the context's base population
//! - `EvaluatorRegistry`: kind -> evaluator table, pre-filled with the
//!   standard evaluators
//! - `evaluators`: the standard evaluators
//! - `register`: the register criteria composer, itself an evaluator

pub mod context;
pub mod definition;
pub mod engine;
pub mod error;
pub mod evaluators;
pub mod expression;
pub mod register;
pub mod registry;

pub use context::EvaluationContext;
pub use definition::{
    AgeCriteria, CodedValueCriteria, CohortDefinition, CompositionCriteria, CompositionSearch,
    DefinitionKind, SetComparator, TimeModifier,
};
pub use engine::{CohortEngine, EvaluatedCohort};
pub use error::{EvalError, EvalResult, LookupKind};
pub use expression::CompositionExpr;
pub use registry::{CohortEvaluator, EvaluatorRegistry};
