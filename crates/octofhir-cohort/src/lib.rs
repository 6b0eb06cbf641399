//! Patient cohort evaluation for Rust
//!
//! This crate bundles:
//! - Cohort definitions and their evaluation engine
//! - The register criteria composer (qualifying visit, positive rapid test,
//!   or positive confirmatory test at a minimum age)
//! - The attribute-restriction query engine for a patient's visits and
//!   clinical events
//! - Store and lookup abstractions with an in-memory implementation
//!
//! # Example
//!
//! ```ignore
//! use octofhir_cohort::prelude::*;
//!
//! let (store, lookup) = Dataset::from_path(path)?.into_parts();
//! let engine = register_engine(Arc::new(store), Arc::new(lookup), LookupPolicy::FailFast);
//! let result = engine.evaluate(&CohortDefinition::RegisterCriteria, &EvaluationContext::today())?;
//! ```

// Re-export all public APIs from internal crates
pub use octofhir_cohort_eval as eval;
pub use octofhir_cohort_model as model;
pub use octofhir_cohort_query as query;
pub use octofhir_cohort_types as types;

// Convenience re-exports
pub use octofhir_cohort_eval::{CohortDefinition, CohortEngine, EvalError, EvaluatedCohort, EvaluationContext};
pub use octofhir_cohort_query::{QueryEngine, RestrictionMap};
pub use octofhir_cohort_types::{Cohort, PatientId};

/// Common imports for callers of the engine
pub mod prelude {
    pub use octofhir_cohort_eval::register::{LookupPolicy, RegisterCriteriaEvaluator, register_engine};
    pub use octofhir_cohort_eval::{
        CohortDefinition, CohortEngine, CompositionExpr, EvalError, EvalResult, EvaluatedCohort,
        EvaluationContext,
    };
    pub use octofhir_cohort_model::{
        ClinicalStore, DataAccessError, Dataset, InMemoryStore, LookupService, StaticLookup,
    };
    pub use octofhir_cohort_query::{QueryEngine, RestrictionMap, keys};
    pub use octofhir_cohort_types::{
        Age, ClinicalEvent, Cohort, ConceptId, ObjectRef, Patient, PatientId, Visit, VisitTypeId,
    };
}

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
