//! Evaluation errors for the cohort engine

use octofhir_cohort_model::DataAccessError;
use std::fmt;
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Kind of master data a lookup code refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Concept,
    VisitType,
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concept => f.write_str("concept"),
            Self::VisitType => f.write_str("visit type"),
        }
    }
}

/// Errors that can occur during cohort evaluation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A code did not resolve through the lookup service
    #[error("Unknown {kind} code: {code}")]
    LookupNotFound { kind: LookupKind, code: String },

    /// A composition expression names a search that was not declared
    #[error("Composition references undeclared search: {label}")]
    UnknownSearch { label: String },

    /// No evaluator is registered for a definition kind
    #[error("No evaluator registered for {kind} definitions")]
    NoEvaluator { kind: String },

    /// Definition handed to an evaluator that cannot handle it
    #[error("Invalid cohort definition: {message}")]
    InvalidDefinition { message: String },

    /// Store access failed
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),
}

impl EvalError {
    pub fn lookup_not_found(kind: LookupKind, code: impl Into<String>) -> Self {
        Self::LookupNotFound {
            kind,
            code: code.into(),
        }
    }

    pub fn unknown_search(label: impl Into<String>) -> Self {
        Self::UnknownSearch {
            label: label.into(),
        }
    }

    pub fn no_evaluator(kind: impl fmt::Display) -> Self {
        Self::NoEvaluator {
            kind: kind.to_string(),
        }
    }

    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            message: message.into(),
        }
    }
}
