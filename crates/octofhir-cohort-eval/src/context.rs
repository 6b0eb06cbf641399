//! Evaluation context for cohort evaluation

use chrono::{Local, NaiveDate};
use octofhir_cohort_types::Cohort;

/// Caller-supplied parameters shared by every sub-evaluation of one call.
///
/// The context is built once and then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationContext {
    evaluation_date: NaiveDate,
    base_cohort: Option<Cohort>,
}

impl EvaluationContext {
    /// Context evaluating at `evaluation_date` over the whole store
    pub fn new(evaluation_date: NaiveDate) -> Self {
        Self {
            evaluation_date,
            base_cohort: None,
        }
    }

    /// Context evaluating at the local current date
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    /// Restrict every result to members of `base`
    pub fn with_base_cohort(mut self, base: Cohort) -> Self {
        self.base_cohort = Some(base);
        self
    }

    /// Reference date for age calculations
    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
    }

    pub fn base_cohort(&self) -> Option<&Cohort> {
        self.base_cohort.as_ref()
    }
}
