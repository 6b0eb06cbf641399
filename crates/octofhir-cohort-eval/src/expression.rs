//! Boolean composition expressions
//!
//! Compositions combine labelled sub-results through a small expression tree
//! built in code, so there is no string to parse at evaluation time. The tree
//! still renders as text (`A OR B`, `(A OR B) AND NOT C`) for logging.

use octofhir_cohort_types::Cohort;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositionExpr {
    /// Result of the search declared under this label
    Search(String),
    And(Box<CompositionExpr>, Box<CompositionExpr>),
    Or(Box<CompositionExpr>, Box<CompositionExpr>),
    /// Complement against the evaluation population
    Not(Box<CompositionExpr>),
}

impl CompositionExpr {
    pub fn search(label: impl Into<String>) -> Self {
        Self::Search(label.into())
    }

    pub fn and(left: impl Into<Self>, right: impl Into<Self>) -> Self {
        Self::And(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn or(left: impl Into<Self>, right: impl Into<Self>) -> Self {
        Self::Or(Box::new(left.into()), Box::new(right.into()))
    }

    pub fn not(operand: impl Into<Self>) -> Self {
        Self::Not(Box::new(operand.into()))
    }

    /// Labels referenced by the expression, in first-occurrence order
    pub fn labels(&self) -> Vec<&str> {
        let mut labels = Vec::new();
        self.collect_labels(&mut labels);
        labels
    }

    fn collect_labels<'a>(&'a self, labels: &mut Vec<&'a str>) {
        match self {
            Self::Search(label) => {
                if !labels.contains(&label.as_str()) {
                    labels.push(label);
                }
            }
            Self::And(left, right) | Self::Or(left, right) => {
                left.collect_labels(labels);
                right.collect_labels(labels);
            }
            Self::Not(operand) => operand.collect_labels(labels),
        }
    }

    /// Combine cohorts bottom-up.
    ///
    /// `resolve` supplies the cohort for a label; `population` is the
    /// universe `NOT` complements against.
    pub fn combine<E>(
        &self,
        resolve: &mut impl FnMut(&str) -> Result<Cohort, E>,
        population: &Cohort,
    ) -> Result<Cohort, E> {
        match self {
            Self::Search(label) => resolve(label.as_str()),
            Self::And(left, right) => {
                let left = left.combine(resolve, population)?;
                let right = right.combine(resolve, population)?;
                Ok(left.intersect(&right))
            }
            Self::Or(left, right) => {
                let left = left.combine(resolve, population)?;
                let right = right.combine(resolve, population)?;
                Ok(left.union(&right))
            }
            Self::Not(operand) => {
                let operand = operand.combine(resolve, population)?;
                Ok(population.subtract(&operand))
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Or(..) => 1,
            Self::And(..) => 2,
            Self::Not(_) => 3,
            Self::Search(_) => 4,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        if self.precedence() < parent {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl From<&str> for CompositionExpr {
    fn from(label: &str) -> Self {
        Self::search(label)
    }
}

impl From<String> for CompositionExpr {
    fn from(label: String) -> Self {
        Self::Search(label)
    }
}

impl fmt::Display for CompositionExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precedence = self.precedence();
        match self {
            Self::Search(label) => f.write_str(label),
            Self::And(left, right) => {
                left.fmt_operand(f, precedence)?;
                f.write_str(" AND ")?;
                right.fmt_operand(f, precedence)
            }
            Self::Or(left, right) => {
                left.fmt_operand(f, precedence)?;
                f.write_str(" OR ")?;
                right.fmt_operand(f, precedence)
            }
            Self::Not(operand) => {
                f.write_str("NOT ")?;
                operand.fmt_operand(f, precedence)
            }
        }
    }
}
