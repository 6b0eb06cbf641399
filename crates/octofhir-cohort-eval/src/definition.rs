//! Cohort definitions
//!
//! A definition is an immutable value describing which patients to select.
//! Definitions are built fresh for each evaluation through the factory
//! functions on [`CohortDefinition`].

use crate::expression::CompositionExpr;
use indexmap::IndexMap;
use octofhir_cohort_types::{Age, Cohort, ConceptId, VisitTypeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Typed patient-selection rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CohortDefinition {
    /// Patients with at least one non-voided visit of any listed type.
    /// An empty list matches nobody.
    VisitType { visit_types: Vec<VisitTypeId> },
    /// Patients with clinical events answering a question with a coded value
    CodedEventValue(CodedValueCriteria),
    /// Patients within an age range at the evaluation date
    Age(AgeCriteria),
    /// Named sub-definitions combined by a boolean expression
    Composition(CompositionCriteria),
    /// Matches nobody. Stands in for a definition whose codes could not be
    /// resolved when degradation is allowed.
    Empty,
    /// The register eligibility rule; takes no parameters
    RegisterCriteria,
}

/// Discriminant of [`CohortDefinition`], used as the registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    VisitType,
    CodedEventValue,
    Age,
    Composition,
    Empty,
    RegisterCriteria,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VisitType => "visit type",
            Self::CodedEventValue => "coded event value",
            Self::Age => "age",
            Self::Composition => "composition",
            Self::Empty => "empty",
            Self::RegisterCriteria => "register criteria",
        };
        f.write_str(name)
    }
}

impl CohortDefinition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::VisitType { .. } => DefinitionKind::VisitType,
            Self::CodedEventValue(_) => DefinitionKind::CodedEventValue,
            Self::Age(_) => DefinitionKind::Age,
            Self::Composition(_) => DefinitionKind::Composition,
            Self::Empty => DefinitionKind::Empty,
            Self::RegisterCriteria => DefinitionKind::RegisterCriteria,
        }
    }

    /// Patients with a visit of any of `visit_types`
    pub fn visit_types(visit_types: impl IntoIterator<Item = VisitTypeId>) -> Self {
        Self::VisitType {
            visit_types: visit_types.into_iter().collect(),
        }
    }

    /// Patients with any event for `question` whose coded value is one of `values`
    pub fn any_coded_value_in(question: ConceptId, values: impl IntoIterator<Item = ConceptId>) -> Self {
        Self::CodedEventValue(CodedValueCriteria {
            question,
            operator: SetComparator::In,
            time_modifier: TimeModifier::Any,
            values: values.into_iter().collect(),
        })
    }

    /// Patients of at least `min` at the evaluation date
    pub fn min_age(min: Age) -> Self {
        Self::Age(AgeCriteria {
            min_age: Some(min),
            max_age: None,
        })
    }

    /// Patients between `min` and `max` inclusive at the evaluation date
    pub fn age_between(min: Age, max: Age) -> Self {
        Self::Age(AgeCriteria {
            min_age: Some(min),
            max_age: Some(max),
        })
    }

    /// Composition starting with no searches
    pub fn composition(expression: CompositionExpr) -> CompositionBuilder {
        CompositionBuilder {
            searches: IndexMap::new(),
            expression,
        }
    }
}

/// How an event's coded value is compared with the accepted values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetComparator {
    In,
    NotIn,
}

/// Which of a patient's events for the question are considered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeModifier {
    /// Any event
    Any,
    /// Only the earliest event
    First,
    /// Only the latest event
    Last,
    /// Patients with no event for the question at all; values are ignored
    No,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedValueCriteria {
    pub question: ConceptId,
    pub operator: SetComparator,
    pub time_modifier: TimeModifier,
    pub values: Vec<ConceptId>,
}

impl CodedValueCriteria {
    /// Whether a coded answer satisfies the operator
    pub fn accepts(&self, value: Option<ConceptId>) -> bool {
        match (self.operator, value) {
            (_, None) => false,
            (SetComparator::In, Some(value)) => self.values.contains(&value),
            (SetComparator::NotIn, Some(value)) => !self.values.contains(&value),
        }
    }
}

/// Age range; an absent bound is unbounded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeCriteria {
    pub min_age: Option<Age>,
    pub max_age: Option<Age>,
}

/// One named operand of a composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionSearch {
    pub definition: CohortDefinition,
    /// Applied to this search's result before combination
    pub filter: Option<Cohort>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionCriteria {
    pub searches: IndexMap<String, CompositionSearch>,
    pub expression: CompositionExpr,
}

/// Builds a [`CohortDefinition::Composition`]
#[derive(Debug, Clone)]
pub struct CompositionBuilder {
    searches: IndexMap<String, CompositionSearch>,
    expression: CompositionExpr,
}

impl CompositionBuilder {
    /// Declare a search under `label`
    pub fn search(mut self, label: impl Into<String>, definition: CohortDefinition) -> Self {
        self.searches.insert(
            label.into(),
            CompositionSearch {
                definition,
                filter: None,
            },
        );
        self
    }

    /// Declare a search whose result is first restricted to `filter`
    pub fn filtered_search(
        mut self,
        label: impl Into<String>,
        definition: CohortDefinition,
        filter: Cohort,
    ) -> Self {
        self.searches.insert(
            label.into(),
            CompositionSearch {
                definition,
                filter: Some(filter),
            },
        );
        self
    }

    pub fn build(self) -> CohortDefinition {
        CohortDefinition::Composition(CompositionCriteria {
            searches: self.searches,
            expression: self.expression,
        })
    }
}
