//! Immutable patient sets

use crate::ids::PatientId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A deduplicated set of patient ids.
///
/// A cohort is never mutated after it has been produced; every combinator
/// returns a fresh cohort. Members iterate in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cohort {
    members: BTreeSet<PatientId>,
}

impl Cohort {
    /// The empty cohort
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a cohort from any collection of ids
    pub fn from_ids(ids: impl IntoIterator<Item = PatientId>) -> Self {
        ids.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: PatientId) -> bool {
        self.members.contains(&id)
    }

    /// Iterate over member ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = PatientId> + '_ {
        self.members.iter().copied()
    }

    /// Member ids as a sorted vector
    pub fn member_ids(&self) -> Vec<PatientId> {
        self.iter().collect()
    }

    /// Patients in either cohort
    pub fn union(&self, other: &Cohort) -> Cohort {
        Self {
            members: self.members.union(&other.members).copied().collect(),
        }
    }

    /// Patients in both cohorts
    pub fn intersect(&self, other: &Cohort) -> Cohort {
        Self {
            members: self.members.intersection(&other.members).copied().collect(),
        }
    }

    /// Patients in this cohort but not in `other`
    pub fn subtract(&self, other: &Cohort) -> Cohort {
        Self {
            members: self.members.difference(&other.members).copied().collect(),
        }
    }

    /// Union of any number of cohorts; the empty cohort for no input
    pub fn union_all<'a>(cohorts: impl IntoIterator<Item = &'a Cohort>) -> Cohort {
        cohorts
            .into_iter()
            .flat_map(|cohort| cohort.iter())
            .collect()
    }
}

impl FromIterator<PatientId> for Cohort {
    fn from_iter<I: IntoIterator<Item = PatientId>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Cohort {
    type Item = &'a PatientId;
    type IntoIter = std::collections::btree_set::Iter<'a, PatientId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cohort[")?;
        for (i, id) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", id.get())?;
        }
        write!(f, "]")
    }
}
