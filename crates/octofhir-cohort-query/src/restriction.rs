//! Restriction maps and their compiled form

use crate::schema::Restrictable;
use indexmap::IndexMap;
use octofhir_cohort_types::{ObjectRef, PatientId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Caller-supplied mapping from property name to acceptable values.
///
/// Iteration order is insertion order, which is also the order of the
/// tie-break keys applied to the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestrictionMap {
    entries: IndexMap<String, Vec<ObjectRef>>,
}

impl RestrictionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a restriction, replacing any previous values for `property`
    pub fn restrict(
        mut self,
        property: impl Into<String>,
        values: impl IntoIterator<Item = ObjectRef>,
    ) -> Self {
        self.insert(property, values);
        self
    }

    pub fn insert(&mut self, property: impl Into<String>, values: impl IntoIterator<Item = ObjectRef>) {
        self.entries.insert(property.into(), values.into_iter().collect());
    }

    pub fn get(&self, property: &str) -> Option<&[ObjectRef]> {
        self.entries.get(property).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ObjectRef])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RestrictionMap
where
    K: Into<String>,
    V: IntoIterator<Item = ObjectRef>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (property, values) in iter {
            map.insert(property, values);
        }
        map
    }
}

/// A restriction map resolved against the schema of one entity kind
#[derive(Debug, Clone)]
pub struct RestrictionPlan<'a, E: Restrictable> {
    applied: Vec<(E::Attribute, &'a [ObjectRef])>,
    ignored: Vec<&'a str>,
}

impl<'a, E: Restrictable> RestrictionPlan<'a, E> {
    /// Resolve every key of `restrictions`.
    ///
    /// Keys outside the schema and keys with an empty value set are recorded
    /// as ignored.
    pub fn compile(restrictions: &'a RestrictionMap) -> Self {
        let mut applied = Vec::new();
        let mut ignored = Vec::new();

        for (property, values) in restrictions.iter() {
            if values.is_empty() {
                tracing::debug!(kind = E::KIND, property, "empty restriction ignored");
                ignored.push(property);
                continue;
            }
            match E::attribute_for(property) {
                Some(attribute) => applied.push((attribute, values)),
                None => {
                    tracing::warn!(kind = E::KIND, property, "unsupported restriction key ignored");
                    ignored.push(property);
                }
            }
        }

        Self { applied, ignored }
    }

    /// Attributes that filter and order the result, in application order
    pub fn applied(&self) -> impl Iterator<Item = E::Attribute> + '_ {
        self.applied.iter().map(|(attribute, _)| *attribute)
    }

    /// Keys that had no effect
    pub fn ignored(&self) -> &[&'a str] {
        &self.ignored
    }

    /// Whether `record` satisfies every applied restriction
    pub fn matches(&self, record: &E) -> bool {
        self.applied.iter().all(|(attribute, values)| {
            record
                .attribute(*attribute)
                .is_some_and(|value| values.contains(&value))
        })
    }

    /// Filter and order the records of `patient`.
    ///
    /// Records of other patients and voided records are dropped. Ordering is
    /// timestamp descending, then each applied attribute ascending.
    pub fn apply(&self, patient: PatientId, records: Vec<E>) -> Vec<E> {
        let mut selected: Vec<E> = records
            .into_iter()
            .filter(|record| record.patient_id() == patient)
            .filter(|record| !record.is_voided())
            .filter(|record| self.matches(record))
            .collect();

        // Stable sorts applied from the least to the most significant key
        for attribute in self.applied().collect::<Vec<_>>().into_iter().rev() {
            selected.sort_by(|a, b| a.attribute(attribute).cmp(&b.attribute(attribute)));
        }
        selected.sort_by(|a, b| compare_newest_first(a, b));

        tracing::debug!(
            kind = E::KIND,
            patient = patient.get(),
            applied = self.applied.len(),
            ignored = self.ignored.len(),
            returned = selected.len(),
            "restriction query completed"
        );
        selected
    }
}

fn compare_newest_first<E: Restrictable>(a: &E, b: &E) -> Ordering {
    b.timestamp().cmp(&a.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use octofhir_cohort_types::{ClinicalEvent, ConceptId, EventId, LocationId};
    use pretty_assertions::assert_eq;

    fn event(id: u64, day: u32, concept: u64, value: Option<u64>) -> ClinicalEvent {
        ClinicalEvent {
            id: EventId(id),
            patient_id: PatientId(1),
            concept: ConceptId(concept),
            value_coded: value.map(ConceptId),
            visit: None,
            location: None,
            observed_at: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            voided: false,
        }
    }

    fn ids(events: &[ClinicalEvent]) -> Vec<u64> {
        events.iter().map(|e| e.id.get()).collect()
    }

    #[test]
    fn test_compile_separates_applied_and_ignored() {
        let map = RestrictionMap::new()
            .restrict("concept", [ObjectRef::Concept(ConceptId(1))])
            .restrict("conceptt", [ObjectRef::Concept(ConceptId(1))])
            .restrict("valueCoded", Vec::<ObjectRef>::new());
        let plan = RestrictionPlan::<ClinicalEvent>::compile(&map);

        assert_eq!(plan.applied().count(), 1);
        assert_eq!(plan.ignored(), &["conceptt", "valueCoded"]);
    }

    #[test]
    fn test_value_kind_must_match() {
        let map = RestrictionMap::new().restrict("concept", [ObjectRef::Location(LocationId(1))]);
        let plan = RestrictionPlan::<ClinicalEvent>::compile(&map);
        assert!(!plan.matches(&event(1, 1, 1, None)));
    }

    #[test]
    fn test_tie_break_follows_restriction_order() {
        let records = vec![
            event(1, 5, 2, Some(20)),
            event(2, 5, 1, Some(30)),
            event(3, 5, 1, Some(10)),
            event(4, 6, 2, Some(10)),
        ];
        let concepts = [ObjectRef::Concept(ConceptId(1)), ObjectRef::Concept(ConceptId(2))];
        let values = [10, 20, 30].map(|v| ObjectRef::Concept(ConceptId(v)));

        let by_concept_then_value = RestrictionMap::new()
            .restrict("concept", concepts)
            .restrict("valueCoded", values);
        let plan = RestrictionPlan::<ClinicalEvent>::compile(&by_concept_then_value);
        assert_eq!(ids(&plan.apply(PatientId(1), records.clone())), vec![4, 3, 2, 1]);

        let by_value_then_concept = RestrictionMap::new()
            .restrict("valueCoded", values)
            .restrict("concept", concepts);
        let plan = RestrictionPlan::<ClinicalEvent>::compile(&by_value_then_concept);
        assert_eq!(ids(&plan.apply(PatientId(1), records)), vec![4, 3, 1, 2]);
    }

    #[test]
    fn test_records_without_value_are_excluded_by_value_restriction() {
        let map = RestrictionMap::new().restrict("valueCoded", [ObjectRef::Concept(ConceptId(10))]);
        let plan = RestrictionPlan::<ClinicalEvent>::compile(&map);
        let result = plan.apply(PatientId(1), vec![event(1, 1, 1, None), event(2, 2, 1, Some(10))]);
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_from_iterator() {
        let map: RestrictionMap = [("concept", vec![ObjectRef::Concept(ConceptId(3))])]
            .into_iter()
            .collect();
        assert_eq!(map.get("concept"), Some(&[ObjectRef::Concept(ConceptId(3))][..]));
        assert_eq!(map.len(), 1);
    }
}
