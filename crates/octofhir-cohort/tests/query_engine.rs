//! Restriction queries through the public API

mod common;

use common::*;
use octofhir_cohort::prelude::*;
use octofhir_cohort::types::{LocationId, VisitId};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn records() -> Arc<InMemoryStore> {
    Records::new()
        .patient(P, None)
        .patient(Q, None)
        .visit_with(P, ADULT_INITIAL, at(2024, 1, 5), Some(20), false)
        .visit_with(P, ADULT_RETURN, at(2024, 3, 5), Some(10), false)
        .visit_with(P, ADULT_RETURN, at(2024, 2, 5), Some(10), false)
        .visit_with(P, ADULT_RETURN, at(2024, 4, 5), Some(10), true)
        .visit(Q, ADULT_RETURN, at(2024, 5, 5))
        .coded(P, RAPID_1, POSITIVE_ANSWER, at(2024, 1, 5))
        .coded(P, RAPID_1, NEGATIVE_ANSWER, at(2024, 2, 5))
        .coded(P, WEIGHT, NEGATIVE_ANSWER, at(2024, 3, 5))
        .coded(Q, RAPID_1, POSITIVE_ANSWER, at(2024, 3, 5))
        .build()
}

#[test]
fn test_visits_restricted_and_newest_first() {
    let engine = QueryEngine::new(records());
    let restrictions = RestrictionMap::new().restrict(
        keys::VISIT_TYPE,
        [ObjectRef::VisitType(ADULT_RETURN)],
    );
    let visits = engine.query_visits(PatientId(P), &restrictions).unwrap();
    let ids: Vec<_> = visits.iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![VisitId(2), VisitId(3)]);
}

#[test]
fn test_visits_multiple_keys() {
    let engine = QueryEngine::new(records());
    let restrictions = RestrictionMap::new()
        .restrict(
            keys::VISIT_TYPE,
            [
                ObjectRef::VisitType(ADULT_INITIAL),
                ObjectRef::VisitType(ADULT_RETURN),
            ],
        )
        .restrict(keys::VISIT_LOCATION, [ObjectRef::Location(LocationId(20))]);
    let visits = engine.query_visits(PatientId(P), &restrictions).unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].id, VisitId(1));
}

#[test]
fn test_events_no_restrictions_returns_all_live_events() {
    let engine = QueryEngine::new(records());
    let events = engine.query_events(PatientId(P), &RestrictionMap::new()).unwrap();
    assert_eq!(events.len(), 3);
    assert!(events.windows(2).all(|w| w[0].observed_at >= w[1].observed_at));
    assert!(events.iter().all(|e| e.patient_id == PatientId(P)));
}

#[test]
fn test_events_by_concept_and_value() {
    let engine = QueryEngine::new(records());
    let restrictions = RestrictionMap::new()
        .restrict(keys::EVENT_CONCEPT, [ObjectRef::Concept(RAPID_1)])
        .restrict(keys::EVENT_VALUE_CODED, [ObjectRef::Concept(POSITIVE_ANSWER)]);
    let events = engine.query_events(PatientId(P), &restrictions).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].value_coded, Some(POSITIVE_ANSWER));
}

#[test]
fn test_empty_value_set_is_noop() {
    let engine = QueryEngine::new(records());
    let restrictions = RestrictionMap::new().restrict(keys::EVENT_CONCEPT, Vec::<ObjectRef>::new());
    let restricted = engine.query_events(PatientId(P), &restrictions).unwrap();
    let unrestricted = engine.query_events(PatientId(P), &RestrictionMap::new()).unwrap();
    assert_eq!(restricted.len(), 3);
    assert_eq!(restricted, unrestricted);
}

#[test]
fn test_unknown_key_is_ignored() {
    let engine = QueryEngine::new(records());
    let restrictions =
        RestrictionMap::new().restrict("dosage", [ObjectRef::Concept(ConceptId(1))]);
    let events = engine.query_events(PatientId(P), &restrictions).unwrap();
    assert_eq!(events.len(), 3);
}

#[test]
fn test_unknown_patient_is_empty() {
    let engine = QueryEngine::new(records());
    assert!(engine.query_visits(PatientId(99), &RestrictionMap::new()).unwrap().is_empty());
}

#[test]
fn test_store_failure_propagates() {
    let engine = QueryEngine::new(Arc::new(FailingStore));
    let err = engine
        .query_events(PatientId(P), &RestrictionMap::new())
        .unwrap_err();
    assert_eq!(err, DataAccessError::unavailable("connection refused"));
}
