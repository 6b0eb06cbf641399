//! Property tests: the register result is the union of its sub-cohorts

mod common;

use common::*;
use octofhir_cohort::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Fact {
    Visit(VisitTypeId, bool),
    Coded(ConceptId, ConceptId, bool),
}

fn arb_fact() -> impl Strategy<Value = Fact> {
    prop_oneof![
        (
            prop::sample::select(vec![ADULT_INITIAL, ADULT_RETURN, PEDIATRIC]),
            any::<bool>()
        )
            .prop_map(|(visit_type, voided)| Fact::Visit(visit_type, voided)),
        (
            prop::sample::select(vec![RAPID_1, RAPID_2, ELISA, WEIGHT]),
            prop::sample::select(vec![POSITIVE_ANSWER, NEGATIVE_ANSWER]),
            any::<bool>()
        )
            .prop_map(|(question, answer, voided)| Fact::Coded(question, answer, voided)),
    ]
}

fn arb_patients() -> impl Strategy<Value = Vec<(Option<i32>, Vec<Fact>)>> {
    prop::collection::vec(
        (
            prop::option::of(1950..2024i32),
            prop::collection::vec(arb_fact(), 0..5),
        ),
        0..12,
    )
}

fn build(patients: &[(Option<i32>, Vec<Fact>)]) -> Arc<InMemoryStore> {
    let mut records = Records::new();
    for (index, (birth_year, facts)) in patients.iter().enumerate() {
        let id = index as u64 + 1;
        records = records.patient(id, birth_year.map(|y| date(y, 5, 20)));
        for (day, fact) in facts.iter().enumerate() {
            let when = at(2023, 1, day as u32 + 1);
            records = match fact {
                Fact::Visit(visit_type, false) => records.visit(id, *visit_type, when),
                Fact::Visit(visit_type, true) => records.voided_visit(id, *visit_type, when),
                Fact::Coded(question, answer, voided) => {
                    records.event(id, *question, Some(*answer), when, *voided)
                }
            };
        }
    }
    records.build()
}

proptest! {
    #[test]
    fn register_result_is_union_of_sub_cohorts(patients in arb_patients()) {
        let lookup = Arc::new(full_lookup());
        let engine = register_engine(build(&patients), lookup.clone(), LookupPolicy::FailFast);
        let ctx = EvaluationContext::new(evaluation_date());

        let parts = RegisterCriteriaEvaluator::new(lookup)
            .sub_definitions()
            .unwrap()
            .map(|definition| engine.evaluate(&definition, &ctx).unwrap().into_cohort());
        let result = engine
            .evaluate(&CohortDefinition::RegisterCriteria, &ctx)
            .unwrap()
            .into_cohort();

        prop_assert_eq!(&result, &Cohort::union_all(&parts));
        for part in &parts {
            prop_assert_eq!(&part.intersect(&result), part);
        }

        let again = engine
            .evaluate(&CohortDefinition::RegisterCriteria, &ctx)
            .unwrap()
            .into_cohort();
        prop_assert_eq!(result, again);
    }

    #[test]
    fn voided_records_never_qualify(patients in arb_patients()) {
        let voided_only: Vec<_> = patients
            .into_iter()
            .map(|(birth, facts)| {
                let facts = facts
                    .into_iter()
                    .map(|fact| match fact {
                        Fact::Visit(visit_type, _) => Fact::Visit(visit_type, true),
                        Fact::Coded(question, answer, _) => Fact::Coded(question, answer, true),
                    })
                    .collect();
                (birth, facts)
            })
            .collect();
        let engine = register_engine(build(&voided_only), Arc::new(full_lookup()), LookupPolicy::FailFast);
        let result = engine
            .evaluate(
                &CohortDefinition::RegisterCriteria,
                &EvaluationContext::new(evaluation_date()),
            )
            .unwrap();
        prop_assert!(result.cohort.is_empty());
    }
}
