//! Restriction schema
//!
//! The set of restriction keys honoured for each entity kind is fixed at
//! compile time. A key maps to a typed attribute accessor; anything else is
//! not part of the schema.

use chrono::NaiveDateTime;
use octofhir_cohort_types::{ClinicalEvent, ObjectRef, PatientId, Visit};
use std::fmt;

/// Restriction keys understood by the query engine
pub mod keys {
    /// Question concept of a clinical event
    pub const EVENT_CONCEPT: &str = "concept";
    /// Coded answer of a clinical event
    pub const EVENT_VALUE_CODED: &str = "valueCoded";
    /// Visit a clinical event was recorded in
    pub const EVENT_VISIT: &str = "visit";
    /// Location of a clinical event
    pub const EVENT_LOCATION: &str = "location";

    pub const VISIT_TYPE: &str = "visitType";
    pub const VISIT_LOCATION: &str = "location";
    pub const VISIT_PROVIDER: &str = "provider";
}

/// An entity kind the query engine can filter and order
pub trait Restrictable: Clone {
    /// Typed attribute selector for this kind
    type Attribute: Copy + Eq + fmt::Debug;

    /// Entity kind name used in logs
    const KIND: &'static str;

    /// Look up the attribute a restriction key refers to
    fn attribute_for(key: &str) -> Option<Self::Attribute>;

    fn patient_id(&self) -> PatientId;

    /// Primary ordering key
    fn timestamp(&self) -> NaiveDateTime;

    fn is_voided(&self) -> bool;

    /// Current value of `attribute`, `None` when unset
    fn attribute(&self, attribute: Self::Attribute) -> Option<ObjectRef>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventAttribute {
    Concept,
    ValueCoded,
    Visit,
    Location,
}

impl EventAttribute {
    pub const ALL: [Self; 4] = [Self::Concept, Self::ValueCoded, Self::Visit, Self::Location];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Concept => keys::EVENT_CONCEPT,
            Self::ValueCoded => keys::EVENT_VALUE_CODED,
            Self::Visit => keys::EVENT_VISIT,
            Self::Location => keys::EVENT_LOCATION,
        }
    }
}

impl Restrictable for ClinicalEvent {
    type Attribute = EventAttribute;

    const KIND: &'static str = "ClinicalEvent";

    fn attribute_for(key: &str) -> Option<EventAttribute> {
        EventAttribute::ALL.into_iter().find(|attr| attr.key() == key)
    }

    fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.observed_at
    }

    fn is_voided(&self) -> bool {
        self.voided
    }

    fn attribute(&self, attribute: EventAttribute) -> Option<ObjectRef> {
        match attribute {
            EventAttribute::Concept => Some(self.concept.into()),
            EventAttribute::ValueCoded => self.value_coded.map(ObjectRef::from),
            EventAttribute::Visit => self.visit.map(ObjectRef::from),
            EventAttribute::Location => self.location.map(ObjectRef::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitAttribute {
    VisitType,
    Location,
    Provider,
}

impl VisitAttribute {
    pub const ALL: [Self; 3] = [Self::VisitType, Self::Location, Self::Provider];

    pub fn key(&self) -> &'static str {
        match self {
            Self::VisitType => keys::VISIT_TYPE,
            Self::Location => keys::VISIT_LOCATION,
            Self::Provider => keys::VISIT_PROVIDER,
        }
    }
}

impl Restrictable for Visit {
    type Attribute = VisitAttribute;

    const KIND: &'static str = "Visit";

    fn attribute_for(key: &str) -> Option<VisitAttribute> {
        VisitAttribute::ALL.into_iter().find(|attr| attr.key() == key)
    }

    fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    fn timestamp(&self) -> NaiveDateTime {
        self.started_at
    }

    fn is_voided(&self) -> bool {
        self.voided
    }

    fn attribute(&self, attribute: VisitAttribute) -> Option<ObjectRef> {
        match attribute {
            VisitAttribute::VisitType => Some(self.visit_type.into()),
            VisitAttribute::Location => self.location.map(ObjectRef::from),
            VisitAttribute::Provider => self.provider.map(ObjectRef::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("concept", Some(EventAttribute::Concept))]
    #[case("valueCoded", Some(EventAttribute::ValueCoded))]
    #[case("visit", Some(EventAttribute::Visit))]
    #[case("location", Some(EventAttribute::Location))]
    #[case("value_coded", None)]
    #[case("Concept", None)]
    #[case("voided", None)]
    fn test_event_keys(#[case] key: &str, #[case] expected: Option<EventAttribute>) {
        assert_eq!(ClinicalEvent::attribute_for(key), expected);
    }

    #[rstest]
    #[case("visitType", Some(VisitAttribute::VisitType))]
    #[case("location", Some(VisitAttribute::Location))]
    #[case("provider", Some(VisitAttribute::Provider))]
    #[case("concept", None)]
    #[case("", None)]
    fn test_visit_keys(#[case] key: &str, #[case] expected: Option<VisitAttribute>) {
        assert_eq!(Visit::attribute_for(key), expected);
    }
}
