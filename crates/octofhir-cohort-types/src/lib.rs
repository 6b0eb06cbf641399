//! Cohort value types
//!
//! This crate defines the values shared by every layer of the cohort engine:
//! - Opaque identifiers (patients, concepts, visit types, locations, ...)
//! - `ObjectRef`, the typed reference used as a restriction value
//! - `Cohort`, an immutable set of patient ids
//! - Clinical entities (`Patient`, `Visit`, `ClinicalEvent`)
//! - Age arithmetic (`Age`, `DurationUnit`)

pub mod age;
pub mod cohort;
pub mod entity;
pub mod ids;

pub use age::{Age, AgeError, DurationUnit};
pub use cohort::Cohort;
pub use entity::{ClinicalEvent, Patient, Visit};
pub use ids::{ConceptId, EventId, LocationId, ObjectRef, PatientId, ProviderId, VisitId, VisitTypeId};
