//! Patient-records store abstraction
//!
//! This crate provides:
//! - `ClinicalStore`, read access to patients, visits and clinical events
//! - `LookupService`, resolution of concept and visit type codes
//! - `DataAccessError`, the failure type of every store call
//! - An in-memory store and lookup backed by a JSON `Dataset`

pub mod dataset;
pub mod memory;
pub mod provider;

pub use dataset::{Dataset, DatasetError};
pub use memory::{InMemoryStore, StaticLookup};
pub use provider::*;
