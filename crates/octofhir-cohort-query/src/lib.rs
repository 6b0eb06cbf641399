//! Attribute-restriction query engine
//!
//! Turns a caller-supplied `property name -> allowed values` map into a
//! filtered, ordered listing of one patient's visits or clinical events.
//!
//! # Semantics
//!
//! - Voided records are never returned.
//! - Results are ordered by timestamp, newest first.
//! - Each restriction whose key names a supported attribute and whose value
//!   set is non-empty keeps only records whose attribute is in the set, and
//!   adds an ascending tie-break on that attribute, in map order.
//! - Unsupported keys and empty value sets are no-ops. A misspelled key
//!   therefore widens the result instead of failing; ignored keys are logged
//!   at `warn` level and reported by [`RestrictionPlan::ignored`].
//!
//! # Example
//!
//! ```ignore
//! use octofhir_cohort_query::{QueryEngine, RestrictionMap, keys};
//!
//! let engine = QueryEngine::new(store);
//! let restrictions = RestrictionMap::new()
//!     .restrict(keys::EVENT_CONCEPT, [ObjectRef::Concept(elisa)])
//!     .restrict(keys::EVENT_VALUE_CODED, [ObjectRef::Concept(positive)]);
//! let events = engine.query_events(patient, &restrictions)?;
//! ```

pub mod engine;
pub mod restriction;
pub mod schema;

pub use engine::QueryEngine;
pub use restriction::{RestrictionMap, RestrictionPlan};
pub use schema::{EventAttribute, Restrictable, VisitAttribute, keys};
