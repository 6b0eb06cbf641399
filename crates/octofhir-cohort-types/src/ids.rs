//! Opaque identifiers
//!
//! Every identifier is a thin newtype over `u64` so that a concept id can never
//! be passed where a visit type id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Create a new identifier
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Raw numeric value
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "/{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Unique identifier of a person
    PatientId,
    "Patient"
);
define_id!(
    /// Coded clinical term (lab test, answer value, ...)
    ConceptId,
    "Concept"
);
define_id!(
    /// Visit (encounter) type
    VisitTypeId,
    "VisitType"
);
define_id!(LocationId, "Location");
define_id!(ProviderId, "Provider");
define_id!(VisitId, "Visit");
define_id!(EventId, "Event");

/// Typed reference to another record, used as a restriction value.
///
/// Ordering is by kind first, then by raw id, which keeps a sort on a single
/// attribute equivalent to a sort on the referenced id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum ObjectRef {
    Concept(ConceptId),
    VisitType(VisitTypeId),
    Location(LocationId),
    Provider(ProviderId),
    Visit(VisitId),
}

impl ObjectRef {
    /// Raw numeric id regardless of kind
    pub fn raw(&self) -> u64 {
        match self {
            Self::Concept(id) => id.get(),
            Self::VisitType(id) => id.get(),
            Self::Location(id) => id.get(),
            Self::Provider(id) => id.get(),
            Self::Visit(id) => id.get(),
        }
    }

    /// Kind name as used in restriction keys and diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Concept(_) => "concept",
            Self::VisitType(_) => "visitType",
            Self::Location(_) => "location",
            Self::Provider(_) => "provider",
            Self::Visit(_) => "visit",
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concept(id) => id.fmt(f),
            Self::VisitType(id) => id.fmt(f),
            Self::Location(id) => id.fmt(f),
            Self::Provider(id) => id.fmt(f),
            Self::Visit(id) => id.fmt(f),
        }
    }
}

impl From<ConceptId> for ObjectRef {
    fn from(id: ConceptId) -> Self {
        Self::Concept(id)
    }
}

impl From<VisitTypeId> for ObjectRef {
    fn from(id: VisitTypeId) -> Self {
        Self::VisitType(id)
    }
}

impl From<LocationId> for ObjectRef {
    fn from(id: LocationId) -> Self {
        Self::Location(id)
    }
}

impl From<ProviderId> for ObjectRef {
    fn from(id: ProviderId) -> Self {
        Self::Provider(id)
    }
}

impl From<VisitId> for ObjectRef {
    fn from(id: VisitId) -> Self {
        Self::Visit(id)
    }
}
