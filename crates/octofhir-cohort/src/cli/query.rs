//! Restriction query commands over a patient's visits and events

use super::load_dataset;
use super::output::{OutputFormat, format_table, render, write_output};
use anyhow::{Context, Result, bail};
use octofhir_cohort_query::{QueryEngine, RestrictionMap, keys};
use octofhir_cohort_types::{
    ClinicalEvent, ConceptId, LocationId, ObjectRef, PatientId, ProviderId, Visit, VisitId,
    VisitTypeId,
};
use std::path::PathBuf;
use std::sync::Arc;
use tabled::Tabled;

/// Which record kind a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTarget {
    Events,
    Visits,
}

/// Configuration for the events and visits commands
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub data: PathBuf,
    pub patient: u64,
    pub target: QueryTarget,
    /// Raw `key=id[,id...]` arguments
    pub restrictions: Vec<String>,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Event")]
    id: u64,
    #[tabled(rename = "Concept")]
    concept: u64,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Visit")]
    visit: String,
    #[tabled(rename = "Observed")]
    observed_at: String,
}

impl From<&ClinicalEvent> for EventRow {
    fn from(event: &ClinicalEvent) -> Self {
        Self {
            id: event.id.get(),
            concept: event.concept.get(),
            value: optional(event.value_coded.map(|c| c.get())),
            visit: optional(event.visit.map(|v| v.get())),
            observed_at: event.observed_at.to_string(),
        }
    }
}

#[derive(Tabled)]
struct VisitRow {
    #[tabled(rename = "Visit")]
    id: u64,
    #[tabled(rename = "Type")]
    visit_type: u64,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Started")]
    started_at: String,
}

impl From<&Visit> for VisitRow {
    fn from(visit: &Visit) -> Self {
        Self {
            id: visit.id.get(),
            visit_type: visit.visit_type.get(),
            location: optional(visit.location.map(|l| l.get())),
            provider: optional(visit.provider.map(|p| p.get())),
            started_at: visit.started_at.to_string(),
        }
    }
}

fn optional(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Parse `key=id[,id...]` arguments into a restriction map.
///
/// The key decides the kind of the referenced ids. Keys the query engine
/// does not know are kept and treated as concept references; the engine
/// ignores them.
pub fn parse_restrictions(args: &[String]) -> Result<RestrictionMap> {
    let mut map = RestrictionMap::new();
    for arg in args {
        let Some((key, ids)) = arg.split_once('=') else {
            bail!("Invalid restriction '{arg}': expected key=id[,id...]");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid restriction '{arg}': empty key");
        }
        let values = ids
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|raw| {
                let id: u64 = raw
                    .parse()
                    .with_context(|| format!("Invalid id '{raw}' in restriction '{arg}'"))?;
                Ok(object_ref(key, id))
            })
            .collect::<Result<Vec<_>>>()?;
        map.insert(key, values);
    }
    Ok(map)
}

fn object_ref(key: &str, id: u64) -> ObjectRef {
    match key {
        keys::EVENT_VISIT => ObjectRef::Visit(VisitId::new(id)),
        keys::EVENT_LOCATION => ObjectRef::Location(LocationId::new(id)),
        keys::VISIT_TYPE => ObjectRef::VisitType(VisitTypeId::new(id)),
        keys::VISIT_PROVIDER => ObjectRef::Provider(ProviderId::new(id)),
        _ => ObjectRef::Concept(ConceptId::new(id)),
    }
}

/// Run a restriction query and write its output
pub fn query(config: QueryConfig) -> Result<()> {
    let restrictions = parse_restrictions(&config.restrictions)?;
    let (store, _) = load_dataset(&config.data)?;
    let engine = QueryEngine::new(Arc::new(store));
    let patient = PatientId::new(config.patient);

    let output = match config.target {
        QueryTarget::Events => {
            let events = engine
                .query_events(patient, &restrictions)
                .with_context(|| format!("Event query failed for {patient}"))?;
            let value = serde_json::to_value(&events).context("Failed to serialize events")?;
            render(&value, config.output_format, || {
                format_table(events.iter().map(EventRow::from).collect())
            })?
        }
        QueryTarget::Visits => {
            let visits = engine
                .query_visits(patient, &restrictions)
                .with_context(|| format!("Visit query failed for {patient}"))?;
            let value = serde_json::to_value(&visits).context("Failed to serialize visits")?;
            render(&value, config.output_format, || {
                format_table(visits.iter().map(VisitRow::from).collect())
            })?
        }
    };
    write_output(&output, config.output_file.as_deref())
}
