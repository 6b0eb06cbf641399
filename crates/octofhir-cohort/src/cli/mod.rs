//! CLI functionality for the cohort tool
//!
//! - Register criteria evaluation
//! - Restriction queries over visits and events
//! - Output formatting

pub mod evaluate;
pub mod output;
pub mod query;

use anyhow::{Context, Result};
use octofhir_cohort_model::{Dataset, InMemoryStore, StaticLookup};
use std::path::Path;

/// Load a dataset file into a store and a lookup
pub fn load_dataset(path: &Path) -> Result<(InMemoryStore, StaticLookup)> {
    let dataset = Dataset::from_path(path)
        .with_context(|| format!("Failed to load dataset: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        patients = dataset.patients.len(),
        visits = dataset.visits.len(),
        events = dataset.events.len(),
        "dataset loaded"
    );
    Ok(dataset.into_parts())
}
