//! Register criteria evaluation command

use super::load_dataset;
use super::output::{OutputFormat, format_table, render, write_output};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use octofhir_cohort_eval::register::{LookupPolicy, register_engine};
use octofhir_cohort_eval::{CohortDefinition, EvaluatedCohort, EvaluationContext};
use octofhir_cohort_types::{Cohort, PatientId};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tabled::Tabled;

/// Configuration for the evaluate command
#[derive(Debug, Clone)]
pub struct EvaluateConfig {
    pub data: PathBuf,
    /// Defaults to today when not given
    pub date: Option<NaiveDate>,
    pub lenient_lookups: bool,
    /// Restrict the result to these patients
    pub base: Vec<u64>,
    pub verbose: bool,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Patient")]
    patient: PatientId,
}

/// Evaluate the register criteria against a dataset
pub fn evaluate(config: EvaluateConfig) -> Result<()> {
    let result = run(&config)?;
    let value = json!({
        "evaluationDate": result.context.evaluation_date().to_string(),
        "count": result.cohort.len(),
        "members": result.cohort,
    });
    let output = render(&value, config.output_format, || {
        let rows = result.cohort.iter().map(|patient| MemberRow { patient }).collect();
        format!(
            "{}\n{} {}",
            format_table(rows),
            "Members:".bold(),
            result.cohort.len()
        )
    })?;
    write_output(&output, config.output_file.as_deref())
}

/// Load the dataset and evaluate, returning the evaluated cohort
pub fn run(config: &EvaluateConfig) -> Result<EvaluatedCohort> {
    let (store, lookup) = load_dataset(&config.data)?;
    let policy = if config.lenient_lookups {
        LookupPolicy::DegradeToEmpty
    } else {
        LookupPolicy::FailFast
    };
    let engine = register_engine(Arc::new(store), Arc::new(lookup), policy);

    let mut ctx = match config.date {
        Some(date) => EvaluationContext::new(date),
        None => EvaluationContext::today(),
    };
    if !config.base.is_empty() {
        ctx = ctx.with_base_cohort(Cohort::from_ids(config.base.iter().copied().map(PatientId::new)));
    }

    let start = Instant::now();
    let result = engine
        .evaluate(&CohortDefinition::RegisterCriteria, &ctx)
        .context("Register criteria evaluation failed")?;

    if config.verbose {
        eprintln!(
            "{} {} members in {:?}",
            "Evaluated:".cyan().bold(),
            result.cohort.len(),
            start.elapsed()
        );
    }
    Ok(result)
}
