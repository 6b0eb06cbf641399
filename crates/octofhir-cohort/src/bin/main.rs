//! Cohort command-line interface

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use octofhir_cohort::cli::evaluate::{self, EvaluateConfig};
use octofhir_cohort::cli::output::{self, OutputFormat};
use octofhir_cohort::cli::query::{self, QueryConfig, QueryTarget};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Cohort command-line tool
#[derive(Parser)]
#[command(name = "cohort")]
#[command(author, version, about = "Patient cohort evaluation tools", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, table, pretty)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the register criteria
    Evaluate {
        /// Dataset file (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Evaluation date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Treat unresolved codes as matching nobody instead of failing
        #[arg(long)]
        lenient_lookups: bool,

        /// Only consider these patients
        #[arg(short, long = "base", value_delimiter = ',')]
        base: Vec<u64>,
    },

    /// List a patient's clinical events matching restrictions
    Events {
        /// Dataset file (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Patient id
        #[arg(short, long)]
        patient: u64,

        /// Restriction (key=id[,id...])
        #[arg(short, long = "restrict")]
        restrictions: Vec<String>,
    },

    /// List a patient's visits matching restrictions
    Visits {
        /// Dataset file (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Patient id
        #[arg(short, long)]
        patient: u64,

        /// Restriction (key=id[,id...])
        #[arg(short, long = "restrict")]
        restrictions: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let output_format = match cli.format.as_deref() {
        Some(format) => format.parse()?,
        None => OutputFormat::default(),
    };

    match cli.command {
        Commands::Evaluate {
            data,
            date,
            lenient_lookups,
            base,
        } => evaluate::evaluate(EvaluateConfig {
            data,
            date,
            lenient_lookups,
            base,
            verbose: cli.verbose,
            output_format,
            output_file: cli.output,
        }),
        Commands::Events {
            data,
            patient,
            restrictions,
        } => query::query(QueryConfig {
            data,
            patient,
            target: QueryTarget::Events,
            restrictions,
            output_format,
            output_file: cli.output,
        }),
        Commands::Visits {
            data,
            patient,
            restrictions,
        } => query::query(QueryConfig {
            data,
            patient,
            target: QueryTarget::Visits,
            restrictions,
            output_format,
            output_file: cli.output,
        }),
    }
}
