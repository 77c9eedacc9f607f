//! Hobart CLI binary.
//!
//! Batch reconciliation of SEC XBRL filings against scraped vendor
//! financials, plus the rule-based canonical mapper, a cross-company
//! concept survey, and an instance-document inspector.

mod commands;

use clap::{Parser, Subcommand};
use commands::{canonical, inspect, reconcile, survey};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hobart")]
#[command(about = "Hobart: SEC XBRL vs vendor financials reconciliation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the evidence-based reconciliation batch and emit the learned
    /// metric mapping plus a per-filing comparison report
    Reconcile {
        /// Aggregated submissions JSON
        #[arg(long, default_value = "data/10x_submissions/10x_submissions.json")]
        submissions: PathBuf,

        /// Directory of saved XBRL instance documents
        #[arg(long, default_value = "data/10x_raw_xbrl")]
        xbrl_dir: PathBuf,

        /// Directory of per-ticker vendor financials JSON
        #[arg(long, default_value = "data/vendor_financials")]
        vendor_dir: PathBuf,

        /// Output directory for the mapping and report
        #[arg(long, default_value = "data/reconciliation")]
        out_dir: PathBuf,

        /// Maximum 10-Q filings to process
        #[arg(long, default_value = "10000")]
        limit: usize,

        /// Maximum facts extracted per filing
        #[arg(long, default_value = "500")]
        fact_limit: usize,

        /// Minimum quarters of evidence for a preferred mapping candidate
        #[arg(long, default_value = "1")]
        min_hits: usize,

        /// Maximum mean relative error for a preferred mapping candidate
        #[arg(long, default_value = "0.05")]
        max_mean_err: f64,

        /// Widest matching tolerance
        #[arg(long, default_value = "0.02")]
        max_tolerance: f64,

        /// Tolerance ladder step
        #[arg(long, default_value = "0.005")]
        step: f64,
    },

    /// Emit the rule-based canonical metric mapping per company
    Canonical {
        /// Aggregated submissions JSON
        #[arg(long, default_value = "data/10x_submissions/10x_submissions.json")]
        submissions: PathBuf,

        /// Directory of saved XBRL instance documents
        #[arg(long, default_value = "data/10x_raw_xbrl")]
        xbrl_dir: PathBuf,

        /// Output JSON path
        #[arg(long, default_value = "data/reconciliation/canonical_mapping.json")]
        output: PathBuf,

        /// Maximum distinct companies
        #[arg(long, default_value = "10")]
        max_companies: usize,

        /// Maximum facts extracted per filing
        #[arg(long, default_value = "500")]
        fact_limit: usize,
    },

    /// Survey concept usage across companies
    Survey {
        /// Aggregated submissions JSON
        #[arg(long, default_value = "data/10x_submissions/10x_submissions.json")]
        submissions: PathBuf,

        /// Directory of saved XBRL instance documents
        #[arg(long, default_value = "data/10x_raw_xbrl")]
        xbrl_dir: PathBuf,

        /// Maximum distinct companies
        #[arg(long, default_value = "10")]
        max_companies: usize,

        /// Maximum facts extracted per filing
        #[arg(long, default_value = "1000")]
        fact_limit: usize,
    },

    /// Parse one instance document and print its facts grouped by context
    Inspect {
        /// Path to the saved instance XML
        instance: PathBuf,

        /// Maximum facts printed per context
        #[arg(long, default_value = "20")]
        per_context: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hobart=info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Reconcile {
            submissions,
            xbrl_dir,
            vendor_dir,
            out_dir,
            limit,
            fact_limit,
            min_hits,
            max_mean_err,
            max_tolerance,
            step,
        } => reconcile::run(&reconcile::ReconcileOptions {
            submissions,
            xbrl_dir,
            vendor_dir,
            out_dir,
            limit,
            fact_limit,
            min_hits,
            max_mean_err,
            max_tolerance,
            step,
        }),
        Commands::Canonical {
            submissions,
            xbrl_dir,
            output,
            max_companies,
            fact_limit,
        } => canonical::run(&submissions, &xbrl_dir, &output, max_companies, fact_limit),
        Commands::Survey {
            submissions,
            xbrl_dir,
            max_companies,
            fact_limit,
        } => survey::run(&submissions, &xbrl_dir, max_companies, fact_limit),
        Commands::Inspect {
            instance,
            per_context,
        } => inspect::run(&instance, per_context),
    }
}
