//! The `reconcile` subcommand: the evidence-learning batch.

use crate::commands::filing_progress;
use chrono::Local;
use hobart_recon::{
    EvidenceStore, ExportFormat, FilingComparison, MappingConfig, MatchConfig, export_mapping,
    reconcile_filing,
};
use hobart_vendor::VendorFinancials;
use hobart_xbrl::{FilingMeta, InstanceDocument, SubmissionsFile, extract_company_totals};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// All knobs of one reconciliation batch.
#[derive(Debug, Clone)]
pub(crate) struct ReconcileOptions {
    pub(crate) submissions: PathBuf,
    pub(crate) xbrl_dir: PathBuf,
    pub(crate) vendor_dir: PathBuf,
    pub(crate) out_dir: PathBuf,
    pub(crate) limit: usize,
    pub(crate) fact_limit: usize,
    pub(crate) min_hits: usize,
    pub(crate) max_mean_err: f64,
    pub(crate) max_tolerance: f64,
    pub(crate) step: f64,
}

pub(crate) fn run(opts: &ReconcileOptions) -> Result<(), Box<dyn std::error::Error>> {
    info!("Loading submissions from {}", opts.submissions.display());
    let submissions = SubmissionsFile::load(&opts.submissions)?;
    let filings = submissions.ten_q_filings(opts.limit);
    if filings.is_empty() {
        return Err("no 10-Q filings found in submissions JSON".into());
    }
    info!("Selected {} 10-Q filings", filings.len());

    let match_config = MatchConfig {
        max_tolerance: opts.max_tolerance,
        step: opts.step,
    };

    let mut evidence = EvidenceStore::new();
    let mut report = String::new();
    let mut processed = 0usize;
    let mut skipped = 0usize;

    let pb = filing_progress(filings.len() as u64);
    for filing in filings {
        pb.set_message(format!("{} {}", filing.ticker, filing.form));

        match compare_one_filing(filing, opts, match_config) {
            Ok(comparison) => {
                report.push_str(&comparison.render());
                report.push('\n');
                evidence.record_filing(&comparison);
                processed += 1;
            }
            Err(e) => {
                // One bad filing must not kill the batch, and a failed
                // filing contributes no evidence at all.
                warn!(
                    "Error processing {} {} ({}): {e}",
                    filing.ticker, filing.form, filing.accession_number
                );
                let _ = writeln!(
                    report,
                    "ERROR processing {} {}: {e}\nSkipping this filing.\n",
                    filing.ticker, filing.form
                );
                skipped += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{processed} processed, {skipped} skipped"));

    std::fs::create_dir_all(&opts.out_dir)?;

    let mapping = evidence.reduce_to_mapping(MappingConfig {
        min_hits: opts.min_hits,
        max_mean_err: opts.max_mean_err,
    });
    let mapping_path = opts.out_dir.join("metric_mapping.json");
    export_mapping(&mapping, &mapping_path, ExportFormat::PrettyJson)?;

    let report_path = opts
        .out_dir
        .join(format!("compare_{}.txt", Local::now().format("%Y%m%d_%H%M%S")));
    std::fs::write(&report_path, report)?;

    info!(
        "Finished: {processed} filings processed, {skipped} skipped; mapping at {}, report at {}",
        mapping_path.display(),
        report_path.display()
    );
    Ok(())
}

fn compare_one_filing(
    filing: &FilingMeta,
    opts: &ReconcileOptions,
    match_config: MatchConfig,
) -> Result<FilingComparison, Box<dyn std::error::Error>> {
    let instance_path = filing.instance_path(&opts.xbrl_dir);
    let xml = std::fs::read_to_string(&instance_path)
        .map_err(|e| format!("reading {}: {e}", instance_path.display()))?;

    let doc = InstanceDocument::parse(&xml)?;
    let rows = extract_company_totals(&doc, &filing.ticker, filing.filing_date, opts.fact_limit);

    let vendor = load_vendor(&opts.vendor_dir, &filing.ticker)?;
    Ok(reconcile_filing(
        filing.clone(),
        &doc.meta,
        &rows,
        vendor.as_ref(),
        match_config,
    ))
}

/// A missing vendor file is a reportable comparison outcome, not a batch
/// error; a present but unreadable one is an error.
fn load_vendor(
    vendor_dir: &Path,
    ticker: &str,
) -> Result<Option<VendorFinancials>, Box<dyn std::error::Error>> {
    let path = vendor_dir.join(format!("{}.json", ticker.to_uppercase()));
    if !path.exists() {
        warn!("No vendor financials JSON for {ticker} at {}", path.display());
        return Ok(None);
    }
    Ok(Some(VendorFinancials::load(&path)?))
}
