//! The `canonical` subcommand: rule-based headline-metric mapping.

use crate::commands::filing_progress;
use hobart_recon::canonical_map;
use hobart_xbrl::{FilingMeta, InstanceDocument, SubmissionsFile, extract_company_totals};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

pub(crate) fn run(
    submissions: &Path,
    xbrl_dir: &Path,
    output: &Path,
    max_companies: usize,
    fact_limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Loading submissions from {}", submissions.display());
    let submissions = SubmissionsFile::load(submissions)?;
    let filings = submissions.latest_ten_q_per_ticker(max_companies);
    if filings.is_empty() {
        return Err("no 10-Q filings found in submissions JSON".into());
    }

    let mut mapping: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let pb = filing_progress(filings.len() as u64);

    for filing in filings {
        pb.set_message(filing.ticker.clone());

        match map_one_company(filing, xbrl_dir, fact_limit) {
            Ok(canon) if !canon.is_empty() => {
                mapping.insert(filing.ticker.clone(), canon);
            }
            Ok(_) => warn!("No canonical metrics resolved for {}", filing.ticker),
            Err(e) => warn!("Error processing {}: {e}", filing.ticker),
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} companies mapped", mapping.len()));

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, serde_json::to_string_pretty(&mapping)?)?;
    info!("Canonical mapping written to {}", output.display());
    Ok(())
}

fn map_one_company(
    filing: &FilingMeta,
    xbrl_dir: &Path,
    fact_limit: usize,
) -> Result<BTreeMap<String, String>, Box<dyn std::error::Error>> {
    let instance_path = filing.instance_path(xbrl_dir);
    let xml = std::fs::read_to_string(&instance_path)
        .map_err(|e| format!("reading {}: {e}", instance_path.display()))?;
    let doc = InstanceDocument::parse(&xml)?;
    let rows = extract_company_totals(&doc, &filing.ticker, filing.filing_date, fact_limit);
    Ok(canonical_map(&rows))
}
