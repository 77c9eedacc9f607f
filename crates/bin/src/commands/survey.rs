//! The `survey` subcommand: concept usage across companies.

use crate::commands::filing_progress;
use hobart_recon::{TickerConcepts, render_summary};
use hobart_xbrl::{InstanceDocument, SubmissionsFile, extract_company_totals};
use std::path::Path;
use tracing::{info, warn};

pub(crate) fn run(
    submissions: &Path,
    xbrl_dir: &Path,
    max_companies: usize,
    fact_limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Loading submissions from {}", submissions.display());
    let submissions = SubmissionsFile::load(submissions)?;
    let filings = submissions.latest_ten_q_per_ticker(max_companies);
    if filings.is_empty() {
        return Err("no 10-Q filings found in submissions JSON".into());
    }
    info!(
        "Surveying {} tickers: {}",
        filings.len(),
        filings
            .iter()
            .map(|f| f.ticker.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut surveyed: Vec<TickerConcepts> = Vec::new();
    let pb = filing_progress(filings.len() as u64);

    for filing in filings {
        pb.set_message(filing.ticker.clone());

        let instance_path = filing.instance_path(xbrl_dir);
        match std::fs::read_to_string(&instance_path) {
            Ok(xml) => match InstanceDocument::parse(&xml) {
                Ok(doc) => {
                    let rows = extract_company_totals(
                        &doc,
                        &filing.ticker,
                        filing.filing_date,
                        fact_limit,
                    );
                    if rows.is_empty() {
                        warn!("No facts extracted for ticker {}", filing.ticker);
                    } else {
                        surveyed.push(TickerConcepts::from_rows(
                            &filing.ticker,
                            filing.filing_date,
                            &rows,
                        ));
                    }
                }
                Err(e) => warn!("Error parsing {}: {e}", instance_path.display()),
            },
            Err(e) => warn!("Error reading {}: {e}", instance_path.display()),
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("{} tickers surveyed", surveyed.len()));

    if surveyed.is_empty() {
        return Err("no usable XBRL data extracted for any ticker".into());
    }

    println!("{}", render_summary(&surveyed));
    Ok(())
}
