//! Filing identity metadata and submissions-index loading.
//!
//! The batch tooling is handed filings discovered externally via an
//! aggregated submissions JSON (one record per 10-K/10-Q). All fields here
//! are opaque provenance pass-throughs; nothing in the core interprets them
//! beyond form-type selection and on-disk path conventions.

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One 10-K / 10-Q (or amendment) filing for a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingMeta {
    /// Stock ticker symbol.
    pub ticker: String,

    /// Central Index Key (CIK) — SEC company identifier.
    pub cik: String,

    /// Form type, e.g. `10-Q` or `10-K/A`.
    #[serde(alias = "form_type")]
    pub form: String,

    /// EDGAR accession number.
    pub accession_number: String,

    /// Primary document filename within the filing.
    #[serde(default)]
    pub primary_document: String,

    /// Official filing date.
    pub filing_date: NaiveDate,
}

impl FilingMeta {
    /// Returns true for 10-Q filings, including amendments (`10-Q/A`).
    pub fn is_ten_q(&self) -> bool {
        self.form.starts_with("10-Q")
    }

    /// Conventional filename of this filing's saved XBRL instance document.
    pub fn instance_filename(&self) -> String {
        format!(
            "{}_{}_{}_instance.xml",
            self.ticker.to_uppercase(),
            self.accession_number,
            self.form.replace('/', "-"),
        )
    }

    /// Conventional on-disk location of the saved instance document under a
    /// raw-XBRL directory: `{dir}/{TICKER}/{TICKER}_{accession}_{form}_instance.xml`.
    pub fn instance_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.ticker.to_uppercase())
            .join(self.instance_filename())
    }
}

/// The aggregated submissions dataset: one record per discovered filing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionsFile {
    /// All discovered filings, in index order.
    #[serde(default)]
    pub filings: Vec<FilingMeta>,
}

impl SubmissionsFile {
    /// Load the submissions JSON from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Up to `limit` 10-Q filings, in index order. This is the working set
    /// for evidence-based reconciliation runs.
    pub fn ten_q_filings(&self, limit: usize) -> Vec<&FilingMeta> {
        self.filings
            .iter()
            .filter(|f| f.is_ten_q())
            .take(limit)
            .collect()
    }

    /// At most `max_companies` distinct tickers, using the latest 10-Q for
    /// each, sorted by ticker for stable output.
    pub fn latest_ten_q_per_ticker(&self, max_companies: usize) -> Vec<&FilingMeta> {
        let mut by_ticker: HashMap<&str, &FilingMeta> = HashMap::new();
        for filing in self.filings.iter().filter(|f| f.is_ten_q()) {
            by_ticker
                .entry(filing.ticker.as_str())
                .and_modify(|existing| {
                    if filing.filing_date > existing.filing_date {
                        *existing = filing;
                    }
                })
                .or_insert(filing);
        }

        let mut chosen: Vec<&FilingMeta> = by_ticker.into_values().collect();
        chosen.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        chosen.truncate(max_companies);
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filing(ticker: &str, form: &str, date: (i32, u32, u32)) -> FilingMeta {
        FilingMeta {
            ticker: ticker.to_string(),
            cik: "0001234567".to_string(),
            form: form.to_string(),
            accession_number: "0001234567-25-000042".to_string(),
            primary_document: "form10q.htm".to_string(),
            filing_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    #[test]
    fn test_form_selection() {
        assert!(filing("ACME", "10-Q", (2025, 9, 5)).is_ten_q());
        assert!(filing("ACME", "10-Q/A", (2025, 9, 5)).is_ten_q());
        assert!(!filing("ACME", "10-K", (2025, 9, 5)).is_ten_q());
        assert!(!filing("ACME", "8-K", (2025, 9, 5)).is_ten_q());
    }

    #[test]
    fn test_instance_path_convention() {
        let f = filing("acme", "10-Q/A", (2025, 9, 5));
        let path = f.instance_path(Path::new("/data/raw_xbrl"));
        assert_eq!(
            path,
            PathBuf::from("/data/raw_xbrl/ACME/ACME_0001234567-25-000042_10-Q-A_instance.xml")
        );
    }

    #[test]
    fn test_form_type_alias() {
        let json = r#"{"filings": [
            {"ticker": "ACME", "cik": "1", "form_type": "10-Q",
             "accession_number": "a-1", "primary_document": "d.htm",
             "filing_date": "2025-09-05"}
        ]}"#;
        let subs: SubmissionsFile = serde_json::from_str(json).unwrap();
        assert_eq!(subs.filings[0].form, "10-Q");
    }

    #[test]
    fn test_ten_q_selection_and_limit() {
        let subs = SubmissionsFile {
            filings: vec![
                filing("AAA", "10-Q", (2025, 3, 1)),
                filing("AAA", "10-K", (2025, 1, 1)),
                filing("BBB", "10-Q", (2025, 6, 1)),
                filing("AAA", "10-Q", (2025, 6, 1)),
            ],
        };

        let all = subs.ten_q_filings(10);
        assert_eq!(all.len(), 3);

        let limited = subs.ten_q_filings(2);
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].ticker, "AAA");
    }

    #[test]
    fn test_latest_ten_q_per_ticker() {
        let subs = SubmissionsFile {
            filings: vec![
                filing("BBB", "10-Q", (2025, 6, 1)),
                filing("AAA", "10-Q", (2025, 3, 1)),
                filing("AAA", "10-Q", (2025, 6, 1)),
                filing("CCC", "10-K", (2025, 6, 1)),
            ],
        };

        let latest = subs.latest_ten_q_per_ticker(10);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].ticker, "AAA");
        assert_eq!(
            latest[0].filing_date,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert_eq!(latest[1].ticker, "BBB");

        let capped = subs.latest_ten_q_per_ticker(1);
        assert_eq!(capped.len(), 1);
        assert_eq!(capped[0].ticker, "AAA");
    }
}
