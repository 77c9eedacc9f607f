//! Cross-company concept survey.
//!
//! Shows which concepts are tagged consistently across companies (standard
//! us-gaap and dei names) and which are company-specific taxonomy
//! extensions, by comparing the consolidated concept sets of one filing per
//! ticker.

use hobart_xbrl::FactRow;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// Concepts appearing most places are listed first; this caps the listing.
const TOP_CONCEPTS: usize = 30;

/// At most this many unique concepts are listed per ticker.
const UNIQUE_SAMPLE: usize = 15;

/// The distinct concept set of one ticker's surveyed filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerConcepts {
    /// Stock ticker symbol.
    pub ticker: String,

    /// Filing date of the surveyed filing.
    pub filing_date: NaiveDate,

    /// Distinct namespace-aliased concepts in its consolidated facts.
    pub concepts: BTreeSet<String>,
}

impl TickerConcepts {
    /// Collect the concept set from extracted fact rows.
    pub fn from_rows(ticker: &str, filing_date: NaiveDate, rows: &[FactRow]) -> Self {
        Self {
            ticker: ticker.to_string(),
            filing_date,
            concepts: rows.iter().map(|r| r.concept.clone()).collect(),
        }
    }
}

/// Count, per concept, how many distinct tickers use it.
pub fn concept_frequency(surveyed: &[TickerConcepts]) -> BTreeMap<&str, usize> {
    let mut freq: BTreeMap<&str, usize> = BTreeMap::new();
    for tc in surveyed {
        for concept in &tc.concepts {
            *freq.entry(concept).or_insert(0) += 1;
        }
    }
    freq
}

/// Concepts present in every surveyed ticker. Empty input yields the empty
/// set rather than "everything".
pub fn common_concepts(surveyed: &[TickerConcepts]) -> BTreeSet<String> {
    let mut iter = surveyed.iter();
    let Some(first) = iter.next() else {
        return BTreeSet::new();
    };
    let mut common = first.concepts.clone();
    for tc in iter {
        common.retain(|c| tc.concepts.contains(c));
    }
    common
}

/// Render the survey summary: per-ticker counts, the shared concept core,
/// the most widely used concepts, and a sample of each ticker's private
/// extensions.
pub fn render_summary(surveyed: &[TickerConcepts]) -> String {
    let mut out = String::new();
    if surveyed.is_empty() {
        let _ = writeln!(out, "No surveyed filings to summarize.");
        return out;
    }

    let mut ordered: Vec<&TickerConcepts> = surveyed.iter().collect();
    ordered.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    let _ = writeln!(out, "=== PER-TICKER CONCEPT COUNTS ===");
    for tc in &ordered {
        let _ = writeln!(out, "{:6}  {:4} distinct concepts", tc.ticker, tc.concepts.len());
    }

    let common = common_concepts(surveyed);
    let _ = writeln!(out, "\n=== CONCEPTS PRESENT IN ALL TICKERS ===");
    if common.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for concept in &common {
        let _ = writeln!(out, "  {concept}");
    }

    let freq = concept_frequency(surveyed);
    let mut ranked: Vec<(&str, usize)> = freq.iter().map(|(c, n)| (*c, *n)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let _ = writeln!(
        out,
        "\n=== TOP {TOP_CONCEPTS} MOST COMMON CONCEPTS (by #tickers that use them) ==="
    );
    for (concept, count) in ranked.iter().take(TOP_CONCEPTS) {
        let _ = writeln!(out, "  {concept:<90}  used by {count} tickers");
    }

    let _ = writeln!(out, "\n=== UNIQUE CONCEPTS PER TICKER (company-specific extensions) ===");
    for tc in &ordered {
        let unique: Vec<&String> = tc
            .concepts
            .iter()
            .filter(|c| freq.get(c.as_str()) == Some(&1))
            .collect();
        let _ = writeln!(out, "\nTicker {}: {} unique concepts", tc.ticker, unique.len());
        for concept in unique.iter().take(UNIQUE_SAMPLE) {
            let _ = writeln!(out, "    {concept}");
        }
        if unique.len() > UNIQUE_SAMPLE {
            let _ = writeln!(out, "    ... and {} more", unique.len() - UNIQUE_SAMPLE);
        }
    }

    out
}
