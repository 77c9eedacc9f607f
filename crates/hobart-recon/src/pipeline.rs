//! Per-filing reconciliation.
//!
//! Glue between the two sources for one filing: align the filing's fiscal
//! quarter with a vendor period column, run the matcher, and package the
//! result with enough provenance to render an audit report section.

use crate::matcher::{MatchConfig, MetricMatch, match_filing, sec_numeric_map};
use hobart_vendor::{VendorFinancials, column_values, resolve_period_index};
use hobart_xbrl::{DocumentMeta, FactRow, FilingMeta};
use std::fmt::Write as _;

/// How far one filing's comparison got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    /// A vendor period column was aligned and matching ran.
    Matched {
        /// The aligned vendor column label, e.g. `"Jul 2025 (FQ3)"`.
        period_label: String,
    },

    /// The filing lacks a usable quarterly fiscal focus
    /// (`DocumentFiscalYearFocus` + `DocumentFiscalPeriodFocus` of `Q1..Q4`).
    MissingFiscalFocus,

    /// No vendor financials exist for this ticker.
    NoVendorData,

    /// The vendor periods contain no column for this fiscal quarter.
    PeriodNotAligned,
}

/// The full comparison result for one filing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilingComparison {
    /// Provenance of the filing compared.
    pub meta: FilingMeta,

    /// `DocumentFiscalYearFocus` as reported, when present.
    pub fiscal_year: Option<String>,

    /// `DocumentFiscalPeriodFocus` as reported, when present.
    pub fiscal_period: Option<String>,

    /// How far the comparison got.
    pub outcome: ComparisonOutcome,

    /// Accepted matches, ascending relative error. Empty unless the outcome
    /// is [`ComparisonOutcome::Matched`] (and possibly empty even then).
    pub matches: Vec<MetricMatch>,
}

/// Reconcile one filing's consolidated facts against its ticker's vendor
/// financials.
///
/// Alignment preconditions are checked in order: quarterly fiscal focus,
/// vendor data present, period column resolvable. The first unmet one is
/// the outcome and no matching runs. This function never fails; a filing
/// that cannot be compared is still a reportable result.
pub fn reconcile_filing(
    meta: FilingMeta,
    doc_meta: &DocumentMeta,
    rows: &[FactRow],
    vendor: Option<&VendorFinancials>,
    config: MatchConfig,
) -> FilingComparison {
    let fiscal_year = doc_meta.fiscal_year.clone();
    let fiscal_period = doc_meta.fiscal_period.clone();

    let mut comparison = FilingComparison {
        meta,
        fiscal_year,
        fiscal_period,
        outcome: ComparisonOutcome::MissingFiscalFocus,
        matches: Vec::new(),
    };

    let (Some(year), Some(period)) = (&comparison.fiscal_year, &comparison.fiscal_period) else {
        return comparison;
    };
    if !period.starts_with('Q') {
        return comparison;
    }

    let Some(vendor) = vendor else {
        comparison.outcome = ComparisonOutcome::NoVendorData;
        return comparison;
    };

    let periods = vendor.periods();
    let Some(index) = resolve_period_index(&periods, year, period) else {
        comparison.outcome = ComparisonOutcome::PeriodNotAligned;
        return comparison;
    };
    let period_label = periods[index].clone();

    let merged = vendor.merged_metrics();
    let vendor_column = column_values(&merged, &period_label);
    let sec_map = sec_numeric_map(rows);

    comparison.matches = match_filing(&sec_map, &vendor_column, config);
    comparison.outcome = ComparisonOutcome::Matched { period_label };
    comparison
}

impl FilingComparison {
    /// Render this comparison as a report section.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "===========================================");
        let _ = writeln!(
            out,
            " TICKER: {} | CIK: {} | FORM: {}",
            self.meta.ticker, self.meta.cik, self.meta.form
        );
        let _ = writeln!(out, "===========================================");
        let _ = writeln!(
            out,
            "Filing metadata: FY={} FP={}",
            self.fiscal_year.as_deref().unwrap_or("?"),
            self.fiscal_period.as_deref().unwrap_or("?"),
        );

        match &self.outcome {
            ComparisonOutcome::MissingFiscalFocus => {
                let _ = writeln!(out, "Cannot align filing period with vendor periods.");
            }
            ComparisonOutcome::NoVendorData => {
                let _ = writeln!(out, "No vendor financials found.");
            }
            ComparisonOutcome::PeriodNotAligned => {
                let _ = writeln!(out, "Could not match period.");
            }
            ComparisonOutcome::Matched { period_label } => {
                let _ = writeln!(out, "Matched vendor period column: {period_label}");
                let _ = writeln!(out, "\n=== Matches (sorted by lowest error) ===\n");
                for m in &self.matches {
                    let _ = writeln!(
                        out,
                        "{:<60} SEC={}  vendor={}:{}  err={:.2}%",
                        m.concept,
                        group_thousands(m.sec_value),
                        m.metric,
                        group_thousands(m.vendor_value),
                        m.rel_err * 100.0,
                    );
                }
            }
        }

        out
    }
}

/// Format a float as a whole number with thousands separators, the way the
/// report columns read.
fn group_thousands(v: f64) -> String {
    let rounded = format!("{:.0}", v.abs());
    let mut grouped = String::new();
    for (i, c) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if v < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn meta() -> FilingMeta {
        FilingMeta {
            ticker: "ACME".to_string(),
            cik: "0000123456".to_string(),
            form: "10-Q".to_string(),
            accession_number: "0000123456-25-000042".to_string(),
            primary_document: "acme-20250731.htm".to_string(),
            filing_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
        }
    }

    fn doc_meta(year: Option<&str>, period: Option<&str>) -> DocumentMeta {
        DocumentMeta {
            period_end: NaiveDate::from_ymd_opt(2025, 7, 31),
            fiscal_year: year.map(str::to_string),
            fiscal_period: period.map(str::to_string),
            document_type: Some("10-Q".to_string()),
            amendment_flag: Some("false".to_string()),
        }
    }

    fn fact(concept: &str, value: &str) -> FactRow {
        FactRow {
            ticker: "ACME".to_string(),
            filing_date: NaiveDate::from_ymd_opt(2025, 9, 5).unwrap(),
            context_id: "c-1".to_string(),
            concept: concept.to_string(),
            value: value.to_string(),
            period_start: None,
            period_end: NaiveDate::from_ymd_opt(2025, 7, 31),
            instant: None,
        }
    }

    fn vendor() -> VendorFinancials {
        serde_json::from_str(
            r#"{
                "ticker": "ACME",
                "periods": ["Oct 2025 (FQ4)", "Jul 2025 (FQ3)"],
                "income_statement": {
                    "Revenue": {"Jul 2025 (FQ3)": "1.86B"},
                    "Net Profit": {"Jul 2025 (FQ3)": "294.00M"}
                }
            }"#,
        )
        .unwrap()
    }

    #[rstest]
    #[case(None, Some("Q3"))]
    #[case(Some("2025"), None)]
    #[case(Some("2025"), Some("FY"))]
    fn test_missing_fiscal_focus(#[case] year: Option<&str>, #[case] period: Option<&str>) {
        let c = reconcile_filing(
            meta(),
            &doc_meta(year, period),
            &[],
            Some(&vendor()),
            MatchConfig::default(),
        );
        assert_eq!(c.outcome, ComparisonOutcome::MissingFiscalFocus);
        assert!(c.matches.is_empty());
    }

    #[test]
    fn test_no_vendor_data() {
        let c = reconcile_filing(
            meta(),
            &doc_meta(Some("2025"), Some("Q3")),
            &[],
            None,
            MatchConfig::default(),
        );
        assert_eq!(c.outcome, ComparisonOutcome::NoVendorData);
    }

    #[test]
    fn test_period_not_aligned() {
        let c = reconcile_filing(
            meta(),
            &doc_meta(Some("2023"), Some("Q1")),
            &[],
            Some(&vendor()),
            MatchConfig::default(),
        );
        assert_eq!(c.outcome, ComparisonOutcome::PeriodNotAligned);
    }

    #[test]
    fn test_matched_filing_produces_matches() {
        let rows = vec![
            fact("us-gaap:Revenues", "1860000000"),
            fact("us-gaap:NetIncomeLoss", "293500000"),
            fact("us-gaap:Assets", "99000000000"),
        ];
        let c = reconcile_filing(
            meta(),
            &doc_meta(Some("2025"), Some("Q3")),
            &rows,
            Some(&vendor()),
            MatchConfig::default(),
        );

        assert_eq!(
            c.outcome,
            ComparisonOutcome::Matched {
                period_label: "Jul 2025 (FQ3)".to_string()
            }
        );
        let pairs: Vec<(&str, &str)> = c
            .matches
            .iter()
            .map(|m| (m.concept.as_str(), m.metric.as_str()))
            .collect();
        // Exact revenue match first, then the ~0.17% net-profit match;
        // Assets has no vendor counterpart.
        assert_eq!(
            pairs,
            vec![
                ("us-gaap:Revenues", "Revenue"),
                ("us-gaap:NetIncomeLoss", "Net Profit"),
            ]
        );
    }

    #[test]
    fn test_render_contains_provenance_and_matches() {
        let rows = vec![fact("us-gaap:Revenues", "1860000000")];
        let c = reconcile_filing(
            meta(),
            &doc_meta(Some("2025"), Some("Q3")),
            &rows,
            Some(&vendor()),
            MatchConfig::default(),
        );
        let report = c.render();
        assert!(report.contains("TICKER: ACME"));
        assert!(report.contains("FY=2025 FP=Q3"));
        assert!(report.contains("Matched vendor period column: Jul 2025 (FQ3)"));
        assert!(report.contains("us-gaap:Revenues"));
        assert!(report.contains("1,860,000,000"));
    }

    #[rstest]
    #[case(1860000000.0, "1,860,000,000")]
    #[case(-407000000.0, "-407,000,000")]
    #[case(950.0, "950")]
    #[case(0.0, "0")]
    fn test_group_thousands(#[case] v: f64, #[case] expected: &str) {
        assert_eq!(group_thousands(v), expected);
    }
}
