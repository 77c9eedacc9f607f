//! Period labels and fiscal alignment.
//!
//! The portal labels its statement columns with free-form strings encoding a
//! month, year, and fiscal quarter, e.g. `"Oct 2025 (FQ4)"`. A filing, on
//! the other side, declares `DocumentFiscalYearFocus` (`"2025"`) and
//! `DocumentFiscalPeriodFocus` (`"Q3"`). Alignment works on the label
//! suffix: the column for that filing is the first label ending with
//! `"2025 (FQ3)"`.

use crate::error::{Result, VendorError};
use crate::numeric::parse_scraped;
use chrono::{Months, NaiveDate};
use std::collections::HashMap;

/// A fiscal quarter decoded from a vendor period label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalPeriod {
    /// Fiscal year, e.g. 2025.
    pub fiscal_year: i32,

    /// Fiscal quarter, 1 through 4.
    pub fiscal_quarter: u8,

    /// Last calendar day of the labeled month.
    pub period_end: NaiveDate,
}

/// Month abbreviations as the portal renders them.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn month_number(abbrev: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(abbrev))
        .map(|i| i as u32 + 1)
}

/// Parse a vendor period label like `"Oct 2025 (FQ4)"` into its fiscal
/// year, fiscal quarter, and period end date (last day of the labeled
/// month).
///
/// # Example
///
/// ```
/// use hobart_vendor::parse_period_label;
/// use chrono::NaiveDate;
///
/// let p = parse_period_label("Oct 2025 (FQ4)").unwrap();
/// assert_eq!(p.fiscal_year, 2025);
/// assert_eq!(p.fiscal_quarter, 4);
/// assert_eq!(p.period_end, NaiveDate::from_ymd_opt(2025, 10, 31).unwrap());
/// ```
pub fn parse_period_label(label: &str) -> Result<FiscalPeriod> {
    let malformed = || VendorError::MalformedPeriodLabel(label.to_string());

    let mut tokens = label.split_whitespace();
    let month = tokens.next().and_then(month_number).ok_or_else(malformed)?;
    let year: i32 = tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(malformed)?;
    let quarter: u8 = tokens
        .next()
        .and_then(|t| t.strip_prefix("(FQ"))
        .and_then(|t| t.strip_suffix(')'))
        .and_then(|t| t.parse().ok())
        .filter(|q| (1..=4).contains(q))
        .ok_or_else(malformed)?;
    if tokens.next().is_some() {
        return Err(malformed());
    }

    let period_end = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .and_then(|d| d.pred_opt())
        .ok_or_else(malformed)?;

    Ok(FiscalPeriod {
        fiscal_year: year,
        fiscal_quarter: quarter,
        period_end,
    })
}

/// Find the vendor period column matching a filing's fiscal year and
/// quarter focus.
///
/// The filing declares focus strings like `"2025"` and `"Q3"`; the match is
/// the first label (in list order) ending with `"{year} (F{quarter})"`.
/// Returns `None` when either focus field is missing or malformed, or when
/// no label matches — that filing then contributes no comparison.
pub fn resolve_period_index(
    periods: &[String],
    fiscal_year: &str,
    fiscal_period: &str,
) -> Option<usize> {
    if fiscal_year.is_empty() || !fiscal_period.starts_with('Q') {
        return None;
    }
    let suffix = format!("{fiscal_year} (F{fiscal_period})");
    periods.iter().position(|label| label.ends_with(&suffix))
}

/// Build the flat metric -> value view for one vendor period column.
///
/// Metrics with missing or unparsable entries for that column are skipped
/// (best-effort per the malformed-numeric contract); they simply do not
/// participate in matching for this filing.
pub fn column_values(
    metrics: &[(String, HashMap<String, String>)],
    period_label: &str,
) -> HashMap<String, f64> {
    let mut out = HashMap::new();
    for (name, per_period) in metrics {
        let raw = per_period.get(period_label).map(String::as_str);
        if let Ok(Some(v)) = parse_scraped(raw) {
            out.insert(name.clone(), v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Oct 2025 (FQ4)", 2025, 4, (2025, 10, 31))]
    #[case("Jul 2025 (FQ3)", 2025, 3, (2025, 7, 31))]
    #[case("Feb 2024 (FQ1)", 2024, 1, (2024, 2, 29))]
    #[case("dec 2023 (FQ2)", 2023, 2, (2023, 12, 31))]
    fn test_parse_period_label(
        #[case] label: &str,
        #[case] year: i32,
        #[case] quarter: u8,
        #[case] end: (i32, u32, u32),
    ) {
        let p = parse_period_label(label).unwrap();
        assert_eq!(p.fiscal_year, year);
        assert_eq!(p.fiscal_quarter, quarter);
        assert_eq!(
            p.period_end,
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap()
        );
    }

    #[rstest]
    #[case("")]
    #[case("Oct 2025")]
    #[case("Smarch 2025 (FQ4)")]
    #[case("Oct 2025 (Q4)")]
    #[case("Oct 2025 (FQ5)")]
    #[case("Oct 2025 (FQ4) extra")]
    fn test_parse_period_label_malformed(#[case] label: &str) {
        assert!(matches!(
            parse_period_label(label),
            Err(VendorError::MalformedPeriodLabel(_))
        ));
    }

    fn labels() -> Vec<String> {
        vec![
            "Oct 2025 (FQ4)".to_string(),
            "Jul 2025 (FQ3)".to_string(),
            "Apr 2025 (FQ2)".to_string(),
            "Jan 2025 (FQ1)".to_string(),
            "Oct 2024 (FQ4)".to_string(),
        ]
    }

    #[test]
    fn test_resolve_period_index() {
        let periods = labels();
        assert_eq!(resolve_period_index(&periods, "2025", "Q3"), Some(1));
        assert_eq!(resolve_period_index(&periods, "2024", "Q4"), Some(4));
        assert_eq!(resolve_period_index(&periods, "2023", "Q1"), None);
    }

    #[test]
    fn test_resolve_period_index_rejects_bad_focus() {
        let periods = labels();
        assert_eq!(resolve_period_index(&periods, "", "Q3"), None);
        assert_eq!(resolve_period_index(&periods, "2025", ""), None);
        assert_eq!(resolve_period_index(&periods, "2025", "FY"), None);
        assert_eq!(resolve_period_index(&[], "2025", "Q3"), None);
    }

    #[test]
    fn test_column_values_skips_missing_and_unparsable() {
        let metrics = vec![
            (
                "Revenue".to_string(),
                HashMap::from([("Jul 2025 (FQ3)".to_string(), "1.86B".to_string())]),
            ),
            (
                "Net Profit".to_string(),
                HashMap::from([("Jul 2025 (FQ3)".to_string(), "-".to_string())]),
            ),
            (
                "Gross Margin".to_string(),
                HashMap::from([("Jul 2025 (FQ3)".to_string(), "51.5%".to_string())]),
            ),
            (
                "Broken".to_string(),
                HashMap::from([("Jul 2025 (FQ3)".to_string(), "n/a".to_string())]),
            ),
            (
                "Absent".to_string(),
                HashMap::from([("Apr 2025 (FQ2)".to_string(), "1.0M".to_string())]),
            ),
        ];

        let column = column_values(&metrics, "Jul 2025 (FQ3)");
        assert_eq!(column.len(), 2);
        assert_eq!(column.get("Revenue"), Some(&1.86e9));
        assert_eq!(column.get("Gross Margin"), Some(&0.515));
    }
}
