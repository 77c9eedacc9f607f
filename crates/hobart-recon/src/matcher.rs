//! Numeric cross-source matching.
//!
//! A filing reports `us-gaap:Revenues = 1_860_000_000`; the vendor column
//! for the same quarter has `"Revenue" -> 1.86e9`. Neither side carries a
//! key linking the two, so the link is inferred from the numbers: two
//! values match when their relative error fits inside an escalating
//! tolerance ladder. The ladder keeps the tightest band that produces any
//! match, so a value with an exact counterpart never picks up loose
//! neighbors from wider bands.

use hobart_xbrl::{FactRow, numeric::parse_reported};
use std::collections::HashMap;

/// Tolerance ladder parameters for one matching run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Widest relative tolerance tried, e.g. 0.02 for 2%.
    pub max_tolerance: f64,

    /// Ladder increment, e.g. 0.005 for half-percent steps.
    pub step: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_tolerance: 0.02,
            step: 0.005,
        }
    }
}

/// One accepted correspondence between a filing concept and a vendor
/// metric, at a specific relative error.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricMatch {
    /// Namespace-aliased filing concept, e.g. `us-gaap:Revenues`.
    pub concept: String,

    /// Value reported in the filing.
    pub sec_value: f64,

    /// Vendor metric display name, e.g. `"Total revenue"`.
    pub metric: String,

    /// Value in the vendor column.
    pub vendor_value: f64,

    /// `|vendor - sec| / |sec|`.
    pub rel_err: f64,
}

/// Match one filing value against a vendor column under the escalating
/// tolerance ladder.
///
/// Bands are `step, 2*step, ..., max_tolerance`; the first band with at
/// least one match wins and returns all its matches sorted by ascending
/// relative error (metric name breaking ties). A zero filing value matches
/// nothing (relative error is undefined there), and zero vendor values are
/// skipped for the same reason in reverse.
pub fn find_close_matches(
    sec_value: f64,
    vendor_values: &HashMap<String, f64>,
    max_tolerance: f64,
    step: f64,
) -> Vec<(String, f64, f64)> {
    if sec_value == 0.0 {
        return Vec::new();
    }

    // Small epsilon so 0.02 / 0.005 reliably yields four bands instead of
    // three under binary-fraction truncation.
    let bands = ((max_tolerance / step) + 1e-9).floor() as usize;

    for band in 1..=bands {
        let tol = band as f64 * step;
        let mut matches: Vec<(String, f64, f64)> = vendor_values
            .iter()
            .filter(|(_, v)| **v != 0.0)
            .filter_map(|(name, v)| {
                let rel_err = (v - sec_value).abs() / sec_value.abs();
                (rel_err <= tol).then(|| (name.clone(), *v, rel_err))
            })
            .collect();

        if !matches.is_empty() {
            matches.sort_by(|a, b| a.2.total_cmp(&b.2).then_with(|| a.0.cmp(&b.0)));
            return matches;
        }
    }

    Vec::new()
}

/// Build the concept -> value view of a filing's extracted fact rows.
///
/// Rows whose value is a placeholder or fails the reported-numeric grammar
/// are skipped (best-effort per the numeric contract: the text universe of
/// an instance document includes dates and strings). When a concept repeats
/// the later fact wins.
pub fn sec_numeric_map(rows: &[FactRow]) -> HashMap<String, f64> {
    let mut out = HashMap::new();
    for row in rows {
        if let Ok(Some(v)) = parse_reported(Some(&row.value)) {
            out.insert(row.concept.clone(), v);
        }
    }
    out
}

/// Match every filing concept against a vendor column.
///
/// Concepts are tried in descending absolute value (the headline totals are
/// the most informative), with the concept name breaking ties for
/// determinism. All accepted matches are then globally re-sorted by
/// ascending relative error, so the report reads best-first.
pub fn match_filing(
    sec_map: &HashMap<String, f64>,
    vendor_column: &HashMap<String, f64>,
    config: MatchConfig,
) -> Vec<MetricMatch> {
    let mut concepts: Vec<(&String, &f64)> = sec_map.iter().collect();
    concepts.sort_by(|a, b| {
        b.1.abs()
            .total_cmp(&a.1.abs())
            .then_with(|| a.0.cmp(b.0))
    });

    let mut all_matches = Vec::new();
    for (concept, sec_value) in concepts {
        for (metric, vendor_value, rel_err) in
            find_close_matches(*sec_value, vendor_column, config.max_tolerance, config.step)
        {
            all_matches.push(MetricMatch {
                concept: concept.clone(),
                sec_value: *sec_value,
                metric,
                vendor_value,
                rel_err,
            });
        }
    }

    all_matches.sort_by(|a, b| {
        a.rel_err
            .total_cmp(&b.rel_err)
            .then_with(|| a.concept.cmp(&b.concept))
            .then_with(|| a.metric.cmp(&b.metric))
    });
    all_matches
}
