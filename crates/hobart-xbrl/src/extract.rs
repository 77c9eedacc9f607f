//! Consolidated-totals extraction.
//!
//! Filters the fact universe of a parsed instance document down to
//! company-wide (non-segmented) facts belonging to the filing's primary
//! reporting period, producing clean [`FactRow`] records ready for
//! comparison against a second data source.

use crate::instance::{InstanceDocument, XBRLDI_NS, local_name};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One flattened consolidated fact with filing provenance attached.
///
/// The value is stored as text and only numerically interpreted at
/// comparison time; a fact is only meaningful together with the context it
/// resolved against, whose period fields are copied here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRow {
    /// Stock ticker symbol.
    pub ticker: String,

    /// Official filing date of the form.
    pub filing_date: NaiveDate,

    /// Context id the fact resolved against.
    pub context_id: String,

    /// Namespace-aliased concept name, e.g.
    /// `us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax`.
    pub concept: String,

    /// Raw reported text value.
    pub value: String,

    /// Duration start date from the resolved context.
    pub period_start: Option<NaiveDate>,

    /// Duration end date from the resolved context.
    pub period_end: Option<NaiveDate>,

    /// Instant date from the resolved context.
    pub instant: Option<NaiveDate>,
}

impl FactRow {
    /// The local (prefix-stripped) part of the concept name.
    pub fn local_concept(&self) -> &str {
        local_name(&self.concept)
    }
}

/// Extract consolidated company-wide totals for the document's primary
/// reporting period.
///
/// A fact candidate is kept iff:
///
/// 1. its `contextRef` resolves to a known context;
/// 2. that context has no dimensions (consolidated totals);
/// 3. the context's end or instant date equals `DocumentPeriodEndDate` —
///    skipped when the filing omits the anchor, accepting the broader risk
///    of non-primary-period facts;
/// 4. the value is non-empty;
/// 5. the element is not dimensional metadata (`xbrldi` namespace).
///
/// Collection stops after `limit` facts, in document order. Callers needing
/// "top N by magnitude" must sort afterwards. This is a heuristic, not a
/// guarantee: a filing whose primary totals are dimensionally tagged in a
/// non-standard way will under- or over-collect.
pub fn extract_company_totals(
    doc: &InstanceDocument,
    ticker: &str,
    filing_date: NaiveDate,
    limit: usize,
) -> Vec<FactRow> {
    let doc_end = doc.document_period_end();
    let mut rows = Vec::new();

    for fact in &doc.facts {
        if rows.len() >= limit {
            break;
        }

        if fact.concept.starts_with("xbrldi:") || fact.concept.starts_with(XBRLDI_NS) {
            continue;
        }

        let value = fact.value.trim();
        if value.is_empty() {
            continue;
        }

        let Some(ctx) = doc.context(&fact.context_ref) else {
            continue;
        };

        if !ctx.is_consolidated() {
            continue;
        }

        if let Some(anchor) = doc_end
            && ctx.end_or_instant() != Some(anchor)
        {
            continue;
        }

        rows.push(FactRow {
            ticker: ticker.to_string(),
            filing_date,
            context_id: ctx.id.clone(),
            concept: fact.concept.clone(),
            value: value.to_string(),
            period_start: ctx.start_date,
            period_end: ctx.end_date,
            instant: ctx.instant,
        });
    }

    rows
}

/// Group extracted fact rows by context id, preserving row order within
/// each group. Diagnostic helper for inspection output.
pub fn rows_by_context<'a>(rows: &'a [FactRow]) -> BTreeMap<&'a str, Vec<&'a FactRow>> {
    let mut grouped: BTreeMap<&str, Vec<&FactRow>> = BTreeMap::new();
    for row in rows {
        grouped.entry(row.context_id.as_str()).or_default().push(row);
    }
    grouped
}
