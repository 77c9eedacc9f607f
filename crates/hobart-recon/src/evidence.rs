//! Cross-quarter match evidence.
//!
//! A single quarter's numeric match can be a coincidence; the same vendor
//! metric landing on the same filing concept quarter after quarter is not.
//! The store accumulates every accepted match as
//! `ticker -> metric -> concept -> [relative errors]` and is append-only
//! during a batch; reduction to a final mapping happens once at the end and
//! never mutates the evidence.

use crate::pipeline::{ComparisonOutcome, FilingComparison};
use serde::Serialize;
use std::collections::BTreeMap;

/// Relative errors observed per candidate concept.
pub type ConceptErrors = BTreeMap<String, Vec<f64>>;

/// Accumulated match observations across a reconciliation batch.
///
/// Ordered maps at every level so serialized output and reduction order are
/// deterministic regardless of insertion order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvidenceStore {
    observations: BTreeMap<String, BTreeMap<String, ConceptErrors>>,
}

impl EvidenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no observation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Record one accepted match.
    pub fn record_observation(&mut self, ticker: &str, metric: &str, concept: &str, rel_err: f64) {
        self.observations
            .entry(ticker.to_string())
            .or_default()
            .entry(metric.to_string())
            .or_default()
            .entry(concept.to_string())
            .or_default()
            .push(rel_err);
    }

    /// Fold all matches of a completed filing comparison into the store.
    ///
    /// Only [`ComparisonOutcome::Matched`] filings contribute; a filing
    /// that failed to align (or failed entirely, in which case the caller
    /// never built a comparison) leaves the store untouched, so a batch
    /// never carries partial evidence from a bad filing.
    pub fn record_filing(&mut self, comparison: &FilingComparison) {
        if !matches!(comparison.outcome, ComparisonOutcome::Matched { .. }) {
            return;
        }
        for m in &comparison.matches {
            self.record_observation(&comparison.meta.ticker, &m.metric, &m.concept, m.rel_err);
        }
    }

    /// Iterate `(ticker, metric, concept-errors)` in sorted order.
    pub(crate) fn iter(
        &self,
    ) -> impl Iterator<Item = (&String, &String, &ConceptErrors)> {
        self.observations.iter().flat_map(|(ticker, metrics)| {
            metrics
                .iter()
                .map(move |(metric, concepts)| (ticker, metric, concepts))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_observation_appends() {
        let mut store = EvidenceStore::new();
        assert!(store.is_empty());

        store.record_observation("ACME", "Revenue", "us-gaap:Revenues", 0.001);
        store.record_observation("ACME", "Revenue", "us-gaap:Revenues", 0.002);
        store.record_observation("ACME", "Revenue", "us-gaap:SalesRevenueNet", 0.01);

        let (_, _, concepts) = store.iter().next().unwrap();
        assert_eq!(concepts.get("us-gaap:Revenues").map(Vec::len), Some(2));
        assert_eq!(concepts.get("us-gaap:SalesRevenueNet").map(Vec::len), Some(1));
    }

    #[test]
    fn test_iteration_order_is_sorted() {
        let mut store = EvidenceStore::new();
        store.record_observation("ZZZ", "Revenue", "us-gaap:Revenues", 0.0);
        store.record_observation("ACME", "Net Profit", "us-gaap:NetIncomeLoss", 0.0);
        store.record_observation("ACME", "Revenue", "us-gaap:Revenues", 0.0);

        let keys: Vec<(String, String)> = store
            .iter()
            .map(|(t, m, _)| (t.clone(), m.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("ACME".to_string(), "Net Profit".to_string()),
                ("ACME".to_string(), "Revenue".to_string()),
                ("ZZZ".to_string(), "Revenue".to_string()),
            ]
        );
    }
}
