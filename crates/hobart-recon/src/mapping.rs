//! Evidence reduction to a per-company mapping.

use crate::evidence::EvidenceStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Thresholds separating preferred evidence from fallback evidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingConfig {
    /// Minimum quarters a candidate must have matched in to be preferred.
    pub min_hits: usize,

    /// Maximum mean relative error for a candidate to be preferred.
    pub max_mean_err: f64,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            min_hits: 1,
            max_mean_err: 0.05,
        }
    }
}

/// Final `ticker -> metric -> concept` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyMapping(pub BTreeMap<String, BTreeMap<String, String>>);

impl CompanyMapping {
    /// Look up the concept mapped to a metric for one ticker.
    pub fn concept_for(&self, ticker: &str, metric: &str) -> Option<&str> {
        self.0.get(ticker)?.get(metric).map(String::as_str)
    }
}

impl EvidenceStore {
    /// Reduce accumulated evidence to one concept per (ticker, metric).
    ///
    /// Candidates are ranked by hit count descending, then mean relative
    /// error ascending. Candidates clearing both thresholds are preferred,
    /// but when none do the best overall still wins: once any evidence
    /// exists for a pair there is always an answer, just a lower-confidence
    /// one. Pairs with no evidence are simply absent.
    pub fn reduce_to_mapping(&self, config: MappingConfig) -> CompanyMapping {
        let mut mapping = CompanyMapping::default();

        for (ticker, metric, concepts) in self.iter() {
            // (concept, hits, mean_err)
            let mut stats: Vec<(&String, usize, f64)> = concepts
                .iter()
                .filter(|(_, errs)| !errs.is_empty())
                .map(|(concept, errs)| {
                    let mean = errs.iter().sum::<f64>() / errs.len() as f64;
                    (concept, errs.len(), mean)
                })
                .collect();
            if stats.is_empty() {
                continue;
            }

            stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.total_cmp(&b.2)));

            let best = stats
                .iter()
                .find(|(_, hits, mean)| *hits >= config.min_hits && *mean <= config.max_mean_err)
                .unwrap_or(&stats[0]);

            mapping
                .0
                .entry(ticker.clone())
                .or_default()
                .insert(metric.clone(), best.0.clone());
        }

        mapping
    }
}
