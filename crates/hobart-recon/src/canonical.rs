//! Rule-based canonical metric mapping.
//!
//! The evidence pipeline learns per-company metric names from the numbers;
//! this module is the complementary shortcut for the headline metrics whose
//! XBRL tagging is conventional enough to resolve from concept names alone.
//! Each canonical metric carries an ordered priority list of exact concepts
//! and a lower-cased local-name substring fallback; the fallback picks the
//! candidate with the largest accumulated magnitude, on the theory that the
//! company-wide total dwarfs any same-named sub-item.

use hobart_xbrl::{FactRow, numeric::parse_reported};
use std::collections::{BTreeMap, HashMap};

/// Resolution rules for one canonical metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricRule {
    /// Canonical metric name, e.g. `"Revenue"`.
    pub canonical_name: &'static str,

    /// Exact concepts preferred in this order.
    pub priority_concepts: &'static [&'static str],

    /// Lower-cased local-name substrings for the fallback search.
    pub name_contains_any: &'static [&'static str],
}

/// The canonical metric rule table, in emission order.
pub const METRIC_RULES: &[MetricRule] = &[
    MetricRule {
        canonical_name: "Revenue",
        priority_concepts: &[
            "us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax",
            "us-gaap:Revenues",
            "us-gaap:SalesRevenueNet",
            "us-gaap:SalesRevenueGoodsNet",
            "us-gaap:SalesRevenueServicesNet",
        ],
        name_contains_any: &["revenue", "sales"],
    },
    MetricRule {
        canonical_name: "GrossProfit",
        priority_concepts: &[
            "us-gaap:GrossProfit",
            "us-gaap:GrossProfitIncludingDepreciation",
        ],
        name_contains_any: &["grossprofit"],
    },
    MetricRule {
        canonical_name: "OperatingIncome",
        priority_concepts: &["us-gaap:OperatingIncomeLoss"],
        name_contains_any: &["operatingincome", "operatingloss"],
    },
    MetricRule {
        canonical_name: "NetIncome",
        priority_concepts: &["us-gaap:NetIncomeLoss", "us-gaap:ProfitLoss"],
        name_contains_any: &["netincome", "netincomeloss", "profitloss"],
    },
    MetricRule {
        canonical_name: "Assets",
        priority_concepts: &["us-gaap:Assets"],
        name_contains_any: &["assets"],
    },
    MetricRule {
        canonical_name: "LiabilitiesAndEquity",
        priority_concepts: &[
            "us-gaap:LiabilitiesAndStockholdersEquity",
            "us-gaap:LiabilitiesAndPartnersCapital",
        ],
        name_contains_any: &[
            "liabilitiesandstockholdersequity",
            "liabilitiesandpartnerscapital",
        ],
    },
    MetricRule {
        canonical_name: "CFO",
        priority_concepts: &["us-gaap:NetCashProvidedByUsedInOperatingActivities"],
        name_contains_any: &["netcashprovidedbyusedinoperatingactivities"],
    },
    MetricRule {
        canonical_name: "CFI",
        priority_concepts: &["us-gaap:NetCashProvidedByUsedInInvestingActivities"],
        name_contains_any: &["netcashprovidedbyusedininvestingactivities"],
    },
    MetricRule {
        canonical_name: "CFF",
        priority_concepts: &["us-gaap:NetCashProvidedByUsedInFinancingActivities"],
        name_contains_any: &["netcashprovidedbyusedinfinancingactivities"],
    },
    MetricRule {
        canonical_name: "EPSBasic",
        priority_concepts: &["us-gaap:EarningsPerShareBasic"],
        name_contains_any: &["earningspersharebasic"],
    },
    MetricRule {
        canonical_name: "EPSDiluted",
        priority_concepts: &["us-gaap:EarningsPerShareDiluted"],
        name_contains_any: &["earningspersharediluted"],
    },
];

/// Accumulate `concept -> sum of |value|` over all numeric facts.
///
/// Non-numeric rows are ignored.
pub fn concept_magnitudes(rows: &[FactRow]) -> HashMap<String, f64> {
    let mut magnitudes: HashMap<String, f64> = HashMap::new();
    for row in rows {
        if let Ok(Some(v)) = parse_reported(Some(&row.value)) {
            *magnitudes.entry(row.concept.clone()).or_insert(0.0) += v.abs();
        }
    }
    magnitudes
}

fn choose_concept(rule: &MetricRule, magnitudes: &HashMap<String, f64>) -> Option<String> {
    for concept in rule.priority_concepts {
        if magnitudes.contains_key(*concept) {
            return Some((*concept).to_string());
        }
    }

    let mut best: Option<(&String, f64)> = None;
    for (concept, mag) in magnitudes {
        let local = concept.rsplit(':').next().unwrap_or(concept).to_lowercase();
        if !rule.name_contains_any.iter().any(|p| local.contains(p)) {
            continue;
        }
        let better = match best {
            Some((best_concept, best_mag)) => {
                mag.total_cmp(&best_mag) == std::cmp::Ordering::Greater
                    // Magnitude ties resolve by name so repeated runs agree.
                    || (*mag == best_mag && concept < best_concept)
            }
            None => true,
        };
        if better {
            best = Some((concept, *mag));
        }
    }

    best.map(|(concept, _)| concept.clone())
}

/// Build the canonical `metric -> concept` map for one company's
/// consolidated facts. Canonicals no rule can resolve are absent.
pub fn canonical_map(rows: &[FactRow]) -> BTreeMap<String, String> {
    let magnitudes = concept_magnitudes(rows);
    let mut out = BTreeMap::new();
    for rule in METRIC_RULES {
        if let Some(concept) = choose_concept(rule, &magnitudes) {
            out.insert(rule.canonical_name.to_string(), concept);
        }
    }
    out
}
