//! Scraped statement model.
//!
//! A vendor document carries up to three statement groups (income statement,
//! balance sheet, cash flow), each mapping metric display names to
//! per-period raw text values. Scraper versions differ in shape: some store
//! a group as a flat `metric -> {period -> value}` map, some nest the same
//! map one level down under a `metrics` key. Both shapes are accepted, and
//! stray scrape metadata (non-object entries) is skipped.
//!
//! Metric display names are not unique across groups ("Revenue" can appear
//! in more than one). The merged view disambiguates collisions by appending
//! the group name, then a numeric suffix, so the final key set is unique.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Statement group keys, in merge order.
const STATEMENT_GROUPS: [&str; 3] = ["income_statement", "balance_sheet", "cash_flow"];

/// One statement group in either accepted shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementGroup(pub Map<String, Value>);

impl StatementGroup {
    /// The metric map for this group: the object under `metrics` when
    /// present, the group object itself otherwise.
    fn metric_source(&self) -> &Map<String, Value> {
        match self.0.get("metrics") {
            Some(Value::Object(metrics)) => metrics,
            _ => &self.0,
        }
    }

    /// Iterate metric entries as `(name, period -> raw value)`, skipping
    /// non-object entries and non-string cells.
    fn metric_entries(&self) -> impl Iterator<Item = (&str, HashMap<String, String>)> {
        self.metric_source().iter().filter_map(|(name, value)| {
            let Value::Object(per_period) = value else {
                return None;
            };
            let cells: HashMap<String, String> = per_period
                .iter()
                .filter_map(|(label, cell)| {
                    cell.as_str().map(|s| (label.clone(), s.to_string()))
                })
                .collect();
            Some((name.as_str(), cells))
        })
    }

    /// A `periods` array stored inside this group, if any.
    fn periods(&self) -> Option<Vec<String>> {
        match self.0.get("periods") {
            Some(Value::Array(labels)) => Some(
                labels
                    .iter()
                    .filter_map(|l| l.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// A per-company scraped financials document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorFinancials {
    /// Stock ticker symbol.
    #[serde(default)]
    pub ticker: String,

    /// Ordered period-column labels, e.g. `"Oct 2025 (FQ4)"`.
    #[serde(default)]
    pub periods: Vec<String>,

    /// Income statement group.
    #[serde(default)]
    pub income_statement: Option<StatementGroup>,

    /// Balance sheet group.
    #[serde(default)]
    pub balance_sheet: Option<StatementGroup>,

    /// Cash flow group.
    #[serde(default)]
    pub cash_flow: Option<StatementGroup>,
}

impl VendorFinancials {
    /// Load a vendor financials JSON from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn group(&self, key: &str) -> Option<&StatementGroup> {
        match key {
            "income_statement" => self.income_statement.as_ref(),
            "balance_sheet" => self.balance_sheet.as_ref(),
            "cash_flow" => self.cash_flow.as_ref(),
            _ => None,
        }
    }

    /// The period-column labels: the top-level list when present, else the
    /// first `periods` array found inside a statement group.
    pub fn periods(&self) -> Vec<String> {
        if !self.periods.is_empty() {
            return self.periods.clone();
        }
        STATEMENT_GROUPS
            .iter()
            .filter_map(|key| self.group(key).and_then(StatementGroup::periods))
            .next()
            .unwrap_or_default()
    }

    /// Merge all statement groups into one flat metric view, in group order
    /// and scrape order within each group.
    ///
    /// Name collisions across groups get the group key appended
    /// (`"Revenue (balance_sheet)"`), and a numeric suffix on the unlikely
    /// repeat collision; every returned name is unique.
    pub fn merged_metrics(&self) -> Vec<(String, HashMap<String, String>)> {
        let mut merged: Vec<(String, HashMap<String, String>)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for key in STATEMENT_GROUPS {
            let Some(group) = self.group(key) else {
                continue;
            };
            for (raw_name, cells) in group.metric_entries() {
                let mut name = raw_name.to_string();
                if seen.contains(&name) {
                    name = format!("{raw_name} ({key})");
                    let mut suffix = 2;
                    while seen.contains(&name) {
                        name = format!("{raw_name} ({key}) #{suffix}");
                        suffix += 1;
                    }
                }
                seen.insert(name.clone());
                merged.push((name, cells));
            }
        }

        merged
    }
}
