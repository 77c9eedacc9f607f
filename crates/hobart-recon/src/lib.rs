#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod canonical;
pub mod error;
pub mod evidence;
pub mod export;
pub mod mapping;
pub mod matcher;
pub mod pipeline;
pub mod survey;

pub use canonical::{METRIC_RULES, MetricRule, canonical_map, concept_magnitudes};
pub use error::{ReconError, Result};
pub use evidence::EvidenceStore;
pub use export::{ExportFormat, export_fact_rows, export_mapping, fact_rows_to_csv};
pub use mapping::{CompanyMapping, MappingConfig};
pub use matcher::{MatchConfig, MetricMatch, find_close_matches, match_filing, sec_numeric_map};
pub use pipeline::{ComparisonOutcome, FilingComparison, reconcile_filing};
pub use survey::{TickerConcepts, common_concepts, concept_frequency, render_summary};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
