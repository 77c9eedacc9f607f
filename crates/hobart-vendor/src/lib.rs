#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod numeric;
pub mod period;
pub mod statements;

pub use error::{Result, VendorError};
pub use period::{FiscalPeriod, column_values, parse_period_label, resolve_period_index};
pub use statements::VendorFinancials;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
