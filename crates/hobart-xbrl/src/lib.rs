#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod extract;
pub mod filing;
pub mod instance;
pub mod numeric;

pub use error::{Result, XbrlError};
pub use extract::{FactRow, extract_company_totals};
pub use filing::{FilingMeta, SubmissionsFile};
pub use instance::{Context, DocumentMeta, InstanceDocument};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
