//! Export of reconciliation artifacts.
//!
//! Fact rows export to CSV for spreadsheet inspection; mappings export to
//! JSON (compact or pretty) since their nesting does not flatten usefully.

use crate::error::{ReconError, Result};
use crate::mapping::CompanyMapping;
use hobart_xbrl::FactRow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Serialize fact rows to a CSV string with a header row.
pub fn fact_rows_to_csv(rows: &[FactRow]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ReconError::InvalidFormat(e.to_string()))
}

/// Write fact rows to a CSV file.
pub fn export_fact_rows(rows: &[FactRow], path: &Path) -> Result<()> {
    let csv = fact_rows_to_csv(rows)?;
    let mut file = File::create(path)?;
    file.write_all(csv.as_bytes())?;
    Ok(())
}

/// Write a company mapping to disk in the requested format.
///
/// CSV is rejected: the mapping is two levels of nesting deep and has no
/// canonical row shape.
pub fn export_mapping(mapping: &CompanyMapping, path: &Path, format: ExportFormat) -> Result<()> {
    let json = match format {
        ExportFormat::Json => serde_json::to_string(mapping)?,
        ExportFormat::PrettyJson => serde_json::to_string_pretty(mapping)?,
        ExportFormat::Csv => {
            return Err(ReconError::InvalidFormat(
                "mappings are nested; use a JSON format".to_string(),
            ));
        }
    };
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}
