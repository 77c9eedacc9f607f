//! Numeric parsing for values reported in XBRL instance documents.
//!
//! XBRL fact values arrive un-suffixed (plain decimals, optionally signed,
//! sometimes with thousands separators), so this parser is deliberately
//! simpler than the vendor-side one. Placeholders map to "no value" rather
//! than an error; anything else that fails the grammar is malformed input
//! and is surfaced to the caller instead of being coerced to `None`.

use crate::error::{Result, XbrlError};

/// Parse a reported XBRL value into a finite float.
///
/// Returns `Ok(None)` for `None`, empty/whitespace-only strings, and the
/// placeholder dashes (`-`, `—`). Returns `Err(XbrlError::MalformedNumber)`
/// for any other string that does not parse as a finite decimal.
///
/// # Example
///
/// ```
/// use hobart_xbrl::numeric::parse_reported;
///
/// assert_eq!(parse_reported(Some("1230000000")).unwrap(), Some(1.23e9));
/// assert_eq!(parse_reported(Some("-")).unwrap(), None);
/// assert!(parse_reported(Some("Q3")).is_err());
/// ```
pub fn parse_reported(raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "-" || cleaned == "\u{2014}" {
        return Ok(None);
    }

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(XbrlError::MalformedNumber(raw.to_string())),
    }
}
