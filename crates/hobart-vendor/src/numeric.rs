//! Numeric parsing for scraped display values.
//!
//! Portal tables render numbers for humans: thousands separators, magnitude
//! suffixes (`294.00K`, `782.00M`, `1.86B`, `2.1T`), percentages (`51.5%`),
//! and placeholder dashes for missing cells. This parser turns those into
//! comparable floats in dollars (or fractions for percentages).
//!
//! Placeholders map to "no value"; anything else non-empty that fails the
//! grammar is a hard error so upstream scraping regressions surface instead
//! of being silently coerced to missing data. Callers doing best-effort
//! batch parsing catch and skip per field.

use crate::error::{Result, VendorError};

/// Parse a scraped display value into a finite float.
///
/// - `None`, empty/whitespace, `-`, `—` → `Ok(None)`
/// - `K`/`M`/`B`/`T` suffix (case-insensitive) → value × 1e3/1e6/1e9/1e12
/// - `%` suffix → value ÷ 100
/// - plain decimal → as-is
///
/// # Example
///
/// ```
/// use hobart_vendor::numeric::parse_scraped;
///
/// assert_eq!(parse_scraped(Some("1.86B")).unwrap(), Some(1.86e9));
/// assert_eq!(parse_scraped(Some("-407.00M")).unwrap(), Some(-4.07e8));
/// assert_eq!(parse_scraped(Some("51.5%")).unwrap(), Some(0.515));
/// assert_eq!(parse_scraped(Some("-")).unwrap(), None);
/// assert!(parse_scraped(Some("not-a-number")).is_err());
/// ```
pub fn parse_scraped(raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "-" || cleaned == "\u{2014}" {
        return Ok(None);
    }

    let malformed = || VendorError::MalformedNumber(raw.to_string());

    if let Some(percent) = cleaned.strip_suffix('%') {
        let v: f64 = percent.trim().parse().map_err(|_| malformed())?;
        return finite(v / 100.0, malformed);
    }

    let (number_part, multiplier) = match cleaned.chars().next_back() {
        Some(c) if c.eq_ignore_ascii_case(&'k') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some(c) if c.eq_ignore_ascii_case(&'m') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some(c) if c.eq_ignore_ascii_case(&'b') => (&cleaned[..cleaned.len() - 1], 1e9),
        Some(c) if c.eq_ignore_ascii_case(&'t') => (&cleaned[..cleaned.len() - 1], 1e12),
        _ => (cleaned, 1.0),
    };

    let v: f64 = number_part.trim().parse().map_err(|_| malformed())?;
    finite(v * multiplier, malformed)
}

fn finite(v: f64, malformed: impl Fn() -> VendorError) -> Result<Option<f64>> {
    if v.is_finite() {
        Ok(Some(v))
    } else {
        Err(malformed())
    }
}
