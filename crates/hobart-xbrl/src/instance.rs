//! XBRL instance document model.
//!
//! An instance document is a flat XML file containing `<xbrli:context>`
//! declarations followed by fact elements that reference them via
//! `contextRef`. This module performs a single streaming pass over the
//! document and produces:
//!
//! - every context, keyed by id, with its reporting period and dimension map;
//! - every fact candidate (element with a `contextRef` and text) in document
//!   order, with its namespace-aliased concept name;
//! - the DEI metadata that anchors the filing (`DocumentPeriodEndDate`,
//!   fiscal year/period focus, document type, amendment flag).
//!
//! Namespace URIs are normalized to short aliases so concept names read as
//! `us-gaap:Revenues` rather than a full versioned taxonomy URI. Unrecognized
//! namespaces fall back to the last path segment of their URI.

use crate::error::{Result, XbrlError};
use chrono::NaiveDate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::collections::{BTreeMap, HashMap};

/// XBRL instance namespace (`xbrli`).
pub const XBRLI_NS: &str = "http://www.xbrl.org/2003/instance";

/// XBRL dimensional instance namespace (`xbrldi`).
pub const XBRLDI_NS: &str = "http://xbrl.org/2006/xbrldi";

/// Known namespace URI prefixes and their short aliases.
///
/// Taxonomy URIs carry a version segment (e.g. `http://fasb.org/us-gaap/2025`),
/// so matching is by prefix rather than exact URI.
const NS_ALIASES: &[(&str, &str)] = &[
    ("http://fasb.org/us-gaap/", "us-gaap"),
    ("http://fasb.org/srt/", "srt"),
    ("http://xbrl.sec.gov/dei/", "dei"),
    ("http://xbrl.sec.gov/country/", "country"),
    ("http://www.xbrl.org/2003/instance", "xbrl"),
    ("http://xbrl.org/2006/xbrldi", "xbrldi"),
];

/// Map a namespace URI to a short alias.
///
/// Unknown namespaces fall back to their last path segment, which keeps
/// company extension taxonomies readable without a lookup table.
fn namespace_alias(uri: &str) -> &str {
    for (prefix, alias) in NS_ALIASES {
        if uri.starts_with(prefix) {
            return alias;
        }
    }
    uri.trim_end_matches('/').rsplit('/').next().unwrap_or(uri)
}

/// One `<xbrli:context>` in the instance document.
///
/// A context determines the reporting period (a start/end duration or a
/// single instant) and any dimensional breakdown. A context with an empty
/// dimension map represents company-wide consolidated totals; any dimension
/// entry means the figure is split by segment, product line, geography, or
/// a consolidation adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Context identifier, unique within the document.
    pub id: String,

    /// Duration start date, if this is a duration context.
    pub start_date: Option<NaiveDate>,

    /// Duration end date, if this is a duration context.
    pub end_date: Option<NaiveDate>,

    /// Instant date, if this is an instant context.
    pub instant: Option<NaiveDate>,

    /// Dimension axis -> member, e.g.
    /// `"srt:ProductOrServiceAxis" -> "us-gaap:ServiceOtherMember"`.
    pub dims: BTreeMap<String, String>,
}

impl Context {
    /// Create an empty context with the given id.
    pub const fn new(id: String) -> Self {
        Self {
            id,
            start_date: None,
            end_date: None,
            instant: None,
            dims: BTreeMap::new(),
        }
    }

    /// Returns true if this context represents company-wide consolidated
    /// totals, i.e. it carries no dimensional qualifiers.
    pub fn is_consolidated(&self) -> bool {
        self.dims.is_empty()
    }

    /// The date this context reports "as of": the duration end date for
    /// duration contexts, the instant date otherwise.
    ///
    /// The two are treated interchangeably when compared against the
    /// document period end, since either may represent the filing's main
    /// period.
    pub const fn end_or_instant(&self) -> Option<NaiveDate> {
        match self.end_date {
            Some(d) => Some(d),
            None => self.instant,
        }
    }
}

/// One flattened fact candidate: an element carrying a `contextRef` and a
/// non-empty text value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFact {
    /// Namespace-aliased concept name, e.g. `us-gaap:Revenues`.
    pub concept: String,

    /// Context id this fact references.
    pub context_ref: String,

    /// Raw text value as reported. Numeric interpretation happens later,
    /// at comparison time.
    pub value: String,
}

/// DEI metadata extracted from the instance document.
///
/// All fields are matched by local name only, namespace-agnostically, since
/// the `dei` taxonomy URI changes each year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    /// `DocumentPeriodEndDate`: the filing's primary reporting period anchor.
    pub period_end: Option<NaiveDate>,

    /// `DocumentFiscalYearFocus`, e.g. `"2025"`.
    pub fiscal_year: Option<String>,

    /// `DocumentFiscalPeriodFocus`, e.g. `"Q3"` or `"FY"`.
    pub fiscal_period: Option<String>,

    /// `DocumentType`, e.g. `"10-Q"`.
    pub document_type: Option<String>,

    /// `AmendmentFlag`, e.g. `"false"`.
    pub amendment_flag: Option<String>,
}

/// A parsed XBRL instance document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceDocument {
    /// All contexts, keyed by context id.
    pub contexts: HashMap<String, Context>,

    /// All fact candidates in document order.
    pub facts: Vec<RawFact>,

    /// DEI metadata for the filing.
    pub meta: DocumentMeta,
}

/// Which period child of a context is currently being read.
#[derive(Debug, Clone, Copy)]
enum PeriodField {
    Start,
    End,
    Instant,
}

/// Streaming state for one `<xbrli:context>` under construction.
#[derive(Debug)]
struct ContextBuilder {
    ctx: Context,
    field: Option<PeriodField>,
    dimension: Option<String>,
    buf: String,
}

impl InstanceDocument {
    /// Parse an XBRL instance document from XML text.
    ///
    /// Returns an error on malformed XML or on context dates that do not
    /// follow the `YYYY-MM-DD` grammar. An absent or unparsable
    /// `DocumentPeriodEndDate` is *not* an error; the anchor simply stays
    /// unknown and downstream filtering degrades gracefully.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut contexts: HashMap<String, Context> = HashMap::new();
        let mut facts: Vec<RawFact> = Vec::new();
        let mut current_context: Option<ContextBuilder> = None;
        let mut current_fact: Option<RawFact> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| XbrlError::Xml(e.to_string()))?;
            match event {
                Event::Start(e) => {
                    // A nested element ends the text content of the fact we
                    // were reading, mirroring how a tree walk sees only the
                    // text before the first child.
                    if let Some(fact) = current_fact.take()
                        && !fact.value.trim().is_empty()
                    {
                        facts.push(fact);
                    }

                    let (ns, local) = reader.resolve_element(e.name());
                    let local = String::from_utf8_lossy(local.as_ref()).into_owned();
                    let uri = resolved_uri(&ns);

                    if let Some(builder) = current_context.as_mut() {
                        start_context_child(builder, &local, uri.as_deref(), &e)?;
                    } else if local == "context" && uri.as_deref() == Some(XBRLI_NS) {
                        if let Some(id) = attribute(&e, "id")? {
                            current_context = Some(ContextBuilder {
                                ctx: Context::new(id),
                                field: None,
                                dimension: None,
                                buf: String::new(),
                            });
                        }
                    } else if let Some(context_ref) = attribute(&e, "contextRef")? {
                        current_fact = Some(RawFact {
                            concept: concept_name(uri.as_deref(), &local),
                            context_ref,
                            value: String::new(),
                        });
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| XbrlError::Xml(e.to_string()))?;
                    if let Some(fact) = current_fact.as_mut() {
                        fact.value.push_str(&text);
                    } else if let Some(builder) = current_context.as_mut()
                        && (builder.field.is_some() || builder.dimension.is_some())
                    {
                        builder.buf.push_str(&text);
                    }
                }
                Event::End(e) => {
                    if let Some(fact) = current_fact.take() {
                        if !fact.value.trim().is_empty() {
                            facts.push(fact);
                        }
                        continue;
                    }

                    if current_context.is_none() {
                        continue;
                    }
                    let (ns, local) = reader.resolve_element(e.name());
                    let local = String::from_utf8_lossy(local.as_ref()).into_owned();
                    let uri = resolved_uri(&ns);

                    if local == "context" && uri.as_deref() == Some(XBRLI_NS) {
                        if let Some(finished) = current_context.take() {
                            contexts.insert(finished.ctx.id.clone(), finished.ctx);
                        }
                    } else if let Some(builder) = current_context.as_mut() {
                        end_context_child(builder, &local)?;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let meta = document_meta(&facts);
        Ok(Self {
            contexts,
            facts,
            meta,
        })
    }

    /// Look up a context by id.
    pub fn context(&self, id: &str) -> Option<&Context> {
        self.contexts.get(id)
    }

    /// The filing's declared primary reporting period end date, if any.
    pub const fn document_period_end(&self) -> Option<NaiveDate> {
        self.meta.period_end
    }
}

/// Extract the URI of a resolved namespace, if bound.
fn resolved_uri(ns: &ResolveResult<'_>) -> Option<String> {
    match ns {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}

/// Build the aliased concept name for an element.
fn concept_name(uri: Option<&str>, local: &str) -> String {
    match uri {
        Some(uri) => format!("{}:{}", namespace_alias(uri), local),
        None => local.to_string(),
    }
}

/// Read an unescaped attribute value from a start tag.
fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    let attr = e
        .try_get_attribute(name)
        .map_err(|e| XbrlError::Xml(e.to_string()))?;
    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|e| XbrlError::Xml(e.to_string()))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Handle a start tag inside a context declaration.
fn start_context_child(
    builder: &mut ContextBuilder,
    local: &str,
    uri: Option<&str>,
    e: &BytesStart<'_>,
) -> Result<()> {
    match local {
        "startDate" if uri == Some(XBRLI_NS) => {
            builder.field = Some(PeriodField::Start);
            builder.buf.clear();
        }
        "endDate" if uri == Some(XBRLI_NS) => {
            builder.field = Some(PeriodField::End);
            builder.buf.clear();
        }
        "instant" if uri == Some(XBRLI_NS) => {
            builder.field = Some(PeriodField::Instant);
            builder.buf.clear();
        }
        "explicitMember" if uri == Some(XBRLDI_NS) => {
            if let Some(dimension) = attribute(e, "dimension")? {
                builder.dimension = Some(dimension);
                builder.buf.clear();
            }
        }
        _ => {}
    }
    Ok(())
}

/// Handle an end tag inside a context declaration.
fn end_context_child(builder: &mut ContextBuilder, local: &str) -> Result<()> {
    match local {
        "startDate" | "endDate" | "instant" => {
            if let Some(field) = builder.field.take() {
                let date = parse_date(builder.buf.trim())?;
                match field {
                    PeriodField::Start => builder.ctx.start_date = Some(date),
                    PeriodField::End => builder.ctx.end_date = Some(date),
                    PeriodField::Instant => builder.ctx.instant = Some(date),
                }
            }
        }
        "explicitMember" => {
            if let Some(dimension) = builder.dimension.take() {
                let member = builder.buf.trim().to_string();
                if !member.is_empty() {
                    builder.ctx.dims.insert(dimension, member);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| XbrlError::InvalidDate(s.to_string()))
}

/// The local (prefix-stripped) part of an aliased concept name.
pub(crate) fn local_name(concept: &str) -> &str {
    concept.rsplit(':').next().unwrap_or(concept)
}

/// Scan facts for DEI metadata, matching by local name only.
fn document_meta(facts: &[RawFact]) -> DocumentMeta {
    let mut meta = DocumentMeta::default();
    for fact in facts {
        let value = fact.value.trim();
        if value.is_empty() {
            continue;
        }
        match local_name(&fact.concept) {
            // Unparsable dates are skipped rather than fatal; a later
            // occurrence may still carry a usable anchor.
            "DocumentPeriodEndDate" if meta.period_end.is_none() => {
                meta.period_end = parse_date(value).ok();
            }
            "DocumentFiscalYearFocus" if meta.fiscal_year.is_none() => {
                meta.fiscal_year = Some(value.to_string());
            }
            "DocumentFiscalPeriodFocus" if meta.fiscal_period.is_none() => {
                meta.fiscal_period = Some(value.to_string());
            }
            "DocumentType" if meta.document_type.is_none() => {
                meta.document_type = Some(value.to_string());
            }
            "AmendmentFlag" if meta.amendment_flag.is_none() => {
                meta.amendment_flag = Some(value.to_string());
            }
            _ => {}
        }
    }
    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance"
      xmlns:xbrldi="http://xbrl.org/2006/xbrldi"
      xmlns:dei="http://xbrl.sec.gov/dei/2025"
      xmlns:us-gaap="http://fasb.org/us-gaap/2025"
      xmlns:srt="http://fasb.org/srt/2025">
  <xbrli:context id="c-1">
    <xbrli:entity>
      <xbrli:identifier scheme="http://www.sec.gov/CIK">0001234567</xbrli:identifier>
    </xbrli:entity>
    <xbrli:period>
      <xbrli:startDate>2025-05-01</xbrli:startDate>
      <xbrli:endDate>2025-07-31</xbrli:endDate>
    </xbrli:period>
  </xbrli:context>
  <xbrli:context id="c-2">
    <xbrli:entity>
      <xbrli:identifier scheme="http://www.sec.gov/CIK">0001234567</xbrli:identifier>
      <xbrli:segment>
        <xbrldi:explicitMember dimension="srt:ProductOrServiceAxis">us-gaap:ProductMember</xbrldi:explicitMember>
      </xbrli:segment>
    </xbrli:entity>
    <xbrli:period>
      <xbrli:startDate>2025-05-01</xbrli:startDate>
      <xbrli:endDate>2025-07-31</xbrli:endDate>
    </xbrli:period>
  </xbrli:context>
  <xbrli:context id="c-3">
    <xbrli:entity>
      <xbrli:identifier scheme="http://www.sec.gov/CIK">0001234567</xbrli:identifier>
    </xbrli:entity>
    <xbrli:period>
      <xbrli:instant>2025-07-31</xbrli:instant>
    </xbrli:period>
  </xbrli:context>
  <dei:DocumentPeriodEndDate contextRef="c-1">2025-07-31</dei:DocumentPeriodEndDate>
  <dei:DocumentFiscalYearFocus contextRef="c-1">2025</dei:DocumentFiscalYearFocus>
  <dei:DocumentFiscalPeriodFocus contextRef="c-1">Q3</dei:DocumentFiscalPeriodFocus>
  <dei:DocumentType contextRef="c-1">10-Q</dei:DocumentType>
  <us-gaap:Revenues contextRef="c-1" unitRef="usd" decimals="-6">1230000000</us-gaap:Revenues>
  <us-gaap:Revenues contextRef="c-2" unitRef="usd" decimals="-6">800000000</us-gaap:Revenues>
  <us-gaap:Assets contextRef="c-3" unitRef="usd" decimals="-6">5000000000</us-gaap:Assets>
</xbrl>"#;

    #[test]
    fn test_parse_contexts() {
        let doc = InstanceDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.contexts.len(), 3);

        let c1 = doc.context("c-1").unwrap();
        assert_eq!(c1.start_date, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(c1.end_date, NaiveDate::from_ymd_opt(2025, 7, 31));
        assert!(c1.instant.is_none());
        assert!(c1.is_consolidated());

        let c2 = doc.context("c-2").unwrap();
        assert!(!c2.is_consolidated());
        assert_eq!(
            c2.dims.get("srt:ProductOrServiceAxis").map(String::as_str),
            Some("us-gaap:ProductMember")
        );

        let c3 = doc.context("c-3").unwrap();
        assert_eq!(c3.instant, NaiveDate::from_ymd_opt(2025, 7, 31));
        assert_eq!(c3.end_or_instant(), NaiveDate::from_ymd_opt(2025, 7, 31));
    }

    #[test]
    fn test_consolidated_classification_ignores_dimension_count() {
        let mut ctx = Context::new("c".to_string());
        assert!(ctx.is_consolidated());
        ctx.dims
            .insert("a:Axis".to_string(), "a:Member".to_string());
        assert!(!ctx.is_consolidated());
        ctx.dims
            .insert("b:Axis".to_string(), "b:Member".to_string());
        assert!(!ctx.is_consolidated());
    }

    #[test]
    fn test_parse_facts_and_concept_aliases() {
        let doc = InstanceDocument::parse(SAMPLE).unwrap();
        let concepts: Vec<&str> = doc.facts.iter().map(|f| f.concept.as_str()).collect();
        assert!(concepts.contains(&"us-gaap:Revenues"));
        assert!(concepts.contains(&"us-gaap:Assets"));
        assert!(concepts.contains(&"dei:DocumentPeriodEndDate"));

        let revenue = doc
            .facts
            .iter()
            .find(|f| f.concept == "us-gaap:Revenues" && f.context_ref == "c-1")
            .unwrap();
        assert_eq!(revenue.value, "1230000000");
    }

    #[test]
    fn test_document_meta() {
        let doc = InstanceDocument::parse(SAMPLE).unwrap();
        assert_eq!(
            doc.document_period_end(),
            NaiveDate::from_ymd_opt(2025, 7, 31)
        );
        assert_eq!(doc.meta.fiscal_year.as_deref(), Some("2025"));
        assert_eq!(doc.meta.fiscal_period.as_deref(), Some("Q3"));
        assert_eq!(doc.meta.document_type.as_deref(), Some("10-Q"));
        assert!(doc.meta.amendment_flag.is_none());
    }

    #[test]
    fn test_missing_period_end_is_not_an_error() {
        let xml = r#"<xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance"
                           xmlns:us-gaap="http://fasb.org/us-gaap/2025">
          <xbrli:context id="c-1">
            <xbrli:period><xbrli:instant>2025-07-31</xbrli:instant></xbrli:period>
          </xbrli:context>
          <us-gaap:Assets contextRef="c-1">100</us-gaap:Assets>
        </xbrl>"#;
        let doc = InstanceDocument::parse(xml).unwrap();
        assert!(doc.document_period_end().is_none());
        assert_eq!(doc.facts.len(), 1);
    }

    #[test]
    fn test_malformed_xml_errors() {
        assert!(matches!(
            InstanceDocument::parse("<xbrl><unclosed></xbrl>"),
            Err(XbrlError::Xml(_))
        ));
    }

    #[test]
    fn test_namespace_alias_fallback() {
        assert_eq!(namespace_alias("http://fasb.org/us-gaap/2024"), "us-gaap");
        assert_eq!(namespace_alias("http://xbrl.sec.gov/dei/2023"), "dei");
        assert_eq!(namespace_alias("http://www.example.com/20250731"), "20250731");
    }
}
