//! Integration tests for instance parsing and consolidated-totals extraction

use chrono::NaiveDate;
use hobart_xbrl::{InstanceDocument, extract_company_totals};

const INSTANCE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance"
      xmlns:xbrldi="http://xbrl.org/2006/xbrldi"
      xmlns:dei="http://xbrl.sec.gov/dei/2024"
      xmlns:us-gaap="http://fasb.org/us-gaap/2024"
      xmlns:srt="http://fasb.org/srt/2024"
      xmlns:acme="http://www.acme.example/20250731">
  <xbrli:context id="q3-ytd">
    <xbrli:entity>
      <xbrli:identifier scheme="http://www.sec.gov/CIK">0000999999</xbrli:identifier>
    </xbrli:entity>
    <xbrli:period>
      <xbrli:startDate>2024-11-01</xbrli:startDate>
      <xbrli:endDate>2025-07-31</xbrli:endDate>
    </xbrli:period>
  </xbrli:context>
  <xbrli:context id="q3">
    <xbrli:entity>
      <xbrli:identifier scheme="http://www.sec.gov/CIK">0000999999</xbrli:identifier>
    </xbrli:entity>
    <xbrli:period>
      <xbrli:startDate>2025-05-01</xbrli:startDate>
      <xbrli:endDate>2025-07-31</xbrli:endDate>
    </xbrli:period>
  </xbrli:context>
  <xbrli:context id="q3-products">
    <xbrli:entity>
      <xbrli:identifier scheme="http://www.sec.gov/CIK">0000999999</xbrli:identifier>
      <xbrli:segment>
        <xbrldi:explicitMember dimension="srt:ProductOrServiceAxis">us-gaap:ProductMember</xbrldi:explicitMember>
        <xbrldi:explicitMember dimension="us-gaap:StatementBusinessSegmentsAxis">acme:HardwareSegmentMember</xbrldi:explicitMember>
      </xbrli:segment>
    </xbrli:entity>
    <xbrli:period>
      <xbrli:startDate>2025-05-01</xbrli:startDate>
      <xbrli:endDate>2025-07-31</xbrli:endDate>
    </xbrli:period>
  </xbrli:context>
  <xbrli:context id="balance">
    <xbrli:entity>
      <xbrli:identifier scheme="http://www.sec.gov/CIK">0000999999</xbrli:identifier>
    </xbrli:entity>
    <xbrli:period>
      <xbrli:instant>2025-07-31</xbrli:instant>
    </xbrli:period>
  </xbrli:context>
  <dei:DocumentType contextRef="q3-ytd">10-Q</dei:DocumentType>
  <dei:DocumentPeriodEndDate contextRef="q3-ytd">2025-07-31</dei:DocumentPeriodEndDate>
  <dei:DocumentFiscalYearFocus contextRef="q3-ytd">2025</dei:DocumentFiscalYearFocus>
  <dei:DocumentFiscalPeriodFocus contextRef="q3-ytd">Q3</dei:DocumentFiscalPeriodFocus>
  <dei:AmendmentFlag contextRef="q3-ytd">false</dei:AmendmentFlag>
  <us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax contextRef="q3" unitRef="usd" decimals="-6">1860000000</us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax>
  <us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax contextRef="q3-products" unitRef="usd" decimals="-6">1100000000</us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax>
  <us-gaap:NetIncomeLoss contextRef="q3" unitRef="usd" decimals="-6">294000000</us-gaap:NetIncomeLoss>
  <us-gaap:Assets contextRef="balance" unitRef="usd" decimals="-6">5210000000</us-gaap:Assets>
  <acme:AdjustedPlatformRevenue contextRef="q3" unitRef="usd" decimals="-6">1700000000</acme:AdjustedPlatformRevenue>
</xbrl>"#;

fn parse() -> InstanceDocument {
    InstanceDocument::parse(INSTANCE).expect("sample instance parses")
}

#[test]
fn test_full_instance_parse() {
    let doc = parse();

    assert_eq!(doc.contexts.len(), 4);
    assert!(doc.context("q3").unwrap().is_consolidated());
    assert!(!doc.context("q3-products").unwrap().is_consolidated());
    assert_eq!(doc.context("q3-products").unwrap().dims.len(), 2);

    assert_eq!(
        doc.document_period_end(),
        NaiveDate::from_ymd_opt(2025, 7, 31)
    );
    assert_eq!(doc.meta.fiscal_year.as_deref(), Some("2025"));
    assert_eq!(doc.meta.fiscal_period.as_deref(), Some("Q3"));
    assert_eq!(doc.meta.amendment_flag.as_deref(), Some("false"));
}

#[test]
fn test_company_extension_namespace_aliasing() {
    let doc = parse();
    // Unrecognized namespaces alias to the last path segment of their URI.
    assert!(
        doc.facts
            .iter()
            .any(|f| f.concept == "20250731:AdjustedPlatformRevenue")
    );
}

#[test]
fn test_extraction_end_to_end() {
    let doc = parse();
    let filing_date = NaiveDate::from_ymd_opt(2025, 9, 5).unwrap();
    let rows = extract_company_totals(&doc, "ACME", filing_date, 500);

    let concepts: Vec<&str> = rows.iter().map(|r| r.concept.as_str()).collect();
    assert!(concepts.contains(&"us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax"));
    assert!(concepts.contains(&"us-gaap:NetIncomeLoss"));
    assert!(concepts.contains(&"us-gaap:Assets"));
    assert!(concepts.contains(&"20250731:AdjustedPlatformRevenue"));

    // The segmented revenue figure must not survive extraction.
    assert_eq!(
        rows.iter()
            .filter(|r| r.concept == "us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax")
            .count(),
        1
    );

    let revenue = rows
        .iter()
        .find(|r| r.concept == "us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax")
        .unwrap();
    assert_eq!(revenue.value, "1860000000");
    assert_eq!(revenue.context_id, "q3");
    assert_eq!(revenue.ticker, "ACME");
    assert_eq!(revenue.filing_date, filing_date);

    let assets = rows.iter().find(|r| r.concept == "us-gaap:Assets").unwrap();
    assert_eq!(assets.instant, NaiveDate::from_ymd_opt(2025, 7, 31));
    assert!(assets.period_end.is_none());
}
