//! End-to-end tests that run a complete narrative through assembly,
//! extraction, and all three renderers.

use claim_parse::types::ContentItem;
use claim_parse::{ExportFormat, ReportMetadata, extract};

/// A representative model-generated narrative: preamble chatter, decorated
/// headers, a repeated section, lists, emphasis, and a cost estimate.
const NARRATIVE: &str = "\
Here is the completed inspection report as requested.

PROPERTY INSPECTION REPORT
---

EXECUTIVE SUMMARY
Wind and hail damage was observed on the south-facing roof slopes.
Interior moisture staining indicates an active leak at the chimney flashing.

ROOF INSPECTION
The roof covering is architectural asphalt shingle, approximately 12 years old.
North slope:
- Scattered granule loss consistent with **hail impact**
- Three creased shingles at the ridge
South slope:
- Two missing tabs near the eave

ROOF INSPECTION
This repeated section should be discarded by the assembler.

INTERIOR OBSERVATIONS
Water staining on the dining room ceiling measuring approximately 2 feet.
The drywall is _soft_ to the touch.

COST ESTIMATE
- Roof repair: $1,200
- Siding: $800
Total cost: $2,000

RECOMMENDATIONS
1. Immediate roof tarp installation required
2. Schedule licensed roofer for permanent repair
3. Monitor interior staining for spread

CONCLUSION
The observed damage is consistent with the reported storm event.
";

fn metadata() -> ReportMetadata {
    ReportMetadata {
        claim_number: Some("CLM-2026-00187".into()),
        insured_name: Some("Dana Whitfield".into()),
        property_address: Some("412 Alder Court, Cedar Falls, IA 50613".into()),
        loss_date: Some("2026-03-14".into()),
        loss_type: Some("Wind/Hail".into()),
        report_type: Some("Inspection Report".into()),
    }
}

#[test]
fn assembles_without_duplicates_or_preamble() {
    let result = claim_parse::parse(NARRATIVE);
    let keys: Vec<&str> = result
        .doc
        .sections
        .iter()
        .map(|s| s.normalized_key.as_str())
        .collect();

    // Every key is unique.
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), keys.len(), "duplicate keys in {keys:?}");

    assert!(keys.contains(&"ROOF INSPECTION"));
    assert!(keys.contains(&"RECOMMENDATIONS"));

    // The duplicate ROOF INSPECTION body is gone, and a diagnostic says so.
    let roof = result.doc.section("ROOF INSPECTION").unwrap();
    let flat = format!("{roof:?}");
    assert!(!flat.contains("repeated section should be discarded"));
    assert!(result.diagnostics.iter().any(|d| d.code.as_deref() == Some("W001")));

    // The preamble never made it into any section.
    assert!(!format!("{:?}", result.doc).contains("as requested"));
}

#[test]
fn extractors_find_summary_and_costs() {
    let summary = extract::executive_summary(NARRATIVE).unwrap();
    assert!(summary.starts_with("Wind and hail damage"));
    assert!(summary.chars().count() <= 500);

    let table = extract::cost_table(NARRATIVE).unwrap();
    assert_eq!(table.items.len(), 2);
    assert_eq!(table.items[0].description, "Roof repair");
    assert_eq!(table.items[0].amount, 1200.0);
    assert_eq!(table.items[1].amount, 800.0);
    assert_eq!(table.total, 2000.0);
}

#[test]
fn recommendation_items_are_flagged() {
    let result = claim_parse::parse(NARRATIVE);
    let recs = result.doc.section("RECOMMENDATIONS").unwrap();
    let flags: Vec<bool> = recs
        .items
        .iter()
        .filter_map(|item| match item {
            ContentItem::Numbered { flagged, .. } => Some(*flagged),
            _ => None,
        })
        .collect();
    assert_eq!(flags, vec![true, true, true]);
}

#[test]
fn web_artifact_contains_every_section_header_once() {
    let result = claim_parse::parse(NARRATIVE);
    let html = result.doc.to_web_page(&metadata());

    for section in &result.doc.sections {
        if section.header_text.is_empty() {
            continue;
        }
        assert_eq!(
            html.matches(&section.header_text).count(),
            1,
            "header {:?}",
            section.header_text
        );
    }
    // Emphasis markers never survive into the page.
    assert!(!html.contains("**"));
}

#[test]
fn print_artifact_contains_every_section_header() {
    let result = claim_parse::parse(NARRATIVE);
    let summary = extract::executive_summary(NARRATIVE);
    let costs = extract::cost_table(NARRATIVE);
    let bytes = result
        .doc
        .to_print(&metadata(), summary.as_deref(), costs.as_ref())
        .unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let pdf = lopdf::Document::load_mem(&bytes).unwrap();
    let page_numbers: Vec<u32> = pdf.get_pages().keys().copied().collect();
    let text = pdf.extract_text(&page_numbers).unwrap();

    // COST ESTIMATE and EXECUTIVE SUMMARY render as call-out boxes; the rest
    // of the headers come from the body walk. Either way each must appear.
    for header in [
        "EXECUTIVE SUMMARY",
        "ROOF INSPECTION",
        "INTERIOR OBSERVATIONS",
        "COST ESTIMATE",
        "RECOMMENDATIONS",
        "CONCLUSION",
    ] {
        assert!(text.contains(header), "missing header {header:?}");
    }
    assert!(text.contains("Page 1 of"));
}

#[test]
fn rich_artifact_is_a_zip_container() {
    let result = claim_parse::parse(NARRATIVE);
    let bytes = result.doc.to_rich_doc(&metadata()).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn export_produces_named_artifacts() {
    for format in [ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Html] {
        let artifact = claim_parse::export(&metadata(), NARRATIVE, format).unwrap();
        assert!(artifact.file_name.starts_with("CLM-2026-00187_Inspection-Report_"));
        assert!(artifact.file_name.ends_with(format.extension()));
        assert!(!artifact.bytes.is_empty());
    }
}

#[test]
fn conversion_is_deterministic() {
    let a = claim_parse::parse(NARRATIVE);
    let b = claim_parse::parse(NARRATIVE);
    assert_eq!(format!("{:?}", a.doc), format!("{:?}", b.doc));

    let html_a = a.doc.to_web_page(&metadata());
    let html_b = b.doc.to_web_page(&metadata());
    assert_eq!(html_a, html_b);
}
