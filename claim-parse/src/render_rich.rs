//! Rich-document renderer.
//!
//! Produces a single flowed DOCX: date stamp, company letterhead, claim
//! key/value block, a fixed pre-filled reserve table, the full body, and a
//! closing signature block. Body items follow the same per-kind rules as the
//! print renderer but without pagination or badges; bullets and numbered
//! items use native list formatting at nesting level 0.

use std::io::Cursor;

use chrono::{NaiveDate, Utc};
use docx_rs::{
    AbstractNumbering, AlignmentType, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat,
    Numbering, NumberingId, Paragraph, Run, Start, Table, TableCell, TableRow, WidthType,
};
use log::debug;

use crate::error::RenderError;
use crate::types::{Document, EmphasisRun, ReportMetadata, SectionLevel, or_na};
use crate::visit::{ItemVisitor, walk};

const COMPANY_NAME: &str = "TrueNorth Claim Services";
const COMPANY_URL: &str = "www.truenorthclaims.com";
const ATTRIBUTION: &str = "Generated by ClaimSight narrative tooling";

// Half-point font sizes.
const BODY_SIZE: usize = 22;
const SUBSECTION_SIZE: usize = 22;
const MAJOR_SIZE: usize = 26;
const LETTERHEAD_SIZE: usize = 32;

/// Numbering definition ids registered on the document.
const BULLET_NUMBERING: usize = 1;
const DECIMAL_NUMBERING: usize = 2;

/// The reserve table's shape is static regardless of input: four coverage
/// rows plus a total row, with the reserve-amount cells intentionally blank
/// for the adjuster to fill in.
const RESERVE_ROWS: &[&str] = &[
    "Coverage A \u{2013} Dwelling",
    "Coverage B \u{2013} Other Structures",
    "Coverage C \u{2013} Personal Property",
    "Coverage D \u{2013} Loss of Use",
];

/// Render the document to DOCX bytes.
pub fn to_rich_doc(doc: &Document, meta: &ReportMetadata) -> Result<Vec<u8>, RenderError> {
    build_docx(doc, meta, Utc::now().date_naive())
}

fn build_docx(
    doc: &Document,
    meta: &ReportMetadata,
    date: NaiveDate,
) -> Result<Vec<u8>, RenderError> {
    let mut docx = Docx::new()
        .add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING).add_level(Level::new(
            0,
            Start::new(1),
            NumberFormat::new("bullet"),
            LevelText::new("\u{2022}"),
            LevelJc::new("left"),
        )))
        .add_numbering(Numbering::new(BULLET_NUMBERING, BULLET_NUMBERING))
        .add_abstract_numbering(AbstractNumbering::new(DECIMAL_NUMBERING).add_level(Level::new(
            0,
            Start::new(1),
            NumberFormat::new("decimal"),
            LevelText::new("%1."),
            LevelJc::new("left"),
        )))
        .add_numbering(Numbering::new(DECIMAL_NUMBERING, DECIMAL_NUMBERING));

    // Date stamp and letterhead.
    docx = docx
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(date.format("%B %e, %Y").to_string()))
                .align(AlignmentType::Right),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(COMPANY_NAME).bold().size(LETTERHEAD_SIZE).color("1D3A5F"))
                .align(AlignmentType::Center),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Property Claim Services").size(20))
                .align(AlignmentType::Center),
        )
        .add_paragraph(Paragraph::new());

    // Claim key/value block.
    for (label, value) in [
        ("RE: Claim ", or_na(&meta.claim_number)),
        ("Insured: ", or_na(&meta.insured_name)),
        ("Property: ", or_na(&meta.property_address)),
        ("Date of Loss: ", or_na(&meta.loss_date)),
        ("Loss Type: ", or_na(&meta.loss_type)),
    ] {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(label).bold().size(BODY_SIZE))
                .add_run(Run::new().add_text(value).size(BODY_SIZE)),
        );
    }
    docx = docx.add_paragraph(Paragraph::new());

    docx = docx.add_table(reserve_table());
    docx = docx.add_paragraph(Paragraph::new());

    // Body.
    let mut visitor = RichVisitor::default();
    walk(doc, &[], &mut visitor);
    for paragraph in visitor.paragraphs {
        docx = docx.add_paragraph(paragraph);
    }

    // Closing block.
    docx = docx
        .add_paragraph(Paragraph::new())
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("_______________________").size(BODY_SIZE)),
        )
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Field Inspector").size(BODY_SIZE)))
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(COMPANY_NAME).bold().size(BODY_SIZE)),
        )
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(COMPANY_URL).size(20)))
        .add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(ATTRIBUTION).italic().size(18).color("6B7680")),
        );

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| RenderError::Docx(e.to_string()))?;
    let bytes = cursor.into_inner();
    debug!("rich-document renderer produced {} bytes", bytes.len());
    Ok(bytes)
}

/// Four coverage rows plus a total row; reserve cells left blank on purpose.
fn reserve_table() -> Table {
    let header = TableRow::new(vec![
        labeled_cell("Coverage", true, 6000),
        labeled_cell("Reserve Amount", true, 3000),
    ]);

    let mut rows = vec![header];
    for coverage in RESERVE_ROWS {
        rows.push(TableRow::new(vec![
            labeled_cell(coverage, false, 6000),
            labeled_cell("", false, 3000),
        ]));
    }
    rows.push(TableRow::new(vec![
        labeled_cell("TOTAL", true, 6000),
        labeled_cell("", false, 3000),
    ]));

    Table::new(rows).set_grid(vec![6000, 3000])
}

fn labeled_cell(text: &str, bold: bool, width: usize) -> TableCell {
    let mut run = Run::new().add_text(text).size(BODY_SIZE);
    if bold {
        run = run.bold();
    }
    TableCell::new()
        .add_paragraph(Paragraph::new().add_run(run))
        .width(width, WidthType::Dxa)
}

/// Collects body paragraphs in document order.
#[derive(Default)]
struct RichVisitor {
    paragraphs: Vec<Paragraph>,
    last_was_spacer: bool,
}

impl RichVisitor {
    fn styled_runs(&self, runs: &[EmphasisRun], size: usize) -> Vec<Run> {
        runs.iter()
            .filter(|run| !run.text.is_empty())
            .map(|run| {
                let mut built = Run::new().add_text(run.text.clone()).size(size);
                if run.bold {
                    built = built.bold();
                }
                built
            })
            .collect()
    }

    fn push(&mut self, paragraph: Paragraph) {
        self.last_was_spacer = false;
        self.paragraphs.push(paragraph);
    }
}

impl ItemVisitor for RichVisitor {
    fn section_header(&mut self, level: SectionLevel, text: &str) {
        let paragraph = match level {
            SectionLevel::Major => Paragraph::new()
                .add_run(Run::new().add_text(text).bold().size(MAJOR_SIZE)),
            SectionLevel::Subsection => Paragraph::new()
                .add_run(Run::new().add_text(text).bold().size(SUBSECTION_SIZE)),
        };
        self.push(paragraph);
    }

    fn paragraph(&mut self, runs: &[EmphasisRun]) {
        let mut paragraph = Paragraph::new();
        for run in self.styled_runs(runs, BODY_SIZE) {
            paragraph = paragraph.add_run(run);
        }
        self.push(paragraph);
    }

    fn bullet(&mut self, runs: &[EmphasisRun]) {
        let mut paragraph = Paragraph::new()
            .numbering(NumberingId::new(BULLET_NUMBERING), IndentLevel::new(0));
        for run in self.styled_runs(runs, BODY_SIZE) {
            paragraph = paragraph.add_run(run);
        }
        self.push(paragraph);
    }

    fn numbered(&mut self, _index: u32, runs: &[EmphasisRun], _flagged: bool) {
        let mut paragraph = Paragraph::new()
            .numbering(NumberingId::new(DECIMAL_NUMBERING), IndentLevel::new(0));
        for run in self.styled_runs(runs, BODY_SIZE) {
            paragraph = paragraph.add_run(run);
        }
        self.push(paragraph);
    }

    fn spacer(&mut self) {
        // Consecutive spacers collapse to one empty paragraph.
        if !self.last_was_spacer {
            self.paragraphs.push(Paragraph::new());
        }
        self.last_was_spacer = true;
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble;
    use pretty_assertions::assert_eq;

    fn meta() -> ReportMetadata {
        ReportMetadata {
            claim_number: Some("CLM-2026-00187".into()),
            insured_name: Some("Dana Whitfield".into()),
            property_address: Some("412 Alder Court, Cedar Falls, IA".into()),
            loss_date: Some("2026-03-14".into()),
            loss_type: Some("Wind/Hail".into()),
            report_type: Some("Inspection Report".into()),
        }
    }

    #[test]
    fn produces_zip_container_bytes() {
        let parsed = assemble::parse("REMARKS\nAll good.\n");
        let date = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        let bytes = build_docx(&parsed.doc, &meta(), date).unwrap();
        // DOCX is a ZIP container.
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn body_visitor_emits_every_header_once() {
        let parsed = assemble::parse(
            "ROOF INSPECTION\nShingle damage.\nINTERIOR OBSERVATIONS\nCeiling stains.\nREMARKS\nDone.\n",
        );
        let mut visitor = RichVisitor::default();
        walk(&parsed.doc, &[], &mut visitor);
        let texts: Vec<String> = visitor.paragraphs.iter().map(|p| p.raw_text()).collect();
        for header in ["ROOF INSPECTION", "INTERIOR OBSERVATIONS", "REMARKS"] {
            assert_eq!(
                texts.iter().filter(|t| t.as_str() == header).count(),
                1,
                "header {header}"
            );
        }
    }

    #[test]
    fn emphasis_becomes_bold_runs() {
        let parsed = assemble::parse("REMARKS\nThe decking is **saturated** throughout.\n");
        let mut visitor = RichVisitor::default();
        walk(&parsed.doc, &[], &mut visitor);
        let body = visitor.paragraphs.last().unwrap();
        assert_eq!(body.raw_text(), "The decking is saturated throughout.");
    }

    #[test]
    fn consecutive_spacers_collapse() {
        let parsed = assemble::parse("REMARKS\nOne.\n\n\nTwo.");
        let mut visitor = RichVisitor::default();
        walk(&parsed.doc, &[], &mut visitor);
        // Header, "One.", one collapsed spacer, "Two.".
        let empties = visitor
            .paragraphs
            .iter()
            .filter(|p| p.raw_text().is_empty())
            .count();
        assert_eq!(empties, 1);
    }

    #[test]
    fn reserve_table_shape_is_static() {
        let table = reserve_table();
        // Header + four coverages + total.
        assert_eq!(table.rows.len(), 6);
    }
}
