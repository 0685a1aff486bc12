//! `claim-parse` — parser and renderers for model-generated insurance
//! inspection narratives.
//!
//! The upstream generator produces free-form, loosely-delimited report text
//! (ALL-CAPS section headers, colon-terminated labels, `#` headings, lists,
//! `*`/`_` emphasis). This crate recovers a canonical [`Document`] from that
//! text and renders it to three targets: a paginated PDF, a flowed DOCX, and
//! a standalone HTML page. The pipeline is total over its input: any string
//! parses, unrecognized structure degrades to body text, and only a renderer
//! backend can fail.
//!
//! # Quick start
//!
//! ```
//! let result = claim_parse::parse("REMARKS\nThe roof shows **hail** damage.\n");
//! assert!(result.diagnostics.is_empty());
//! assert_eq!(result.doc.sections.len(), 1);
//! ```

pub mod assemble;
pub mod classify;
pub mod error;
pub mod extract;
pub mod inline;
pub mod render_print;
pub mod render_rich;
pub mod render_web;
pub mod types;
pub mod visit;

pub use assemble::{ParseResult, parse};
pub use error::*;
pub use types::*;

use chrono::{DateTime, Utc};

/// Target artifact for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Html => "html",
        }
    }
}

impl Document {
    /// Render this document as a paginated print PDF.
    pub fn to_print(
        &self,
        meta: &ReportMetadata,
        summary: Option<&str>,
        costs: Option<&CostTable>,
    ) -> Result<Vec<u8>, RenderError> {
        render_print::to_print(self, meta, summary, costs)
    }

    /// Render this document as a flowed word-processor DOCX.
    pub fn to_rich_doc(&self, meta: &ReportMetadata) -> Result<Vec<u8>, RenderError> {
        render_rich::to_rich_doc(self, meta)
    }

    /// Render this document as a complete standalone HTML page.
    pub fn to_web_page(&self, meta: &ReportMetadata) -> String {
        render_web::to_web_page(self, meta)
    }
}

/// One-shot conversion: parse the raw narrative, run the extractors, render
/// the requested target, and suggest a file name.
pub fn export(
    meta: &ReportMetadata,
    raw: &str,
    format: ExportFormat,
) -> Result<Artifact, RenderError> {
    let parsed = parse(raw);
    let bytes = match format {
        ExportFormat::Pdf => {
            let summary = extract::executive_summary(raw);
            let costs = extract::cost_table(raw);
            parsed.doc.to_print(meta, summary.as_deref(), costs.as_ref())?
        }
        ExportFormat::Docx => parsed.doc.to_rich_doc(meta)?,
        ExportFormat::Html => parsed.doc.to_web_page(meta).into_bytes(),
    };
    Ok(Artifact { file_name: suggested_file_name(meta, format, Utc::now()), bytes })
}

/// Suggested artifact name: `{claimNumber}_{reportType}_{timestamp}.{ext}`.
///
/// Components are sanitized for portability across filesystems; missing
/// metadata falls back to generic placeholders.
pub fn suggested_file_name(
    meta: &ReportMetadata,
    format: ExportFormat,
    at: DateTime<Utc>,
) -> String {
    let claim = sanitize_component(meta.claim_number.as_deref().unwrap_or("claim"));
    let kind = sanitize_component(meta.report_type.as_deref().unwrap_or("report"));
    format!(
        "{claim}_{kind}_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
        .collect();
    let collapsed = cleaned.split('-').filter(|p| !p.is_empty()).collect::<Vec<_>>().join("-");
    if collapsed.is_empty() { "report".to_string() } else { collapsed }
}
