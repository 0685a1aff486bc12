//! Web renderer.
//!
//! Produces a single self-contained HTML page aimed at quick human and
//! printer consumption. Emphasis runs are flattened to plain text before
//! insertion (bold markers stripped, not re-styled), and the document's
//! section and paragraph boundaries are preserved as newline-separated text
//! inside one scrollable content block. All inserted text is HTML-escaped.

use crate::types::{Document, EmphasisRun, ReportMetadata, SectionLevel, flatten_runs, or_na};
use crate::visit::{ItemVisitor, walk};

/// Render a `Document` as a complete standalone HTML page.
///
/// The info panel above the content block is built directly from the
/// metadata record, not from the document model.
pub fn to_web_page(doc: &Document, meta: &ReportMetadata) -> String {
    let mut collector = TextCollector::default();
    walk(doc, &[], &mut collector);
    let content = escape_html(collector.finish().trim_end());

    let title = format!(
        "{} — Claim {}",
        or_na(&meta.report_type),
        or_na(&meta.claim_number)
    );

    let info_rows = [
        ("Claim Number", or_na(&meta.claim_number)),
        ("Insured", or_na(&meta.insured_name)),
        ("Property Address", or_na(&meta.property_address)),
        ("Date of Loss", or_na(&meta.loss_date)),
        ("Loss Type", or_na(&meta.loss_type)),
        ("Report Type", or_na(&meta.report_type)),
    ];
    let info_panel: String = info_rows
        .iter()
        .map(|(label, value)| {
            format!(
                "      <div class=\"label\">{}</div><div class=\"value\">{}</div>\n",
                escape_html(label),
                escape_html(value)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="generator" content="ClaimSight v0.1">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
<article class="report">
    <header>
      <h1>{title}</h1>
    </header>
    <section class="info-panel">
{info_panel}    </section>
    <section class="content">
<pre>{content}</pre>
    </section>
</article>
</body>
</html>"#,
        title = escape_html(&title),
        css = REPORT_CSS,
        info_panel = info_panel,
        content = content,
    )
}

/// Flattens visited items into prefixed plain-text lines.
#[derive(Default)]
struct TextCollector {
    lines: Vec<String>,
    pending_gap: bool,
}

impl TextCollector {
    fn push(&mut self, line: String) {
        if self.pending_gap && !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.pending_gap = false;
        self.lines.push(line);
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

impl ItemVisitor for TextCollector {
    fn section_header(&mut self, _level: SectionLevel, text: &str) {
        // A blank line above each header keeps section boundaries readable.
        self.pending_gap = true;
        self.push(text.to_string());
    }

    fn paragraph(&mut self, runs: &[EmphasisRun]) {
        self.push(flatten_runs(runs));
    }

    fn bullet(&mut self, runs: &[EmphasisRun]) {
        self.push(format!("\u{2022} {}", flatten_runs(runs)));
    }

    fn numbered(&mut self, index: u32, runs: &[EmphasisRun], _flagged: bool) {
        self.push(format!("{index}. {}", flatten_runs(runs)));
    }

    fn spacer(&mut self) {
        // Consecutive spacers collapse to a single blank line here.
        self.pending_gap = true;
    }
}

/// Escape HTML special characters.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Embedded CSS for standalone report pages. Light theme: these pages are
/// meant to be skimmed and printed, not themed.
const REPORT_CSS: &str = r#"
*, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
body { background: #f5f6f8; color: #1c2733; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; line-height: 1.6; }
.report { max-width: 52rem; margin: 0 auto; padding: 2rem 1.5rem 4rem; }
header h1 { font-size: 1.5rem; font-weight: 700; color: #1d3a5f; margin-bottom: 1.25rem; }
.info-panel { display: grid; grid-template-columns: 11rem 1fr; gap: 0.35rem 1rem; background: #ffffff; border: 1px solid #d7dde4; border-radius: 6px; padding: 1rem 1.25rem; margin-bottom: 1.5rem; }
.info-panel .label { font-weight: 600; color: #51606f; }
.info-panel .value { color: #1c2733; }
.content { background: #ffffff; border: 1px solid #d7dde4; border-radius: 6px; padding: 1.25rem 1.5rem; max-height: 70vh; overflow-y: auto; }
.content pre { font-family: inherit; white-space: pre-wrap; word-wrap: break-word; }
@media print {
  body { background: #ffffff; }
  .content { max-height: none; overflow: visible; border: none; padding: 0; }
}
"#;

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
