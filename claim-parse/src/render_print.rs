//! Print renderer.
//!
//! Produces a paginated, fixed-layout PDF: title block, two-column info
//! panel, executive-summary and cost-estimate call-out boxes, the ruled body,
//! and a running footer with `Page i of N` on every page.
//!
//! Rendering happens in two phases. The layout pass is pure: it walks the
//! document and produces per-page lists of positioned drawing ops, breaking
//! pages whenever the next item does not fit. The page count is only known
//! after that full pass, so footers are stamped in a second pass over the
//! laid-out pages. A final emission step maps the ops onto PDF content
//! streams with the base-14 Helvetica fonts; only that backend step can fail.

use std::io::Cursor;

use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{Document as PdfDocument, Object, Stream, dictionary};

use crate::error::RenderError;
use crate::types::{CostTable, Document, EmphasisRun, Priority, ReportMetadata, SectionLevel, or_na};
use crate::visit::{ItemVisitor, walk};

// US Letter, points.
const PAGE_W: f32 = 612.0;
const PAGE_H: f32 = 792.0;
const MARGIN: f32 = 54.0;
const CONTENT_TOP: f32 = PAGE_H - MARGIN;
/// Baselines below this break to a new page; the footer zone sits underneath.
const CONTENT_FLOOR: f32 = 76.0;
const BODY_W: f32 = PAGE_W - 2.0 * MARGIN;

const BODY_SIZE: f32 = 10.0;
const LINE_H: f32 = 13.5;

/// Sections the surrounding layout renders as dedicated call-out boxes; the
/// generic body walk must not repeat them. This is a renderer-local blocklist,
/// independent of the assembler's duplicate suppression.
const CALLOUT_SECTIONS: &[&str] = &[
    "EXECUTIVE SUMMARY",
    "COST ESTIMATE",
    "CLAIM INFORMATION",
    "REPORT INFORMATION",
];

const COMPANY_NAME: &str = "TrueNorth Claim Services";
const ATTRIBUTION: &str = "Generated by ClaimSight narrative tooling";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb(f32, f32, f32);

const INK: Rgb = Rgb(0.12, 0.16, 0.21);
const ACCENT: Rgb = Rgb(0.11, 0.24, 0.39);
const MUTED: Rgb = Rgb(0.38, 0.44, 0.50);
const RULE: Rgb = Rgb(0.78, 0.82, 0.86);
const PANEL_BG: Rgb = Rgb(0.95, 0.96, 0.975);
const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);

fn badge_color(priority: Priority) -> Rgb {
    match priority {
        Priority::Urgent => Rgb(0.76, 0.15, 0.15),
        Priority::High => Rgb(0.83, 0.47, 0.10),
        Priority::Recommended => Rgb(0.16, 0.44, 0.70),
        Priority::Standard => Rgb(0.45, 0.50, 0.55),
    }
}

/// One positioned drawing instruction.
#[derive(Debug, Clone)]
enum Op {
    Text { x: f32, y: f32, size: f32, bold: bool, color: Rgb, text: String },
    /// Horizontal rule.
    Rule { x1: f32, x2: f32, y: f32, width: f32, color: Rgb },
    /// Filled rectangle; `y` is the bottom edge.
    Rect { x: f32, y: f32, w: f32, h: f32, color: Rgb },
}

#[derive(Debug, Default)]
struct Page {
    ops: Vec<Op>,
}

struct Layout {
    pages: Vec<Page>,
    /// Current baseline, in PDF coordinates (origin bottom-left).
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self { pages: vec![Page::default()], y: CONTENT_TOP }
    }

    fn page(&mut self) -> &mut Page {
        // `pages` is never empty.
        self.pages.last_mut().unwrap()
    }

    fn break_page(&mut self) {
        self.pages.push(Page::default());
        self.y = CONTENT_TOP;
    }

    /// Break the page unless `needed` points of vertical space remain.
    fn ensure_room(&mut self, needed: f32) {
        if self.y - needed < CONTENT_FLOOR {
            self.break_page();
        }
    }

    fn at_page_top(&self) -> bool {
        self.y >= CONTENT_TOP - 0.5
    }

    fn text(&mut self, x: f32, size: f32, bold: bool, color: Rgb, text: impl Into<String>) {
        let y = self.y;
        self.page().ops.push(Op::Text { x, y, size, bold, color, text: text.into() });
    }

    fn rule(&mut self, x1: f32, x2: f32, y: f32, width: f32, color: Rgb) {
        self.page().ops.push(Op::Rule { x1, x2, y, width, color });
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.page().ops.push(Op::Rect { x, y, w, h, color });
    }
}

/// Render the document to PDF bytes.
pub fn to_print(
    doc: &Document,
    meta: &ReportMetadata,
    summary: Option<&str>,
    costs: Option<&CostTable>,
) -> Result<Vec<u8>, RenderError> {
    let pages = lay_out(doc, meta, summary, costs);
    debug!("print layout produced {} pages", pages.len());
    emit_pdf(&pages)
}

// ------------------------------------------------------------------
// Layout pass
// ------------------------------------------------------------------

fn lay_out(
    doc: &Document,
    meta: &ReportMetadata,
    summary: Option<&str>,
    costs: Option<&CostTable>,
) -> Vec<Page> {
    let mut layout = Layout::new();

    title_block(&mut layout, meta);
    info_panel(&mut layout, meta);

    if let Some(text) = summary {
        callout_box(&mut layout, "EXECUTIVE SUMMARY", text);
    }
    if let Some(table) = costs {
        cost_box(&mut layout, table);
    }

    let mut visitor = PrintVisitor { layout: &mut layout, last_was_spacer: false };
    walk(doc, CALLOUT_SECTIONS, &mut visitor);

    stamp_footers(&mut layout.pages);
    layout.pages
}

fn title_block(layout: &mut Layout, meta: &ReportMetadata) {
    let title = meta
        .report_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("Inspection Report")
        .to_uppercase();

    layout.y -= 10.0;
    layout.text(MARGIN, 19.0, true, ACCENT, title);
    layout.y -= 16.0;
    layout.text(
        MARGIN,
        10.5,
        false,
        MUTED,
        format!("Claim {}", or_na(&meta.claim_number)),
    );
    layout.y -= 10.0;
    let y = layout.y;
    layout.rule(MARGIN, PAGE_W - MARGIN, y, 1.2, ACCENT);
    layout.y -= 18.0;
}

/// Two-column key/value panel; each value word-wraps within its column.
fn info_panel(layout: &mut Layout, meta: &ReportMetadata) {
    const GUTTER: f32 = 24.0;
    const LABEL_H: f32 = 11.0;
    const VALUE_H: f32 = 12.5;
    const PAD: f32 = 12.0;

    let col_w = (BODY_W - GUTTER) / 2.0 - PAD;
    let left = [
        ("CLAIM NUMBER", or_na(&meta.claim_number)),
        ("INSURED", or_na(&meta.insured_name)),
        ("DATE OF LOSS", or_na(&meta.loss_date)),
    ];
    let right = [
        ("PROPERTY ADDRESS", or_na(&meta.property_address)),
        ("LOSS TYPE", or_na(&meta.loss_type)),
        ("REPORT TYPE", or_na(&meta.report_type)),
    ];

    let wrapped_left: Vec<(&str, Vec<String>)> =
        left.iter().map(|(k, v)| (*k, wrap_text(v, 9.5, col_w))).collect();
    let wrapped_right: Vec<(&str, Vec<String>)> =
        right.iter().map(|(k, v)| (*k, wrap_text(v, 9.5, col_w))).collect();

    let col_height = |col: &[(&str, Vec<String>)]| -> f32 {
        col.iter()
            .map(|(_, lines)| LABEL_H + lines.len() as f32 * VALUE_H + 6.0)
            .sum()
    };
    let panel_h = col_height(&wrapped_left).max(col_height(&wrapped_right)) + 2.0 * PAD - 6.0;

    let top = layout.y;
    layout.rect(MARGIN, top - panel_h, BODY_W, panel_h, PANEL_BG);

    for (col_idx, col) in [&wrapped_left, &wrapped_right].iter().enumerate() {
        let x = MARGIN + PAD + col_idx as f32 * ((BODY_W - GUTTER) / 2.0 + GUTTER);
        layout.y = top - PAD - 6.0;
        for (label, lines) in col.iter() {
            layout.text(x, 7.5, true, MUTED, *label);
            layout.y -= LABEL_H;
            for line in lines {
                layout.text(x, 9.5, false, INK, line.clone());
                layout.y -= VALUE_H;
            }
            layout.y -= 6.0;
        }
    }

    layout.y = top - panel_h - 18.0;
}

/// Shaded call-out box with an accent bar and wrapped body text.
fn callout_box(layout: &mut Layout, label: &str, text: &str) {
    const PAD: f32 = 12.0;
    let inner_w = BODY_W - 2.0 * PAD - 6.0;
    let lines = wrap_text(text, 9.5, inner_w);
    let box_h = 24.0 + lines.len() as f32 * 12.5 + PAD;

    layout.ensure_room(box_h + 12.0);
    let top = layout.y;
    layout.rect(MARGIN, top - box_h, BODY_W, box_h, PANEL_BG);
    layout.rect(MARGIN, top - box_h, 4.0, box_h, ACCENT);

    layout.y = top - PAD - 7.0;
    layout.text(MARGIN + PAD + 6.0, 9.0, true, ACCENT, label);
    layout.y -= 15.0;
    for line in lines {
        layout.text(MARGIN + PAD + 6.0, 9.5, false, INK, line);
        layout.y -= 12.5;
    }
    layout.y = top - box_h - 16.0;
}

/// Cost-estimate call-out: description rows with right-aligned amounts and a
/// ruled total row.
fn cost_box(layout: &mut Layout, table: &CostTable) {
    const PAD: f32 = 12.0;
    let rows = table.items.len() as f32;
    let box_h = 24.0 + rows * 13.0 + 20.0 + PAD;

    layout.ensure_room(box_h + 12.0);
    let top = layout.y;
    layout.rect(MARGIN, top - box_h, BODY_W, box_h, PANEL_BG);
    layout.rect(MARGIN, top - box_h, 4.0, box_h, ACCENT);

    let x_text = MARGIN + PAD + 6.0;
    let x_right = MARGIN + BODY_W - PAD;

    layout.y = top - PAD - 7.0;
    layout.text(x_text, 9.0, true, ACCENT, "COST ESTIMATE");
    layout.y -= 16.0;

    for item in &table.items {
        let amount = fmt_money(item.amount);
        layout.text(x_text, 9.5, false, INK, item.description.clone());
        let ax = x_right - text_width(&amount, 9.5);
        layout.text(ax, 9.5, false, INK, amount);
        layout.y -= 13.0;
    }

    let y = layout.y + 9.0;
    layout.rule(x_text, x_right, y, 0.6, RULE);
    layout.y -= 4.0;
    let total = fmt_money(table.total);
    layout.text(x_text, 9.5, true, INK, "Total");
    let ax = x_right - text_width(&total, 9.5);
    layout.text(ax, 9.5, true, INK, total);
    layout.y = top - box_h - 16.0;
}

/// Second pass: page count is now known, stamp every page's footer.
fn stamp_footers(pages: &mut [Page]) {
    let total = pages.len();
    for (idx, page) in pages.iter_mut().enumerate() {
        page.ops.push(Op::Rule { x1: MARGIN, x2: PAGE_W - MARGIN, y: 58.0, width: 0.6, color: RULE });
        page.ops.push(Op::Text {
            x: MARGIN,
            y: 45.0,
            size: 8.0,
            bold: false,
            color: MUTED,
            text: format!("{COMPANY_NAME} \u{2014} {ATTRIBUTION}"),
        });
        let label = format!("Page {} of {}", idx + 1, total);
        page.ops.push(Op::Text {
            x: PAGE_W - MARGIN - text_width(&label, 8.0),
            y: 45.0,
            size: 8.0,
            bold: false,
            color: MUTED,
            text: label,
        });
    }
}

// ------------------------------------------------------------------
// Body visitor
// ------------------------------------------------------------------

struct PrintVisitor<'a> {
    layout: &'a mut Layout,
    last_was_spacer: bool,
}

impl PrintVisitor<'_> {
    /// Draw one wrapped, style-switching line of runs starting at `x`.
    fn styled_lines(&mut self, runs: &[EmphasisRun], x: f32, width: f32) {
        for line in wrap_runs(runs, BODY_SIZE, width) {
            self.layout.ensure_room(LINE_H);
            let mut cursor = x;
            for span in line {
                self.layout.text(cursor, BODY_SIZE, span.bold, INK, span.text.clone());
                cursor += text_width(&span.text, BODY_SIZE) + text_width(" ", BODY_SIZE);
            }
            self.layout.y -= LINE_H;
        }
    }
}

impl ItemVisitor for PrintVisitor<'_> {
    fn section_header(&mut self, level: SectionLevel, text: &str) {
        self.last_was_spacer = false;
        match level {
            SectionLevel::Major => {
                // Room for the heading plus at least one body line, so a
                // header never strands at a page bottom.
                self.layout.ensure_room(48.0);
                if !self.layout.at_page_top() {
                    self.layout.y -= 12.0;
                }
                self.layout.text(MARGIN, 13.0, true, ACCENT, text);
                self.layout.y -= 6.0;
                let y = self.layout.y;
                self.layout.rule(MARGIN, PAGE_W - MARGIN, y, 0.7, RULE);
                self.layout.y -= 14.0;
            }
            SectionLevel::Subsection => {
                self.layout.ensure_room(34.0);
                if !self.layout.at_page_top() {
                    self.layout.y -= 6.0;
                }
                self.layout.text(MARGIN, 10.5, true, INK, text);
                self.layout.y -= LINE_H;
            }
        }
    }

    fn paragraph(&mut self, runs: &[EmphasisRun]) {
        self.last_was_spacer = false;
        self.styled_lines(runs, MARGIN, BODY_W);
        self.layout.y -= 2.0;
    }

    fn bullet(&mut self, runs: &[EmphasisRun]) {
        self.last_was_spacer = false;
        self.layout.ensure_room(LINE_H);
        self.layout.text(MARGIN + 4.0, BODY_SIZE, false, INK, "\u{2022}");
        self.styled_lines(runs, MARGIN + 16.0, BODY_W - 16.0);
    }

    fn numbered(&mut self, index: u32, runs: &[EmphasisRun], flagged: bool) {
        self.last_was_spacer = false;
        self.layout.ensure_room(LINE_H + 2.0);

        let mut x = MARGIN;
        if flagged {
            let priority = Priority::from_text(&crate::types::flatten_runs(runs));
            let label = priority.label();
            let badge_w = text_width(label, 6.5) + 8.0;
            let y = self.layout.y - 1.5;
            self.layout.rect(x, y, badge_w, 9.5, badge_color(priority));
            self.layout.text(x + 4.0, 6.5, true, WHITE, label);
            x += badge_w + 6.0;
        }

        let prefix = format!("{index}.");
        self.layout.text(x, BODY_SIZE, true, INK, prefix.clone());
        let text_x = x + text_width(&prefix, BODY_SIZE) + 5.0;
        self.styled_lines(runs, text_x, PAGE_W - MARGIN - text_x);
    }

    fn spacer(&mut self) {
        // Collapse runs of spacers into a single gap; page tops stay flush.
        if !self.last_was_spacer && !self.layout.at_page_top() {
            self.layout.y -= 7.0;
        }
        self.last_was_spacer = true;
    }
}

// ------------------------------------------------------------------
// Text measurement
// ------------------------------------------------------------------

/// Approximate Helvetica advance for one character, as a fraction of the
/// font size. Coarse but stable; wrapping only needs to be consistent.
fn char_factor(c: char) -> f32 {
    match c {
        'i' | 'l' | 'j' | 't' | 'f' | 'I' | '.' | ',' | ';' | ':' | '\'' | '|' | '!' => 0.30,
        'm' | 'w' | 'M' | 'W' | '@' => 0.85,
        ' ' => 0.28,
        c if c.is_ascii_uppercase() => 0.67,
        c if c.is_ascii_digit() => 0.556,
        _ => 0.52,
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_factor).sum::<f32>() * size
}

/// Greedy word wrap on plain text.
fn wrap_text(text: &str, size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() { word.to_string() } else { format!("{line} {word}") };
        if text_width(&candidate, size) <= width || line.is_empty() {
            line = candidate;
        } else {
            lines.push(std::mem::take(&mut line));
            line = word.to_string();
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[derive(Debug, Clone, PartialEq)]
struct Span {
    text: String,
    bold: bool,
}

/// Greedy word wrap over styled runs, merging same-style neighbors per line.
fn wrap_runs(runs: &[EmphasisRun], size: f32, width: f32) -> Vec<Vec<Span>> {
    let words: Vec<(String, bool)> = runs
        .iter()
        .flat_map(|run| run.text.split_whitespace().map(|w| (w.to_string(), run.bold)))
        .collect();

    let mut lines: Vec<Vec<Span>> = Vec::new();
    let mut line: Vec<Span> = Vec::new();
    let mut line_w = 0.0;
    let space_w = text_width(" ", size);

    for (word, bold) in words {
        let word_w = text_width(&word, size);
        let needed = if line.is_empty() { word_w } else { line_w + space_w + word_w };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line_w = 0.0;
        }
        match line.last_mut() {
            Some(span) if span.bold == bold => {
                span.text.push(' ');
                span.text.push_str(&word);
            }
            _ => line.push(Span { text: word, bold }),
        }
        line_w = if line_w == 0.0 { word_w } else { line_w + space_w + word_w };
    }
    if !line.is_empty() {
        lines.push(line);
    }
    if lines.is_empty() {
        lines.push(vec![Span { text: String::new(), bold: false }]);
    }
    lines
}

fn fmt_money(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let dollars = cents / 100;
    let rem = (cents % 100).abs();
    let mut digits = dollars.abs().to_string();
    let mut grouped = String::new();
    while digits.len() > 3 {
        let split = digits.len() - 3;
        grouped = format!(",{}{}", &digits[split..], grouped);
        digits.truncate(split);
    }
    let sign = if dollars < 0 { "-" } else { "" };
    format!("{sign}${digits}{grouped}.{rem:02}")
}

// ------------------------------------------------------------------
// PDF emission
// ------------------------------------------------------------------

fn emit_pdf(pages: &[Page]) -> Result<Vec<u8>, RenderError> {
    let mut pdf = PdfDocument::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! { "F1" => regular, "F2" => bold },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let content = Content { operations: page_operations(page) };
        let encoded = content.encode().map_err(|e| RenderError::Pdf(e.to_string()))?;
        let stream_id = pdf.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => stream_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    pdf.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_W.into(), PAGE_H.into()],
        }),
    );
    let catalog_id = pdf.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    pdf.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    pdf.save_to(&mut Cursor::new(&mut bytes))
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    Ok(bytes)
}

fn page_operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();
    for op in &page.ops {
        match op {
            Op::Rect { x, y, w, h, color } => {
                ops.push(Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]));
                ops.push(Operation::new("re", vec![(*x).into(), (*y).into(), (*w).into(), (*h).into()]));
                ops.push(Operation::new("f", vec![]));
            }
            Op::Rule { x1, x2, y, width, color } => {
                ops.push(Operation::new("w", vec![(*width).into()]));
                ops.push(Operation::new("RG", vec![color.0.into(), color.1.into(), color.2.into()]));
                ops.push(Operation::new("m", vec![(*x1).into(), (*y).into()]));
                ops.push(Operation::new("l", vec![(*x2).into(), (*y).into()]));
                ops.push(Operation::new("S", vec![]));
            }
            Op::Text { x, y, size, bold, color, text } => {
                let font = if *bold { "F2" } else { "F1" };
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new("Tf", vec![font.into(), (*size).into()]));
                ops.push(Operation::new("rg", vec![color.0.into(), color.1.into(), color.2.into()]));
                ops.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_winansi(text), lopdf::StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
        }
    }
    ops
}

/// Map text onto WinAnsi bytes for the base-14 fonts. Characters outside the
/// code page degrade to `?`.
fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en dash
            '\u{2014}' => 0x97, // em dash
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            c if (c as u32) < 0x100 => c as u8,
            _ => b'?',
        })
        .collect()
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
