//! Section assembler.
//!
//! Folds the classified line stream into the canonical [`Document`]. The
//! assembler never fails: malformed structure degrades to body paragraphs and
//! irregularities (duplicate sections, dropped preamble) surface as non-fatal
//! diagnostics.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::{self, ClassifierContext, LineTag};
use crate::error::{Diagnostic, Severity};
use crate::inline::parse_runs;
use crate::types::{ContentItem, Document, Section, SectionLevel, normalize_key};

/// Result of assembling a narrative.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The assembled document.
    pub doc: Document,
    /// Non-fatal diagnostics collected during assembly.
    pub diagnostics: Vec<Diagnostic>,
}

/// Headers that open a recommendation window: numbered items within the next
/// 30 lines get flagged for priority-badge rendering.
static PRIORITY_SCOPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"RECOMMENDATION|ACTION PLAN|WORK TO BE COMPLETED").unwrap());

/// How many lines past a recommendation header a numbered item still gets
/// flagged.
const PRIORITY_WINDOW_LINES: usize = 30;

/// Assemble a raw narrative into a `ParseResult`.
///
/// This function never panics and accepts any input string. The same input
/// always yields the same document.
pub fn parse(input: &str) -> ParseResult {
    // Normalise CRLF → LF.
    let normalised = input.replace("\r\n", "\n");
    let lines: Vec<&str> = normalised.split('\n').collect();

    let mut ctx = ClassifierContext::new();
    let mut diagnostics = Vec::new();
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;
    // While set, every non-header line is discarded (duplicate-section skip).
    let mut suppressing = false;
    // Line index of the most recent recommendation-style header.
    let mut priority_anchor: Option<usize> = None;

    for (idx, &line) in lines.iter().enumerate() {
        let tag = classify::classify(line, &mut ctx);

        if tag.is_header() {
            let (level, header_text) = header_parts(line, tag);
            // A bare `#` (or fully-decorated empty heading) carries no
            // structure; it must not open a section that would collide with
            // the implicit leading section's empty key.
            if header_text.is_empty() {
                continue;
            }
            let key = normalize_key(&header_text);

            if ctx.seen_headers.contains(&key) {
                suppressing = true;
                debug!("suppressing repeated section '{key}' at line {}", idx + 1);
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    message: format!("Repeated section header '{header_text}'; body discarded"),
                    line: Some(idx + 1),
                    code: Some("W001".into()),
                });
                continue;
            }

            suppressing = false;
            ctx.seen_headers.insert(key.clone());

            if PRIORITY_SCOPE_RE.is_match(&key) {
                priority_anchor = Some(idx);
            } else if level == SectionLevel::Major {
                // A new unrelated major section ends the recommendation scope.
                priority_anchor = None;
            }

            if let Some(done) = current.take() {
                sections.push(done);
            }
            current = Some(Section::new(level, header_text));
            continue;
        }

        if suppressing {
            continue;
        }

        match tag {
            LineTag::Preamble => {
                diagnostics.push(Diagnostic {
                    severity: Severity::Info,
                    message: format!("Dropped preamble line: {}", line.trim()),
                    line: Some(idx + 1),
                    code: Some("I001".into()),
                });
            }
            LineTag::Blank | LineTag::Separator => {
                // Spacers before the first section carry no layout meaning.
                if let Some(section) = current.as_mut() {
                    section.items.push(ContentItem::Spacer);
                }
            }
            LineTag::Bullet => {
                let text = bullet_text(line);
                section_for_content(&mut current)
                    .items
                    .push(ContentItem::Bullet { runs: parse_runs(text) });
            }
            LineTag::Numbered => {
                let (index, text) = classify::split_numbered(line).unwrap_or((0, line.trim()));
                let flagged = priority_anchor
                    .is_some_and(|anchor| idx - anchor <= PRIORITY_WINDOW_LINES);
                section_for_content(&mut current).items.push(ContentItem::Numbered {
                    index,
                    runs: parse_runs(text),
                    flagged,
                });
            }
            // Headers were consumed above; everything else is body text.
            _ => {
                section_for_content(&mut current)
                    .items
                    .push(ContentItem::Paragraph { runs: parse_runs(line.trim()) });
            }
        }
    }

    if let Some(done) = current.take() {
        sections.push(done);
    }

    debug!("assembled {} sections", sections.len());
    ParseResult { doc: Document { sections }, diagnostics }
}

/// Section level and display text for a header line.
fn header_parts(line: &str, tag: LineTag) -> (SectionLevel, String) {
    match tag {
        LineTag::MarkdownHeading => {
            let text = line.trim().trim_start_matches('#');
            let text = classify::strip_emphasis_markers(text);
            (SectionLevel::Major, trim_header(&text))
        }
        LineTag::MajorHeader => {
            let text = classify::strip_emphasis_markers(line);
            (SectionLevel::Major, trim_header(&text))
        }
        LineTag::SubsectionLabel => (SectionLevel::Subsection, line.trim().to_string()),
        _ => (SectionLevel::Major, line.trim().to_string()),
    }
}

/// Major headers display without a trailing colon; labels keep theirs.
fn trim_header(text: &str) -> String {
    text.trim().trim_end_matches(':').trim_end().to_string()
}

fn bullet_text(line: &str) -> &str {
    let trimmed = line.trim_start();
    trimmed[1..].trim_start()
}

/// Current section, or the implicit leading section when content appears
/// before any header.
fn section_for_content(current: &mut Option<Section>) -> &mut Section {
    current.get_or_insert_with(|| Section::new(SectionLevel::Major, ""))
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
