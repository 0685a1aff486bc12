//! Line classifier.
//!
//! Inspects one line of narrative text in isolation (plus the per-call
//! [`ClassifierContext`]) and assigns it a [`LineTag`]. Classification is an
//! ordered list of predicate rules evaluated once per line, first match wins;
//! anything unmatched degrades to `Body`. The ordering is load-bearing: the
//! named section vocabulary is checked before the generic all-caps rule, and a
//! different order changes which real-world headers get recognized.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Tag assigned to one line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Blank,
    /// A lone `---` / `___` / `...` line.
    Separator,
    /// `#`-style heading.
    MarkdownHeading,
    /// Model meta-commentary ("here is", "as requested", ...), only
    /// recognized while the preamble gate is open.
    Preamble,
    /// `*` / `-` / `+` list item.
    Bullet,
    /// `1.` / `2.` list item.
    Numbered,
    /// A known section name or a generic all-caps header.
    MajorHeader,
    /// Short non-header line ending in `:`.
    SubsectionLabel,
    Body,
}

impl LineTag {
    /// Whether this tag opens a new section during assembly.
    pub fn is_header(&self) -> bool {
        matches!(
            self,
            LineTag::MajorHeader | LineTag::MarkdownHeading | LineTag::SubsectionLabel
        )
    }
}

/// Mutable classifier state, allocated fresh per conversion call.
///
/// This is the only mutable shared state in the whole pipeline and it never
/// escapes one call's stack.
#[derive(Debug)]
pub struct ClassifierContext {
    /// True until the first header-like line; while true, preamble phrases
    /// are dropped instead of becoming body text.
    pub skip_preamble: bool,
    /// Normalized keys of headers the assembler has already opened.
    pub seen_headers: HashSet<String>,
}

impl ClassifierContext {
    pub fn new() -> Self {
        Self { skip_preamble: true, seen_headers: HashSet::new() }
    }
}

impl Default for ClassifierContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed vocabulary of section names the upstream generator is known to emit.
/// Matched against the upper-cased line after emphasis markers are stripped;
/// a line matches when it equals a name or starts with one.
pub const SECTION_VOCABULARY: &[&str] = &[
    "EXECUTIVE SUMMARY",
    "KEY FINDINGS",
    "CLAIM INFORMATION",
    "REPORT INFORMATION",
    "PROPERTY INFORMATION",
    "PROPERTY DESCRIPTION",
    "INSPECTION DETAILS",
    "INSPECTION FINDINGS",
    "OBSERVATIONS",
    "EXTERIOR OBSERVATIONS",
    "INTERIOR OBSERVATIONS",
    "ROOF INSPECTION",
    "ROOF OBSERVATIONS",
    "SIDING AND TRIM",
    "GUTTERS AND DOWNSPOUTS",
    "WINDOWS AND DOORS",
    "FOUNDATION",
    "ATTIC AND INSULATION",
    "BASEMENT",
    "GARAGE",
    "FENCING",
    "DAMAGE ASSESSMENT",
    "CAUSE OF LOSS",
    "SCOPE OF DAMAGE",
    "COST ESTIMATE",
    "ESTIMATED COST OF REPAIRS",
    "REPAIR COSTS",
    "RECOMMENDATION",
    "RECOMMENDATIONS",
    "ACTION PLAN",
    "WORK TO BE COMPLETED",
    "WEATHER CONDITIONS",
    "SAFETY CONCERNS",
    "LIMITATIONS",
    "PHOTOGRAPHS",
    "CONCLUSION",
    "REMARKS",
    "ADDITIONAL NOTES",
];

/// Meta-commentary openers the generator wraps around the actual report.
const PREAMBLE_PHRASES: &[&str] = &[
    "here is",
    "here's",
    "below is",
    "as requested",
    "please find",
    "i have prepared",
    "i have completed",
    "i hope this",
    "certainly",
    "of course",
    "sure,",
    "attached is",
    "this report was generated",
];

static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.\s+").unwrap());
static CAPS_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z\s]+:?$").unwrap());

/// One classification rule: a tag and the predicate that claims a line.
struct Rule {
    tag: LineTag,
    matches: fn(&str, &ClassifierContext) -> bool,
}

/// The priority table. Evaluated top to bottom, first match wins; `Body` is
/// the fallthrough and has no entry.
const RULES: &[Rule] = &[
    Rule { tag: LineTag::Blank, matches: is_blank },
    Rule { tag: LineTag::Separator, matches: is_separator },
    Rule { tag: LineTag::MarkdownHeading, matches: is_markdown_heading },
    Rule { tag: LineTag::Preamble, matches: is_preamble },
    Rule { tag: LineTag::Bullet, matches: is_bullet },
    Rule { tag: LineTag::Numbered, matches: is_numbered },
    Rule { tag: LineTag::MajorHeader, matches: is_major_header },
    Rule { tag: LineTag::SubsectionLabel, matches: is_subsection_label },
];

/// Classify one line. Total and deterministic: the same line plus the same
/// context always yields the same tag.
///
/// Side effect: clears `ctx.skip_preamble` permanently the first time a
/// header (or an all-caps header-shaped line) is seen.
pub fn classify(line: &str, ctx: &mut ClassifierContext) -> LineTag {
    let tag = RULES
        .iter()
        .find(|rule| (rule.matches)(line, ctx))
        .map(|rule| rule.tag)
        .unwrap_or(LineTag::Body);

    if ctx.skip_preamble && (tag.is_header() || CAPS_LINE_RE.is_match(line.trim())) {
        ctx.skip_preamble = false;
    }

    tag
}

/// Remove emphasis delimiter characters. Header matching works on the
/// undecorated text so `**REMARKS**` classifies the same as `REMARKS`.
pub fn strip_emphasis_markers(text: &str) -> String {
    text.chars().filter(|c| *c != '*' && *c != '_').collect()
}

/// Split a numbered-item line into its literal index and remaining text.
pub(crate) fn split_numbered(line: &str) -> Option<(u32, &str)> {
    let trimmed = line.trim_start();
    let caps = NUMBERED_RE.captures(trimmed)?;
    let index = caps[1].parse().unwrap_or(0);
    Some((index, trimmed[caps[0].len()..].trim_end()))
}

// ------------------------------------------------------------------
// Predicates
// ------------------------------------------------------------------

fn is_blank(line: &str, _ctx: &ClassifierContext) -> bool {
    line.trim().is_empty()
}

fn is_separator(line: &str, _ctx: &ClassifierContext) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3
        && ['-', '_', '.']
            .iter()
            .any(|marker| trimmed.chars().all(|c| c == *marker))
}

fn is_markdown_heading(line: &str, _ctx: &ClassifierContext) -> bool {
    line.trim_start().starts_with('#')
}

fn is_preamble(line: &str, ctx: &ClassifierContext) -> bool {
    if !ctx.skip_preamble {
        return false;
    }
    let lower = line.trim().to_lowercase();
    PREAMBLE_PHRASES.iter().any(|phrase| lower.starts_with(phrase))
}

fn is_bullet(line: &str, _ctx: &ClassifierContext) -> bool {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    matches!(chars.next(), Some('*' | '-' | '+')) && matches!(chars.next(), Some(c) if c.is_whitespace())
}

fn is_numbered(line: &str, _ctx: &ClassifierContext) -> bool {
    NUMBERED_RE.is_match(line.trim_start())
}

fn is_major_header(line: &str, _ctx: &ClassifierContext) -> bool {
    let stripped = strip_emphasis_markers(line);
    let stripped = stripped.trim();
    if stripped.is_empty() {
        return false;
    }

    // Named vocabulary first.
    let upper = stripped.to_uppercase();
    if SECTION_VOCABULARY.iter().any(|name| upper == *name || upper.starts_with(name)) {
        return true;
    }

    // Generic fallback: fully upper-case, no colon, longer than 3 characters.
    stripped.chars().count() > 3
        && !stripped.contains(':')
        && stripped.chars().any(|c| c.is_alphabetic())
        && !stripped.chars().any(|c| c.is_lowercase())
}

fn is_subsection_label(line: &str, _ctx: &ClassifierContext) -> bool {
    let trimmed = line.trim();
    trimmed.ends_with(':')
        && trimmed.chars().count() < 80
        && trimmed.chars().any(|c| c.is_alphanumeric())
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
