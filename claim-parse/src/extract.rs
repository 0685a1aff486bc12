//! Specialized extractors.
//!
//! Two optional secondary passes over the raw text, independent of the
//! section assembler: an executive-summary block and a cost-estimate
//! line-item table. Both are best-effort; absence of a match yields `None`,
//! never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{CostLineItem, CostTable};

/// Longest summary the callers will feature in a call-out box.
const SUMMARY_MAX_CHARS: usize = 500;

static SUMMARY_HEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)executive summary|key findings|summary").unwrap());
static SUMMARY_STOP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)summary").unwrap());

static COST_HEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)cost estimate|estimated cost|repair costs").unwrap());
static COST_STOP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)cost").unwrap());
static COST_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[-*+\u{2022}]?\s*(.+?)\s*[:\-]\s*\$\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)\s*$")
        .unwrap()
});
static TOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\btotal\b.*\bcost\b.*?\$\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)").unwrap()
});

/// Lift out the executive-summary block, if the narrative has one.
///
/// Finds the first heading-looking line matching the summary vocabulary, then
/// collects subsequent non-list, non-empty lines until the next all-caps
/// header that is not itself summary-related. The result is flattened to a
/// single plain-text string of at most 500 characters.
pub fn executive_summary(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.lines().collect();
    let start = lines
        .iter()
        .position(|line| SUMMARY_HEAD_RE.is_match(line) && looks_like_heading(line))?;

    let mut collected: Vec<&str> = Vec::new();
    for line in &lines[start + 1..] {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_list_line(trimmed) {
            continue;
        }
        if is_all_caps_header(trimmed) && !SUMMARY_STOP_RE.is_match(trimmed) {
            break;
        }
        collected.push(trimmed);
    }

    let text: String = collected
        .join(" ")
        .chars()
        .filter(|c| *c != '*' && *c != '_')
        .collect();
    let text = text.trim().to_string();
    if text.is_empty() {
        return None;
    }
    Some(truncate_chars(&text, SUMMARY_MAX_CHARS))
}

/// Lift out the cost-estimate table, if the narrative has one.
///
/// Item lines have the shape `<description>[:-] $<amount>`. A literal
/// `total … cost … $<amount>` line is captured separately and never becomes an
/// item. The table total is the item sum when items contributed one, else the
/// literal total.
pub fn cost_table(raw: &str) -> Option<CostTable> {
    let lines: Vec<&str> = raw.lines().collect();
    let start = lines
        .iter()
        .position(|line| COST_HEAD_RE.is_match(line) && looks_like_heading(line))?;

    let mut items: Vec<CostLineItem> = Vec::new();
    for line in &lines[start + 1..] {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if is_all_caps_header(trimmed) && !COST_STOP_RE.is_match(trimmed) {
            break;
        }
        if TOTAL_RE.is_match(trimmed) {
            continue;
        }
        if let Some(caps) = COST_ITEM_RE.captures(trimmed) {
            if let Some(amount) = parse_amount(&caps[2]) {
                items.push(CostLineItem {
                    description: caps[1].trim().to_string(),
                    amount,
                });
            }
        }
    }

    // The literal total may sit anywhere in the text, not only in-section.
    let literal_total = lines
        .iter()
        .find_map(|line| TOTAL_RE.captures(line))
        .and_then(|caps| parse_amount(&caps[1]));

    let sum: f64 = items.iter().map(|item| item.amount).sum();
    let total = if sum > 0.0 { sum } else { literal_total.unwrap_or(0.0) };

    if items.is_empty() && literal_total.is_none() {
        return None;
    }
    Some(CostTable { items, total })
}

// ------------------------------------------------------------------
// Helpers
// ------------------------------------------------------------------

/// Heading shapes this pass accepts: a `#` heading, an all-caps line, or a
/// short label ending in `:`.
fn looks_like_heading(line: &str) -> bool {
    let trimmed = line.trim().trim_matches(|c| c == '*' || c == '_');
    let trimmed = trimmed.trim();
    if trimmed.is_empty() || trimmed.chars().count() >= 80 {
        return false;
    }
    trimmed.starts_with('#') || is_all_caps_header(trimmed) || trimmed.ends_with(':')
}

fn is_all_caps_header(line: &str) -> bool {
    let stripped: String = line.chars().filter(|c| *c != '*' && *c != '_').collect();
    let stripped = stripped.trim();
    stripped.chars().count() > 3
        && stripped.chars().any(|c| c.is_alphabetic())
        && !stripped.chars().any(|c| c.is_lowercase())
}

fn is_list_line(line: &str) -> bool {
    let mut chars = line.chars();
    match chars.next() {
        Some('-' | '*' | '+' | '\u{2022}') => true,
        Some(c) if c.is_ascii_digit() => line.contains('.'),
        _ => false,
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    text.replace(',', "").parse().ok()
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_collected_until_next_header() {
        let raw = "EXECUTIVE SUMMARY\nWind damage to the roof.\nInterior staining noted.\n- not collected\nRECOMMENDATIONS\nTarp the roof.\n";
        let summary = executive_summary(raw).unwrap();
        assert_eq!(summary, "Wind damage to the roof. Interior staining noted.");
    }

    #[test]
    fn summary_absent() {
        assert_eq!(executive_summary("REMARKS\nNothing here.\n"), None);
    }

    #[test]
    fn summary_requires_heading_shape() {
        // "summary" buried in prose is not a heading.
        let raw = "REMARKS\nIn summary, the roof leaks and more words follow here.\n";
        assert_eq!(executive_summary(raw), None);
    }

    #[test]
    fn summary_truncated_to_limit() {
        let long = "word ".repeat(200);
        let raw = format!("KEY FINDINGS\n{long}\nREMARKS\n");
        let summary = executive_summary(&raw).unwrap();
        assert_eq!(summary.chars().count(), 500);
    }

    #[test]
    fn summary_strips_emphasis_markers() {
        let raw = "EXECUTIVE SUMMARY\nThe decking is **saturated**.\nREMARKS\n";
        assert_eq!(executive_summary(raw).unwrap(), "The decking is saturated.");
    }

    #[test]
    fn cost_table_items_and_literal_total() {
        let raw = "COST ESTIMATE\n- Roof repair: $1,200\n- Siding: $800\nTotal cost: $2,000\nRECOMMENDATION\nTarp the roof.\n";
        let table = cost_table(raw).unwrap();
        assert_eq!(
            table.items,
            vec![
                CostLineItem { description: "Roof repair".into(), amount: 1200.0 },
                CostLineItem { description: "Siding".into(), amount: 800.0 },
            ]
        );
        assert_eq!(table.total, 2000.0);
    }

    #[test]
    fn cost_table_literal_total_used_when_no_items() {
        let raw = "COST ESTIMATE\nDetailed estimate to follow.\nTotal estimated cost: $4,500\nREMARKS\n";
        let table = cost_table(raw).unwrap();
        assert!(table.items.is_empty());
        assert_eq!(table.total, 4500.0);
    }

    #[test]
    fn cost_table_sum_wins_over_literal() {
        let raw = "COST ESTIMATE\n- Roof repair: $1,000\nTotal cost: $9,999\nREMARKS\n";
        let table = cost_table(raw).unwrap();
        assert_eq!(table.total, 1000.0);
    }

    #[test]
    fn cost_section_exits_on_non_cost_header() {
        let raw = "COST ESTIMATE\n- Roof repair: $1,200\nRECOMMENDATIONS\n- Painting: $999\n";
        let table = cost_table(raw).unwrap();
        assert_eq!(table.items.len(), 1);
    }

    #[test]
    fn cost_table_absent() {
        assert_eq!(cost_table("REMARKS\nNothing to price.\n"), None);
    }

    #[test]
    fn amounts_with_cents_and_dash_separator() {
        let raw = "REPAIR COSTS\nGutter reset - $245.50\n";
        let table = cost_table(raw).unwrap();
        assert_eq!(table.items[0].amount, 245.5);
        assert_eq!(table.items[0].description, "Gutter reset");
    }
}
