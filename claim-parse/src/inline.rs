//! Inline emphasis parser.
//!
//! Splits a line of text into (text, bold) runs. `**`/`__` pairs and single
//! `*`/`_` pairs all map to bold; the pipeline has no distinct italic run
//! type because no renderer needs one. Stray delimiters are dropped, never
//! rendered literally, so the concatenated run text always equals the input
//! with every delimiter character removed.

use crate::types::EmphasisRun;

/// Delimiters in match priority order: double markers before single.
const DELIMITERS: &[&str] = &["**", "__", "*", "_"];

/// Parse a line into emphasis runs.
///
/// Scans left to right for the first delimiter. If its closer exists, the
/// text before it becomes a plain run, the captured text a bold run, and
/// scanning resumes after the closer. A delimiter with no closer is deleted.
/// Input without delimiters comes back as a single plain run.
pub fn parse_runs(text: &str) -> Vec<EmphasisRun> {
    let mut runs = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while let Some((at, delim)) = find_delimiter(rest) {
        plain.push_str(&rest[..at]);
        let after = &rest[at + delim.len()..];
        match after.find(delim) {
            Some(close) => {
                flush_plain(&mut runs, &mut plain);
                let inner = strip_delimiter_chars(&after[..close]);
                if !inner.is_empty() {
                    runs.push(EmphasisRun::bold(inner));
                }
                rest = &after[close + delim.len()..];
            }
            // Unmatched: drop the delimiter and keep scanning.
            None => rest = after,
        }
    }

    plain.push_str(rest);
    flush_plain(&mut runs, &mut plain);

    if runs.is_empty() {
        runs.push(EmphasisRun::plain(String::new()));
    }
    runs
}

/// Byte position and kind of the leftmost delimiter, double markers winning
/// over single at the same position.
fn find_delimiter(text: &str) -> Option<(usize, &'static str)> {
    for (idx, _) in text.char_indices() {
        for delim in DELIMITERS {
            if text[idx..].starts_with(delim) {
                return Some((idx, delim));
            }
        }
    }
    None
}

fn strip_delimiter_chars(text: &str) -> String {
    text.chars().filter(|c| *c != '*' && *c != '_').collect()
}

fn flush_plain(runs: &mut Vec<EmphasisRun>, plain: &mut String) {
    if !plain.is_empty() {
        runs.push(EmphasisRun::plain(std::mem::take(plain)));
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flat(runs: &[EmphasisRun]) -> String {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn no_delimiters_single_plain_run() {
        let runs = parse_runs("The roof shows hail damage.");
        assert_eq!(runs, vec![EmphasisRun::plain("The roof shows hail damage.")]);
    }

    #[test]
    fn double_star_bold() {
        let runs = parse_runs("Condition: **poor** overall");
        assert_eq!(
            runs,
            vec![
                EmphasisRun::plain("Condition: "),
                EmphasisRun::bold("poor"),
                EmphasisRun::plain(" overall"),
            ]
        );
    }

    #[test]
    fn underscore_variants_are_bold_equivalent() {
        assert_eq!(
            parse_runs("__severe__ and _moderate_"),
            vec![
                EmphasisRun::bold("severe"),
                EmphasisRun::plain(" and "),
                EmphasisRun::bold("moderate"),
            ]
        );
    }

    #[test]
    fn double_checked_before_single() {
        let runs = parse_runs("**bold**");
        assert_eq!(runs, vec![EmphasisRun::bold("bold")]);
    }

    #[test]
    fn stray_delimiter_dropped() {
        assert_eq!(parse_runs("5 * 3 panels"), vec![EmphasisRun::plain("5  3 panels")]);
        assert_eq!(parse_runs("snake_case"), vec![EmphasisRun::plain("snakecase")]);
    }

    #[test]
    fn trailing_unmatched_pair_half() {
        // In "**a**b**" the first pair closes and the trailing opener is stray.
        assert_eq!(
            parse_runs("**a**b**"),
            vec![EmphasisRun::bold("a"), EmphasisRun::plain("b")]
        );
    }

    #[test]
    fn empty_input_yields_one_empty_run() {
        assert_eq!(parse_runs(""), vec![EmphasisRun::plain("")]);
    }

    #[test]
    fn concatenation_equals_input_minus_delimiters() {
        let cases = [
            "plain",
            "**a** b _c_ d",
            "*x*y*z",
            "a ** b",
            "__ __",
            "**nested _inner_ text**",
        ];
        for case in cases {
            let expect: String = case.chars().filter(|c| *c != '*' && *c != '_').collect();
            assert_eq!(flat(&parse_runs(case)), expect, "case: {case:?}");
        }
    }
}
