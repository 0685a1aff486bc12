//! Property-based tests using proptest.
//!
//! The pipeline is meant to be total over its input domain: any string
//! assembles, and the emphasis parser's output always reconstructs its input
//! minus delimiter characters.

use proptest::prelude::*;

fn strip_delims(text: &str) -> String {
    text.chars().filter(|c| *c != '*' && *c != '_').collect()
}

proptest! {
    /// Any random string fed to the assembler should never cause a panic,
    /// and the resulting document must not contain duplicate section keys.
    #[test]
    fn any_input_assembles_without_duplicates(input in "\\PC{0,500}") {
        let result = claim_parse::parse(&input);
        let mut keys: Vec<&str> = result
            .doc
            .sections
            .iter()
            .map(|s| s.normalized_key.as_str())
            .collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        prop_assert_eq!(keys.len(), total);
    }

    /// Emphasis round-trip: the concatenated run text equals the input with
    /// every delimiter character removed, and no run keeps a delimiter.
    #[test]
    fn emphasis_roundtrip(input in "\\PC{0,200}") {
        let runs = claim_parse::inline::parse_runs(&input);
        let flat: String = runs.iter().map(|r| r.text.as_str()).collect();
        prop_assert_eq!(flat, strip_delims(&input));
        for run in &runs {
            prop_assert!(!run.text.contains('*') && !run.text.contains('_'));
        }
    }

    /// Extractors never panic and never invent content on arbitrary input.
    #[test]
    fn extractors_are_best_effort(input in "\\PC{0,500}") {
        if let Some(summary) = claim_parse::extract::executive_summary(&input) {
            prop_assert!(summary.chars().count() <= 500);
            prop_assert!(!summary.is_empty());
        }
        if let Some(table) = claim_parse::extract::cost_table(&input) {
            // Amounts only match unsigned literals, so a table never goes negative.
            prop_assert!(table.total >= 0.0);
        }
    }

    /// The web renderer produces a complete page for any assembled input.
    #[test]
    fn web_renderer_total(input in "\\PC{0,300}") {
        let result = claim_parse::parse(&input);
        let html = result.doc.to_web_page(&claim_parse::ReportMetadata::default());
        prop_assert!(html.starts_with("<!DOCTYPE html>"));
        prop_assert!(html.contains("</html>"));
    }

    /// Classification is deterministic: two fresh contexts agree line by line.
    #[test]
    fn classification_deterministic(input in "\\PC{0,300}") {
        use claim_parse::classify::{ClassifierContext, classify};
        let mut a = ClassifierContext::new();
        let mut b = ClassifierContext::new();
        for line in input.split('\n') {
            prop_assert_eq!(classify(line, &mut a), classify(line, &mut b));
        }
    }
}
