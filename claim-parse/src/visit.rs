//! Shared item-kind dispatch for renderers.
//!
//! All three renderers switch on the same content-item kinds; only the layout
//! instructions differ. [`walk`] owns the switch once, and each renderer
//! supplies an [`ItemVisitor`].

use crate::types::{ContentItem, Document, EmphasisRun, Section, SectionLevel};

/// Receives one callback per visible element, in document order.
pub trait ItemVisitor {
    fn section_header(&mut self, level: SectionLevel, text: &str);
    fn paragraph(&mut self, runs: &[EmphasisRun]);
    fn bullet(&mut self, runs: &[EmphasisRun]);
    fn numbered(&mut self, index: u32, runs: &[EmphasisRun], flagged: bool);
    fn spacer(&mut self);
}

/// Walk every section in order, skipping any whose normalized key appears in
/// `exclude`. The implicit leading section (empty header) emits no header
/// callback.
pub fn walk<V: ItemVisitor>(doc: &Document, exclude: &[&str], visitor: &mut V) {
    for section in &doc.sections {
        if exclude.contains(&section.normalized_key.as_str()) {
            continue;
        }
        walk_section(section, visitor);
    }
}

fn walk_section<V: ItemVisitor>(section: &Section, visitor: &mut V) {
    if !section.header_text.is_empty() {
        visitor.section_header(section.level, &section.header_text);
    }
    for item in &section.items {
        match item {
            ContentItem::Paragraph { runs } => visitor.paragraph(runs),
            ContentItem::Bullet { runs } => visitor.bullet(runs),
            ContentItem::Numbered { index, runs, flagged } => {
                visitor.numbered(*index, runs, *flagged)
            }
            ContentItem::Spacer => visitor.spacer(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Collector {
        headers: Vec<String>,
        items: usize,
    }

    impl ItemVisitor for Collector {
        fn section_header(&mut self, _level: SectionLevel, text: &str) {
            self.headers.push(text.to_string());
        }
        fn paragraph(&mut self, _runs: &[EmphasisRun]) {
            self.items += 1;
        }
        fn bullet(&mut self, _runs: &[EmphasisRun]) {
            self.items += 1;
        }
        fn numbered(&mut self, _index: u32, _runs: &[EmphasisRun], _flagged: bool) {
            self.items += 1;
        }
        fn spacer(&mut self) {}
    }

    #[test]
    fn exclude_list_skips_whole_sections() {
        let parsed = assemble::parse(
            "CLAIM INFORMATION\nClaim data here.\nREMARKS\nBody line.\n",
        );
        let mut collector = Collector::default();
        walk(&parsed.doc, &["CLAIM INFORMATION"], &mut collector);
        assert_eq!(collector.headers, vec!["REMARKS"]);
        assert_eq!(collector.items, 1);
    }

    #[test]
    fn implicit_leading_section_has_no_header_callback() {
        let parsed = assemble::parse("Loose opening line.\nREMARKS\nBody.\n");
        let mut collector = Collector::default();
        walk(&parsed.doc, &[], &mut collector);
        assert_eq!(collector.headers, vec!["REMARKS"]);
        assert_eq!(collector.items, 2);
    }
}
