use serde::{Deserialize, Serialize};

/// Metadata record supplied by the caller alongside the raw narrative text.
///
/// Every field is optional: a missing field renders as the literal `N/A`
/// rather than failing the conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insured_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
}

/// Placeholder used wherever a metadata field is rendered in a literal position.
pub(crate) fn or_na(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.trim().is_empty()).unwrap_or("N/A")
}

/// Heading depth of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLevel {
    Major,
    Subsection,
}

/// A contiguous span of text sharing one bold/plain style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmphasisRun {
    pub text: String,
    pub bold: bool,
}

impl EmphasisRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), bold: false }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self { text: text.into(), bold: true }
    }
}

/// Concatenate run texts into a single plain string.
pub fn flatten_runs(runs: &[EmphasisRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// One ordered unit of section body content.
///
/// Ordering within a section is insertion order from the source text and is
/// semantically significant. Consecutive `Spacer`s are kept as-is; each
/// renderer decides its own collapsing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ContentItem {
    Paragraph {
        runs: Vec<EmphasisRun>,
    },
    Bullet {
        runs: Vec<EmphasisRun>,
    },
    Numbered {
        /// Literal index from the source text, never renumbered.
        index: u32,
        runs: Vec<EmphasisRun>,
        /// Set when the item falls inside a recommendation window and is
        /// eligible for a priority badge in the print renderer.
        flagged: bool,
    },
    Spacer,
}

/// A header plus its ordered body content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub level: SectionLevel,
    pub header_text: String,
    /// Upper-cased, trimmed header text used for de-duplication.
    pub normalized_key: String,
    pub items: Vec<ContentItem>,
}

impl Section {
    pub fn new(level: SectionLevel, header_text: impl Into<String>) -> Self {
        let header_text = header_text.into();
        let normalized_key = normalize_key(&header_text);
        Self { level, header_text, normalized_key, items: Vec::new() }
    }
}

/// Normalize a header for de-duplication: trim, drop a trailing colon,
/// upper-case. `"Roof Condition:"` and `"ROOF CONDITION"` collide on purpose.
pub fn normalize_key(header: &str) -> String {
    header.trim().trim_end_matches(':').trim().to_uppercase()
}

/// The canonical document model: an ordered sequence of sections.
///
/// Built once per conversion call and immutable afterwards. No section's
/// `normalized_key` appears twice; the assembler suppresses repeats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    /// Look up a section by its normalized key.
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.normalized_key == key)
    }
}

/// A single extracted cost line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    pub description: String,
    pub amount: f64,
}

/// Cost estimate table lifted out of the raw text. A derived view, computed
/// fresh per render call and never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTable {
    pub items: Vec<CostLineItem>,
    pub total: f64,
}

/// Priority class for flagged recommendation items, derived from urgency
/// keywords in the item text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Recommended,
    Standard,
}

impl Priority {
    /// Keyword classification. First matching class wins; unmatched text is
    /// `Standard`.
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        const URGENT: &[&str] = &["urgent", "immediate", "critical", "emergency"];
        const HIGH: &[&str] = &["high priority", "important", "required"];
        const RECOMMENDED: &[&str] = &["medium", "moderate", "recommend"];

        if URGENT.iter().any(|k| lower.contains(k)) {
            Priority::Urgent
        } else if HIGH.iter().any(|k| lower.contains(k)) {
            Priority::High
        } else if RECOMMENDED.iter().any(|k| lower.contains(k)) {
            Priority::Recommended
        } else {
            Priority::Standard
        }
    }

    /// Badge caption as printed on the artifact.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Urgent => "URGENT",
            Priority::High => "HIGH PRIORITY",
            Priority::Recommended => "RECOMMENDED",
            Priority::Standard => "STANDARD",
        }
    }
}

/// One renderable artifact: suggested file name plus raw bytes.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
