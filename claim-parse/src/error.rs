use serde::{Deserialize, Serialize};

/// Errors that can occur while producing an artifact.
///
/// Parsing and extraction are total over their input domain and never fail;
/// only a renderer backend can. Malformed narrative text degrades to body
/// content instead of erroring.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("PDF backend error: {0}")]
    Pdf(String),

    #[error("DOCX backend error: {0}")]
    Docx(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A diagnostic message produced during assembly.
///
/// Diagnostics are non-fatal: the assembler continues and produces a
/// best-effort document even when diagnostics are emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based line number in the source text, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}
