//! Metadata sidecar loading.
//!
//! Each narrative file may carry a `.yaml`/`.yml`/`.json` sidecar with the
//! claim metadata. A missing sidecar is not an error: the pipeline renders
//! `N/A` placeholders for absent fields.

use std::path::Path;

use anyhow::{Context, Result};
use claim_parse::ReportMetadata;

/// Resolve and load metadata for a narrative file.
///
/// An explicit `--metadata` path wins; otherwise sibling sidecars named after
/// the input (`report.txt` → `report.yaml` / `report.yml` / `report.json`)
/// are tried in order.
pub fn load_for(input: &Path, explicit: Option<&Path>) -> Result<ReportMetadata> {
    if let Some(path) = explicit {
        return load(path);
    }
    for ext in ["yaml", "yml", "json"] {
        let candidate = input.with_extension(ext);
        if candidate.is_file() {
            return load(&candidate);
        }
    }
    Ok(ReportMetadata::default())
}

fn load(path: &Path) -> Result<ReportMetadata> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read metadata '{}'", path.display()))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON metadata in '{}'", path.display())),
        _ => serde_yaml::from_str(&text)
            .with_context(|| format!("Invalid YAML metadata in '{}'", path.display())),
    }
}
