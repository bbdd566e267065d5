//! Findings document loading, timestamping, and atomic write-back.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use macrofind_shared::{FindingsDocument, MacroFindError, Result};

/// Default location of the findings document for a given month.
pub fn default_findings_path(year: i32, month: u32) -> PathBuf {
    Path::new("reports")
        .join("euro_macro")
        .join(format!("{year}-{month:02}-findings.json"))
}

/// Read and parse a findings document.
///
/// Missing files, invalid JSON, and documents without `meta.year` /
/// `meta.month` all fail with [`MacroFindError::DocumentRead`].
pub fn load_document(path: &Path) -> Result<FindingsDocument> {
    let content =
        std::fs::read_to_string(path).map_err(|e| MacroFindError::document_read(path, e))?;
    let doc: FindingsDocument =
        serde_json::from_str(&content).map_err(|e| MacroFindError::document_read(path, e))?;

    debug!(
        path = %path.display(),
        groups = doc.agent_results.len(),
        findings = doc.total_findings(),
        "findings document loaded"
    );
    Ok(doc)
}

/// Set `meta.generated_at` to `now`. Other meta fields are left alone.
pub fn stamp(doc: &mut FindingsDocument, now: DateTime<Utc>) {
    doc.meta.generated_at = Some(now.to_rfc3339_opts(SecondsFormat::Micros, false));
}

/// Stamp the document with the current time and write it to `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn update_document(path: &Path, doc: &mut FindingsDocument) -> Result<()> {
    stamp(doc, Utc::now());
    save_document(path, doc)
}

/// Serialize `doc` and atomically replace `path` with it.
///
/// The JSON is written to a sibling temp file first and renamed over the
/// target, so readers never observe a partial document.
pub fn save_document(path: &Path, doc: &FindingsDocument) -> Result<()> {
    let mut json =
        serde_json::to_string_pretty(doc).map_err(|e| MacroFindError::document_write(path, e))?;
    json.push('\n');

    let file_name = path
        .file_name()
        .ok_or_else(|| MacroFindError::document_write(path, "path has no file name"))?
        .to_string_lossy();
    let temp = path.with_file_name(format!(".{file_name}.{}.tmp", Uuid::now_v7()));

    let written = std::fs::write(&temp, json)
        .map_err(|e| MacroFindError::document_write(&temp, e))
        .and_then(|()| {
            std::fs::rename(&temp, path).map_err(|e| MacroFindError::document_write(path, e))
        });
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp);
        return Err(e);
    }

    info!(
        path = %path.display(),
        groups = doc.agent_results.len(),
        "findings document written"
    );
    Ok(())
}
