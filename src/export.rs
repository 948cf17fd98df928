//! Winners export as CSV.
//!
//! ```text
//! Name,Original Occurrence,Selected At
//! Alice,3,2026-10-16T09:30:12.481Z
//! ```

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use std::fs;
use std::path::Path;

use crate::entry::DrawRecord;

pub const HEADER: &str = "Name,Original Occurrence,Selected At";

/// Render `history` as CSV text, header first
pub fn to_csv(history: &[DrawRecord]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for record in history {
        out.push_str(&quote(&record.name));
        out.push(',');
        out.push_str(&record.weight.to_string());
        out.push(',');
        out.push_str(&record.drawn_at.to_rfc3339_opts(SecondsFormat::Millis, true));
        out.push('\n');
    }
    out
}

/// Write `history` to `path`, creating parent directories
pub fn write_csv(path: &Path, history: &[DrawRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create export directory {}", parent.display()))?;
    }

    fs::write(path, to_csv(history))
        .with_context(|| format!("Failed to write winners to {}", path.display()))?;

    tracing::info!("Exported {} winners to {}", history.len(), path.display());
    Ok(())
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
