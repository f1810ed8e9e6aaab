//! Path, name and timestamp utilities

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, SecondsFormat};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Extension of a base name: text after the last `.`. A whole name like `.md` yields `md`.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rfind('.').map(|i| &name[i + 1..])
}

/// Strip a leading dot so `.go` and `go` configure the same extension.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

/// RFC 3339 at second precision with the local offset (`Z` when local is UTC).
pub fn format_timestamp(t: SystemTime) -> String {
    DateTime::<Local>::from(t).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time in the atlas timestamp format.
pub fn now_timestamp() -> String {
    format_timestamp(SystemTime::now())
}

/// `<name>-atlas-YYYY-MM-DD.json`
pub fn default_output_name(dir_name: &str, date: NaiveDate) -> String {
    format!("{}-atlas-{}.json", dir_name, date.format("%Y-%m-%d"))
}

/// Root must exist and be a directory. Returned as given (discovered paths keep the caller's form).
pub fn check_root(root: &Path) -> Result<PathBuf> {
    let meta = std::fs::metadata(root)
        .with_context(|| format!("read root metadata for {}", root.display()))?;
    if !meta.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }
    Ok(root.to_path_buf())
}

/// Resolve the atlas destination: `output` relative to `dir` (absolute stays as-is),
/// or the dated default named after the canonical directory.
pub fn resolve_output_path(dir: &Path, output: Option<&Path>) -> Result<PathBuf> {
    if let Some(out) = output {
        return Ok(dir.join(out));
    }
    let canonical = dir
        .canonicalize()
        .with_context(|| format!("canonicalize {}", dir.display()))?;
    let name = canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());
    Ok(dir.join(default_output_name(&name, Local::now().date_naive())))
}
