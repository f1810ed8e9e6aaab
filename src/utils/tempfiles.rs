use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Temp sibling of `dest`: `<name>.tmp` in the same directory, so the rename stays on one filesystem.
pub fn temp_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{}-atlas", env!("CARGO_PKG_NAME")));
    dest.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .join(format!("{name}.tmp"))
}

/// Remove a stale temp file left by an interrupted write. Missing is fine.
pub fn remove_stale_temp(temp_path: &Path) -> Result<()> {
    match fs::remove_file(temp_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e)
            .with_context(|| format!("remove stale temp file {}", temp_path.display())),
    }
}

pub fn rename_temp_to_final(temp_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp_path, final_path).with_context(|| {
        format!(
            "atomic rename temp atlas to final path ({} -> {})",
            temp_path.display(),
            final_path.display()
        )
    })
}

/// Write `data` to `dest` atomically: stale temp removed, temp written, renamed over `dest`.
pub fn write_atomic(dest: &Path, data: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(dest);
    remove_stale_temp(&temp_path)?;
    fs::write(&temp_path, data)
        .with_context(|| format!("write {}", temp_path.display()))?;
    if let Err(e) = rename_temp_to_final(&temp_path, dest) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
