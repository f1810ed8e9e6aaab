//! Atlas assembly and persistence.

use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use std::path::Path;

use crate::engine::tools::now_timestamp;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::tempfiles::write_atomic;
use crate::{Atlas, AtlasMetadata, FileEntry};

impl Atlas {
    /// Stamp metadata over a finished entry list. `file_count` is taken from `files`, nothing else.
    pub fn from_entries(files: Vec<FileEntry>) -> Self {
        let metadata = AtlasMetadata {
            version: SCHEMA_VERSION.to_string(),
            created: now_timestamp(),
            file_count: files.len(),
        };
        Atlas { files, metadata }
    }

    pub fn file_count(&self) -> usize {
        self.metadata.file_count
    }

    /// Entry for `path`, if indexed.
    pub fn get(&self, path: &Path) -> Option<&FileEntry> {
        self.files.iter().find(|e| e.path.as_path() == path)
    }
}

/// Drain `entry_rx` until every sender is gone, then stamp metadata. No I/O.
/// `on_received` is called with 1 per entry (progress).
pub fn assemble(entry_rx: Receiver<FileEntry>, on_received: Option<&dyn Fn(usize)>) -> Atlas {
    let mut files = Vec::new();
    for entry in entry_rx.iter() {
        files.push(entry);
        if let Some(f) = on_received {
            f(1);
        }
    }
    Atlas::from_entries(files)
}

/// Serialize with two-space indentation.
pub fn to_json(atlas: &Atlas) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(atlas).context("serialize atlas")
}

/// Refuse to clobber an existing destination unless `force`.
pub fn check_destination(dest: &Path, force: bool) -> Result<()> {
    if !force && dest.exists() {
        anyhow::bail!(
            "'{}' already exists; use --force to overwrite",
            dest.display()
        );
    }
    Ok(())
}

/// Serialize `atlas` and write it to `dest` via a temp file and rename.
pub fn write_atlas(atlas: &Atlas, dest: &Path) -> Result<()> {
    let data = to_json(atlas)?;
    write_atomic(dest, &data)
}
