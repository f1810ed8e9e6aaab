//! Trigram extraction for a single file.

use std::collections::BTreeSet;
use std::path::Path;

use crate::engine::tools::format_timestamp;
use crate::error::ExtractError;
use crate::utils::config::MAX_FILE_SIZE;
use crate::{FileEntry, Trigram};

/// Distinct 3-byte windows of `content`. Content shorter than 3 bytes yields an empty set.
///
/// Windows are raw bytes: a multi-byte UTF-8 character may be split across windows.
pub fn extract_trigrams(content: &[u8]) -> BTreeSet<Trigram> {
    if content.len() < 3 {
        return BTreeSet::new();
    }
    // sort+dedup first so the set is bulk-built from sorted input
    let mut windows: Vec<Trigram> = content
        .windows(3)
        .map(|w| [w[0], w[1], w[2]])
        .collect();
    windows.sort_unstable();
    windows.dedup();
    windows.into_iter().collect()
}

/// Index one file with the default 10 MiB ceiling.
pub fn index_file(path: &Path) -> Result<FileEntry, ExtractError> {
    index_file_with_limit(path, MAX_FILE_SIZE)
}

/// Read `path`, reject content above `max_size` bytes, extract trigrams, then stat for mtime.
/// A stat failure discards the already-read content.
pub fn index_file_with_limit(path: &Path, max_size: u64) -> Result<FileEntry, ExtractError> {
    let data = std::fs::read(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let size = data.len() as u64;
    if size > max_size {
        return Err(ExtractError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_size,
        });
    }

    let trigrams = extract_trigrams(&data);
    drop(data);

    let mtime = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|source| ExtractError::Stat {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(FileEntry {
        path: path.to_path_buf(),
        trigrams,
        mtime: format_timestamp(mtime),
    })
}
