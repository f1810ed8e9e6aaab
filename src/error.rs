//! Per-file extraction errors. These never abort a build; the file is skipped.

use std::path::PathBuf;
use thiserror::Error;

/// Why a single file could not be turned into a [`FileEntry`](crate::FileEntry).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Content could not be read
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content was read but the modification time could not be retrieved
    #[error("stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content exceeds the size ceiling
    #[error("file too large ({size} bytes > {limit} bytes): {path}")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}
