//! Public and internal types for the atlas document and the build options.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::utils::config::{DEFAULT_WORKERS, MAX_FILE_SIZE};

/// Three contiguous bytes of file content.
pub type Trigram = [u8; 3];

/// One successfully indexed file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    /// Path as discovered during the walk (root joined with the relative path; not normalized).
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    /// Distinct byte windows of the content, compared as raw bytes. The JSON array renders
    /// each window lossily, so it can be shorter than the set when renderings collide, and a
    /// rendered string can be longer than 3 bytes.
    #[serde(serialize_with = "serialize_trigrams")]
    pub trigrams: BTreeSet<Trigram>,
    /// Modification time, RFC 3339 with local offset.
    pub mtime: String,
}

/// Build-level metadata. `file_count` always equals `files.len()` of the owning [`Atlas`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AtlasMetadata {
    pub version: String,
    pub created: String,
    pub file_count: usize,
}

/// The whole document. Order of `files` is whatever order workers finished in; key by path.
#[derive(Clone, Debug, Serialize)]
pub struct Atlas {
    pub files: Vec<FileEntry>,
    pub metadata: AtlasMetadata,
}

/// Render a trigram for JSON. Non UTF-8 windows are rendered lossily.
pub fn trigram_to_string(t: &Trigram) -> Cow<'_, str> {
    String::from_utf8_lossy(t)
}

fn serialize_path<S: Serializer>(path: &Path, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&path.to_string_lossy())
}

// Lossy renderings can collide; the emitted array stays duplicate free.
fn serialize_trigrams<S: Serializer>(set: &BTreeSet<Trigram>, s: S) -> Result<S::Ok, S::Error> {
    let rendered: BTreeSet<Cow<'_, str>> = set.iter().map(trigram_to_string).collect();
    s.collect_seq(rendered)
}

/// Lib-only options for [`build_atlas`](crate::build_atlas). Fields left empty / `None` use the defaults.
#[derive(Clone, Debug, Default)]
pub struct AtlasOpts {
    /// Trigram worker count. Default 4.
    pub num_workers: Option<usize>,
    /// Per-file size ceiling in bytes. Default 10 MiB.
    pub max_file_size: Option<u64>,
    /// Included extensions (with or without the leading dot). Empty keeps the default set.
    pub extensions: Vec<String>,
    /// Extra directory names to prune, added to the defaults.
    pub exclude_dirs: Vec<String>,
    /// Follow symbolic links during the walk.
    pub follow_links: bool,
    /// Read directories in parallel (jwalk) instead of the serial walkdir walk.
    pub parallel_walk: bool,
    /// Log every traversal error as a warning instead of tolerating it silently.
    pub strict: bool,
    /// Surface per-file skips and ignore-file problems.
    pub verbose: bool,
}

impl From<&AtlasOpts> for Opts {
    fn from(o: &AtlasOpts) -> Self {
        Opts {
            output: None,
            num_workers: o.num_workers.unwrap_or(DEFAULT_WORKERS),
            max_file_size: o.max_file_size.unwrap_or(MAX_FILE_SIZE),
            extensions: o.extensions.clone(),
            exclude_dirs: o.exclude_dirs.clone(),
            follow_links: o.follow_links,
            parallel_walk: o.parallel_walk,
            strict: o.strict,
            verbose: o.verbose,
            force: false,
            show_progress: false,
        }
    }
}

/// Full options (CLI and config file). Use [`AtlasOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Destination of the atlas. Never indexed itself.
    pub output: Option<PathBuf>,
    pub num_workers: usize,
    pub max_file_size: u64,
    /// Included extensions. Empty keeps the default set.
    pub extensions: Vec<String>,
    /// Extra excluded directory names, added to the defaults.
    pub exclude_dirs: Vec<String>,
    pub follow_links: bool,
    pub parallel_walk: bool,
    /// Strict mode: warn on every traversal error.
    pub strict: bool,
    pub verbose: bool,
    /// Overwrite an existing destination.
    pub force: bool,
    /// Show the progress bar (CLI verbose builds).
    pub show_progress: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts::from(&AtlasOpts::default())
    }
}
