//! tca: trigram code atlas. Walks a source tree, extracts the distinct 3-byte windows of every
//! eligible file on a worker pool, and produces a JSON atlas for a trigram query layer.

pub mod atlas;
pub mod engine;
pub mod error;
pub mod filter;
pub mod index;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use atlas::{assemble, check_destination, to_json};
pub use engine::trigrams::{extract_trigrams, index_file, index_file_with_limit};
pub use error::ExtractError;
pub use filter::{FilterConfig, IgnorePatterns, should_index};

use log::debug;
use std::path::Path;

/// Result alias used by public tca API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Build an atlas for `root`. Files that cannot be read, are too large or cannot be stat'ed
/// are left out; directories that cannot be walked are skipped.
///
/// ```ignore
/// let atlas = tca::build_atlas(Path::new("src"), &tca::AtlasOpts::default())?;
/// assert_eq!(atlas.metadata.file_count, atlas.files.len());
/// tca::write_atlas(&atlas, Path::new("src-atlas.json"))?;
/// ```
pub fn build_atlas(root: &Path, opts: &AtlasOpts) -> Result<Atlas> {
    let opts = Opts::from(opts);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    index::build_atlas_with_opts(root, &opts)
}

/// Serialize `atlas` as indented JSON and write it to `dest` atomically.
pub fn write_atlas(atlas: &Atlas, dest: &Path) -> Result<()> {
    atlas::write_atlas(atlas, dest)
}
