//! Pipeline context: shared read-only state for the walk passes, plus the channels.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::filter::FilterConfig;
use crate::utils::config::CHANNEL_CAP;
use crate::{FileEntry, Opts};

/// Traversal errors recorded by the feed pass: (path or placeholder, message).
pub type WalkErrors = Arc<Mutex<Vec<(PathBuf, String)>>>;

/// Shared context for both walk passes. Cloned into each walk thread; the filter is
/// behind an `Arc` and never mutated after construction.
#[derive(Clone)]
pub struct PipelineContext {
    pub root: PathBuf,
    pub filter: Arc<FilterConfig>,
    /// Canonical destination of the atlas, if it already exists; never indexed.
    pub output_canonical: Option<PathBuf>,
    pub follow_links: bool,
    pub parallel_walk: bool,
    pub walk_errors: WalkErrors,
}

/// Result of [`collect_entries`](super::collect_entries): (entries, eligible count from the count pass).
pub type CollectEntriesResult = (Vec<FileEntry>, usize);

/// Handles returned by [`run_pipeline`](super::run_pipeline): receive entries and join when done.
/// `path_count_rx`: receives the count pass total (progress only; never the atlas file count).
pub struct PipelineHandles {
    pub entry_rx: Receiver<FileEntry>,
    pub path_count_rx: Receiver<usize>,
    pub count_handle: JoinHandle<usize>,
    pub walk_handle: JoinHandle<usize>,
    pub worker_handles: Vec<JoinHandle<()>>,
    pub walk_errors: WalkErrors,
}

/// Channels for the pipeline. Feed thread gets path_tx; count thread gets path_count_tx;
/// workers get path_rx and clones of entry_tx.
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub entry_tx: Sender<FileEntry>,
    pub entry_rx: Receiver<FileEntry>,
    pub path_count_tx: Sender<usize>,
    pub path_count_rx: Receiver<usize>,
    pub ctx: PipelineContext,
}

pub fn create_pipeline_channels(
    root: &Path,
    filter: FilterConfig,
    output_canonical: Option<PathBuf>,
    opts: &Opts,
) -> PipelineChannels {
    let (path_tx, path_rx) = bounded::<PathBuf>(CHANNEL_CAP);
    let (entry_tx, entry_rx) = bounded::<FileEntry>(CHANNEL_CAP);
    let (path_count_tx, path_count_rx) = bounded::<usize>(1);

    let ctx = PipelineContext {
        root: root.to_path_buf(),
        filter: Arc::new(filter),
        output_canonical,
        follow_links: opts.follow_links,
        parallel_walk: opts.parallel_walk,
        walk_errors: Arc::new(Mutex::new(Vec::new())),
    };

    PipelineChannels {
        path_tx,
        path_rx,
        entry_tx,
        entry_rx,
        path_count_tx,
        path_count_rx,
        ctx,
    }
}
