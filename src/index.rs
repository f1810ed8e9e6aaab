//! Atlas build: pipeline + optional progress bar + assembly.

use anyhow::Result;
use crossbeam_channel::Receiver;
use kdam::Animation;
use log::debug;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use crate::atlas::assemble;
use crate::engine::progress::{
    ProgressBar, ProgressBarConfig, create_progress_bar, finish_progress_bar, progress_callback,
    set_bar_total,
};
use crate::pipeline::{
    PipelineHandles, report_walk_errors, run_pipeline, shutdown_pipeline_handles,
};
use crate::{Atlas, Opts};

/// Build the progress bar when requested. The count pass total arrives on `path_count_rx`
/// while the main thread is blocked draining entries, so a helper thread sets it.
fn setup_progress(show: bool, path_count_rx: Receiver<usize>) -> Option<ProgressBar> {
    let bar = show.then(|| {
        create_progress_bar(ProgressBarConfig::new(0, "Indexing", Animation::Classic))
    })?;
    let bar_clone = Arc::clone(&bar);
    thread::spawn(move || {
        if let Ok(total) = path_count_rx.recv() {
            set_bar_total(&bar_clone, total);
        }
    });
    Some(bar)
}

/// Index `root` into an in-memory [`Atlas`]. Per-file and traversal failures are absorbed;
/// only a bad root or a panicked pipeline thread is an error.
pub fn build_atlas_with_opts(root: &Path, opts: &Opts) -> Result<Atlas> {
    let PipelineHandles {
        entry_rx,
        path_count_rx,
        count_handle,
        walk_handle,
        worker_handles,
        walk_errors,
    } = run_pipeline(root, opts)?;

    let bar = setup_progress(opts.show_progress, path_count_rx);
    let on_received = progress_callback(&bar);

    let atlas = assemble(entry_rx, on_received.as_deref().map(|f| f as &dyn Fn(usize)));

    let (eligible, fed) = shutdown_pipeline_handles(count_handle, walk_handle, worker_handles)?;
    if let Some(bar) = &bar {
        finish_progress_bar(bar, atlas.file_count(), eligible);
    }
    debug!(
        "Indexed {} of {} fed paths ({} counted eligible)",
        atlas.file_count(),
        fed,
        eligible
    );
    report_walk_errors(opts, &walk_errors);

    Ok(atlas)
}
