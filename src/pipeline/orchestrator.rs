use anyhow::Result;
use log::debug;
use std::path::Path;
use std::thread::JoinHandle;

use crate::Opts;
use crate::engine::tools::check_root;
use crate::filter::FilterConfig;
use crate::pipeline;

/// Start count pass, feed pass and the worker pool. Caller receives from `entry_rx`
/// until it closes, then joins with [`shutdown_pipeline_handles`].
pub fn run_pipeline(root: &Path, opts: &Opts) -> Result<pipeline::PipelineHandles> {
    let root = check_root(root)?;
    let filter = FilterConfig::from_opts(&root, opts);
    let output_canonical = opts.output.as_ref().and_then(|p| p.canonicalize().ok());
    debug!(
        "Workers: {}, walk: {}",
        opts.num_workers,
        if opts.parallel_walk { "parallel" } else { "serial" }
    );

    let channels = pipeline::create_pipeline_channels(&root, filter, output_canonical, opts);

    let count_handle =
        pipeline::spawn_count_thread(channels.path_count_tx, channels.ctx.clone());

    let walk_errors = std::sync::Arc::clone(&channels.ctx.walk_errors);
    let walk_handle = pipeline::spawn_walk_thread(channels.path_tx, channels.ctx);

    let worker_handles = pipeline::spawn_trigram_workers(
        channels.path_rx,
        &channels.entry_tx,
        opts.num_workers,
        opts.max_file_size,
    );

    // Dropping the last sender outside the workers lets the entry channel close when they exit.
    drop(channels.entry_tx);

    Ok(pipeline::PipelineHandles {
        entry_rx: channels.entry_rx,
        path_count_rx: channels.path_count_rx,
        count_handle,
        walk_handle,
        worker_handles,
        walk_errors,
    })
}

/// Join count, feed and worker threads (after the entry stream is drained).
/// Returns (eligible count from the count pass, paths fed).
pub fn shutdown_pipeline_handles(
    count_handle: JoinHandle<usize>,
    walk_handle: JoinHandle<usize>,
    worker_handles: Vec<JoinHandle<()>>,
) -> Result<(usize, usize)> {
    let fed = walk_handle
        .join()
        .map_err(|_| anyhow::anyhow!("walk thread panicked"))?;
    for h in worker_handles {
        h.join()
            .map_err(|_| anyhow::anyhow!("trigram worker panicked"))?;
    }
    let counted = count_handle
        .join()
        .map_err(|_| anyhow::anyhow!("count thread panicked"))?;
    Ok((counted, fed))
}

/// Collect all entries under `root` without progress or assembly.
/// Walk → path channel → workers (trigrams) → entry channel → Vec.
pub fn collect_entries(root: &Path, opts: &Opts) -> Result<pipeline::CollectEntriesResult> {
    let pipeline::PipelineHandles {
        entry_rx,
        path_count_rx: _path_count_rx,
        count_handle,
        walk_handle,
        worker_handles,
        walk_errors,
    } = run_pipeline(root, opts)?;

    let entries: Vec<_> = entry_rx.iter().collect();
    debug!("main: channel closed, total {} entries", entries.len());

    let (counted, _fed) = shutdown_pipeline_handles(count_handle, walk_handle, worker_handles)?;
    pipeline::report_walk_errors(opts, &walk_errors);

    Ok((entries, counted))
}
