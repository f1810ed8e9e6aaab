//! Tree walks: the count pass (progress total) and the feed pass (paths to workers).
//! Both use the same walk backend and the same eligibility test.

use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::context::PipelineContext;

/// One result from a directory walk: a discovered path or an error with optional path.
pub enum WalkOutcome {
    Ok { path: PathBuf, is_dir: bool },
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a jwalk result into [`WalkOutcome`].
pub fn to_outcome_jwalk(r: Result<jwalk::DirEntry<((), ())>, jwalk::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => WalkOutcome::Ok {
            is_dir: entry.file_type().is_dir(),
            path: entry.path(),
        },
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => WalkOutcome::Ok {
            is_dir: entry.file_type().is_dir(),
            path: entry.into_path(),
        },
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

fn jwalk_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use jwalk::Parallelism;
    use std::time::Duration;
    Box::new(
        jwalk::WalkDir::new(&ctx.root)
            .follow_links(ctx.follow_links)
            .skip_hidden(false)
            .parallelism(Parallelism::RayonDefaultPool {
                busy_timeout: Duration::from_secs(60),
            })
            .into_iter()
            .map(to_outcome_jwalk),
    )
}

/// Serial depth-first walk; excluded directories are pruned before they are read.
fn walkdir_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    use walkdir::WalkDir;
    let filter = Arc::clone(&ctx.filter);
    Box::new(
        WalkDir::new(&ctx.root)
            .follow_links(ctx.follow_links)
            .into_iter()
            .filter_entry(move |e| {
                e.depth() == 0
                    || !(e.file_type().is_dir()
                        && filter.is_excluded_dir(&e.file_name().to_string_lossy()))
            })
            .map(to_outcome_walkdir),
    )
}

fn walk_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    match ctx.parallel_walk {
        true => jwalk_iter(ctx),
        false => walkdir_iter(ctx),
    }
}

/// Eligibility of one walked path. The filter sees the path relative to the root so a root
/// that itself sits under an excluded name is still indexable.
pub fn is_eligible(ctx: &PipelineContext, path: &Path, is_dir: bool) -> bool {
    if is_dir {
        return false;
    }
    let rel = path.strip_prefix(&ctx.root).unwrap_or(path);
    ctx.filter.should_index(rel) && !is_output_file(ctx, path)
}

fn is_output_file(ctx: &PipelineContext, path: &Path) -> bool {
    match &ctx.output_canonical {
        Some(out) if out.file_name() == path.file_name() => {
            path.canonicalize().is_ok_and(|p| &p == out)
        }
        _ => false,
    }
}

/// Count pass: number of eligible files. Traversal errors are swallowed.
pub fn count_eligible<I>(ctx: &PipelineContext, iter: I) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    iter.filter(|outcome| match outcome {
        WalkOutcome::Ok { path, is_dir } => is_eligible(ctx, path, *is_dir),
        WalkOutcome::Err { .. } => false,
    })
    .count()
}

/// Spawn the count pass. Sends the total on `path_count_tx` (ignored if nobody listens).
pub fn spawn_count_thread(path_count_tx: Sender<usize>, ctx: PipelineContext) -> JoinHandle<usize> {
    thread::spawn(move || {
        let total = count_eligible(&ctx, walk_iter(&ctx));
        let _ = path_count_tx.send(total);
        total
    })
}

/// Spawn the feed pass.
pub fn spawn_walk_thread(path_tx: Sender<PathBuf>, ctx: PipelineContext) -> JoinHandle<usize> {
    thread::spawn(move || {
        let iter = walk_iter(&ctx);
        let track_last_path = !ctx.parallel_walk;
        run_walk_loop(path_tx, &ctx, iter, track_last_path)
    })
}

/// Feed loop: send every eligible path to `path_tx`, record traversal errors and keep going.
/// Dropping `path_tx` on return closes the path channel so workers drain and exit.
/// When `track_last_path` is true (serial walk), an error without a path is labelled with the last path seen.
pub fn run_walk_loop<I>(
    path_tx: Sender<PathBuf>,
    ctx: &PipelineContext,
    iter: I,
    track_last_path: bool,
) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    let mut last_path: Option<PathBuf> = None;
    for outcome in iter {
        match outcome {
            WalkOutcome::Ok { path, is_dir } => {
                if track_last_path {
                    last_path = Some(path.clone());
                }
                if is_eligible(ctx, &path, is_dir) {
                    if path_tx.send(path).is_err() {
                        break;
                    }
                    count += 1;
                }
            }
            WalkOutcome::Err { msg, path } => {
                let to_push = path.unwrap_or_else(|| {
                    PathBuf::from(format!(
                        "<no-path, last was {}>",
                        last_path
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "<none>".to_string())
                    ))
                });
                if let Ok(mut errors) = ctx.walk_errors.lock() {
                    errors.push((to_push, msg));
                }
            }
        }
    }
    drop(path_tx);
    count
}
