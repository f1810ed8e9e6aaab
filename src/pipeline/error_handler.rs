use log::{debug, warn};

use super::context::WalkErrors;
use crate::Opts;

/// Report traversal errors recorded by the feed pass. Call after joining the walk.
/// Strict mode warns per error; otherwise they are tolerated with a debug-level count.
/// Never fails the build.
pub fn report_walk_errors(opts: &Opts, walk_errors: &WalkErrors) {
    let errors = match walk_errors.lock() {
        Ok(errors) => errors,
        Err(poisoned) => poisoned.into_inner(),
    };
    if errors.is_empty() {
        return;
    }
    if opts.strict {
        for (path, msg) in errors.iter() {
            warn!("walk error at {}: {}", path.display(), msg);
        }
        warn!(
            "Skipped {} paths due to permission errors or access issues",
            errors.len()
        );
    } else {
        debug!("Tolerated {} traversal errors", errors.len());
    }
}
