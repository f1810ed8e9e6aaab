//! Pipeline components: context, walk passes, trigram workers, error reporting.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;
pub mod workers;

pub use context::{
    CollectEntriesResult, PipelineChannels, PipelineContext, PipelineHandles, WalkErrors,
    create_pipeline_channels,
};
pub use error_handler::report_walk_errors;
pub use orchestrator::{collect_entries, run_pipeline, shutdown_pipeline_handles};
pub use walk::{
    WalkOutcome, count_eligible, is_eligible, run_walk_loop, spawn_count_thread,
    spawn_walk_thread, to_outcome_jwalk, to_outcome_walkdir,
};
pub use workers::spawn_trigram_workers;
