//! Engine module: command surface, trigram extraction, progress, helpers

pub mod arg_parser;
pub mod handlers;
pub mod progress;
pub mod tools;
pub mod trigrams;

// Re-export commonly used functions
pub use arg_parser::{BuildArgs, Cli, Commands};
pub use handlers::{handle_build, handle_run};
pub use tools::{extension_of, format_timestamp, resolve_output_path};
pub use trigrams::{extract_trigrams, index_file, index_file_with_limit};
