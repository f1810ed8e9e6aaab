use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Trigram code atlas: index a source tree into a portable JSON document.
#[derive(Clone, Parser)]
#[command(name = "tca", version)]
#[command(about = "Build a trigram atlas for a directory.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Build an atlas from a directory
    Build(BuildArgs),
    /// Search an atlas (not implemented yet)
    Search(SearchArgs),
    /// Update an existing atlas (not implemented yet)
    Update(UpdateArgs),
}

#[derive(Clone, Args)]
pub struct BuildArgs {
    /// Directory to index. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Output file, relative to DIR. Default: <dir>-atlas-YYYY-MM-DD.json.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Verbose output: per-file skips, ignore-file warnings, progress bar.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Overwrite an existing output file.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub force: Option<bool>,

    /// Strict mode: warn about every directory or file the walk could not visit.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,

    /// Number of trigram workers. Default: 4.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Included extensions, replacing the default set. Can specify multiple: --ext rs go md
    #[arg(long = "ext", num_args = 1..)]
    pub extensions: Vec<String>,

    /// Extra directory names to skip, added to .git, node_modules and vendor.
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude_dir: Vec<String>,

    /// Per-file size ceiling in bytes. Larger files are skipped. Default: 10 MiB.
    #[arg(long, value_parser = clap::value_parser!(u64))]
    pub max_file_size: Option<u64>,

    /// Follow symbolic links.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Read directories in parallel.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub parallel_walk: Option<bool>,
}

#[derive(Clone, Args)]
pub struct SearchArgs {
    /// Query text.
    #[arg(value_name = "QUERY", num_args = 1..)]
    pub query: Vec<String>,

    /// Atlas file to search.
    #[arg(long, short)]
    pub atlas: Option<PathBuf>,
}

#[derive(Clone, Args)]
pub struct UpdateArgs {
    /// Directory whose atlas should be updated.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,
}
