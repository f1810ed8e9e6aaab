//! CLI command handlers: build writes an atlas; search and update are declared only.

use anyhow::{Result, bail};
use colored::Colorize;
use log::{debug, warn};
use std::time::Instant;

use crate::Opts;
use crate::atlas::{check_destination, write_atlas};
use crate::engine::arg_parser::{BuildArgs, Cli, Commands};
use crate::engine::tools::resolve_output_path;
use crate::index::build_atlas_with_opts;
use crate::utils::{apply_file_to_opts, load_tca_toml, setup_logging};

/// Overwrite opts field from a flag when given.
macro_rules! apply_cli_opt {
    ($args:expr, $opts:expr, $arg_field:ident => $opts_field:ident) => {
        if let Some(v) = $args.$arg_field {
            $opts.$opts_field = v;
        }
    };
}

/// Defaults, then `.tca.toml` in DIR, then flags. Initializes logging.
fn setup_opts(args: &BuildArgs) -> Result<Opts> {
    // Read before logging is up so the file's verbose setting applies; report after.
    let file = load_tca_toml(&args.dir);
    let file_verbose = file
        .as_ref()
        .ok()
        .and_then(|f| f.as_ref())
        .and_then(|f| f.verbose())
        .unwrap_or(false);
    setup_logging(args.verbose.unwrap_or(file_verbose));

    let mut opts = Opts::default();
    match file {
        Ok(Some(f)) => apply_file_to_opts(&f, &mut opts),
        Ok(None) => {}
        Err(e) => warn!("{:#}; using defaults", e),
    }

    if args.output.is_some() {
        opts.output = args.output.clone();
    }
    if !args.extensions.is_empty() {
        opts.extensions = args.extensions.clone();
    }
    opts.exclude_dirs.extend(args.exclude_dir.iter().cloned());
    apply_cli_opt!(args, opts, workers => num_workers);
    apply_cli_opt!(args, opts, max_file_size => max_file_size);
    apply_cli_opt!(args, opts, verbose => verbose);
    apply_cli_opt!(args, opts, force => force);
    apply_cli_opt!(args, opts, strict => strict);
    apply_cli_opt!(args, opts, follow_links => follow_links);
    apply_cli_opt!(args, opts, parallel_walk => parallel_walk);

    if opts.num_workers == 0 {
        bail!("worker count must be at least 1");
    }
    opts.show_progress = opts.verbose;
    Ok(opts)
}

/// Build an atlas for `args.dir` and write it. Refuses to overwrite without `--force`.
pub fn handle_build(args: &BuildArgs) -> Result<()> {
    let start = Instant::now();
    let mut opts = setup_opts(args)?;

    let dest = resolve_output_path(&args.dir, opts.output.as_deref())?;
    check_destination(&dest, opts.force)?;
    opts.output = Some(dest.clone());
    debug!(
        "Build using directory: {}, output: {}",
        args.dir.display(),
        dest.display()
    );

    debug!("Building atlas for '{}'...", args.dir.display());
    let atlas = build_atlas_with_opts(&args.dir, &opts)?;
    write_atlas(&atlas, &dest)?;

    let elapsed = start.elapsed();
    let msg = if opts.verbose {
        format!(
            "Success: Atlas built with {} files in {:?} to '{}'",
            atlas.file_count(),
            elapsed,
            dest.display()
        )
    } else {
        format!(
            "Success: Atlas built in {:?} to '{}'",
            elapsed,
            dest.display()
        )
    };
    println!("{}", msg.green());
    Ok(())
}

/// Dispatch a parsed command line.
pub fn handle_run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Build(args) => handle_build(args),
        Commands::Search(_) => {
            setup_logging(false);
            bail!("search is not implemented yet")
        }
        Commands::Update(_) => {
            setup_logging(false);
            bail!("update is not implemented yet")
        }
    }
}
