//! Load `.tca.toml` from the indexed directory (CLI only). Lib callers pass [`AtlasOpts`](crate::AtlasOpts).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TcaToml {
    #[serde(default)]
    settings: BuildSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildSection {
    output: Option<String>,
    extensions: Option<Vec<String>>,
    exclude_dirs: Option<Vec<String>>,
    workers: Option<usize>,
    max_file_size: Option<u64>,
    follow_links: Option<bool>,
    parallel_walk: Option<bool>,
    strict: Option<bool>,
    verbose: Option<bool>,
    force: Option<bool>,
}

impl TcaToml {
    pub fn verbose(&self) -> Option<bool> {
        self.settings.verbose
    }
}

/// Parse settings text.
pub fn parse_tca_toml(text: &str) -> Result<TcaToml> {
    toml::from_str(text).context("parse settings")
}

/// Load `.tca.toml` from `dir`. `Ok(None)` when absent; an error when unreadable or malformed.
pub fn load_tca_toml(dir: &Path) -> Result<Option<TcaToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    parse_tca_toml(&text)
        .with_context(|| path.display().to_string())
        .map(Some)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file settings to opts (only fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &TcaToml, opts: &mut Opts) {
    let sec = &file.settings;
    if let Some(ref p) = sec.output {
        opts.output = Some(PathBuf::from(p));
    }
    apply_file_opt!(sec, opts, extensions => extensions);
    apply_file_opt!(sec, opts, exclude_dirs => exclude_dirs);
    apply_file_opt!(sec, opts, workers => num_workers);
    apply_file_opt!(sec, opts, max_file_size => max_file_size);
    apply_file_opt!(sec, opts, follow_links => follow_links);
    apply_file_opt!(sec, opts, parallel_walk => parallel_walk);
    apply_file_opt!(sec, opts, strict => strict);
    apply_file_opt!(sec, opts, verbose => verbose);
    apply_file_opt!(sec, opts, force => force);
}
