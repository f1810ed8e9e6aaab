//! Eligibility policy: included extensions, pruned directory names, root ignore patterns.
//!
//! A [`FilterConfig`] is built once per build and shared read-only (behind an `Arc`) by the
//! count pass, the feed pass and anything else that needs to decide eligibility.

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use log::{debug, warn};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Component, Path};

use crate::Opts;
use crate::engine::tools::{extension_of, normalize_extension};
use crate::utils::config::{DefaultFilter, PackagePaths};

/// Rewrite a plain shell pattern (`*`, `?`, `[...]`, `[^...]`, `\` escapes) into globset syntax.
/// Braces are literal, and a leading `!` in a class is a literal `!`, not negation.
/// An unterminated class is passed through and fails to compile.
fn to_glob_syntax(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            '[' => {
                let rest: String = chars.clone().collect();
                let Some(end) = rest.find(']') else {
                    out.push('[');
                    continue;
                };
                let body = &rest[..end];
                for _ in 0..=body.chars().count() {
                    chars.next();
                }
                let (negate, body) = match body.strip_prefix('^') {
                    Some(b) => ("^", b),
                    None => ("", body),
                };
                match body.strip_prefix('!') {
                    Some("") if negate.is_empty() => out.push_str("\\!"),
                    Some(tail) => {
                        out.push('[');
                        out.push_str(negate);
                        out.push_str(tail);
                        out.push_str("!]");
                    }
                    None => {
                        out.push('[');
                        out.push_str(negate);
                        out.push_str(body);
                        out.push(']');
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Glob patterns from the root ignore file, matched against base names only.
#[derive(Clone, Debug)]
pub struct IgnorePatterns {
    patterns: Vec<String>,
    set: GlobSet,
}

impl Default for IgnorePatterns {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

impl IgnorePatterns {
    /// Parse ignore-file text: one pattern per line, blank and `#` lines skipped, lines trimmed.
    /// A pattern that fails to compile is kept in [`Self::patterns`] but matches nothing.
    pub fn parse(text: &str) -> Self {
        let patterns: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(String::from)
            .collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            match GlobBuilder::new(&to_glob_syntax(pattern))
                .literal_separator(true)
                .backslash_escape(true)
                .build()
            {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => debug!("Ignoring invalid pattern {:?}: {}", pattern, e),
            }
        }
        let set = builder.build().unwrap_or_else(|e| {
            debug!("Failed to build ignore set: {}", e);
            GlobSet::empty()
        });
        Self { patterns, set }
    }

    /// Load the ignore file at `root`. Missing file is not an error (empty set);
    /// a present but unreadable file is.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(PackagePaths::get().ignore_filename());
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Self::parse(&String::from_utf8_lossy(&bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True if the base name matches any pattern.
    pub fn is_match(&self, name: &str) -> bool {
        !self.set.is_empty() && self.set.is_match(name)
    }
}

/// Immutable eligibility policy for one build.
#[derive(Clone, Debug)]
pub struct FilterConfig {
    included_extensions: HashSet<String>,
    excluded_dirs: HashSet<String>,
    ignore: IgnorePatterns,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(
            DefaultFilter::EXTENSIONS.iter().copied(),
            DefaultFilter::EXCLUDED_DIRS.iter().copied(),
            IgnorePatterns::default(),
        )
    }
}

impl FilterConfig {
    pub fn new<E, D>(extensions: E, excluded_dirs: D, ignore: IgnorePatterns) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        Self {
            included_extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
            excluded_dirs: excluded_dirs
                .into_iter()
                .map(|d| d.as_ref().to_string())
                .collect(),
            ignore,
        }
    }

    /// Defaults overlaid with `opts`, plus the ignore file at `root` (best effort: a read
    /// failure is only reported when verbose and leaves the pattern set empty).
    pub fn from_opts(root: &Path, opts: &Opts) -> Self {
        let ignore = IgnorePatterns::load(root).unwrap_or_else(|e| {
            if opts.verbose {
                warn!("failed to load {}: {:#}", PackagePaths::get().ignore_filename(), e);
            }
            IgnorePatterns::default()
        });
        if !ignore.is_empty() {
            debug!("Loaded {} ignore patterns", ignore.patterns().len());
        }

        let extensions: Vec<&str> = if opts.extensions.is_empty() {
            DefaultFilter::EXTENSIONS.to_vec()
        } else {
            opts.extensions.iter().map(String::as_str).collect()
        };
        let excluded = DefaultFilter::EXCLUDED_DIRS
            .iter()
            .copied()
            .chain(opts.exclude_dirs.iter().map(String::as_str));

        Self::new(extensions, excluded, ignore)
    }

    pub fn ignore_patterns(&self) -> &IgnorePatterns {
        &self.ignore
    }

    pub fn includes_extension(&self, ext: &str) -> bool {
        self.included_extensions.contains(ext)
    }

    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }

    /// Decide whether a discovered file should be indexed. In order: any directory segment
    /// excluded, base name matches an ignore pattern, extension not included.
    pub fn should_index(&self, path: &Path) -> bool {
        if let Some(parent) = path.parent() {
            let excluded = parent.components().any(|c| match c {
                Component::Normal(seg) => seg.to_str().is_some_and(|s| self.is_excluded_dir(s)),
                _ => false,
            });
            if excluded {
                return false;
            }
        }

        let name = match path.file_name() {
            Some(n) => n.to_string_lossy(),
            None => return false,
        };
        if self.ignore.is_match(&name) {
            return false;
        }

        extension_of(&name).is_some_and(|ext| self.includes_extension(ext))
    }
}

/// Free-function form of [`FilterConfig::should_index`].
pub fn should_index(path: &Path, config: &FilterConfig) -> bool {
    config.should_index(path)
}
