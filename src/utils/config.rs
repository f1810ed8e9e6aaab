//! Application configuration constants.
//! Filter defaults, limits and package-derived names in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    ignore_filename: String,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                ignore_filename: format!(".{pkg}ignore"),
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Ignore file looked up at the indexed root (`.tcaignore`).
    pub fn ignore_filename(&self) -> &str {
        &self.ignore_filename
    }

    /// Optional settings file at the indexed root (`.tca.toml`). CLI only.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Filter policy ----

/// Default eligibility policy. Overridable through `.tca.toml` or flags.
pub struct DefaultFilter;

impl DefaultFilter {
    /// Included extensions, without the leading dot.
    pub const EXTENSIONS: &'static [&'static str] = &[
        "go", "js", "ts", "jsx", "tsx", "py", "java", "c", "cpp", "h", "html", "css", "json",
        "yaml", "md",
    ];

    /// Directory names pruned wherever they appear in a path.
    pub const EXCLUDED_DIRS: &'static [&'static str] = &[".git", "node_modules", "vendor"];
}

// ---- Extraction / pool ----

/// Files larger than this are skipped, never truncated (bytes). 10 MiB.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Trigram worker count. More workers trade memory for wall-clock time only.
pub const DEFAULT_WORKERS: usize = 4;

/// Capacity of the path channel and of the entry channel.
pub const CHANNEL_CAP: usize = 100;

// ---- Atlas ----

/// Schema version stamped into `metadata.version`.
pub const SCHEMA_VERSION: &str = "1.0";
