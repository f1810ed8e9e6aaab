use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter, Record};
use std::io::Write;

use super::config::PackagePaths;

fn format_line(record: &Record) -> String {
    let name = PackagePaths::get().pkg_name();
    let level_str = match record.level() {
        Level::Warn => "WARN".yellow(),
        Level::Error => "ERROR".red(),
        _ => return format!("[{}] {}", name.cyan(), record.args()),
    };
    let target = record.target().to_string().white();
    format!("[{} {} {}] {}", name.cyan(), level_str, target, record.args())
}

/// Install the env_logger backend: dependencies at Warn, this crate at Info (Debug when
/// verbose). `RUST_LOG` is read first. Safe to call more than once.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(PackagePaths::get().pkg_name(), level)
        .format(|buf, record| writeln!(buf, "{}", format_line(record)))
        .try_init();
}
