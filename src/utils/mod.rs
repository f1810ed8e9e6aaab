pub mod config;
pub mod logger;
pub mod tca_toml;
pub mod tempfiles;

pub use config::*;
pub use logger::setup_logging;
pub use tca_toml::{TcaToml, apply_file_to_opts, load_tca_toml};
pub use tempfiles::write_atomic;
