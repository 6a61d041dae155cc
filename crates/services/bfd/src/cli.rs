//! Command-line interface for the bookfinder service.

use std::path::PathBuf;

use clap::Parser;

/// Configuration file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "bookfinder.toml";

/// Command-line interface for the bookfinder service.
#[derive(Parser, Debug)]
#[command(name = "bfd")]
#[command(about = "Bookfinder - account and authentication service")]
pub struct Cli {
    /// Path to the configuration file (defaults to ./bookfinder.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The configuration file to load, if any.
    ///
    /// An explicit `--config` must exist; the default file is optional.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        })
    }
}
