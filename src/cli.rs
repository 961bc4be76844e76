//! Command-line arguments shared by the binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ConfigError};

#[derive(Debug, Parser)]
pub struct ServerArgs {
    /// TCP port to listen on (must be >= 1024)
    pub port: String,

    /// YAML file overriding the built-in settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ServerArgs {
    /// Built-in settings, overlaid by `--config`, with the port applied last.
    pub fn resolve(&self, base: Config) -> Result<Config, ConfigError> {
        Config::load(base, self.config.as_deref())?.with_port(&self.port)
    }
}

#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Absolute URL beginning with http://
    pub url: String,
}

/// Parses `std::env::args`, exiting with status 1 on bad arguments and 0 for
/// `--help`.
pub fn parse_or_exit<T: Parser>() -> T {
    T::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code)
    })
}
