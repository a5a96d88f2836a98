//! CLI argument definitions for the Waypost server.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "WAYPOST_CONFIG";

/// Waypost - IP echo, mail notification relay and tag-to-URL redirects.
#[derive(Parser, Debug)]
#[command(name = "waypost", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > WAYPOST_CONFIG env var > ./config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.config_path_from(std::env::var(CONFIG_ENV).ok())
    }

    fn config_path_from(&self, env_value: Option<String>) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        match env_value {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => PathBuf::from("config.toml"),
        }
    }

    /// Resolve the log filter directive.
    ///
    /// Priority: --log-level flag > config file value > "info".
    /// `RUST_LOG`, when set, overrides all of these at subscriber init.
    pub fn resolve_log_level(&self, config_level: Option<&str>) -> String {
        if let Some(ref level) = self.log_level {
            return level.clone();
        }
        match config_level {
            Some(level) if !level.is_empty() => level.to_string(),
            _ => "info".to_string(),
        }
    }
}
