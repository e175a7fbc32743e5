// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `watchmux`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "watchmux",
    version,
    about = "Watch files and directories through shared native subscriptions.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML). Missing file means defaults.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// File to watch for content changes. May be repeated.
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<String>,

    /// Directory to watch for children being created or deleted. May be
    /// repeated.
    #[arg(long = "dir", value_name = "PATH")]
    pub dirs: Vec<String>,

    /// Report changes anywhere beneath each `--dir`, not only direct children.
    #[arg(long)]
    pub recursive: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WATCHMUX_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
