// src/lib.rs

//! Watch-subscription multiplexer.
//!
//! Many logical "watch this file" / "watch this directory" requests are
//! served by as few native filesystem subscriptions as possible: requests are
//! rooted at the nearest project directory, share one subscription per root,
//! and incoming events are routed back to exactly the watches whose scope
//! matches. See [`watch::WatchService`].

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod source;
pub mod types;
pub mod watch;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::watch::WatchService;

pub use crate::errors::WatchmuxError;
pub use crate::types::{FileChangeKind, RawEvent, RawEventKind};
pub use crate::watch::WatchHandle;

/// High-level entry point used by `main.rs`.
///
/// Registers every `--file` / `--dir` against the real filesystem, prints one
/// line per reported change, and closes all watches on Ctrl-C.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(&args.config)?;
    let service = WatchService::native(cfg.watch)?;

    let mut handles = Vec::with_capacity(args.files.len() + args.dirs.len());
    for path in args.files {
        handles.push(service.watch_file(path, |path, kind| {
            println!("[file] {kind} {path}");
        })?);
    }
    for path in args.dirs {
        let watched = path.clone();
        handles.push(service.watch_directory(path, args.recursive, move |changed| {
            println!("[dir {watched}] {changed}");
        })?);
    }

    if handles.is_empty() {
        info!("nothing to watch; pass --file or --dir");
        return Ok(());
    }
    info!(roots = ?service.roots(), watches = handles.len(), "watching");

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    for handle in &handles {
        handle.close();
    }
    Ok(())
}
