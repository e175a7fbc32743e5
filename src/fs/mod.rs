// src/fs/mod.rs

use std::fmt::Debug;
use std::path::Path;

pub mod mock;

/// Filesystem metadata oracle used for root resolution and path comparison.
///
/// Queries are synchronous and must not have side effects.
pub trait FileSystem: Send + Sync + Debug {
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether file names differing only in case name different files.
    fn case_sensitive(&self) -> bool;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn case_sensitive(&self) -> bool {
        // Default volumes on Windows and macOS are case-insensitive.
        !cfg!(any(windows, target_os = "macos"))
    }
}
