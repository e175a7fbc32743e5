// src/watch/ancestors.rs

//! Choosing the directory a native subscription is rooted at.
//!
//! Subscriptions are rooted at project boundaries where possible, so the
//! number of native watchers grows with projects rather than with watched
//! files.

use std::path::Path;

use tracing::trace;

use crate::errors::{Result, WatchmuxError};
use crate::fs::FileSystem;
use crate::watch::path_utils::parent_dir;

/// Manifest file that marks a project root when none is configured.
pub const DEFAULT_PROJECT_MARKER: &str = "package.json";

/// Call `f` on `path` and each of its ancestors, nearest first, returning the
/// first `Some`. Stops once the parent of a directory is the directory itself.
pub fn for_each_ancestor<'a, T>(
    path: &'a str,
    mut f: impl FnMut(&'a str) -> Option<T>,
) -> Option<T> {
    let mut dir = path;
    loop {
        if let Some(found) = f(dir) {
            return Some(found);
        }
        let parent = parent_dir(dir);
        if parent == dir {
            return None;
        }
        dir = parent;
    }
}

/// Resolve the subscription root for `path`.
///
/// 1. `path` itself, when it is already a subscription root.
/// 2. The nearest ancestor containing one of `markers`.
/// 3. The nearest ancestor that exists as a directory.
pub fn resolve_root(
    path: &str,
    is_known_root: impl Fn(&str) -> bool,
    fs: &dyn FileSystem,
    markers: &[String],
) -> Result<String> {
    if is_known_root(path) {
        trace!(%path, "path is already a subscription root");
        return Ok(path.to_string());
    }

    let project_root = for_each_ancestor(path, |dir| {
        markers
            .iter()
            .any(|marker| fs.is_file(&Path::new(dir).join(marker)))
            .then_some(dir)
    });
    if let Some(dir) = project_root {
        trace!(%path, root = %dir, "resolved to project root");
        return Ok(dir.to_string());
    }

    let existing = for_each_ancestor(path, |dir| fs.is_dir(Path::new(dir)).then_some(dir));
    match existing {
        Some(dir) => {
            trace!(%path, root = %dir, "resolved to nearest existing directory");
            Ok(dir.to_string())
        }
        None => Err(WatchmuxError::Resolution(path.to_string())),
    }
}
