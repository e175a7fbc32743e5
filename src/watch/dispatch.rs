// src/watch/dispatch.rs

//! Routing raw event batches to the watches of one subscription.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::types::{FileChangeKind, RawEvent, RawEventKind};
use crate::watch::path_utils::{normalize_separators, parent_dir, PathMatcher};
use crate::watch::registry::{Watch, WatchKind};

/// Whether an event at `event_path` of `kind` is in scope for `watch`.
///
/// Directory watches only see structural changes (create/delete); content
/// updates are reported to file watches alone.
pub fn watch_matches(
    matcher: &PathMatcher,
    watch: &WatchKind,
    event_path: &str,
    kind: RawEventKind,
) -> bool {
    match watch {
        WatchKind::File { path, .. } => matcher.is_same_path(event_path, path),
        WatchKind::Directory {
            path, recursive, ..
        } => {
            kind.is_structural()
                && if *recursive {
                    matcher.contains(path, event_path)
                } else {
                    matcher.is_same_path(parent_dir(event_path), path)
                }
        }
    }
}

fn invoke(watch: &Watch, event_path: &str, kind: RawEventKind) {
    match watch.kind() {
        WatchKind::File { path, callback } => {
            let change = FileChangeKind::from(kind);
            debug!(watch = %path, ?change, "invoking file watch");
            callback(path, change);
        }
        WatchKind::Directory {
            path,
            recursive,
            callback,
        } => {
            debug!(watch = %path, recursive, changed = %event_path, "invoking directory watch");
            callback(event_path);
        }
    }
}

/// Dispatch one batch in delivery order and return the number of callbacks
/// invoked.
///
/// `current_watches` is called before every event and must return the
/// subscription's watch set at that moment, or `None` once the subscription
/// is gone. No lock may be held across the returned snapshot: callbacks are
/// free to register or dispose watches. Watches removed after the snapshot
/// was taken are skipped.
pub fn dispatch_batch<F>(matcher: &PathMatcher, events: &[RawEvent], mut current_watches: F) -> usize
where
    F: FnMut() -> Option<Vec<Arc<Watch>>>,
{
    let mut invoked = 0;

    for event in events {
        let watches = match current_watches() {
            Some(watches) if !watches.is_empty() => watches,
            _ => {
                trace!(remaining = events.len(), "no watches left; discarding batch");
                break;
            }
        };

        let event_path = normalize_separators(&event.path);
        for watch in &watches {
            if !watch.is_active() {
                continue;
            }
            if watch_matches(matcher, watch.kind(), &event_path, event.kind) {
                invoke(watch, &event_path, event.kind);
                invoked += 1;
            }
        }
    }

    invoked
}
