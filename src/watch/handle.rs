// src/watch/handle.rs

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;

use crate::types::WatchId;
use crate::watch::service::Shared;

/// Handle for a registered watch.
///
/// Closing it (explicitly or by dropping it) removes the watch; the last
/// watch of a subscription releases the native subscription. Closing more
/// than once is a no-op.
pub struct WatchHandle {
    shared: Weak<Shared>,
    root: String,
    watch_id: WatchId,
    closed: AtomicBool,
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("root", &self.root)
            .field("watch_id", &self.watch_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl WatchHandle {
    pub(crate) fn new(shared: Weak<Shared>, root: String, watch_id: WatchId) -> Self {
        Self {
            shared,
            root,
            watch_id,
            closed: AtomicBool::new(false),
        }
    }

    /// Root directory of the subscription this watch shares.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn id(&self) -> WatchId {
        self.watch_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Remove the watch. Bookkeeping is done before this returns; releasing
    /// the native subscription happens in the background.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            shared.dispose(&self.root, self.watch_id);
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.close();
    }
}
