// src/watch/registry.rs

//! Pure subscription bookkeeping.
//!
//! [`SubscriptionRegistry`] maps root directories to their subscription and
//! the set of watches depending on it. It performs no IO and spawns nothing:
//! creating or releasing a native subscription is returned to the caller as
//! a [`RegistryCommand`], which the async shell in
//! [`service`](crate::watch::service) carries out.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::types::{FileChangeKind, SubscriptionId, WatchId};

pub type FileWatchCallback = Arc<dyn Fn(&str, FileChangeKind) + Send + Sync>;
pub type DirectoryWatchCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// What a watch is interested in.
#[derive(Clone)]
pub enum WatchKind {
    File {
        path: String,
        callback: FileWatchCallback,
    },
    Directory {
        path: String,
        recursive: bool,
        callback: DirectoryWatchCallback,
    },
}

impl WatchKind {
    pub fn path(&self) -> &str {
        match self {
            WatchKind::File { path, .. } | WatchKind::Directory { path, .. } => path,
        }
    }
}

impl fmt::Debug for WatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchKind::File { path, .. } => f
                .debug_struct("File")
                .field("path", path)
                .finish_non_exhaustive(),
            WatchKind::Directory {
                path, recursive, ..
            } => f
                .debug_struct("Directory")
                .field("path", path)
                .field("recursive", recursive)
                .finish_non_exhaustive(),
        }
    }
}

/// A single logical watch.
///
/// `active` is cleared when the watch is removed so that a dispatcher holding
/// an older snapshot of the watch set skips it.
#[derive(Debug)]
pub struct Watch {
    id: WatchId,
    kind: WatchKind,
    active: AtomicBool,
}

impl Watch {
    pub fn new(id: WatchId, kind: WatchKind) -> Self {
        Self {
            id,
            kind,
            active: AtomicBool::new(true),
        }
    }

    pub fn id(&self) -> WatchId {
        self.id
    }

    pub fn kind(&self) -> &WatchKind {
        &self.kind
    }

    pub fn path(&self) -> &str {
        self.kind.path()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }
}

/// One native subscription and the watches that depend on it.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    root: String,
    watches: Vec<Arc<Watch>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn watches(&self) -> &[Arc<Watch>] {
        &self.watches
    }
}

/// Side effect requested by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCommand {
    /// Begin establishing a native subscription at `root`.
    Establish { root: String, id: SubscriptionId },
    /// The subscription lost its last watch; release its native subscription
    /// once it has been established.
    Release { root: String, id: SubscriptionId },
}

/// Result of adding a watch.
#[derive(Debug)]
pub struct Registration {
    pub watch: Arc<Watch>,
    pub root: String,
    pub command: Option<RegistryCommand>,
}

/// Result of [`SubscriptionRegistry::remove_watch`].
#[derive(Debug, Default)]
pub struct Removal {
    /// The watch taken out of its subscription, already deactivated.
    pub watch: Option<Arc<Watch>>,
    /// `Release` when the subscription lost its last watch.
    pub command: Option<RegistryCommand>,
}

#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<String, Subscription>,
    next_watch_id: u64,
    next_subscription_id: u64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_root(&self, root: &str) -> bool {
        self.subscriptions.contains_key(root)
    }

    pub fn get(&self, root: &str) -> Option<&Subscription> {
        self.subscriptions.get(root)
    }

    pub fn roots(&self) -> impl Iterator<Item = &str> {
        self.subscriptions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Add a watch under `root`, creating the subscription if needed.
    pub fn add_watch(&mut self, root: String, kind: WatchKind) -> Registration {
        self.next_watch_id += 1;
        let watch = Arc::new(Watch::new(WatchId(self.next_watch_id), kind));

        let next_subscription_id = &mut self.next_subscription_id;
        let mut command = None;
        let subscription = self
            .subscriptions
            .entry(root.clone())
            .or_insert_with(|| {
                *next_subscription_id += 1;
                let id = SubscriptionId(*next_subscription_id);
                debug!(%root, ?id, "creating subscription");
                command = Some(RegistryCommand::Establish {
                    root: root.clone(),
                    id,
                });
                Subscription {
                    id,
                    root: root.clone(),
                    watches: Vec::new(),
                }
            });
        subscription.watches.push(Arc::clone(&watch));

        Registration {
            watch,
            root,
            command,
        }
    }

    /// Remove a watch. Unknown roots and watches are ignored, which makes
    /// disposal idempotent.
    ///
    /// The removed watch is handed back rather than dropped here: its
    /// callback may own other handles whose drop re-enters the caller.
    pub fn remove_watch(&mut self, root: &str, watch_id: WatchId) -> Removal {
        let Some(subscription) = self.subscriptions.get_mut(root) else {
            return Removal::default();
        };
        let Some(index) = subscription
            .watches
            .iter()
            .position(|w| w.id() == watch_id)
        else {
            return Removal::default();
        };
        let removed = subscription.watches.swap_remove(index);
        removed.deactivate();

        let mut removal = Removal {
            watch: Some(removed),
            command: None,
        };
        if !subscription.watches.is_empty() {
            return removal;
        }

        if let Some(subscription) = self.subscriptions.remove(root) {
            debug!(%root, id = ?subscription.id, "subscription has no watches left");
            removal.command = Some(RegistryCommand::Release {
                root: subscription.root,
                id: subscription.id,
            });
        }
        removal
    }

    /// Current watches of the subscription `id` at `root`.
    ///
    /// `None` once that subscription is gone, even if a newer one now exists
    /// at the same root.
    pub fn snapshot(&self, root: &str, id: SubscriptionId) -> Option<Vec<Arc<Watch>>> {
        self.subscriptions
            .get(root)
            .filter(|s| s.id == id)
            .map(|s| s.watches.clone())
    }
}
