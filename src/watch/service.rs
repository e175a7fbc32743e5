// src/watch/service.rs

//! Async shell around [`SubscriptionRegistry`].
//!
//! [`WatchService`] owns the registry, resolves subscription roots, and
//! carries out the registry's commands: one Tokio task per subscription
//! establishes the native subscription, drains its batches in order, and
//! releases it when asked.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::WatchSettings;
use crate::errors::{Result, WatchmuxError};
use crate::fs::{FileSystem, RealFileSystem};
use crate::source::{
    BoxFuture, EventSink, EventSource, NativeSubscription, NotifyEventSource, SourceMessage,
};
use crate::types::{FileChangeKind, RawEvent, SubscriptionId, WatchId};
use crate::watch::ancestors::resolve_root;
use crate::watch::dispatch::dispatch_batch;
use crate::watch::handle::WatchHandle;
use crate::watch::path_utils::{normalize_separators, parent_dir, trim_trailing_separators, PathMatcher};
use crate::watch::registry::{RegistryCommand, SubscriptionRegistry, WatchKind};

#[derive(Debug, Default)]
struct State {
    registry: SubscriptionRegistry,
    /// Release signal for each live subscription task.
    closers: HashMap<SubscriptionId, oneshot::Sender<()>>,
}

pub(crate) struct Shared {
    state: Mutex<State>,
    fs: Arc<dyn FileSystem>,
    source: Arc<dyn EventSource>,
    matcher: PathMatcher,
    project_markers: Vec<String>,
    runtime: Handle,
}

impl Shared {
    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dispose a watch. Unknown roots and watches are a no-op.
    pub(crate) fn dispose(&self, root: &str, watch_id: WatchId) {
        let mut state = self.lock_state();
        let removal = state.registry.remove_watch(root, watch_id);
        let closer = match &removal.command {
            Some(RegistryCommand::Release { root, id }) => {
                info!(%root, "closing subscription");
                state.closers.remove(id)
            }
            _ => None,
        };
        drop(state);

        if let Some(closer) = closer {
            // The task may already be gone if establishment failed.
            let _ = closer.send(());
        }
        // Dropping the watch may drop handles owned by its callback, which
        // re-enter `dispose`.
        drop(removal);
    }

    fn dispatch(&self, root: &str, id: SubscriptionId, events: &[RawEvent]) -> usize {
        debug!(%root, count = events.len(), "dispatching batch");
        dispatch_batch(&self.matcher, events, || {
            self.lock_state().registry.snapshot(root, id)
        })
    }
}

/// Multiplexes logical file and directory watches onto shared native
/// subscriptions.
///
/// Cloning is cheap and clones share one registry. Must be created from
/// within a Tokio runtime.
#[derive(Clone)]
pub struct WatchService {
    shared: Arc<Shared>,
}

impl fmt::Debug for WatchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchService")
            .field("matcher", &self.shared.matcher)
            .field("project_markers", &self.shared.project_markers)
            .field("subscriptions", &self.subscription_count())
            .finish_non_exhaustive()
    }
}

impl WatchService {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        source: Arc<dyn EventSource>,
        settings: WatchSettings,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| WatchmuxError::NoRuntime(e.to_string()))?;
        let case_sensitive = settings
            .case_sensitive
            .unwrap_or_else(|| fs.case_sensitive());

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::default()),
                fs,
                source,
                matcher: PathMatcher::new(case_sensitive),
                project_markers: settings.project_markers,
                runtime,
            }),
        })
    }

    /// Real filesystem and `notify`, with the given settings.
    pub fn native(settings: WatchSettings) -> Result<Self> {
        Self::new(
            Arc::new(RealFileSystem),
            Arc::new(NotifyEventSource::new()),
            settings,
        )
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.shared.matcher
    }

    /// Watch a single file. `callback` receives the watched path and the kind
    /// of change.
    pub fn watch_file<F>(&self, path: impl Into<String>, callback: F) -> Result<WatchHandle>
    where
        F: Fn(&str, FileChangeKind) + Send + Sync + 'static,
    {
        let path = path.into();
        debug!(%path, "watch_file");
        let lookup = root_key(parent_dir(&normalize_separators(&path)));
        self.register(
            &lookup,
            WatchKind::File {
                path,
                callback: Arc::new(callback),
            },
        )
    }

    /// Watch a directory for children being created or deleted, anywhere
    /// beneath it when `recursive` is set. `callback` receives the changed
    /// path.
    pub fn watch_directory<F>(
        &self,
        path: impl Into<String>,
        recursive: bool,
        callback: F,
    ) -> Result<WatchHandle>
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let path = path.into();
        debug!(%path, recursive, "watch_directory");
        let lookup = root_key(&path);
        self.register(
            &lookup,
            WatchKind::Directory {
                path,
                recursive,
                callback: Arc::new(callback),
            },
        )
    }

    pub fn subscription_count(&self) -> usize {
        self.shared.lock_state().registry.len()
    }

    /// Roots of all live subscriptions, sorted.
    pub fn roots(&self) -> Vec<String> {
        let state = self.shared.lock_state();
        let mut roots: Vec<String> = state.registry.roots().map(str::to_string).collect();
        roots.sort();
        roots
    }

    /// Number of watches depending on the subscription at `root`.
    pub fn watch_count(&self, root: &str) -> usize {
        self.shared
            .lock_state()
            .registry
            .get(root)
            .map_or(0, |s| s.watches().len())
    }

    fn register(&self, lookup: &str, kind: WatchKind) -> Result<WatchHandle> {
        let shared = &self.shared;
        let mut state = shared.lock_state();

        let root = resolve_root(
            lookup,
            |p| state.registry.contains_root(p),
            shared.fs.as_ref(),
            &shared.project_markers,
        )?;

        let registration = state.registry.add_watch(root, kind);
        let pending = match registration.command {
            Some(RegistryCommand::Establish { root, id }) => {
                let (close_tx, close_rx) = oneshot::channel();
                state.closers.insert(id, close_tx);
                Some((root, id, close_rx))
            }
            _ => None,
        };
        drop(state);

        // A dispose racing in here finds the closer already registered and
        // takes effect once establishment completes.
        if let Some((root, id, close_rx)) = pending {
            self.establish(root, id, close_rx);
        }

        Ok(WatchHandle::new(
            Arc::downgrade(shared),
            registration.root,
            registration.watch.id(),
        ))
    }

    /// Start the native subscription. Called without the state lock held,
    /// since `subscribe` is foreign code.
    fn establish(&self, root: String, id: SubscriptionId, close_rx: oneshot::Receiver<()>) {
        info!(%root, "subscribing");
        let (tx, rx) = mpsc::unbounded_channel();
        let establish = self.shared.source.subscribe(&root, EventSink::new(tx));

        self.shared.runtime.spawn(run_subscription(
            Arc::downgrade(&self.shared),
            root,
            id,
            establish,
            rx,
            close_rx,
        ));
    }
}

/// Registry key for a lookup path: separators normalized, trailing ones
/// dropped, case kept.
fn root_key(path: &str) -> String {
    trim_trailing_separators(&normalize_separators(path)).to_string()
}

/// Lifetime of one native subscription.
///
/// Nothing is dispatched before establishment completes. A release requested
/// while establishment is still pending takes effect right after it.
async fn run_subscription(
    shared: Weak<Shared>,
    root: String,
    id: SubscriptionId,
    establish: BoxFuture<'static, Result<Box<dyn NativeSubscription>>>,
    mut batches: mpsc::UnboundedReceiver<SourceMessage>,
    mut close_rx: oneshot::Receiver<()>,
) {
    let native = match establish.await {
        Ok(native) => native,
        Err(err) => {
            warn!(%root, error = %err, "failed to establish native subscription; watches stay silent");
            return;
        }
    };
    debug!(%root, ?id, "native subscription established");

    loop {
        tokio::select! {
            biased;

            _ = &mut close_rx => break,

            message = batches.recv() => match message {
                Some(SourceMessage::Events(events)) => {
                    let Some(service) = shared.upgrade() else { break };
                    service.dispatch(&root, id, &events);
                }
                Some(SourceMessage::Error(err)) => {
                    warn!(%root, error = %err, "native subscription reported an error");
                }
                None => {
                    debug!(%root, "native event stream ended");
                    let _ = (&mut close_rx).await;
                    break;
                }
            },
        }
    }

    if let Err(err) = native.unsubscribe().await {
        warn!(%root, error = %err, "failed to release native subscription");
    } else {
        debug!(%root, ?id, "native subscription released");
    }
}
