// src/source/notify_source.rs

//! [`EventSource`] backed by the cross-platform `notify` crate.

use std::fmt;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info};

use crate::errors::{Result, WatchmuxError};
use crate::source::{BoxFuture, EventSink, EventSource, NativeSubscription};
use crate::types::{RawEvent, RawEventKind};

/// Recursive `notify` watcher per subscription root.
#[derive(Debug, Clone, Default)]
pub struct NotifyEventSource;

impl NotifyEventSource {
    pub fn new() -> Self {
        Self
    }
}

/// Translate a `notify` event into raw events.
///
/// Renames are reported as a delete of the old path and a create of the new
/// one, decided by whether the path still exists.
pub fn raw_events_from_notify(event: &Event) -> Vec<RawEvent> {
    let kind_for = |path: &Path| match event.kind {
        EventKind::Create(_) => Some(RawEventKind::Create),
        EventKind::Remove(_) => Some(RawEventKind::Delete),
        EventKind::Modify(ModifyKind::Name(_)) => Some(if path.exists() {
            RawEventKind::Create
        } else {
            RawEventKind::Delete
        }),
        EventKind::Modify(_) => Some(RawEventKind::Update),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    };

    event
        .paths
        .iter()
        .filter_map(|path| {
            kind_for(path).map(|kind| RawEvent::new(path.to_string_lossy().into_owned(), kind))
        })
        .collect()
}

impl EventSource for NotifyEventSource {
    fn subscribe(
        &self,
        root: &str,
        sink: EventSink,
    ) -> BoxFuture<'static, Result<Box<dyn NativeSubscription>>> {
        let root = PathBuf::from(root);

        Box::pin(async move {
            let watch_root = root.clone();
            // Creating the watcher and registering the root walk the tree on
            // some backends, so keep it off the async workers.
            let watcher = tokio::task::spawn_blocking(move || -> Result<RecommendedWatcher> {
                let mut watcher = RecommendedWatcher::new(
                    move |res: notify::Result<Event>| match res {
                        Ok(event) => {
                            sink.send_events(raw_events_from_notify(&event));
                        }
                        Err(err) => {
                            sink.send_error(err);
                        }
                    },
                    Config::default(),
                )?;
                watcher.watch(&watch_root, RecursiveMode::Recursive)?;
                Ok(watcher)
            })
            .await
            .map_err(|e| WatchmuxError::Other(e.into()))??;

            info!("native watcher started on {:?}", root);
            Ok(Box::new(NotifySubscription { root, watcher }) as Box<dyn NativeSubscription>)
        })
    }
}

struct NotifySubscription {
    root: PathBuf,
    watcher: RecommendedWatcher,
}

impl fmt::Debug for NotifySubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifySubscription")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl NativeSubscription for NotifySubscription {
    fn unsubscribe(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move {
            let NotifySubscription { root, mut watcher } = *self;
            tokio::task::spawn_blocking(move || -> Result<()> {
                watcher.unwatch(&root)?;
                debug!("native watcher stopped on {:?}", root);
                Ok(())
            })
            .await
            .map_err(|e| WatchmuxError::Other(e.into()))?
        })
    }
}
