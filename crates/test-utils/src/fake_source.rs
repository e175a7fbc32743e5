use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use watchmux::errors::{Result, WatchmuxError};
use watchmux::source::{BoxFuture, EventSink, EventSource, NativeSubscription};
use watchmux::types::RawEvent;

#[derive(Debug, Default)]
struct FakeState {
    /// Established subscriptions by root.
    sinks: HashMap<String, EventSink>,
    subscribes: Vec<String>,
    unsubscribes: Vec<String>,
    failing_roots: HashSet<String>,
}

#[derive(Debug, Default)]
struct FakeInner {
    state: Mutex<FakeState>,
    changed: Notify,
}

/// An event source that:
/// - records every subscribe/unsubscribe call
/// - establishes subscriptions immediately (or fails for chosen roots)
/// - lets tests push batches to an established root.
#[derive(Debug, Clone, Default)]
pub struct FakeEventSource {
    inner: Arc<FakeInner>,
}

impl FakeEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subscriptions at `root` fail to establish.
    pub fn fail_root(&self, root: &str) {
        self.inner
            .state
            .lock()
            .unwrap()
            .failing_roots
            .insert(root.to_string());
    }

    pub fn subscribe_calls(&self) -> Vec<String> {
        self.inner.state.lock().unwrap().subscribes.clone()
    }

    pub fn unsubscribe_calls(&self) -> Vec<String> {
        self.inner.state.lock().unwrap().unsubscribes.clone()
    }

    pub fn subscribe_count(&self, root: &str) -> usize {
        self.subscribe_calls().iter().filter(|r| *r == root).count()
    }

    pub fn unsubscribe_count(&self, root: &str) -> usize {
        self.unsubscribe_calls().iter().filter(|r| *r == root).count()
    }

    /// Deliver a batch at `root`, waiting for the subscription there to be
    /// established first.
    pub async fn emit(&self, root: &str, events: Vec<RawEvent>) {
        let sink = self.established(root).await;
        assert!(sink.send_events(events), "subscription at {root} is no longer consumed");
    }

    /// Report a source error at `root`.
    pub async fn emit_error(&self, root: &str, message: &str) {
        let sink = self.established(root).await;
        sink.send_error(message);
    }

    /// Wait until `root` has seen at least `count` unsubscribe calls.
    pub async fn wait_for_unsubscribes(&self, root: &str, count: usize) {
        loop {
            let notified = self.inner.changed.notified();
            if self.unsubscribe_count(root) >= count {
                return;
            }
            notified.await;
        }
    }

    async fn established(&self, root: &str) -> EventSink {
        loop {
            let notified = self.inner.changed.notified();
            if let Some(sink) = self.inner.state.lock().unwrap().sinks.get(root) {
                return sink.clone();
            }
            notified.await;
        }
    }
}

impl EventSource for FakeEventSource {
    fn subscribe(
        &self,
        root: &str,
        sink: EventSink,
    ) -> BoxFuture<'static, Result<Box<dyn NativeSubscription>>> {
        let root = root.to_string();
        let fails = {
            let mut state = self.inner.state.lock().unwrap();
            state.subscribes.push(root.clone());
            state.failing_roots.contains(&root)
        };
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            if fails {
                return Err(WatchmuxError::Other(anyhow::anyhow!(
                    "fake subscribe failure at {root}"
                )));
            }
            inner
                .state
                .lock()
                .unwrap()
                .sinks
                .insert(root.clone(), sink.clone());
            inner.changed.notify_waiters();
            Ok(Box::new(FakeSubscription { root, sink, inner }) as Box<dyn NativeSubscription>)
        })
    }
}

#[derive(Debug)]
struct FakeSubscription {
    root: String,
    sink: EventSink,
    inner: Arc<FakeInner>,
}

impl NativeSubscription for FakeSubscription {
    fn unsubscribe(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
        Box::pin(async move {
            {
                let mut state = self.inner.state.lock().unwrap();
                if state
                    .sinks
                    .get(&self.root)
                    .is_some_and(|s| s.same_channel(&self.sink))
                {
                    state.sinks.remove(&self.root);
                }
                state.unsubscribes.push(self.root.clone());
            }
            self.inner.changed.notify_waiters();
            Ok(())
        })
    }
}
