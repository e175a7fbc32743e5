// src/source/mod.rs

//! Pluggable native event source abstraction.
//!
//! The watch service talks to an [`EventSource`] instead of `notify`
//! directly. Production code uses [`NotifyEventSource`]; tests can provide an
//! implementation that records subscribe/unsubscribe calls and emits batches
//! on demand.

use std::fmt::{self, Debug};
use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::errors::Result;
use crate::types::RawEvent;

pub mod notify_source;

pub use notify_source::NotifyEventSource;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Message delivered by a native subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMessage {
    Events(Vec<RawEvent>),
    Error(String),
}

/// Where a native subscription delivers its batches.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<SourceMessage>,
}

impl Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl EventSink {
    pub fn new(tx: mpsc::UnboundedSender<SourceMessage>) -> Self {
        Self { tx }
    }

    /// Deliver a batch. Returns `false` once the receiving side is gone.
    pub fn send_events(&self, events: Vec<RawEvent>) -> bool {
        if events.is_empty() {
            return !self.tx.is_closed();
        }
        self.tx.send(SourceMessage::Events(events)).is_ok()
    }

    pub fn send_error(&self, error: impl fmt::Display) -> bool {
        self.tx.send(SourceMessage::Error(error.to_string())).is_ok()
    }

    pub fn same_channel(&self, other: &EventSink) -> bool {
        self.tx.same_channel(&other.tx)
    }
}

/// An established native subscription.
pub trait NativeSubscription: Send + Debug {
    /// Release the subscription. Called at most once.
    fn unsubscribe(self: Box<Self>) -> BoxFuture<'static, Result<()>>;
}

/// Trait abstracting the native filesystem event source.
pub trait EventSource: Send + Sync + Debug {
    /// Start a subscription covering `root` and everything beneath it.
    ///
    /// The returned future completes once the subscription is established;
    /// batches are delivered through `sink` from then on.
    fn subscribe(
        &self,
        root: &str,
        sink: EventSink,
    ) -> BoxFuture<'static, Result<Box<dyn NativeSubscription>>>;
}
