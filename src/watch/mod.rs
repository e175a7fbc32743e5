// src/watch/mod.rs

//! Watch multiplexing.
//!
//! This module is responsible for:
//! - Comparing paths the way the host filesystem does ([`path_utils`]).
//! - Choosing the root directory for a native subscription ([`ancestors`]).
//! - Reference counting subscriptions per root ([`registry`]).
//! - Routing raw event batches to matching watches ([`dispatch`]).
//! - Driving native subscriptions from Tokio ([`service`]).

pub mod ancestors;
pub mod dispatch;
pub mod handle;
pub mod path_utils;
pub mod registry;
pub mod service;

pub use ancestors::{resolve_root, DEFAULT_PROJECT_MARKER};
pub use handle::WatchHandle;
pub use path_utils::PathMatcher;
pub use registry::{SubscriptionRegistry, Watch, WatchKind};
pub use service::WatchService;
