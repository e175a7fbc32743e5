// tests/registry_core.rs

use std::sync::Arc;

use watchmux::types::{FileChangeKind, SubscriptionId};
use watchmux::watch::registry::{RegistryCommand, SubscriptionRegistry, WatchKind};

fn dir_watch(path: &str) -> WatchKind {
    WatchKind::Directory {
        path: path.to_string(),
        recursive: false,
        callback: Arc::new(|_: &str| {}),
    }
}

fn file_watch(path: &str) -> WatchKind {
    WatchKind::File {
        path: path.to_string(),
        callback: Arc::new(|_: &str, _: FileChangeKind| {}),
    }
}

#[test]
fn first_watch_on_a_root_establishes_exactly_once() {
    let mut registry = SubscriptionRegistry::new();

    let first = registry.add_watch("/proj".to_string(), dir_watch("/proj/src"));
    let second = registry.add_watch("/proj".to_string(), file_watch("/proj/src/a.ts"));
    let third = registry.add_watch("/proj".to_string(), dir_watch("/proj/src"));

    assert!(matches!(
        first.command,
        Some(RegistryCommand::Establish { ref root, .. }) if root == "/proj"
    ));
    assert!(second.command.is_none());
    assert!(third.command.is_none());
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("/proj").unwrap().watches().len(), 3);

    // Same path, distinct watches.
    assert_ne!(first.watch.id(), third.watch.id());
}

#[test]
fn last_removal_releases_the_subscription() {
    let mut registry = SubscriptionRegistry::new();
    let a = registry.add_watch("/proj".to_string(), dir_watch("/proj/src"));
    let b = registry.add_watch("/proj".to_string(), file_watch("/proj/src/a.ts"));

    let removal = registry.remove_watch("/proj", a.watch.id());
    assert_eq!(removal.command, None);
    assert!(removal.watch.is_some_and(|w| w.id() == a.watch.id()));
    assert!(registry.contains_root("/proj"));
    assert!(!a.watch.is_active());
    assert!(b.watch.is_active());

    let released = registry.remove_watch("/proj", b.watch.id()).command;
    assert!(matches!(
        released,
        Some(RegistryCommand::Release { ref root, .. }) if root == "/proj"
    ));
    assert!(registry.is_empty());
}

#[test]
fn removal_is_idempotent() {
    let mut registry = SubscriptionRegistry::new();
    let a = registry.add_watch("/proj".to_string(), dir_watch("/proj"));

    assert!(registry.remove_watch("/proj", a.watch.id()).command.is_some());

    let again = registry.remove_watch("/proj", a.watch.id());
    assert!(again.command.is_none() && again.watch.is_none());
    let elsewhere = registry.remove_watch("/elsewhere", a.watch.id());
    assert!(elsewhere.command.is_none() && elsewhere.watch.is_none());
}

#[test]
fn stale_handle_does_not_touch_a_recreated_subscription() {
    let mut registry = SubscriptionRegistry::new();
    let old = registry.add_watch("/proj".to_string(), dir_watch("/proj"));
    registry.remove_watch("/proj", old.watch.id());

    let new = registry.add_watch("/proj".to_string(), dir_watch("/proj"));
    assert!(new.command.is_some());

    let stale = registry.remove_watch("/proj", old.watch.id());
    assert!(stale.command.is_none() && stale.watch.is_none());
    assert_eq!(registry.get("/proj").unwrap().watches().len(), 1);
}

#[test]
fn snapshot_is_scoped_to_one_subscription_generation() {
    let mut registry = SubscriptionRegistry::new();
    let first = registry.add_watch("/proj".to_string(), dir_watch("/proj"));
    let Some(RegistryCommand::Establish { id: first_id, .. }) = first.command else {
        panic!("expected Establish");
    };
    assert_eq!(registry.snapshot("/proj", first_id).unwrap().len(), 1);

    registry.remove_watch("/proj", first.watch.id());
    assert!(registry.snapshot("/proj", first_id).is_none());

    let second = registry.add_watch("/proj".to_string(), dir_watch("/proj"));
    let Some(RegistryCommand::Establish { id: second_id, .. }) = second.command else {
        panic!("expected Establish");
    };
    assert_ne!(first_id, second_id);
    assert!(registry.snapshot("/proj", first_id).is_none());
    assert!(registry.snapshot("/proj", SubscriptionId(u64::MAX)).is_none());
    assert_eq!(registry.snapshot("/proj", second_id).unwrap().len(), 1);
}
