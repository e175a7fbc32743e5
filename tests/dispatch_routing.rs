// tests/dispatch_routing.rs

use std::sync::{Arc, Mutex};

use watchmux::types::{FileChangeKind, RawEvent, RawEventKind, WatchId};
use watchmux::watch::dispatch::{dispatch_batch, watch_matches};
use watchmux::watch::path_utils::PathMatcher;
use watchmux::watch::registry::{Watch, WatchKind};

type Log = Arc<Mutex<Vec<String>>>;

fn file_watch(id: u64, path: &str, log: &Log) -> Arc<Watch> {
    let log = Arc::clone(log);
    Arc::new(Watch::new(
        WatchId(id),
        WatchKind::File {
            path: path.to_string(),
            callback: Arc::new(move |p: &str, kind: FileChangeKind| log.lock().unwrap().push(format!("file {p} {kind}"))),
        },
    ))
}

fn dir_watch(id: u64, path: &str, recursive: bool, log: &Log) -> Arc<Watch> {
    let log = Arc::clone(log);
    Arc::new(Watch::new(
        WatchId(id),
        WatchKind::Directory {
            path: path.to_string(),
            recursive,
            callback: Arc::new(move |p: &str| log.lock().unwrap().push(format!("dir {p}"))),
        },
    ))
}

#[test]
fn file_watch_matches_only_its_own_path() {
    let matcher = PathMatcher::new(true);
    let log = Log::default();
    let watch = file_watch(1, "/proj/a.txt", &log);

    for kind in [RawEventKind::Create, RawEventKind::Update, RawEventKind::Delete] {
        assert!(watch_matches(&matcher, watch.kind(), "/proj/a.txt", kind));
        assert!(!watch_matches(&matcher, watch.kind(), "/proj/b.txt", kind));
        assert!(!watch_matches(&matcher, watch.kind(), "/proj/a.txt/x", kind));
    }
}

#[test]
fn file_watch_maps_each_kind() {
    let matcher = PathMatcher::new(true);
    let log = Log::default();
    let watches = vec![file_watch(1, "/proj/a.txt", &log)];

    let events = vec![
        RawEvent::create("/proj/a.txt"),
        RawEvent::update("/proj/a.txt"),
        RawEvent::delete("/proj/a.txt"),
        RawEvent::update("/proj/other.txt"),
    ];
    let invoked = dispatch_batch(&matcher, &events, || Some(watches.clone()));

    assert_eq!(invoked, 3);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            format!("file /proj/a.txt {}", FileChangeKind::Created),
            format!("file /proj/a.txt {}", FileChangeKind::Changed),
            format!("file /proj/a.txt {}", FileChangeKind::Deleted),
        ]
    );
}

#[test]
fn non_recursive_directory_sees_only_structural_changes_of_children() {
    let matcher = PathMatcher::new(true);
    let log = Log::default();
    let watches = vec![dir_watch(1, "/proj/src", false, &log)];

    let events = vec![
        RawEvent::create("/proj/src/a.ts"),
        RawEvent::update("/proj/src/a.ts"),
        RawEvent::delete("/proj/src/b.ts"),
        RawEvent::create("/proj/src/deep/c.ts"),
        RawEvent::create("/proj/lib/d.ts"),
    ];
    dispatch_batch(&matcher, &events, || Some(watches.clone()));

    assert_eq!(
        *log.lock().unwrap(),
        vec!["dir /proj/src/a.ts", "dir /proj/src/b.ts"]
    );
}

#[test]
fn recursive_directory_sees_structural_changes_at_any_depth() {
    let matcher = PathMatcher::new(true);
    let log = Log::default();
    let watches = vec![dir_watch(1, "/proj/src", true, &log)];

    let events = vec![
        RawEvent::create("/proj/src/x/y.ts"),
        RawEvent::update("/proj/src/x/y.ts"),
        RawEvent::delete("/proj/src/x"),
        RawEvent::create("/proj/srcs/z.ts"),
    ];
    dispatch_batch(&matcher, &events, || Some(watches.clone()));

    assert_eq!(
        *log.lock().unwrap(),
        vec!["dir /proj/src/x/y.ts", "dir /proj/src/x"]
    );
}

#[test]
fn event_separators_are_normalized_before_matching() {
    let matcher = PathMatcher::new(false);
    let log = Log::default();
    let watches = vec![
        file_watch(1, "C:/Proj/a.txt", &log),
        dir_watch(2, "C:/Proj", false, &log),
    ];

    let events = vec![RawEvent::create(r"C:\proj\A.TXT")];
    dispatch_batch(&matcher, &events, || Some(watches.clone()));

    assert_eq!(
        *log.lock().unwrap(),
        vec!["file C:/Proj/a.txt created", "dir C:/proj/A.TXT"]
    );
}

#[test]
fn empty_or_missing_watch_set_discards_the_batch() {
    let matcher = PathMatcher::new(true);
    let events = vec![RawEvent::create("/proj/a"), RawEvent::create("/proj/b")];

    let mut calls = 0;
    assert_eq!(
        dispatch_batch(&matcher, &events, || {
            calls += 1;
            Some(Vec::new())
        }),
        0
    );
    assert_eq!(calls, 1);

    assert_eq!(dispatch_batch(&matcher, &events, || None), 0);
}

#[test]
fn watches_deactivated_mid_batch_are_skipped() {
    use watchmux::watch::registry::{RegistryCommand, SubscriptionRegistry};

    let matcher = PathMatcher::new(true);
    let log = Log::default();
    let mut registry = SubscriptionRegistry::new();

    let first_log = Arc::clone(&log);
    let first = registry.add_watch(
        "/proj".to_string(),
        WatchKind::Directory {
            path: "/proj".to_string(),
            recursive: false,
            callback: Arc::new(move |p: &str| first_log.lock().unwrap().push(format!("first {p}"))),
        },
    );
    let second_kind = dir_watch(0, "/proj", false, &log).kind().clone();
    let second = registry.add_watch("/proj".to_string(), second_kind);
    let Some(RegistryCommand::Establish { id, .. }) = first.command else {
        panic!("expected Establish");
    };

    // The snapshot for the only event is taken before `second` goes away.
    let snapshot = registry.snapshot("/proj", id).unwrap();
    registry.remove_watch("/proj", second.watch.id());

    dispatch_batch(&matcher, &[RawEvent::create("/proj/a")], || Some(snapshot.clone()));
    assert_eq!(*log.lock().unwrap(), vec!["first /proj/a"]);
}
