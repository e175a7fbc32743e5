use std::fmt;

/// Kind of a raw event as reported by the native event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawEventKind {
    Create,
    Update,
    Delete,
}

impl RawEventKind {
    /// Create and delete change the child set of a directory; updates do not.
    pub fn is_structural(self) -> bool {
        matches!(self, RawEventKind::Create | RawEventKind::Delete)
    }
}

/// A single low-level filesystem event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: String,
    pub kind: RawEventKind,
}

impl RawEvent {
    pub fn new(path: impl Into<String>, kind: RawEventKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn create(path: impl Into<String>) -> Self {
        Self::new(path, RawEventKind::Create)
    }

    pub fn update(path: impl Into<String>) -> Self {
        Self::new(path, RawEventKind::Update)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(path, RawEventKind::Delete)
    }
}

/// Change kind delivered to file watch callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileChangeKind {
    Created,
    Changed,
    Deleted,
}

impl From<RawEventKind> for FileChangeKind {
    fn from(kind: RawEventKind) -> Self {
        match kind {
            RawEventKind::Create => FileChangeKind::Created,
            RawEventKind::Update => FileChangeKind::Changed,
            RawEventKind::Delete => FileChangeKind::Deleted,
        }
    }
}

impl fmt::Display for FileChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileChangeKind::Created => "created",
            FileChangeKind::Changed => "changed",
            FileChangeKind::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// Identity of a single logical watch. Two watches on the same path are
/// distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatchId(pub u64);

/// Identity of one underlying subscription. A root that is released and
/// later watched again gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);
