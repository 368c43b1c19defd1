//! The `workspace/didChangeWatchedFiles` notification.

use core::ops::BitOr;

use clasp_codec::{Composable, FieldValue, Fields, Reader, Rejection, TokenSink, object_value};

use crate::DocumentUri;

/// Client capabilities for file watching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DidChangeWatchedFilesClientCapabilities {
    /// Did change watched files notification supports dynamic registration.
    /// Note that the client may not support it even when this is set.
    pub dynamic_registration: Option<bool>,
}

impl Composable for DidChangeWatchedFilesClientCapabilities {
    fn declare(fields: &mut Fields<Self>) {
        fields.optional("dynamicRegistration", |c| &c.dynamic_registration, |c| &mut c.dynamic_registration);
    }
}

/// Which file system events a watcher is interested in, as bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchKind(u32);

impl WatchKind {
    /// Interested in create events.
    pub const CREATE: WatchKind = WatchKind(1);
    /// Interested in change events.
    pub const CHANGE: WatchKind = WatchKind(2);
    /// Interested in delete events.
    pub const DELETE: WatchKind = WatchKind(4);
    /// Every event; the default when a watcher sends no kind.
    pub const ALL: WatchKind = WatchKind(7);

    /// The raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every flag of `other` is set in `self`.
    pub const fn contains(self, other: WatchKind) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for WatchKind {
    fn default() -> Self {
        WatchKind::ALL
    }
}

impl BitOr for WatchKind {
    type Output = WatchKind;

    fn bitor(self, rhs: WatchKind) -> WatchKind {
        WatchKind(self.0 | rhs.0)
    }
}

impl FieldValue for WatchKind {
    fn reader() -> Reader<Self> {
        u32::reader().try_map(|bits| {
            if bits & !WatchKind::ALL.0 == 0 {
                Ok(WatchKind(bits))
            } else {
                Err(Rejection::expected("watch kind flags (1, 2 and 4)"))
            }
        })
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.integer(i64::from(self.0));
    }
}

/// One glob pattern to watch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSystemWatcher {
    /// The glob pattern to watch, like `**/*.{ts,js}`.
    pub glob_pattern: String,
    /// The kind of events of interest. Defaults to [`WatchKind::ALL`] when
    /// absent.
    pub kind: Option<WatchKind>,
}

impl FileSystemWatcher {
    /// The kinds this watcher reports, applying the default.
    pub fn effective_kind(&self) -> WatchKind {
        self.kind.unwrap_or_default()
    }
}

impl Composable for FileSystemWatcher {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("globPattern", |w| &w.glob_pattern, |w| &mut w.glob_pattern)
            .optional("kind", |w| &w.kind, |w| &mut w.kind);
    }
}

/// Describe options to be used when registering for file system change
/// events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DidChangeWatchedFilesRegistrationOptions {
    /// The watchers to register.
    pub watchers: Vec<FileSystemWatcher>,
}

impl Composable for DidChangeWatchedFilesRegistrationOptions {
    fn declare(fields: &mut Fields<Self>) {
        fields.required("watchers", |o| &o.watchers, |o| &mut o.watchers);
    }
}

/// The file event type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FileChangeType {
    /// The file got created.
    #[default]
    Created = 1,
    /// The file got changed.
    Changed = 2,
    /// The file got deleted.
    Deleted = 3,
}

impl FieldValue for FileChangeType {
    fn reader() -> Reader<Self> {
        i64::reader().try_map(|value| match value {
            1 => Ok(FileChangeType::Created),
            2 => Ok(FileChangeType::Changed),
            3 => Ok(FileChangeType::Deleted),
            _ => Err(Rejection::expected("file change type (1, 2 or 3)")),
        })
    }

    fn write(&self, sink: &mut dyn TokenSink) {
        sink.integer(*self as i64);
    }
}

/// An event describing a file change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileEvent {
    /// The file's URI.
    pub uri: DocumentUri,
    /// The change type.
    pub change: FileChangeType,
}

impl Composable for FileEvent {
    fn declare(fields: &mut Fields<Self>) {
        fields
            .required("uri", |e| &e.uri, |e| &mut e.uri)
            .required("type", |e| &e.change, |e| &mut e.change);
    }
}

/// Params of a `workspace/didChangeWatchedFiles` notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DidChangeWatchedFilesParams {
    /// The actual file events.
    pub changes: Vec<FileEvent>,
}

impl Composable for DidChangeWatchedFilesParams {
    fn declare(fields: &mut Fields<Self>) {
        fields.required("changes", |p| &p.changes, |p| &mut p.changes);
    }
}

object_value!(
    DidChangeWatchedFilesClientCapabilities,
    FileSystemWatcher,
    DidChangeWatchedFilesRegistrationOptions,
    FileEvent,
    DidChangeWatchedFilesParams,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_kinds_combine() {
        let kind = WatchKind::CREATE | WatchKind::DELETE;
        assert_eq!(kind.bits(), 5);
        assert!(kind.contains(WatchKind::DELETE));
        assert!(!kind.contains(WatchKind::CHANGE));
        assert!(WatchKind::ALL.contains(kind));
    }

    #[test]
    fn absent_kind_means_all_events() {
        let watcher = FileSystemWatcher {
            glob_pattern: "**/*.rs".into(),
            kind: None,
        };
        assert_eq!(watcher.effective_kind(), WatchKind::ALL);
    }
}
