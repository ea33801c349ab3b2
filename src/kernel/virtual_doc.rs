//! 合并视图（虚拟文档）
//!
//! 以 `code-split:<原始文件绝对路径>` 为地址，内容始终是各分片当前内容按 `\n`
//! 直接拼接的结果（不做 trim）。分片文件变化时向订阅者发送变更事件。

use crate::kernel::services::adapters::file_watcher::{PartWatchEvent, PartWatcher};
use crate::kernel::split::{self, MetadataStore};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

pub const SCHEME: &str = "code-split";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombinedUri {
    original: PathBuf,
}

impl CombinedUri {
    pub fn new(original: impl Into<PathBuf>) -> Self {
        Self {
            original: original.into(),
        }
    }

    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Accepts `code-split:/abs/path` and `code-split:file:///abs/path`.
    pub fn parse(value: &str) -> Option<Self> {
        let rest = value.strip_prefix(SCHEME)?.strip_prefix(':')?;
        let path = rest.strip_prefix("file://").unwrap_or(rest);
        if path.is_empty() {
            return None;
        }
        Some(Self::new(path))
    }
}

impl std::fmt::Display for CombinedUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", SCHEME, self.original.display())
    }
}

/// A part opens the view of its owner; a registered original opens its own
/// view. Anything else is `NotSplit`.
pub fn view_uri(store: &MetadataStore, input: &Path) -> split::Result<CombinedUri> {
    let (original, _) = split::resolve(store, input)?;
    Ok(CombinedUri::new(original))
}

/// Receiving end of the provider's change events. Dropping it unsubscribes.
pub struct ChangeSubscription {
    rx: Receiver<CombinedUri>,
}

impl ChangeSubscription {
    pub fn try_recv(&self) -> Option<CombinedUri> {
        self.rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<CombinedUri> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn drain(&self) -> Vec<CombinedUri> {
        self.rx.try_iter().collect()
    }
}

pub struct CombinedDocumentProvider {
    watcher: Option<PartWatcher>,
    owners: FxHashMap<PathBuf, PathBuf>,
    listeners: Vec<Sender<CombinedUri>>,
    synced_generation: Option<u64>,
    disposed: bool,
}

impl CombinedDocumentProvider {
    pub fn new(store: &MetadataStore) -> Result<Self, notify::Error> {
        Ok(Self::with_watcher(PartWatcher::new()?, store))
    }

    pub(crate) fn with_watcher(watcher: PartWatcher, store: &MetadataStore) -> Self {
        let mut provider = Self {
            watcher: Some(watcher),
            owners: FxHashMap::default(),
            listeners: Vec::new(),
            synced_generation: None,
            disposed: false,
        };
        provider.rebuild_watches(store);
        provider
    }

    pub fn on_did_change(&mut self) -> ChangeSubscription {
        let (tx, rx) = mpsc::channel();
        if !self.disposed {
            self.listeners.push(tx);
        }
        ChangeSubscription { rx }
    }

    /// Empty content means the original is unknown or was never split.
    pub fn provide_content(&self, store: &MetadataStore, uri: &CombinedUri) -> String {
        match store.lookup_parts(uri.original()) {
            Some(parts) => read_combined_blocking(parts),
            None => String::new(),
        }
    }

    /// Rebuilds the watch set if the store changed since the last rebuild.
    pub fn sync_watches(&mut self, store: &MetadataStore) -> bool {
        if self.synced_generation == Some(store.generation()) {
            return false;
        }
        self.rebuild_watches(store);
        true
    }

    /// Drops every watch and re-creates one per part across all records.
    pub fn rebuild_watches(&mut self, store: &MetadataStore) {
        if self.disposed {
            return;
        }
        let Some(watcher) = self.watcher.as_mut() else {
            return;
        };

        self.owners.clear();
        for (original, record) in store.all_records() {
            for part in record.parts {
                if let Some(previous) = self.owners.insert(part.clone(), original.clone()) {
                    tracing::warn!(
                        part = %part.display(),
                        previous = %previous.display(),
                        owner = %original.display(),
                        "part registered under several originals"
                    );
                }
            }
        }
        watcher.watch_parts(self.owners.keys().map(PathBuf::as_path));
        self.synced_generation = Some(store.generation());
    }

    /// Drains file events and fires one change per affected original.
    pub fn poll_changes(&mut self) -> usize {
        let Some(watcher) = self.watcher.as_mut() else {
            return 0;
        };

        let mut changed = FxHashSet::default();
        for event in watcher.drain_events() {
            if let PartWatchEvent::Removed(path) = &event {
                tracing::debug!(part = %path.display(), "watched part removed");
            }
            if let Some(original) = self.owners.get(event.path()) {
                changed.insert(original.clone());
            }
        }

        let mut changed = changed.into_iter().collect::<Vec<_>>();
        changed.sort_unstable();
        let fired = changed.len();
        for original in changed {
            self.fire(CombinedUri::new(original));
        }
        fired
    }

    pub fn fire(&mut self, uri: CombinedUri) {
        self.listeners.retain(|tx| tx.send(uri.clone()).is_ok());
    }

    pub fn watched_parts(&self) -> usize {
        self.owners.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(mut watcher) = self.watcher.take() {
            watcher.clear();
        }
        self.owners.clear();
        self.listeners.clear();
        self.synced_generation = None;
        self.disposed = true;
    }
}

impl Drop for CombinedDocumentProvider {
    fn drop(&mut self) {
        self.dispose();
    }
}

pub fn join_raw<S: AsRef<str>>(contents: &[S]) -> String {
    contents
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn read_combined_blocking(parts: &[PathBuf]) -> String {
    let contents: Vec<String> = parts
        .iter()
        .map(|part| {
            std::fs::read_to_string(part).unwrap_or_else(|e| {
                tracing::warn!(part = %part.display(), error = %e, "part unreadable, showing it empty");
                String::new()
            })
        })
        .collect();
    join_raw(&contents)
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/virtual_doc.rs"]
mod tests;
