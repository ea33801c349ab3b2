use notify::event::{ModifyKind, RenameMode};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, SystemTime};

const WATCHER_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartWatchEvent {
    Modified(PathBuf),
    Removed(PathBuf),
}

impl PartWatchEvent {
    pub fn path(&self) -> &Path {
        match self {
            PartWatchEvent::Modified(path) | PartWatchEvent::Removed(path) => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FsDelta {
    Created { path: PathBuf },
    Deleted { path: PathBuf },
    Renamed { from: PathBuf, to: PathBuf },
    Modified { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileFingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

#[derive(Default)]
struct DrainBuckets {
    removed: FxHashSet<PathBuf>,
    modified: FxHashSet<PathBuf>,
}

/// Watches individual part files.
///
/// notify loses single-file watches across atomic saves (write temp, rename
/// over), so the parent directories are watched instead and events are matched
/// back to parts by raw and canonical path.
pub struct PartWatcher {
    watcher: RecommendedWatcher,
    raw_event_rx: mpsc::Receiver<notify::Event>,
    watched_dirs: FxHashSet<PathBuf>,
    parts: FxHashSet<PathBuf>,
    part_keys: FxHashMap<PathBuf, FxHashSet<PathBuf>>,
    fingerprints: FxHashMap<PathBuf, FileFingerprint>,
}

impl PartWatcher {
    pub fn new() -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else { return };
                let _ = tx.send(event);
            },
            Config::default().with_poll_interval(WATCHER_POLL_INTERVAL),
        )?;
        Ok(Self {
            watcher,
            raw_event_rx: rx,
            watched_dirs: FxHashSet::default(),
            parts: FxHashSet::default(),
            part_keys: FxHashMap::default(),
            fingerprints: FxHashMap::default(),
        })
    }

    /// Replaces the whole watch set.
    pub fn watch_parts<'a, I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = &'a Path>,
    {
        self.clear();

        let mut dirs = FxHashSet::default();
        for path in paths {
            let path = path.to_path_buf();
            if !self.parts.insert(path.clone()) {
                continue;
            }
            for key in path_identity_keys(path.as_path()) {
                self.part_keys.entry(key).or_default().insert(path.clone());
            }
            if let Some(fingerprint) = file_fingerprint(path.as_path()) {
                self.fingerprints.insert(path.clone(), fingerprint);
            }
            if let Some(parent) = path.parent() {
                dirs.insert(parent.to_path_buf());
            }
        }

        for dir in dirs {
            match self.watcher.watch(&dir, RecursiveMode::NonRecursive) {
                Ok(()) => {
                    self.watched_dirs.insert(dir);
                }
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "cannot watch part directory");
                }
            }
        }
        tracing::debug!(
            parts = self.parts.len(),
            dirs = self.watched_dirs.len(),
            "part watch set rebuilt"
        );
    }

    pub fn clear(&mut self) {
        for dir in self.watched_dirs.drain() {
            let _ = self.watcher.unwatch(&dir);
        }
        self.parts.clear();
        self.part_keys.clear();
        self.fingerprints.clear();
        while self.raw_event_rx.try_recv().is_ok() {}
    }

    pub fn watched_parts(&self) -> &FxHashSet<PathBuf> {
        &self.parts
    }

    pub fn drain_events(&mut self) -> Vec<PartWatchEvent> {
        let mut buckets = DrainBuckets::default();

        while let Ok(event) = self.raw_event_rx.try_recv() {
            for delta in normalize_notify_event(event) {
                self.route_delta(delta, &mut buckets);
            }
        }

        let DrainBuckets { removed, modified } = buckets;
        let mut events = Vec::new();

        let mut removed = removed.into_iter().collect::<Vec<_>>();
        removed.sort_unstable();
        events.extend(removed.into_iter().map(PartWatchEvent::Removed));

        let mut modified = modified.into_iter().collect::<Vec<_>>();
        modified.sort_unstable();
        events.extend(modified.into_iter().map(PartWatchEvent::Modified));

        events
    }

    fn route_delta(&mut self, delta: FsDelta, buckets: &mut DrainBuckets) {
        match delta {
            FsDelta::Modified { path } => {
                for part in self.match_parts(path.as_path()) {
                    if self.refresh_fingerprint(part.as_path()) {
                        buckets.modified.insert(part);
                    }
                }
            }
            FsDelta::Created { path } => {
                for part in self.match_parts(path.as_path()) {
                    let _ = self.refresh_fingerprint(part.as_path());
                    buckets.removed.remove(&part);
                    buckets.modified.insert(part);
                }
            }
            FsDelta::Deleted { path } => {
                for part in self.match_parts(path.as_path()) {
                    self.fingerprints.remove(&part);
                    buckets.removed.insert(part);
                }
            }
            FsDelta::Renamed { from, to } => {
                for part in self.match_parts(from.as_path()) {
                    self.fingerprints.remove(&part);
                    buckets.removed.insert(part);
                }
                for part in self.match_parts(to.as_path()) {
                    let _ = self.refresh_fingerprint(part.as_path());
                    buckets.removed.remove(&part);
                    buckets.modified.insert(part);
                }
            }
        }
    }

    fn refresh_fingerprint(&mut self, path: &Path) -> bool {
        match file_fingerprint(path) {
            Some(new_fingerprint) => {
                if let Some(previous) = self
                    .fingerprints
                    .insert(path.to_path_buf(), new_fingerprint.clone())
                {
                    previous != new_fingerprint
                } else {
                    true
                }
            }
            None => self.fingerprints.remove(path).is_some(),
        }
    }

    fn match_parts(&self, path: &Path) -> FxHashSet<PathBuf> {
        let mut matched = FxHashSet::default();
        for key in path_identity_keys(path) {
            if let Some(parts) = self.part_keys.get(&key) {
                matched.extend(parts.iter().cloned());
            }
        }
        matched
    }
}

fn path_identity_keys(path: &Path) -> Vec<PathBuf> {
    let raw = path.to_path_buf();
    let mut keys = vec![raw.clone()];
    if let Ok(canonical) = raw.canonicalize() {
        if canonical != raw {
            keys.push(canonical);
        }
    }
    keys
}

fn file_fingerprint(path: &Path) -> Option<FileFingerprint> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }

    Some(FileFingerprint {
        len: metadata.len(),
        modified: metadata.modified().ok(),
    })
}

fn normalize_notify_event(event: notify::Event) -> Vec<FsDelta> {
    match event.kind {
        EventKind::Create(_) => event
            .paths
            .into_iter()
            .map(|path| FsDelta::Created { path })
            .collect(),
        EventKind::Remove(_) => event
            .paths
            .into_iter()
            .map(|path| FsDelta::Deleted { path })
            .collect(),
        EventKind::Modify(kind) => normalize_modify_event(kind, event.paths),
        _ => Vec::new(),
    }
}

fn normalize_modify_event(kind: ModifyKind, paths: Vec<PathBuf>) -> Vec<FsDelta> {
    match kind {
        ModifyKind::Name(RenameMode::Both) => {
            if paths.len() >= 2 {
                vec![FsDelta::Renamed {
                    from: paths[0].clone(),
                    to: paths[1].clone(),
                }]
            } else {
                paths
                    .into_iter()
                    .map(|path| FsDelta::Modified { path })
                    .collect()
            }
        }
        ModifyKind::Name(RenameMode::From) => paths
            .into_iter()
            .map(|path| FsDelta::Deleted { path })
            .collect(),
        ModifyKind::Name(RenameMode::To) => paths
            .into_iter()
            .map(|path| FsDelta::Created { path })
            .collect(),
        ModifyKind::Data(_)
        | ModifyKind::Any
        | ModifyKind::Other
        | ModifyKind::Metadata(_)
        | ModifyKind::Name(_) => paths
            .into_iter()
            .map(|path| FsDelta::Modified { path })
            .collect(),
    }
}

#[cfg(test)]
pub(crate) fn watcher_with_raw_channel() -> (PartWatcher, mpsc::Sender<notify::Event>) {
    let (tx, rx) = mpsc::channel();
    let watcher = RecommendedWatcher::new(
        |_| {},
        Config::default().with_poll_interval(WATCHER_POLL_INTERVAL),
    )
    .expect("create watcher");
    (
        PartWatcher {
            watcher,
            raw_event_rx: rx,
            watched_dirs: FxHashSet::default(),
            parts: FxHashSet::default(),
            part_keys: FxHashMap::default(),
            fingerprints: FxHashMap::default(),
        },
        tx,
    )
}
