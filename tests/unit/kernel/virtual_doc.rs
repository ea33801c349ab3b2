use super::*;
use crate::kernel::services::adapters::file_watcher::watcher_with_raw_channel;
use crate::kernel::split::Splitter;
use notify::event::{DataChange, ModifyKind};
use notify::EventKind;
use tempfile::tempdir;

fn content_event(path: &Path) -> notify::Event {
    notify::Event {
        kind: EventKind::Modify(ModifyKind::Data(DataChange::Content)),
        paths: vec![path.to_path_buf()],
        attrs: Default::default(),
    }
}

fn split_fixture(dir: &Path, name: &str, text: &str) -> (PathBuf, Vec<PathBuf>) {
    let original = dir.join(name);
    let mut store = MetadataStore::load(dir);
    let outcome = Splitter::new(1)
        .unwrap()
        .split(&mut store, &original, text)
        .unwrap();
    (original, outcome.parts)
}

#[test]
fn test_uri_roundtrip_and_file_scheme() {
    let uri = CombinedUri::new("/work/game.py");
    assert_eq!(uri.to_string(), "code-split:/work/game.py");
    assert_eq!(CombinedUri::parse("code-split:/work/game.py"), Some(uri.clone()));
    assert_eq!(CombinedUri::parse("code-split:file:///work/game.py"), Some(uri));
    assert_eq!(CombinedUri::parse("file:///work/game.py"), None);
    assert_eq!(CombinedUri::parse("code-split:"), None);
}

#[test]
fn test_content_is_raw_join_of_parts() {
    let dir = tempdir().unwrap();
    let text = "  a  \n\nb\n";
    let (original, _) = split_fixture(dir.path(), "game.py", text);
    let store = MetadataStore::load(dir.path());

    let (watcher, _tx) = watcher_with_raw_channel();
    let provider = CombinedDocumentProvider::with_watcher(watcher, &store);

    assert_eq!(provider.provide_content(&store, &CombinedUri::new(original)), text);
}

#[test]
fn test_unknown_original_yields_empty_content() {
    let dir = tempdir().unwrap();
    let store = MetadataStore::load(dir.path());
    let (watcher, _tx) = watcher_with_raw_channel();
    let provider = CombinedDocumentProvider::with_watcher(watcher, &store);

    let uri = CombinedUri::new(dir.path().join("never.py"));
    assert_eq!(provider.provide_content(&store, &uri), "");
}

#[test]
fn test_unreadable_part_degrades_to_empty() {
    let dir = tempdir().unwrap();
    let (original, parts) = split_fixture(dir.path(), "game.py", "a\nb\nc");
    std::fs::remove_file(&parts[1]).unwrap();
    let store = MetadataStore::load(dir.path());

    let (watcher, _tx) = watcher_with_raw_channel();
    let provider = CombinedDocumentProvider::with_watcher(watcher, &store);

    assert_eq!(provider.provide_content(&store, &CombinedUri::new(original)), "a\n\nc");
}

#[test]
fn test_part_change_fires_for_owning_original() {
    let dir = tempdir().unwrap();
    let (original, parts) = split_fixture(dir.path(), "game.py", "a\nb");
    let store = MetadataStore::load(dir.path());

    let (watcher, tx) = watcher_with_raw_channel();
    let mut provider = CombinedDocumentProvider::with_watcher(watcher, &store);
    let subscription = provider.on_did_change();
    assert_eq!(provider.watched_parts(), 2);

    std::fs::write(&parts[0], "a, edited").unwrap();
    tx.send(content_event(&parts[0])).unwrap();
    std::fs::write(&parts[1], "b, edited").unwrap();
    tx.send(content_event(&parts[1])).unwrap();

    assert_eq!(provider.poll_changes(), 1);
    assert_eq!(subscription.drain(), vec![CombinedUri::new(original.clone())]);
    assert_eq!(
        provider.provide_content(&store, &CombinedUri::new(original)),
        "a, edited\nb, edited"
    );
}

#[test]
fn test_every_subscriber_is_notified() {
    let dir = tempdir().unwrap();
    let (original, _) = split_fixture(dir.path(), "game.py", "a");
    let store = MetadataStore::load(dir.path());

    let (watcher, _tx) = watcher_with_raw_channel();
    let mut provider = CombinedDocumentProvider::with_watcher(watcher, &store);
    let first = provider.on_did_change();
    let second = provider.on_did_change();
    drop(provider.on_did_change());

    provider.fire(CombinedUri::new(original.clone()));

    assert_eq!(first.try_recv(), Some(CombinedUri::new(original.clone())));
    assert_eq!(second.try_recv(), Some(CombinedUri::new(original)));
}

#[test]
fn test_sync_watches_rebuilds_after_new_split() {
    let dir = tempdir().unwrap();
    let mut store = MetadataStore::load(dir.path());

    let (watcher, _tx) = watcher_with_raw_channel();
    let mut provider = CombinedDocumentProvider::with_watcher(watcher, &store);
    assert_eq!(provider.watched_parts(), 0);
    assert!(!provider.sync_watches(&store));

    let original = dir.path().join("game.py");
    Splitter::new(1)
        .unwrap()
        .split(&mut store, &original, "a\nb\nc")
        .unwrap();

    assert!(provider.sync_watches(&store));
    assert_eq!(provider.watched_parts(), 3);
    assert!(!provider.sync_watches(&store));
}

#[test]
fn test_dispose_is_idempotent_and_stops_events() {
    let dir = tempdir().unwrap();
    let (original, parts) = split_fixture(dir.path(), "game.py", "a\nb");
    let store = MetadataStore::load(dir.path());

    let (watcher, tx) = watcher_with_raw_channel();
    let mut provider = CombinedDocumentProvider::with_watcher(watcher, &store);
    let subscription = provider.on_did_change();

    provider.dispose();
    provider.dispose();
    assert!(provider.is_disposed());
    assert_eq!(provider.watched_parts(), 0);

    let _ = tx.send(content_event(&parts[0]));
    assert_eq!(provider.poll_changes(), 0);
    provider.fire(CombinedUri::new(original));
    assert!(subscription.try_recv().is_none());
}

#[test]
fn test_view_uri_from_part_or_original() {
    let dir = tempdir().unwrap();
    let (original, parts) = split_fixture(dir.path(), "game.py", "a\nb");
    let store = MetadataStore::load(dir.path());

    assert_eq!(view_uri(&store, &parts[1]).unwrap(), CombinedUri::new(&original));
    assert_eq!(view_uri(&store, &original).unwrap(), CombinedUri::new(&original));

    let stray = dir.path().join("notes.txt");
    assert_eq!(
        view_uri(&store, &stray),
        Err(crate::kernel::split::SplitError::NotSplit(stray.clone()))
    );
}
