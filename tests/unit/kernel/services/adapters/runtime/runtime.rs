use super::*;
use std::sync::mpsc;
use std::time::Duration;
use tempfile::tempdir;

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn load_combined_degrades_missing_parts() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("game_p01.part");
    let second = dir.path().join("game_p02.part");
    let third = dir.path().join("game_p03.part");
    std::fs::write(&first, "one\n").unwrap();
    std::fs::write(&third, "three").unwrap();

    let (tx, rx) = mpsc::channel();
    let runtime = AsyncRuntime::new(tx).unwrap();
    let uri = CombinedUri::new(dir.path().join("game.py"));
    runtime.load_combined(uri.clone(), vec![first, second, third]);

    let AppMessage::CombinedContent { uri: got, content } = rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(got, uri);
    assert_eq!(content, "one\n\n\nthree");
}

#[test]
fn load_combined_keeps_part_whitespace() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("game_p01.part");
    let second = dir.path().join("game_p02.part");
    std::fs::write(&first, "  a  ").unwrap();
    std::fs::write(&second, "b\n").unwrap();

    let (tx, rx) = mpsc::channel();
    let runtime = AsyncRuntime::new(tx).unwrap();
    runtime.load_combined(CombinedUri::new(dir.path().join("game.py")), vec![first, second]);

    let AppMessage::CombinedContent { content, .. } = rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(content, "  a  \nb\n");
}
