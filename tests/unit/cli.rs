use super::*;
use tempfile::tempdir;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn parse_split_with_max_lines_and_root() {
    let parsed = parse_args(&args(&["--root", "/w", "split", "a.py", "--max-lines", "40"])).unwrap();

    assert_eq!(parsed.root, Some(PathBuf::from("/w")));
    assert_eq!(
        parsed.command,
        CliCommand::Split {
            file: PathBuf::from("a.py"),
            max_lines: Some(40),
        }
    );
}

#[test]
fn parse_single_file_commands() {
    let cases = [
        ("combine", CliCommand::Combine { file: PathBuf::from("f") }),
        ("run", CliCommand::Run { file: PathBuf::from("f") }),
        ("view", CliCommand::View { file: PathBuf::from("f") }),
        ("watch", CliCommand::Watch { file: PathBuf::from("f") }),
        ("forget", CliCommand::Forget { file: PathBuf::from("f") }),
    ];
    for (name, expected) in cases {
        assert_eq!(parse_args(&args(&[name, "f"])).unwrap().command, expected);
    }
}

#[test]
fn parse_defaults_to_help() {
    assert_eq!(parse_args(&[]).unwrap().command, CliCommand::Help);
    assert_eq!(parse_args(&args(&["--help"])).unwrap().command, CliCommand::Help);
    assert_eq!(parse_args(&args(&["list"])).unwrap().command, CliCommand::List);
}

#[test]
fn parse_rejects_bad_input() {
    assert!(parse_args(&args(&["split"])).is_err());
    assert!(parse_args(&args(&["combine", "a", "b"])).is_err());
    assert!(parse_args(&args(&["split", "a", "--max-lines", "many"])).is_err());
    assert!(parse_args(&args(&["combine", "a", "--max-lines", "3"])).is_err());
    assert!(parse_args(&args(&["explode", "a"])).is_err());
    assert!(parse_args(&args(&["--verbose", "list"])).is_err());
    assert!(parse_args(&args(&["list", "extra"])).is_err());
    assert!(parse_args(&args(&["--root"])).is_err());
}

#[test]
fn resolve_root_defaults_to_cwd() {
    let dir = tempdir().unwrap();
    let root = resolve_root(dir.path(), None).unwrap();
    assert_eq!(root, dir.path().canonicalize().unwrap());
}

#[test]
fn resolve_root_accepts_relative_directory() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("workspace")).unwrap();

    let root = resolve_root(dir.path(), Some(Path::new("workspace"))).unwrap();
    assert_eq!(root, dir.path().join("workspace").canonicalize().unwrap());
}

#[test]
fn resolve_root_rejects_files() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "x").unwrap();

    assert!(resolve_root(dir.path(), Some(Path::new("a.txt"))).is_err());
}

#[test]
fn absolute_joins_relative_paths_onto_cwd() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("a.py"), "x").unwrap();
    let cwd = dir.path().canonicalize().unwrap();

    assert_eq!(absolute(&cwd, Path::new("a.py")), cwd.join("a.py"));
    assert_eq!(absolute(&cwd, Path::new("missing.py")), cwd.join("missing.py"));
}
