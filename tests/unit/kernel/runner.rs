use super::*;

#[test]
fn test_default_runners_by_extension() {
    let table = RunnerTable::default();

    let py = table.command_for(Path::new("/w/game_01.py")).unwrap();
    assert_eq!(py.program, "python");
    assert_eq!(py.path, PathBuf::from("/w/game_01.py"));

    assert_eq!(table.command_for(Path::new("a.js")).unwrap().program, "node");
    assert_eq!(table.command_for(Path::new("a.ts")).unwrap().program, "ts-node");
}

#[test]
fn test_extension_match_is_case_insensitive() {
    let table = RunnerTable::default();
    assert_eq!(table.command_for(Path::new("SCRIPT.PY")).unwrap().program, "python");
}

#[test]
fn test_unsupported_extension() {
    let table = RunnerTable::default();

    assert_eq!(
        table.command_for(Path::new("main.rs")),
        Err(SplitError::UnsupportedFileType(".rs".to_string()))
    );
    assert_eq!(
        table.command_for(Path::new("Makefile")),
        Err(SplitError::UnsupportedFileType(String::new()))
    );
    assert!(matches!(
        table.run(Path::new("main.rs")),
        Err(SplitError::UnsupportedFileType(_))
    ));
}

#[test]
fn test_runners_from_settings() {
    let mut settings = Settings::default();
    settings
        .runners
        .insert(".RB".to_string(), "ruby".to_string());

    let table = RunnerTable::from_settings(&settings);
    assert_eq!(table.command_for(Path::new("x.rb")).unwrap().program, "ruby");
}

#[test]
fn test_run_command_display_quotes_path() {
    let run = RunCommand {
        program: "node".to_string(),
        path: PathBuf::from("/w/my app.js"),
    };
    assert_eq!(run.to_string(), "node \"/w/my app.js\"");
}

#[test]
fn test_launch_failure_is_reported() {
    let mut runners = BTreeMap::new();
    runners.insert(
        ".py".to_string(),
        "codesplit-test-no-such-interpreter".to_string(),
    );
    let table = RunnerTable::new(runners);

    assert!(matches!(
        table.run(Path::new("x.py")),
        Err(SplitError::Launch { .. })
    ));
}
