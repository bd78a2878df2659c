use std::fs;
use std::path::PathBuf;

use sdl::{
    ActionStyle, BatchOptions, FileError, PrintConfig, format_file, format_files, format_source,
};

fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn syntax_error_in_one_file_leaves_the_others_formatted() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write(&dir, "one.sdl", "service \"one\" {\n   version=\"1\"\n}\n"),
        write(&dir, "two.sdl", "service \"two\" {\n  version = \n}\n"),
        write(&dir, "three.sdl", "config {}\n"),
    ];

    let results = format_files(&paths, &PrintConfig::default(), &BatchOptions::default());
    assert_eq!(results.len(), 3);

    let one = results[0].as_ref().unwrap();
    assert!(one.changed);
    assert_eq!(one.formatted, "service \"one\" {\n  version = \"1\"\n}\n");

    match &results[1] {
        Err(FileError::Syntax {
            path, diagnostics, ..
        }) => {
            assert_eq!(path, &paths[1]);
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics[0].position.line, 2);
        }
        other => panic!("expected syntax error, got {:?}", other),
    }

    let three = results[2].as_ref().unwrap();
    assert!(!three.changed);
    assert_eq!(three.path, paths[2]);
}

#[test]
fn batch_results_match_sequential_results() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<PathBuf> = (0..12)
        .map(|i| {
            write(
                &dir,
                &format!("s{:02}.sdl", i),
                &format!("service \"s{}\" {{ version = \"{}\"\n GET /x{} -> H }}", i, i, i),
            )
        })
        .collect();
    let config = PrintConfig::new(ActionStyle::Multi, 0);

    let batch = format_files(&paths, &config, &BatchOptions::default().with_workers(3));
    for (path, result) in paths.iter().zip(batch) {
        let sequential = format_file(path, &config).unwrap();
        assert_eq!(result.unwrap(), sequential);
    }
}

#[test]
fn unreadable_file_is_reported_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(&dir, "good.sdl", "config {}\n");
    let missing = dir.path().join("missing.sdl");

    let results = format_files(
        &[missing.clone(), good],
        &PrintConfig::default(),
        &BatchOptions::default(),
    );
    assert!(matches!(&results[0], Err(FileError::Io { path, .. }) if path == &missing));
    assert!(results[1].is_ok());
}

#[test]
fn formatting_is_pure() {
    let source = "service \"a\" {\n  GET /x -> H\n}\n";
    let first = format_source("a.sdl", source, &PrintConfig::default()).unwrap();
    let second = format_source("a.sdl", source, &PrintConfig::default()).unwrap();
    assert_eq!(first, second);
    assert!(!first.changed);
}
