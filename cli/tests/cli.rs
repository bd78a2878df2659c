use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

const CANONICAL: &str = "service \"a\" {\n  version = \"1\"\n\n  GET /x -> H\n}\n";
const MESSY: &str = "service \"a\" {\n   version=\"1\"\n  action = GET /x -> H\n}\n";
const BROKEN: &str = "service \"b\" {\n  version = \n}\n";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn fmt_writes_canonical_text() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.sdl", MESSY);

    cargo_bin_cmd!("sdl")
        .arg("fmt")
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("a.sdl")).unwrap(), CANONICAL);
}

#[test]
fn fmt_check_lists_files_and_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.sdl", MESSY);
    write(dir.path(), "b.sdl", CANONICAL);

    cargo_bin_cmd!("sdl")
        .args(["fmt", "--check"])
        .arg(dir.path())
        .assert()
        .code(3)
        .stdout(predicate::str::contains("a.sdl").and(predicate::str::contains("b.sdl").not()))
        .stderr(predicate::str::contains("1 file(s) would be reformatted"));

    assert_eq!(fs::read_to_string(dir.path().join("a.sdl")).unwrap(), MESSY);
}

#[test]
fn fmt_check_with_a_broken_file_still_reports_the_others() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "1.sdl", MESSY);
    write(dir.path(), "2.sdl", BROKEN);
    write(dir.path(), "3.sdl", CANONICAL);

    cargo_bin_cmd!("sdl")
        .args(["--no-color", "fmt", "--check"])
        .arg(dir.path())
        .assert()
        .code(3)
        .stdout(predicate::str::contains("1.sdl"))
        .stderr(predicate::str::contains("expected a value"));
}

#[test]
fn fmt_syntax_error_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.sdl", BROKEN);

    cargo_bin_cmd!("sdl")
        .args(["--no-color", "fmt"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error[syntax]"));

    assert_eq!(fs::read_to_string(dir.path().join("b.sdl")).unwrap(), BROKEN);
}

#[test]
fn fmt_diff_prints_and_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.sdl", MESSY);

    cargo_bin_cmd!("sdl")
        .args(["fmt", "--diff"])
        .arg(dir.path().join("a.sdl"))
        .assert()
        .success()
        .stdout(predicate::str::contains("+  version = \"1\"").and(predicate::str::contains("---")));

    assert_eq!(fs::read_to_string(dir.path().join("a.sdl")).unwrap(), MESSY);
}

#[test]
fn fmt_write_false_leaves_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.sdl", MESSY);

    cargo_bin_cmd!("sdl")
        .args(["fmt", "--write=false"])
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(dir.path().join("a.sdl")).unwrap(), MESSY);
}

#[test]
fn fmt_actions_flag_and_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.sdl", CANONICAL);
    write(dir.path(), "sdl.toml", "[fmt]\nactions = \"multi\"\n");

    cargo_bin_cmd!("sdl")
        .args(["fmt", "--check"])
        .arg(dir.path())
        .assert()
        .code(3);

    // the flag overrides the file
    cargo_bin_cmd!("sdl")
        .args(["fmt", "--check", "--actions", "single"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn fmt_rejects_invalid_action_style_before_touching_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.sdl", MESSY);

    cargo_bin_cmd!("sdl")
        .args(["fmt", "--actions", "wide"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "invalid --actions value: wide (expected single|multi|auto)",
        ));

    assert_eq!(fs::read_to_string(dir.path().join("a.sdl")).unwrap(), MESSY);
}

#[test]
fn fmt_without_sdl_files_fails() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "notes.txt", "");

    cargo_bin_cmd!("sdl")
        .arg("fmt")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no .sdl files found under"));
}

#[test]
fn validate_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "ok.sdl", CANONICAL);
    write(dir.path(), "warn.sdl", "config {}\nwidget \"w\" {}\n");

    cargo_bin_cmd!("sdl")
        .args(["--no-color", "validate"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 file(s) valid (1 warning(s))"))
        .stderr(predicate::str::contains("warning[unknown-kind]"));
}

#[test]
fn validate_fails_on_errors() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "dup.sdl",
        "service \"api\" {\n  version = \"1\"\n}\nservice \"api\" {\n  version = \"1\"\n}\n",
    );

    cargo_bin_cmd!("sdl")
        .args(["--no-color", "validate"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(
            predicate::str::contains("error[duplicate-block]")
                .and(predicate::str::contains("validation failed (1 errors, 0 warnings)")),
        );
}

#[test]
fn compile_is_a_stub() {
    cargo_bin_cmd!("sdl")
        .arg("compile")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile is not implemented yet"));
}
