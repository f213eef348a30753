//! CLI end-to-end tests for the `cmc` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmc() -> Command {
    Command::cargo_bin("cmc").expect("binary builds")
}

#[test]
fn help_and_version() {
    cmc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmc"));
    cmc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cmc"));
}

#[test]
fn compiles_and_executes_with_explicit_paths() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("prog.txt");
    std::fs::write(&input, "void main(void){ output(5); }").unwrap();
    let result = dir.path().join("result.txt");
    let error = dir.path().join("error.txt");

    cmc()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&result)
        .arg("-e")
        .arg(&error)
        .arg("--outdir")
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(std::fs::read_to_string(&result).unwrap(), "PRINT    5\n");
    assert!(std::fs::read_to_string(&error)
        .unwrap()
        .contains("--->  PC = 0"));
    for artifact in [
        "tokens.txt",
        "lexical_errors.txt",
        "symbol_table.txt",
        "syntax_errors.txt",
        "parse_tree.txt",
        "output.txt",
    ] {
        assert!(dir.path().join(artifact).exists(), "missing {artifact}");
    }
}

#[test]
fn default_file_names_resolve_in_the_working_directory() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("input.txt"), "void main(void){ output(7); }").unwrap();

    cmc().current_dir(dir.path()).assert().success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("result.txt")).unwrap(),
        "PRINT    7\n"
    );
    assert!(dir.path().join("error.txt").exists());
}

#[test]
fn no_exec_stops_after_compilation() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("input.txt"), "void main(void){}").unwrap();

    cmc()
        .current_dir(dir.path())
        .arg("--no-exec")
        .assert()
        .success();

    assert!(dir.path().join("output.txt").exists());
    assert!(!dir.path().join("result.txt").exists());
}

#[test]
fn missing_input_fails_with_nonzero_exit() {
    let dir = TempDir::new().unwrap();
    cmc()
        .current_dir(dir.path())
        .arg("-i")
        .arg("does_not_exist.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open input file"));
}

#[test]
fn erroneous_source_still_writes_artifacts() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("input.txt"), "void main(void){ int ; }").unwrap();

    cmc().current_dir(dir.path()).assert().success();

    let syntax = std::fs::read_to_string(dir.path().join("syntax_errors.txt")).unwrap();
    assert!(syntax.contains("syntax error"), "got {syntax}");
    assert!(dir.path().join("parse_tree.txt").exists());
    assert!(dir.path().join("result.txt").exists());
}

#[test]
fn external_grammar_directory_overrides_builtin() {
    let dir = TempDir::new().unwrap();
    let grammar_dir = dir.path().join("grammar");
    std::fs::create_dir(&grammar_dir).unwrap();
    // Ship the builtin assets as external files.
    std::fs::write(
        grammar_dir.join("grammar.txt"),
        include_str!("../../cmc-par/grammar/grammar.txt"),
    )
    .unwrap();
    std::fs::write(
        grammar_dir.join("first.txt"),
        include_str!("../../cmc-par/grammar/first.txt"),
    )
    .unwrap();
    std::fs::write(
        grammar_dir.join("follow.txt"),
        include_str!("../../cmc-par/grammar/follow.txt"),
    )
    .unwrap();
    std::fs::write(dir.path().join("input.txt"), "void main(void){ output(3); }").unwrap();

    cmc()
        .current_dir(dir.path())
        .arg("--grammar-dir")
        .arg(&grammar_dir)
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("result.txt")).unwrap(),
        "PRINT    3\n"
    );
}
