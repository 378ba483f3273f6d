//! End-to-end tests driving the built `precis` binary.

use std::fs;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn precis() -> Command
{
    Command::cargo_bin("precis").expect("bin")
}

#[test]
fn compresses_stdin_text_to_fit_shape()
{
    let body = (1..=200).map(|n| format!("line {n} of the input body\n")).collect::<String>();

    precis()
        .args(["--shape", "40:10", "--no-line-numbers"])
        .write_stdin(body)
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn rejects_malformed_shape()
{
    precis()
        .args(["--shape", "not-a-shape"])
        .write_stdin("hello\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid shape"));
}

#[test]
fn rejects_inverted_range()
{
    precis()
        .args(["--shape", "40:10", "--range", "5:1"])
        .write_stdin("hello\n")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid range"));
}

#[test]
fn reports_missing_file_path()
{
    precis()
        .args(["--shape", "40:10", "/nonexistent/path/does/not/exist.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn profile_flag_requires_a_path()
{
    precis().args(["--profile"]).assert().failure().code(1).stderr(predicate::str::contains("--profile"));
}

#[test]
fn profile_flag_reports_size_and_extension()
{
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.path().join("module.py");
    fs::write(&file, "def f():\n    pass\n").unwrap();

    precis()
        .args(["--profile", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("extension: py"));
}

#[test]
fn compresses_a_directory_tree()
{
    let dir = assert_fs::TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha file contents\n").unwrap();
    fs::write(dir.path().join("b.txt"), "beta file contents\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("c.txt"), "gamma file contents\n").unwrap();

    precis()
        .args(["--shape", "60:20", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"));
}

#[test]
fn custom_separator_selects_top_chunks()
{
    let body = "first###second###third###fourth###fifth";

    precis()
        .args(["--shape", "20:2", "--separator", "###", "--no-line-numbers"])
        .write_stdin(body)
        .assert()
        .success();
}

#[test]
fn deduplicate_flag_collapses_repeated_lines()
{
    let body = "the quick brown fox\n".repeat(20);

    let assert = precis().args(["--shape", "40:30", "--no-line-numbers", "--deduplicate"]).write_stdin(body).assert().success();

    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(out.matches("the quick brown fox").count() < 20);
}

#[test]
fn limit_flag_bounds_total_output_length()
{
    let body = (1..=500).map(|n| format!("a rather long line of filler text number {n}\n")).collect::<String>();

    let assert = precis().args(["--shape", "200:200", "--no-line-numbers", "--limit", "500"]).write_stdin(body).assert().success();

    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(out.len() <= 600, "output length {} should respect the limit plus bookend markers", out.len());
}
