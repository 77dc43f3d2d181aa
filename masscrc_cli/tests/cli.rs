use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("masscrc").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_walk_emits_checksum_lines() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("data.txt"), b"short test data").unwrap();

    let mut cmd = Command::cargo_bin("masscrc").unwrap();
    cmd.arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4AmyZA== 15 "))
        .stderr(predicate::str::contains("Files computed: 1"));
}

#[test]
fn test_stdin_file_list() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("data.txt");
    fs::write(&file, b"short test data").unwrap();

    let mut cmd = Command::cargo_bin("masscrc").unwrap();
    cmd.write_stdin(format!("{}\n", file.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "4AmyZA== 15 {}",
            file.display()
        )));
}

#[cfg(unix)]
#[test]
fn test_walk_notices_shown_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real.bin"), b"data").unwrap();
    std::os::unix::fs::symlink(dir.path().join("real.bin"), dir.path().join("link.bin")).unwrap();

    let mut cmd = Command::cargo_bin("masscrc").unwrap();
    cmd.arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("entering dir:"))
        .stderr(predicate::str::contains("ignoring:"))
        .stderr(predicate::str::contains("Ignored files: 1"));
}

#[test]
fn test_missing_file_is_counted_not_fatal() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.txt");
    fs::write(&good, b"short test data").unwrap();

    let mut cmd = Command::cargo_bin("masscrc").unwrap();
    cmd.write_stdin(format!("{}\n/no/such/file\n", good.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("4AmyZA=="))
        .stderr(predicate::str::contains("error: '/no/such/file':"))
        .stderr(predicate::str::contains("File errors: 1"));
}

#[test]
fn test_out_flag_redirects_results() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("data.txt"), b"abc").unwrap();
    let out_path = dir.path().join("results.txt");

    let mut cmd = Command::cargo_bin("masscrc").unwrap();
    cmd.arg("--out")
        .arg(&out_path)
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let results = fs::read_to_string(&out_path).unwrap();
    assert!(results.contains("data.txt"));
}

#[test]
fn test_unopenable_out_file_exits_2() {
    let mut cmd = Command::cargo_bin("masscrc").unwrap();
    cmd.arg("--out")
        .arg("/no/such/dir/results.txt")
        .arg(".")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot open"));
}

#[test]
fn test_parallel_run_matches_file_count() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        fs::write(dir.path().join(format!("f{i}.bin")), vec![i as u8; 100]).unwrap();
    }

    let mut cmd = Command::cargo_bin("masscrc").unwrap();
    let assert = cmd
        .arg("-j")
        .arg("4")
        .arg("-l")
        .arg("8")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Files computed: 20"))
        .stderr(predicate::str::contains("Computed data: 2000B"));

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.lines().count(), 20);
}
