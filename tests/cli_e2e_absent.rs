//! CLI end-to-end tests for the `absent` subcommand.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn write_epel(temp: &assert_fs::TempDir) {
    temp.child("epel.repo")
        .write_str("[epel]\nbaseurl = https://download.example/epel\nname = EPEL\n\n")
        .unwrap();
}

#[test]
fn test_absent_deletes_single_section_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_epel(&temp);

    let mut cmd = cargo_bin_cmd!("repoconf");
    cmd.arg("absent")
        .arg("epel")
        .arg("--reposdir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(changed)"));

    assert!(!temp.path().join("epel.repo").exists());
}

#[test]
fn test_absent_missing_repo_is_unchanged() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("repoconf");
    cmd.arg("absent")
        .arg("epel")
        .arg("--reposdir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(unchanged)"));
}

#[test]
fn test_absent_dry_run_keeps_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_epel(&temp);

    let mut cmd = cargo_bin_cmd!("repoconf");
    cmd.arg("absent")
        .arg("epel")
        .arg("--reposdir")
        .arg(temp.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("(changed)"));

    temp.child("epel.repo").assert(predicate::path::exists());
}

#[test]
fn test_absent_leaves_other_sections_in_shared_file() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("extras.repo")
        .write_str(
            "[epel]\nbaseurl = https://a.example\nname = A\n\n[other]\nbaseurl = https://b.example\nname = B\n\n",
        )
        .unwrap();

    let mut cmd = cargo_bin_cmd!("repoconf");
    cmd.arg("absent")
        .arg("epel")
        .arg("--file")
        .arg("extras")
        .arg("--reposdir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(changed)"));

    let content = std::fs::read_to_string(temp.path().join("extras.repo")).unwrap();
    assert!(!content.contains("[epel]"));
    assert!(content.contains("[other]"));
}
