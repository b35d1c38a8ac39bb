//! `dejadiff find` and `dejadiff verify`: locator lines and match counts
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

mod utils;

use predicates::prelude::*;
use utils::Fixture;

const TEST: &str = "c-c++-common/Wcast-qual-1.c -std=gnu++11  (test for warnings, line 100)";

#[test]
fn test_find_reports_summary_and_log() {
    let fx = Fixture::new();
    fx.write("control/g++.sum", &format!("PASS: {}\n", TEST));
    fx.write(
        "control/g++.log",
        &format!("spawn g++ Wcast-qual-1.c\nPASS: {}\n", TEST),
    );

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dejadiff");
    cmd.arg("find")
        .arg(TEST)
        .arg(fx.path("control"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains(format!("g++.sum:1: PASS: {}", TEST)))
        .stdout(predicate::str::contains(format!("g++.log:2: PASS: {}", TEST)));
}

#[test]
fn test_find_absent_exits_zero() {
    let fx = Fixture::new();
    fx.write("control/gcc.sum", "PASS: other\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dejadiff");
    cmd.arg("find")
        .arg("nope")
        .arg(fx.path("control"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_find_sums_over_multiple_paths() {
    let fx = Fixture::new();
    fx.write("a/gcc.sum", "FAIL: t\n");
    fx.write("a/gcc.log", "FAIL: t\n");
    fx.write("b/gcc.sum", "PASS: t\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dejadiff");
    cmd.arg("find")
        .arg("t")
        .arg(fx.path("a"))
        .arg(fx.path("b"))
        .assert()
        .code(3);
}

#[test]
fn test_find_summary_only() {
    let fx = Fixture::new();
    fx.write("a/gcc.sum", "FAIL: t\n");
    fx.write("a/gcc.log", "FAIL: t\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dejadiff");
    cmd.arg("find")
        .arg("--summary-only")
        .arg("t")
        .arg(fx.path("a"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("gcc.log").not());
}

#[test]
fn test_find_warns_on_disagreement() {
    let fx = Fixture::new();
    fx.write("a/gcc.sum", "PASS: t\n");
    fx.write("a/gcc.log", "FAIL: t\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dejadiff");
    cmd.arg("find")
        .arg("t")
        .arg(fx.path("a"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("warning: FAIL but"));

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dejadiff");
    cmd.arg("find")
        .arg("--no-consistency-check")
        .arg("t")
        .arg(fx.path("a"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("warning").not());
}

#[test]
fn test_find_survives_missing_log() {
    let fx = Fixture::new();
    fx.write("a/gcc.sum", "PASS: t\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dejadiff");
    cmd.arg("find")
        .arg("t")
        .arg(fx.path("a"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Skipping detail lookup"));
}

#[test]
fn test_verify_lists_mismatches() {
    let fx = Fixture::new();
    fx.write("a/gcc.sum", "PASS: t1\nPASS: t2\nPASS: t3\n");
    fx.write("a/gcc.log", "PASS: t1\nFAIL: t2\nUNRESOLVED: t3\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dejadiff");
    cmd.arg("verify")
        .arg(fx.path("a"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Outcome mismatches in"))
        .stdout(predicate::str::contains("gcc.log:2: warning: FAIL but"))
        .stdout(predicate::str::contains("gcc.log:3: warning: UNRESOLVED but"));
}

#[test]
fn test_verify_clean() {
    let fx = Fixture::new();
    fx.write("a/gcc.sum", "PASS: t1\n");
    fx.write("a/gcc.log", "noise\nPASS: t1\n");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("dejadiff");
    cmd.arg("verify")
        .arg(fx.path("a"))
        .assert()
        .success()
        .stdout("No outcome mismatches in 1 .sum files\n");
}
