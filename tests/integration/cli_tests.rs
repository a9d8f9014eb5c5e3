//! Binary tests for the course-grader command line.

use crate::fixtures::*;
use assert_cmd::Command;
use predicates::prelude::*;

fn grader(curriculum: &Curriculum) -> Command {
    let mut cmd = Command::cargo_bin("course-grader").unwrap();
    cmd.current_dir(curriculum.root())
        .env_remove("COURSE_GRADER_CONFIG")
        .env_remove("COURSE_GRADER_FORMAT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn passing_module_exits_zero() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    grader(&curriculum)
        .args(["grade", MODULE_01])
        .assert()
        .success()
        .stdout(predicate::str::contains("[PASS] M01-001"))
        .stdout(predicate::str::contains("Result: PASSED"));
}

#[test]
fn failing_module_exits_one() {
    let curriculum = Curriculum::new().with_profile(&profile_without_h1());
    grader(&curriculum)
        .args(["grade", MODULE_01])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[FAIL] M01-007"));
}

#[test]
fn homework_directory_is_a_valid_target() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    let homework = curriculum.homework(MODULE_01);
    grader(&curriculum).arg("grade").arg(&homework).assert().success();
}

#[test]
fn missing_fixture_exits_three() {
    let curriculum = Curriculum::new();
    curriculum.write(MODULE_01, "starter/index.html", PROFILE_HTML);
    grader(&curriculum)
        .args(["grade", MODULE_01])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("fixture missing"));
}

#[test]
fn uninferable_module_needs_flag() {
    let curriculum = Curriculum::new();
    curriculum.write("submission", "starter/index.html", PROFILE_HTML);
    curriculum.write("submission", "starter/styles.css", PROFILE_CSS);

    grader(&curriculum)
        .args(["grade", "submission"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("--module"));

    grader(&curriculum)
        .args(["grade", "submission", "--module", "1"])
        .assert()
        .success();
}

#[test]
fn all_grades_every_module() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML).with_todo();
    grader(&curriculum)
        .args(["grade", "--all", "--root"])
        .arg(curriculum.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("module-01 - Personal Profile Page"))
        .stdout(predicate::str::contains("module-03 - To-Do List Application"))
        .stdout(predicate::str::contains("OVERALL: 2 modules"));
}

#[test]
fn json_format_is_parseable() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    let output = grader(&curriculum)
        .args(["grade", MODULE_01, "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["module_id"], "module-01");
}

#[test]
fn format_from_environment() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    grader(&curriculum)
        .env("COURSE_GRADER_FORMAT", "junit")
        .args(["grade", MODULE_01])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"));
}

#[test]
fn only_and_category_filters() {
    let curriculum = Curriculum::new().with_profile(&profile_without_h1());
    grader(&curriculum)
        .args(["grade", MODULE_01, "--only", "M01-001,M01-002"])
        .assert()
        .success()
        .stdout(predicate::str::contains("M01-007").not());

    grader(&curriculum)
        .args(["grade", MODULE_01, "--category", "css-styling"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CSS STYLING"))
        .stdout(predicate::str::contains("HTML STRUCTURE").not());
}

#[test]
fn config_file_is_applied() {
    let curriculum = Curriculum::new().with_profile(&profile_without_h1());
    curriculum.write_root("grader.toml", "[grading]\nskip = [\"M01-007\"]\n");
    grader(&curriculum)
        .args(["grade", MODULE_01])
        .assert()
        .success()
        .stdout(predicate::str::contains("M01-007").not());
}

#[test]
fn explicit_config_and_bad_config() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    let good = curriculum.write_root("ci.toml", "[output]\nformat = \"json\"\n");
    grader(&curriculum)
        .arg("--config")
        .arg(&good)
        .args(["grade", MODULE_01])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));

    let bad = curriculum.write_root("bad.toml", "timeout_ms = \"never\"\n");
    grader(&curriculum)
        .arg("--config")
        .arg(&bad)
        .args(["grade", MODULE_01])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("config parse error"));
}

#[test]
fn baseline_round_trip() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    let baseline = curriculum.root().join("baseline.json");

    grader(&curriculum)
        .args(["grade", MODULE_01, "--save-baseline"])
        .arg(&baseline)
        .assert()
        .success();
    assert!(baseline.is_file());

    curriculum.write(MODULE_01, "starter/index.html", &profile_without_h1());
    grader(&curriculum)
        .args(["grade", MODULE_01, "--baseline"])
        .arg(&baseline)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("BASELINE COMPARISON (module-01)"))
        .stdout(predicate::str::contains("Regressions: M01-007"));
}

#[test]
fn list_checks() {
    let curriculum = Curriculum::new();
    grader(&curriculum)
        .args(["list", "module-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("module-01 - Personal Profile Page"))
        .stdout(predicate::str::contains("M01-007"))
        .stdout(predicate::str::contains("(advisory)"))
        .stdout(predicate::str::contains("M02-").not());

    grader(&curriculum)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("M08-001"));

    grader(&curriculum).args(["list", "module-99"]).assert().code(3);
}

#[test]
fn modules_and_version() {
    let curriculum = Curriculum::new();
    grader(&curriculum)
        .arg("modules")
        .assert()
        .success()
        .stdout(predicate::str::contains("module-04"))
        .stdout(predicate::str::contains("homework/starter/index.ts"));

    grader(&curriculum)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("course-grader "));
}

#[test]
fn usage_error_exits_three() {
    let curriculum = Curriculum::new();
    grader(&curriculum).args(["grade", "--format", "yaml"]).assert().code(3);
}
