//! Output format tests over real grading reports.

use crate::fixtures::*;
use course_grader::cli::output::{JsonFormatter, JunitFormatter, OutputFormatter, TerminalFormatter};
use course_grader::{grade_curriculum, grade_module, GraderConfig, GradingReport};

fn failing_profile() -> GradingReport {
    let curriculum = Curriculum::new().with_profile(&profile_without_h1());
    grade_module(
        &curriculum.homework(MODULE_01),
        "module-01",
        &GraderConfig::default(),
    )
    .unwrap()
}

#[test]
fn terminal_report() {
    let output = TerminalFormatter::new(false, false, false)
        .format(&[failing_profile()])
        .unwrap();

    assert!(output.contains("module-01 - Personal Profile Page"));
    assert!(output.contains("HTML STRUCTURE"));
    assert!(output.contains("[FAIL] M01-007"));
    assert!(output.contains("[PASS] M01-001"));
    assert!(output.contains("SUMMARY: 19 passed, 0 warnings, 1 failed, 0 skipped"));
    assert!(output.contains("Result: FAILED (exit code 1)"));
}

#[test]
fn terminal_quiet_shows_only_problems() {
    let output = TerminalFormatter::new(false, false, true)
        .format(&[failing_profile()])
        .unwrap();
    assert!(output.contains("M01-007"));
    assert!(!output.contains("[PASS]"));
}

#[test]
fn json_report_is_valid() {
    let output = JsonFormatter::new(true).format(&[failing_profile()]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["module_id"], "module-01");
    assert_eq!(value["summary"]["total"], 20);
    assert_eq!(value["summary"]["failed"], 1);
    let checks = value["checks"].as_array().unwrap();
    let h1 = checks.iter().find(|c| c["id"] == "M01-007").unwrap();
    assert_eq!(h1["result"]["status"], "fail");
}

#[test]
fn json_curriculum_is_an_array() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML).with_todo();
    let reports = grade_curriculum(curriculum.root(), &GraderConfig::default()).unwrap();
    let output = JsonFormatter::new(true).format(&reports).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    let modules: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["module_id"].as_str().unwrap())
        .collect();
    assert_eq!(modules, vec!["module-01", "module-03"]);
}

#[test]
fn junit_report() {
    let output = JunitFormatter::new().format(&[failing_profile()]).unwrap();
    assert!(output.starts_with("<?xml version=\"1.0\""));
    assert!(output.contains("<testsuites name=\"course-grader\" tests=\"20\" failures=\"1\""));
    assert!(output.contains("<testsuite name=\"module-01.html-structure\""));
    assert!(output.contains("<failure message="));
    assert_eq!(output.matches("<testcase ").count(), 20);
    assert!(output.ends_with("</testsuites>"));
}
