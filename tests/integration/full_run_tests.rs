//! Full run integration tests.
//!
//! Load fixtures from disk, run whole batteries and aggregate the results.

use crate::fixtures::*;
use course_grader::checks::fail;
use course_grader::components::ReferenceKit;
use course_grader::engine::context::GradingContext;
use course_grader::engine::orchestrator::{CheckOrchestrator, OrchestratorConfig, RegisteredCheck};
use course_grader::interactive::InteractionSettings;
use course_grader::submission::{ArtifactKind, Submission};
use course_grader::{
    grade_curriculum, grade_module, CheckCategory, CheckResult, FixtureOverride, GraderConfig,
    GraderError,
};
use std::rc::Rc;

#[test]
fn complete_profile_passes_every_check() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    let report = grade_module(
        &curriculum.homework(MODULE_01),
        "module-01",
        &GraderConfig::default(),
    )
    .unwrap();

    assert_eq!(report.module_id, "module-01");
    assert_eq!(report.module_title, "Personal Profile Page");
    let summary = report.summary();
    assert_eq!(summary.total, 20);
    assert_eq!(summary.failed, 0);
    assert!(!report.has_failures());
}

#[test]
fn missing_h1_fails_and_other_checks_still_run() {
    let curriculum = Curriculum::new().with_profile(&profile_without_h1());
    let report = grade_module(
        &curriculum.homework(MODULE_01),
        "module-01",
        &GraderConfig::default(),
    )
    .unwrap();

    assert_eq!(report.summary().total, 20);
    let failed: Vec<&str> = report.failures().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(failed, vec!["M01-007"]);
    let message = report.find("M01-007").unwrap().result.as_ref().unwrap().to_string();
    assert!(message.contains("h1"), "{}", message);
}

#[test]
fn missing_required_fixture_is_fatal() {
    let curriculum = Curriculum::new();
    curriculum.write(MODULE_01, "starter/index.html", PROFILE_HTML);

    let err = grade_module(
        &curriculum.homework(MODULE_01),
        "module-01",
        &GraderConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GraderError::FixtureMissing { .. }));
    assert!(err.to_string().contains("styles.css"), "{}", err);
}

#[test]
fn unknown_module_is_fatal() {
    let curriculum = Curriculum::new();
    let err = grade_module(&curriculum.homework("module-42"), "module-42", &GraderConfig::default())
        .unwrap_err();
    assert!(matches!(err, GraderError::UnknownModule(_)));
}

#[test]
fn curriculum_run_grades_each_module_in_order() {
    let curriculum = Curriculum::new()
        .with_todo()
        .with_profile(PROFILE_HTML)
        .with_empty_module(MODULE_05);
    // Not a module directory
    std::fs::create_dir_all(curriculum.root().join("notes")).unwrap();

    let reports = grade_curriculum(curriculum.root(), &GraderConfig::default()).unwrap();
    let ids: Vec<&str> = reports.iter().map(|r| r.module_id.as_str()).collect();
    assert_eq!(ids, vec!["module-01", "module-03", "module-05"]);
    for report in &reports {
        assert!(!report.has_failures(), "{} failed: {:?}", report.module_id, report.failures());
    }
}

#[test]
fn absent_optional_source_skips_source_checks() {
    let curriculum = Curriculum::new().with_empty_module(MODULE_05);
    let report = grade_module(
        &curriculum.homework(MODULE_05),
        "module-05",
        &GraderConfig::default(),
    )
    .unwrap();

    let summary = report.summary();
    assert!(summary.skipped > 0);
    assert!(summary.passed > 0);
    assert!(matches!(
        report.find("M05-028").unwrap().result,
        Some(CheckResult::Skip { .. })
    ));
}

#[test]
fn empty_root_has_nothing_to_grade() {
    let curriculum = Curriculum::new();
    let err = grade_curriculum(curriculum.root(), &GraderConfig::default()).unwrap_err();
    assert!(matches!(err, GraderError::NothingToGrade(_)));
}

#[test]
fn category_filter() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    let config = GraderConfig {
        categories: Some(vec![CheckCategory::CssStyling]),
        ..GraderConfig::default()
    };
    let report = grade_module(&curriculum.homework(MODULE_01), "module-01", &config).unwrap();

    assert!(report.summary().total > 0);
    assert!(report.checks.iter().all(|c| c.category == CheckCategory::CssStyling));
}

#[test]
fn only_wins_over_skip() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    let config = GraderConfig {
        only_checks: vec!["M01-001".to_string(), "m01-007".to_string()],
        skip_checks: vec!["M01-001".to_string()],
        ..GraderConfig::default()
    };
    let report = grade_module(&curriculum.homework(MODULE_01), "module-01", &config).unwrap();
    let ids: Vec<&str> = report.checks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["M01-001", "M01-007"]);
}

#[test]
fn skip_removes_checks() {
    let curriculum = Curriculum::new().with_profile(&profile_without_h1());
    let config = GraderConfig {
        skip_checks: vec!["M01-007".to_string()],
        ..GraderConfig::default()
    };
    let report = grade_module(&curriculum.homework(MODULE_01), "module-01", &config).unwrap();
    assert!(report.find("M01-007").is_none());
    assert_eq!(report.summary().total, 19);
    assert!(!report.has_failures());
}

#[test]
fn fixture_paths_can_be_overridden() {
    let curriculum = Curriculum::new();
    curriculum.write(MODULE_01, "solution/page.html", PROFILE_HTML);
    curriculum.write(MODULE_01, "starter/styles.css", PROFILE_CSS);

    let mut config = GraderConfig::default();
    config.fixtures.insert(
        "module-01".to_string(),
        FixtureOverride {
            markup: Some("solution/page.html".to_string()),
            ..FixtureOverride::default()
        },
    );
    let report = grade_module(&curriculum.homework(MODULE_01), "module-01", &config).unwrap();
    assert!(!report.has_failures());
}

#[test]
fn panicking_check_does_not_stop_the_run() {
    let submission = Submission::from_texts("hw", &[(ArtifactKind::Markup, "<h1>Hi</h1>")]);
    let context = GradingContext::new(
        submission,
        InteractionSettings::default(),
        Rc::new(ReferenceKit),
    );

    let mut orchestrator = CheckOrchestrator::new(OrchestratorConfig::default());
    orchestrator.register_checks(vec![
        RegisteredCheck::new("T-001", "First", CheckCategory::Content, "", |_| {
            Ok("fine".to_string())
        }),
        RegisteredCheck::new("T-002", "Explodes", CheckCategory::Content, "", |_| {
            panic!("boom")
        }),
        RegisteredCheck::new("T-003", "Unmet", CheckCategory::Content, "", |_| {
            Err(fail("not there"))
        }),
        RegisteredCheck::new("T-004", "Advisory", CheckCategory::Content, "", |_| {
            Err(fail("could be better"))
        })
        .advisory(),
    ]);

    let report = orchestrator
        .run_all(&context)
        .unwrap()
        .into_report("test", "Test", std::path::Path::new("hw"));
    let statuses: Vec<String> = report.outcomes().into_iter().map(|(_, s)| s).collect();
    assert_eq!(statuses, vec!["pass", "fail", "fail", "warn"]);

    match &report.find("T-002").unwrap().result {
        Some(CheckResult::Fail { message, details, .. }) => {
            assert!(message.contains("panicked"));
            assert_eq!(details, "boom");
        }
        other => panic!("unexpected result {:?}", other),
    }
}
