//! Repeated runs over unchanged fixtures give identical outcomes.

use crate::fixtures::*;
use course_grader::engine::result::{load_baseline, save_baseline};
use course_grader::{grade_curriculum, grade_module, GraderConfig};

#[test]
fn same_fixture_same_outcomes() {
    let curriculum = Curriculum::new().with_profile(&profile_without_h1());
    let homework = curriculum.homework(MODULE_01);
    let config = GraderConfig::default();

    let first = grade_module(&homework, "module-01", &config).unwrap();
    let second = grade_module(&homework, "module-01", &config).unwrap();
    assert_eq!(first.outcomes(), second.outcomes());

    let comparison = second.compare_to_baseline(&first);
    assert!(!comparison.has_regressions());
    assert_eq!(comparison.unchanged.len(), first.checks.len());
}

#[test]
fn interactive_modules_are_deterministic() {
    let curriculum = Curriculum::new()
        .with_empty_module(MODULE_05)
        .with_empty_module("module-06-hooks")
        .with_empty_module("module-08-nextjs");
    let config = GraderConfig::default();

    let first = grade_curriculum(curriculum.root(), &config).unwrap();
    let second = grade_curriculum(curriculum.root(), &config).unwrap();
    assert_eq!(first.len(), 3);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.outcomes(), b.outcomes(), "{}", a.module_id);
    }
}

#[test]
fn saved_baseline_detects_regression() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    let homework = curriculum.homework(MODULE_01);
    let config = GraderConfig::default();
    let baseline_path = curriculum.root().join("baseline.json");

    let passing = grade_module(&homework, "module-01", &config).unwrap();
    save_baseline(&[passing], &baseline_path).unwrap();

    curriculum.write(MODULE_01, "starter/index.html", &profile_without_h1());
    let regressed = grade_module(&homework, "module-01", &config).unwrap();

    let baseline = load_baseline(&baseline_path).unwrap();
    let comparison = regressed.compare_to_baseline(&baseline[0]);
    assert_eq!(comparison.regressions, vec!["M01-007"]);
    assert!(comparison.has_regressions());
}
