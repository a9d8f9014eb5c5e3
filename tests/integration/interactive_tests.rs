//! Interactive grading tests.
//!
//! Mount components on the virtual clock directly, and grade whole modules
//! against kits with deliberate defects.

use crate::fixtures::*;
use course_grader::components::tasks::TaskManager;
use course_grader::components::{ComponentKit, Counter, CounterProps, ReferenceKit, TaskManagerOptions};
use course_grader::interactive::{Component, InteractionSettings, Instance, Mount, TextMatch};
use course_grader::{grade_module_with_kit, CheckResult, GraderConfig, GradingReport};
use std::rc::Rc;

fn counter(props: CounterProps) -> Instance {
    Mount::new(Counter::new(props)).mount(InteractionSettings::default())
}

fn click(instance: &mut Instance, pattern: &str) {
    let node = instance
        .get_by_text(TextMatch::pattern(pattern).unwrap())
        .unwrap();
    instance.click(node).unwrap();
}

fn shows(instance: &Instance, value: &str) -> bool {
    instance.get_by_text(value).is_ok()
}

fn failing_ids(report: &GradingReport) -> Vec<&str> {
    report.failures().iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn counter_stops_at_max() {
    let mut instance = counter(CounterProps {
        max: Some(10),
        ..CounterProps::starting_at(9)
    });
    click(&mut instance, r"\+");
    assert!(shows(&instance, "10"));
    click(&mut instance, r"\+");
    assert!(shows(&instance, "10"));
    assert!(!shows(&instance, "11"));
}

#[test]
fn counter_stops_at_min() {
    let mut instance = counter(CounterProps {
        min: Some(0),
        ..CounterProps::starting_at(1)
    });
    click(&mut instance, "-");
    click(&mut instance, "-");
    assert!(shows(&instance, "0"));
    assert!(!shows(&instance, "-1"));
}

/// Ignores `max`.
struct UnclampedCounterKit;

impl ComponentKit for UnclampedCounterKit {
    fn name(&self) -> &str {
        "unclamped-counter"
    }

    fn counter(&self, props: CounterProps) -> Box<dyn Component> {
        Box::new(Counter::new(CounterProps { max: None, ..props }))
    }
}

/// Never writes to local storage.
struct ForgetfulKit;

impl ComponentKit for ForgetfulKit {
    fn name(&self) -> &str {
        "forgetful"
    }

    fn task_manager(&self, options: TaskManagerOptions) -> Box<dyn Component> {
        Box::new(TaskManager::new(TaskManagerOptions {
            persist: false,
            ..options
        }))
    }
}

/// Counter construction blows up.
struct PanickyKit;

impl ComponentKit for PanickyKit {
    fn name(&self) -> &str {
        "panicky"
    }

    fn counter(&self, _props: CounterProps) -> Box<dyn Component> {
        panic!("counter is not implemented")
    }
}

fn grade(module_dir: &str, module_id: &str, kit: Rc<dyn ComponentKit>) -> GradingReport {
    let curriculum = Curriculum::new().with_empty_module(module_dir);
    grade_module_with_kit(
        &curriculum.homework(module_dir),
        module_id,
        &GraderConfig::default(),
        kit,
    )
    .unwrap()
}

#[test]
fn reference_kit_passes_component_modules() {
    for (dir, id) in [
        ("module-05-react", "module-05"),
        ("module-06-hooks", "module-06"),
        ("module-07-tailwind", "module-07"),
        ("module-08-nextjs", "module-08"),
    ] {
        let report = grade(dir, id, Rc::new(ReferenceKit));
        assert!(failing_ids(&report).is_empty(), "{}: {:?}", id, report.failures());
    }
}

#[test]
fn unclamped_counter_fails_only_the_max_check() {
    let report = grade(MODULE_05, "module-05", Rc::new(UnclampedCounterKit));
    assert_eq!(failing_ids(&report), vec!["M05-020"]);
}

#[test]
fn forgetful_task_manager_fails_persistence_checks() {
    let report = grade("module-06-hooks", "module-06", Rc::new(ForgetfulKit));
    assert_eq!(failing_ids(&report), vec!["M06-002", "M06-003", "M06-011"]);
}

#[test]
fn panicking_component_is_contained() {
    let report = grade(MODULE_05, "module-05", Rc::new(PanickyKit));

    let failures = report.failures();
    assert!(!failures.is_empty());
    for check in &failures {
        match &check.result {
            Some(CheckResult::Fail { message, details, .. }) => {
                assert!(message.contains("panicked"), "{}: {}", check.id, message);
                assert_eq!(details, "counter is not implemented");
            }
            other => panic!("{} has {:?}", check.id, other),
        }
    }
    assert!(report.summary().passed > 0);
    assert!(failing_ids(&report).contains(&"M05-020"));
}

#[test]
fn kit_backed_checks_name_their_kit() {
    let report = grade(MODULE_05, "module-05", Rc::new(UnclampedCounterKit));
    assert_eq!(report.component_kits(), vec!["unclamped-counter"]);

    let max_check = report.checks.iter().find(|c| c.id == "M05-020").unwrap();
    assert_eq!(max_check.component_kit.as_deref(), Some("unclamped-counter"));
}

#[test]
fn static_modules_use_no_kit() {
    let curriculum = Curriculum::new().with_profile(PROFILE_HTML);
    let report = grade_module_with_kit(
        &curriculum.homework(MODULE_01),
        "module-01",
        &GraderConfig::default(),
        Rc::new(ReferenceKit),
    )
    .unwrap();
    assert!(report.component_kits().is_empty());
}
