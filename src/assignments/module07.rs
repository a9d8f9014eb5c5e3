//! Module 7: Task Manager Styling.
//!
//! Behaviour is graded on the single-page task manager. Styling is graded
//! statically: the utility classes in `App.tsx` are matched by pattern.

use crate::assignments::{absent, click_text, script_matches, script_uses_all};
use crate::checks::{ensure, fail, CheckError, CheckOutcome};
use crate::components::TaskManagerOptions;
use crate::engine::context::GradingContext;
use crate::engine::orchestrator::RegisteredCheck;
use crate::interactive::{Instance, TextMatch};
use crate::CheckCategory;

/// Get all module 7 checks
pub fn checks() -> Vec<RegisteredCheck> {
    use CheckCategory::{Components, Styling};
    vec![
        RegisteredCheck::new(
            "M07-001",
            "Container",
            Components,
            "The title sits inside a container element",
            run_m07_001,
        ),
        RegisteredCheck::new(
            "M07-002",
            "Header Heading",
            Components,
            "Task Manager is an h1",
            run_m07_002,
        ),
        RegisteredCheck::new(
            "M07-003",
            "Task Input",
            Components,
            "An input asks what needs to be done",
            run_m07_003,
        ),
        RegisteredCheck::new(
            "M07-004",
            "Add Button",
            Components,
            "An Add Task button renders",
            run_m07_004,
        ),
        RegisteredCheck::new(
            "M07-005",
            "Add Task",
            Components,
            "A submitted task appears",
            run_m07_005,
        ),
        RegisteredCheck::new(
            "M07-006",
            "Task Checkboxes",
            Components,
            "Each task has a checkbox",
            run_m07_006,
        ),
        RegisteredCheck::new(
            "M07-007",
            "Delete Buttons",
            Components,
            "Each task has a Delete button",
            run_m07_007,
        ),
        RegisteredCheck::new(
            "M07-008",
            "Toggle Completion",
            Components,
            "A completed task stays visible",
            run_m07_008,
        ),
        RegisteredCheck::new(
            "M07-009",
            "Delete Task",
            Components,
            "Delete removes the task",
            run_m07_009,
        ),
        RegisteredCheck::new(
            "M07-010",
            "Filter Buttons",
            Components,
            "All, Active and Completed render",
            run_m07_010,
        ),
        RegisteredCheck::new(
            "M07-011",
            "Active Filter",
            Components,
            "Active hides completed tasks",
            run_m07_011,
        ),
        RegisteredCheck::new(
            "M07-012",
            "Completed Filter",
            Components,
            "Completed hides active tasks",
            run_m07_012,
        ),
        RegisteredCheck::new(
            "M07-013",
            "Remaining Counter",
            Components,
            "Counts remaining tasks with correct plurals",
            run_m07_013,
        ),
        RegisteredCheck::new(
            "M07-014",
            "Completed Not Counted",
            Components,
            "Completed tasks leave the remaining count",
            run_m07_014,
        ),
        RegisteredCheck::new(
            "M07-015",
            "Empty State",
            Components,
            "An empty list says so",
            run_m07_015,
        ),
        RegisteredCheck::new(
            "M07-016",
            "Empty Active Filter",
            Components,
            "Active filter with nothing active says so",
            run_m07_016,
        ),
        RegisteredCheck::new(
            "M07-017",
            "Empty Completed Filter",
            Components,
            "Completed filter with nothing completed says so",
            run_m07_017,
        ),
        RegisteredCheck::new(
            "M07-018",
            "Utility Classes",
            Styling,
            "Elements are styled through className",
            run_m07_018,
        ),
        RegisteredCheck::new(
            "M07-019",
            "Card Styling",
            Styling,
            "The container is a rounded, shadowed card",
            run_m07_019,
        ),
        RegisteredCheck::new(
            "M07-020",
            "Responsive Prefixes",
            Styling,
            "Uses breakpoint prefixes such as md:",
            run_m07_020,
        ),
        RegisteredCheck::new(
            "M07-021",
            "Hover States",
            Styling,
            "Buttons change on hover",
            run_m07_021,
        ),
        RegisteredCheck::new(
            "M07-022",
            "Focus States",
            Styling,
            "Inputs show focus",
            run_m07_022,
        )
        .advisory(),
        RegisteredCheck::new(
            "M07-023",
            "Colour Palette",
            Styling,
            "Buttons use the blue and red palette",
            run_m07_023,
        )
        .advisory(),
    ]
}

fn manager(ctx: &GradingContext) -> Instance {
    ctx.mount(ctx.kit().task_manager(TaskManagerOptions::styled()))
}

fn add_task(instance: &mut Instance, title: &str) -> Result<(), CheckError> {
    let input = instance.get_by_placeholder(TextMatch::pattern("(?i)what needs to be done")?)?;
    instance.change(input, title)?;
    click_text(instance, "Add Task")?;
    instance.get_by_text(title)?;
    Ok(())
}

/// Two tasks, the first completed.
fn one_of_two_done(ctx: &GradingContext) -> Result<Instance, CheckError> {
    let mut instance = manager(ctx);
    add_task(&mut instance, "Task 1")?;
    add_task(&mut instance, "Task 2")?;
    let first = instance.get_all_by_role("checkbox")?[0];
    instance.click(first)?;
    Ok(instance)
}

fn expect_text(instance: &Instance, pattern: &str) -> Result<(), CheckError> {
    instance.get_by_text(TextMatch::pattern(pattern)?)?;
    Ok(())
}

/// M07-001: Container
fn run_m07_001(ctx: &GradingContext) -> CheckOutcome {
    let instance = manager(ctx);
    let title = instance.get_by_text("Task Manager")?;
    instance
        .closest(title, "div")?
        .ok_or_else(|| fail("Task Manager is not inside a div"))?;
    ensure(
        instance.parent(title).is_some(),
        "Task Manager has no parent element",
    )?;
    Ok("title inside a container".to_string())
}

/// M07-002: Header Heading
fn run_m07_002(ctx: &GradingContext) -> CheckOutcome {
    let instance = manager(ctx);
    let title = instance.get_by_text("Task Manager")?;
    let tag = instance.document().tag_name(title).unwrap_or_default();
    ensure(tag == "h1", format!("Task Manager is a <{}>, expected <h1>", tag))?;
    Ok("h1 heading".to_string())
}

/// M07-003: Task Input
fn run_m07_003(ctx: &GradingContext) -> CheckOutcome {
    manager(ctx).get_by_placeholder(TextMatch::pattern("(?i)what needs to be done")?)?;
    Ok("input rendered".to_string())
}

/// M07-004: Add Button
fn run_m07_004(ctx: &GradingContext) -> CheckOutcome {
    manager(ctx).get_by_text("Add Task")?;
    Ok("add button rendered".to_string())
}

/// M07-005: Add Task
fn run_m07_005(ctx: &GradingContext) -> CheckOutcome {
    add_task(&mut manager(ctx), "Test task")?;
    Ok("task added".to_string())
}

/// M07-006: Task Checkboxes
fn run_m07_006(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = manager(ctx);
    add_task(&mut instance, "Test task")?;
    let boxes = instance.get_all_by_role("checkbox")?;
    Ok(format!("{} checkbox(es)", boxes.len()))
}

/// M07-007: Delete Buttons
fn run_m07_007(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = manager(ctx);
    add_task(&mut instance, "Test task")?;
    instance.get_by_text("Delete")?;
    Ok("delete button rendered".to_string())
}

/// M07-008: Toggle Completion
fn run_m07_008(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = manager(ctx);
    add_task(&mut instance, "Test task")?;
    let checkbox = instance.get_by_role("checkbox")?;
    instance.click(checkbox)?;
    instance.get_by_text("Test task")?;
    let checkbox = instance.get_by_role("checkbox")?;
    ensure(instance.is_checked(checkbox), "checkbox did not become checked")?;
    Ok("completed task still shown".to_string())
}

/// M07-009: Delete Task
fn run_m07_009(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = manager(ctx);
    add_task(&mut instance, "Test task")?;
    click_text(&mut instance, "Delete")?;
    absent(&instance, "Test task")?;
    Ok("task deleted".to_string())
}

/// M07-010: Filter Buttons
fn run_m07_010(ctx: &GradingContext) -> CheckOutcome {
    let instance = manager(ctx);
    for filter in ["All", "Active", "Completed"] {
        instance.get_by_text(filter)?;
    }
    Ok("three filters".to_string())
}

/// M07-011: Active Filter
fn run_m07_011(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = one_of_two_done(ctx)?;
    click_text(&mut instance, "Active")?;
    absent(&instance, "Task 1")?;
    instance.get_by_text("Task 2")?;
    Ok("only active tasks shown".to_string())
}

/// M07-012: Completed Filter
fn run_m07_012(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = one_of_two_done(ctx)?;
    click_text(&mut instance, "Completed")?;
    instance.get_by_text("Task 1")?;
    absent(&instance, "Task 2")?;
    Ok("only completed tasks shown".to_string())
}

/// M07-013: Remaining Counter
fn run_m07_013(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = manager(ctx);
    expect_text(&instance, "(?i)0 tasks remaining")?;
    add_task(&mut instance, "Task 1")?;
    expect_text(&instance, "(?i)1 task remaining")?;
    add_task(&mut instance, "Task 2")?;
    expect_text(&instance, "(?i)2 tasks remaining")?;
    Ok("0, 1 and 2 remaining".to_string())
}

/// M07-014: Completed Not Counted
fn run_m07_014(ctx: &GradingContext) -> CheckOutcome {
    let instance = one_of_two_done(ctx)?;
    expect_text(&instance, "(?i)1 task remaining")?;
    Ok("1 task remaining".to_string())
}

/// M07-015: Empty State
fn run_m07_015(ctx: &GradingContext) -> CheckOutcome {
    expect_text(&manager(ctx), "(?i)no tasks yet")?;
    Ok("empty state shown".to_string())
}

/// M07-016: Empty Active Filter
fn run_m07_016(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = manager(ctx);
    add_task(&mut instance, "Task 1")?;
    let checkbox = instance.get_by_role("checkbox")?;
    instance.click(checkbox)?;
    click_text(&mut instance, "Active")?;
    expect_text(&instance, "(?i)no active tasks")?;
    Ok("empty active message".to_string())
}

/// M07-017: Empty Completed Filter
fn run_m07_017(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = manager(ctx);
    click_text(&mut instance, "Completed")?;
    expect_text(&instance, "(?i)no completed tasks yet")?;
    Ok("empty completed message".to_string())
}

/// M07-018: Utility Classes
fn run_m07_018(ctx: &GradingContext) -> CheckOutcome {
    script_matches(
        ctx,
        r#"className=["{`][^"}`]*\b(?:p|px|py|m|mx|my|bg|text)-"#,
        "utility classes on className",
    )
}

/// M07-019: Card Styling
fn run_m07_019(ctx: &GradingContext) -> CheckOutcome {
    script_uses_all(ctx, &["rounded", "shadow"], "card styling")
}

/// M07-020: Responsive Prefixes
fn run_m07_020(ctx: &GradingContext) -> CheckOutcome {
    script_matches(ctx, r"\b(?:sm|md|lg|xl):[a-z]", "responsive prefixes")
}

/// M07-021: Hover States
fn run_m07_021(ctx: &GradingContext) -> CheckOutcome {
    script_matches(ctx, r"\bhover:[a-z]", "hover variants")
}

/// M07-022: Focus States
fn run_m07_022(ctx: &GradingContext) -> CheckOutcome {
    script_matches(ctx, r"\bfocus:[a-z]", "focus variants")
}

/// M07-023: Colour Palette
fn run_m07_023(ctx: &GradingContext) -> CheckOutcome {
    script_matches(ctx, r"\bbg-blue-\d{3}\b", "blue buttons")?;
    script_matches(ctx, r"\bbg-red-\d{3}\b", "red delete buttons")
}
