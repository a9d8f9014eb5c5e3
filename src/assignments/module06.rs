//! Module 6: Task Manager with Hooks.
//!
//! The task manager is mounted against a fresh local storage for every
//! check. Storage contents are inspected directly for the persistence
//! checks; everything else goes through the rendered document.

use crate::assignments::{absent, click_text, script_uses_any};
use crate::checks::{ensure, fail, CheckError, CheckOutcome, Failure};
use crate::components::tasks::{TASKS_KEY, THEME_KEY};
use crate::components::{Task, TaskManagerOptions};
use crate::engine::context::GradingContext;
use crate::engine::orchestrator::RegisteredCheck;
use crate::error::GraderError;
use crate::interactive::{Instance, LocalStorage, Mount, TextMatch};
use crate::CheckCategory;

type Step = std::result::Result<(), CheckError>;

/// Get all module 6 checks
pub fn checks() -> Vec<RegisteredCheck> {
    use CheckCategory::{Components, Hooks, TypeScript};
    vec![
        RegisteredCheck::new(
            "M06-001",
            "Light Theme Default",
            Hooks,
            "Starts in the light theme",
            run_m06_001,
        ),
        RegisteredCheck::new(
            "M06-002",
            "Theme Persistence",
            Hooks,
            "Switching theme writes it to storage",
            run_m06_002,
        ),
        RegisteredCheck::new(
            "M06-003",
            "Restore From Storage",
            Hooks,
            "Tasks and theme are read back on mount",
            run_m06_003,
        ),
        RegisteredCheck::new(
            "M06-004",
            "Empty Statistics",
            Hooks,
            "Statistics are all zero with no tasks",
            run_m06_004,
        ),
        RegisteredCheck::new(
            "M06-005",
            "Task Statistics",
            Hooks,
            "Totals and completion rate follow the task list",
            run_m06_005,
        ),
        RegisteredCheck::new(
            "M06-006",
            "Add Task",
            Components,
            "A submitted title appears in the list",
            run_m06_006,
        ),
        RegisteredCheck::new(
            "M06-007",
            "Empty Title Ignored",
            Components,
            "Submitting without a title adds nothing",
            run_m06_007,
        ),
        RegisteredCheck::new(
            "M06-008",
            "Toggle Completion",
            Components,
            "The checkbox marks a task complete",
            run_m06_008,
        ),
        RegisteredCheck::new(
            "M06-009",
            "Delete Task",
            Components,
            "Delete removes the task",
            run_m06_009,
        ),
        RegisteredCheck::new(
            "M06-010",
            "Filter By Status",
            Components,
            "Active and Completed filters narrow the list",
            run_m06_010,
        ),
        RegisteredCheck::new(
            "M06-011",
            "Persist Tasks",
            Hooks,
            "Tasks are saved to storage as JSON",
            run_m06_011,
        ),
        RegisteredCheck::new(
            "M06-012",
            "Renders All Parts",
            Components,
            "Header, form, filters and statistics render",
            run_m06_012,
        ),
        RegisteredCheck::new(
            "M06-013",
            "Complete Workflow",
            Components,
            "Add, complete, filter and delete in sequence",
            run_m06_013,
        ),
        RegisteredCheck::new(
            "M06-014",
            "Context Provider",
            TypeScript,
            "Creates a context and exposes a provider",
            run_m06_014,
        ),
        RegisteredCheck::new(
            "M06-015",
            "Context Consumer Hook",
            TypeScript,
            "Reads the context with useContext",
            run_m06_015,
        ),
        RegisteredCheck::new(
            "M06-016",
            "State Hook",
            TypeScript,
            "Holds tasks with useReducer or useState",
            run_m06_016,
        ),
        RegisteredCheck::new(
            "M06-017",
            "Storage Hook",
            TypeScript,
            "Persists through localStorage",
            run_m06_017,
        )
        .advisory(),
    ]
}

fn manager(ctx: &GradingContext, storage: &LocalStorage) -> Instance {
    let component = ctx.kit().task_manager(TaskManagerOptions::hooks());
    ctx.mount_with(Mount::boxed(component).with_storage(storage.clone()))
}

fn fresh_manager(ctx: &GradingContext) -> (Instance, LocalStorage) {
    let storage = LocalStorage::new();
    (manager(ctx, &storage), storage)
}

fn add_task(instance: &mut Instance, title: &str) -> Step {
    let input = instance.get_by_placeholder(TextMatch::pattern("(?i)task title")?)?;
    instance.change(input, title)?;
    let submit = instance.get_by_text(TextMatch::pattern("(?i)add task")?)?;
    instance.click(submit)?;
    let title = title.to_string();
    instance.wait_for(|i| i.get_by_text(title.as_str()))?;
    Ok(())
}

fn delete_button() -> crate::error::Result<TextMatch> {
    TextMatch::pattern("Delete|×")
}

fn only_checkbox_checked(instance: &Instance) -> std::result::Result<(), Failure> {
    let checkbox = instance.get_by_role("checkbox")?;
    if instance.is_checked(checkbox) {
        Ok(())
    } else {
        Err(Failure::new("checkbox is not checked"))
    }
}

fn expect_stat(instance: &Instance, test_id: &str, expected: &str) -> Step {
    let node = instance.get_by_test_id(test_id)?;
    let shown = instance.text(node);
    ensure(
        shown.contains(expected),
        format!("{} shows \"{}\", expected {}", test_id, shown, expected),
    )
}

/// M06-001: Light Theme Default
fn run_m06_001(ctx: &GradingContext) -> CheckOutcome {
    let (instance, _) = fresh_manager(ctx);
    instance.get_by_text(TextMatch::pattern("(?i)task manager")?)?;
    instance.get_by_text(TextMatch::pattern("(?i)switch to dark")?)?;
    Ok("light theme on first render".to_string())
}

/// M06-002: Theme Persistence
fn run_m06_002(ctx: &GradingContext) -> CheckOutcome {
    let (mut instance, storage) = fresh_manager(ctx);
    click_text(&mut instance, TextMatch::pattern("(?i)switch to")?)?;
    let stored = instance.wait_for(|_| {
        storage
            .get_item(THEME_KEY)
            .ok_or_else(|| Failure::new("theme not written to storage"))
    })?;
    Ok(format!("theme stored as {}", stored))
}

/// M06-003: Restore From Storage
fn run_m06_003(ctx: &GradingContext) -> CheckOutcome {
    let storage = LocalStorage::new();
    let saved = vec![Task {
        id: 1,
        title: "stored-value".to_string(),
        description: String::new(),
        completed: true,
        created_at: 0,
    }];
    let json = serde_json::to_string(&saved).map_err(GraderError::from)?;
    storage.set_item(TASKS_KEY, json);
    storage.set_item(THEME_KEY, "\"dark\"");

    let instance = manager(ctx, &storage);
    instance.get_by_text("stored-value")?;
    let checkbox = instance.get_by_role("checkbox")?;
    ensure(
        instance.is_checked(checkbox),
        "restored task lost its completed flag",
    )?;
    instance.get_by_text(TextMatch::pattern("(?i)switch to light")?)?;
    Ok("stored task and dark theme restored".to_string())
}

/// M06-004: Empty Statistics
fn run_m06_004(ctx: &GradingContext) -> CheckOutcome {
    let (instance, _) = fresh_manager(ctx);
    for id in ["total", "active", "completed", "percentage"] {
        expect_stat(&instance, id, "0")?;
    }
    Ok("all statistics are 0".to_string())
}

/// M06-005: Task Statistics
fn run_m06_005(ctx: &GradingContext) -> CheckOutcome {
    let (mut instance, _) = fresh_manager(ctx);
    for title in ["Task 1", "Task 2", "Task 3"] {
        add_task(&mut instance, title)?;
    }
    let first = instance.get_all_by_role("checkbox")?[0];
    instance.click(first)?;
    let rate = TextMatch::pattern("33%|34%")?;
    instance.wait_for(|i| i.get_by_text(rate.clone()))?;
    expect_stat(&instance, "total", "3")?;
    expect_stat(&instance, "active", "2")?;
    expect_stat(&instance, "completed", "1")?;
    Ok("3 total, 2 active, 1 completed, 33%".to_string())
}

/// M06-006: Add Task
fn run_m06_006(ctx: &GradingContext) -> CheckOutcome {
    let (mut instance, _) = fresh_manager(ctx);
    add_task(&mut instance, "Test Task")?;
    Ok("task added".to_string())
}

/// M06-007: Empty Title Ignored
fn run_m06_007(ctx: &GradingContext) -> CheckOutcome {
    let (mut instance, _) = fresh_manager(ctx);
    let before = instance.query_all_by_role("checkbox").len();
    click_text(&mut instance, TextMatch::pattern("(?i)add task")?)?;
    let after = instance.query_all_by_role("checkbox").len();
    ensure(
        after == before,
        format!("task count went from {} to {} on an empty submit", before, after),
    )?;
    Ok("empty title ignored".to_string())
}

/// M06-008: Toggle Completion
fn run_m06_008(ctx: &GradingContext) -> CheckOutcome {
    let (mut instance, _) = fresh_manager(ctx);
    add_task(&mut instance, "Test Task")?;
    let checkbox = instance.get_by_role("checkbox")?;
    ensure(
        !instance.is_checked(checkbox),
        "a new task starts out completed",
    )?;
    instance.click(checkbox)?;
    instance.wait_for(only_checkbox_checked)?;
    Ok("task marked complete".to_string())
}

/// M06-009: Delete Task
fn run_m06_009(ctx: &GradingContext) -> CheckOutcome {
    let (mut instance, _) = fresh_manager(ctx);
    add_task(&mut instance, "Test Task")?;
    click_text(&mut instance, delete_button()?)?;
    instance.wait_for(|i| absent(i, "Test Task"))?;
    Ok("task deleted".to_string())
}

/// M06-010: Filter By Status
fn run_m06_010(ctx: &GradingContext) -> CheckOutcome {
    let (mut instance, _) = fresh_manager(ctx);
    add_task(&mut instance, "Task 1")?;
    add_task(&mut instance, "Task 2")?;
    let first = instance.get_all_by_role("checkbox")?[0];
    instance.click(first)?;

    click_text(&mut instance, "Active")?;
    instance.wait_for(|i| {
        absent(i, "Task 1")?;
        i.get_by_text("Task 2").map(|_| ())
    })?;

    click_text(&mut instance, "Completed")?;
    instance.wait_for(|i| {
        absent(i, "Task 2")?;
        i.get_by_text("Task 1").map(|_| ())
    })?;
    Ok("Active and Completed filters apply".to_string())
}

/// M06-011: Persist Tasks
fn run_m06_011(ctx: &GradingContext) -> CheckOutcome {
    let (mut instance, storage) = fresh_manager(ctx);
    add_task(&mut instance, "Persistent Task")?;
    let saved: Vec<Task> = storage
        .get_json(TASKS_KEY)
        .ok_or_else(|| fail("no parseable task list in storage"))?;
    ensure(
        saved.len() == 1,
        format!("{} tasks stored, expected 1", saved.len()),
    )?;
    ensure(
        saved[0].title == "Persistent Task",
        format!("stored title is \"{}\"", saved[0].title),
    )?;
    Ok("task list persisted".to_string())
}

/// M06-012: Renders All Parts
fn run_m06_012(ctx: &GradingContext) -> CheckOutcome {
    let (instance, _) = fresh_manager(ctx);
    instance.get_by_text(TextMatch::pattern("(?i)task manager")?)?;
    instance.get_by_placeholder(TextMatch::pattern("(?i)task title")?)?;
    for filter in ["All", "Active", "Completed"] {
        instance.get_by_text(filter)?;
    }
    instance.get_by_text(TextMatch::pattern("(?i)total")?)?;
    Ok("header, form, filters and statistics".to_string())
}

/// M06-013: Complete Workflow
fn run_m06_013(ctx: &GradingContext) -> CheckOutcome {
    let title = "Complete Workflow Task";
    let (mut instance, _) = fresh_manager(ctx);
    add_task(&mut instance, title)?;

    let checkbox = instance.get_by_role("checkbox")?;
    instance.click(checkbox)?;
    instance.wait_for(only_checkbox_checked)?;

    click_text(&mut instance, "Completed")?;
    instance.wait_for(|i| i.get_by_text(title))?;

    click_text(&mut instance, delete_button()?)?;
    instance.wait_for(|i| absent(i, title))?;
    Ok("add, complete, filter, delete".to_string())
}

/// M06-014: Context Provider
fn run_m06_014(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["createContext"], "context creation")?;
    script_uses_any(ctx, &["Provider"], "context provider")
}

/// M06-015: Context Consumer Hook
fn run_m06_015(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["useContext("], "context consumer")
}

/// M06-016: State Hook
fn run_m06_016(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["useReducer(", "useState("], "state hook")
}

/// M06-017: Storage Hook
fn run_m06_017(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["useLocalStorage", "localStorage"], "local storage")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignments::testing::{grade, grade_with_kit, problems, status};
    use crate::components::{ComponentKit, TaskManager};
    use crate::interactive::Component;
    use crate::submission::ArtifactKind::Script;
    use std::rc::Rc;

    const CONTEXT: &str = r#"
import { createContext, useContext, useReducer, ReactNode } from 'react';
import { useLocalStorage } from '../hooks/useLocalStorage';

const TaskContext = createContext<TaskContextType | undefined>(undefined);

export function TaskProvider({ children }: { children: ReactNode }) {
  const [stored, setStored] = useLocalStorage<Task[]>('tasks', []);
  const [tasks, dispatch] = useReducer(taskReducer, stored);
  return <TaskContext.Provider value={{ tasks, dispatch }}>{children}</TaskContext.Provider>;
}

export function useTasks() {
  const context = useContext(TaskContext);
  if (!context) throw new Error('useTasks must be used within TaskProvider');
  return context;
}
"#;

    /// Keeps everything in memory.
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

    #[test]
    fn reference_kit_passes() {
        let report = grade("module-06", &[(Script, CONTEXT)]);
        assert!(problems(&report).is_empty(), "{:?}", problems(&report));
    }

    #[test]
    fn in_memory_state_fails_persistence() {
        let report = grade_with_kit("module-06", &[(Script, CONTEXT)], Rc::new(ForgetfulKit));
        assert_eq!(problems(&report), vec!["M06-002", "M06-003", "M06-011"]);
        assert_eq!(status(&report, "M06-010"), "pass");
    }

    #[test]
    fn prop_drilling_fails_context_checks() {
        let source = "export function App() { const [tasks, setTasks] = useState([]); }";
        let report = grade("module-06", &[(Script, source)]);
        assert_eq!(problems(&report), vec!["M06-014", "M06-015", "M06-017"]);
        assert_eq!(status(&report, "M06-017"), "warn");
    }

    #[test]
    fn stat_mismatch_is_described() {
        let storage = LocalStorage::new();
        let instance = Mount::new(TaskManager::new(TaskManagerOptions::hooks()))
            .with_storage(storage)
            .mount(Default::default());
        let err = expect_stat(&instance, "total", "5").unwrap_err();
        assert_eq!(err.to_string(), "total shows \"0\", expected 5");
    }
}
