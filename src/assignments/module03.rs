//! Module 3: To-Do List Application.

use crate::assignments::script_uses_any;
use crate::checks::markup::require_count_at_least;
use crate::checks::{fail, CheckOutcome};
use crate::engine::context::GradingContext;
use crate::engine::orchestrator::RegisteredCheck;
use crate::CheckCategory;

/// Get all module 3 checks
pub fn checks() -> Vec<RegisteredCheck> {
    use CheckCategory::*;
    vec![
        RegisteredCheck::new(
            "M03-001",
            "Todo Form",
            HtmlStructure,
            "A form with id todo-form",
            run_m03_001,
        ),
        RegisteredCheck::new(
            "M03-002",
            "Todo Input",
            HtmlStructure,
            "An input with id todo-input",
            run_m03_002,
        ),
        RegisteredCheck::new(
            "M03-003",
            "Todo List",
            HtmlStructure,
            "A list with id todo-list",
            run_m03_003,
        ),
        RegisteredCheck::new(
            "M03-004",
            "Filter Buttons",
            HtmlStructure,
            "At least three .filter-btn buttons",
            run_m03_004,
        ),
        RegisteredCheck::new(
            "M03-005",
            "Arrays",
            JavaScript,
            "Uses arrays",
            run_m03_005,
        ),
        RegisteredCheck::new(
            "M03-006",
            "Event Listeners",
            JavaScript,
            "Uses addEventListener",
            run_m03_006,
        ),
        RegisteredCheck::new(
            "M03-007",
            "Modern Declarations",
            JavaScript,
            "Uses let or const",
            run_m03_007,
        ),
        RegisteredCheck::new(
            "M03-008",
            "Functions",
            JavaScript,
            "Defines functions for todo operations",
            run_m03_008,
        ),
        RegisteredCheck::new(
            "M03-009",
            "DOM Manipulation",
            JavaScript,
            "Reads or writes the DOM",
            run_m03_009,
        ),
    ]
}

fn element_with_id(ctx: &GradingContext, id: &str) -> CheckOutcome {
    let doc = ctx.document()?;
    match doc.get_element_by_id(id) {
        Some(node) => Ok(format!("#{} is {}", id, doc.describe(node))),
        None => Err(fail(format!("no element with id \"{}\"", id))),
    }
}

/// M03-001: Todo Form
fn run_m03_001(ctx: &GradingContext) -> CheckOutcome {
    element_with_id(ctx, "todo-form")
}

/// M03-002: Todo Input
fn run_m03_002(ctx: &GradingContext) -> CheckOutcome {
    element_with_id(ctx, "todo-input")
}

/// M03-003: Todo List
fn run_m03_003(ctx: &GradingContext) -> CheckOutcome {
    element_with_id(ctx, "todo-list")
}

/// M03-004: Filter Buttons
fn run_m03_004(ctx: &GradingContext) -> CheckOutcome {
    let buttons = require_count_at_least(ctx.document()?, ".filter-btn", 3, "filter buttons")?;
    Ok(format!("{} filter buttons", buttons.len()))
}

/// M03-005: Arrays
fn run_m03_005(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["[]", "Array"], "array usage")
}

/// M03-006: Event Listeners
fn run_m03_006(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["addEventListener"], "event listener")
}

/// M03-007: Modern Declarations
fn run_m03_007(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["let ", "const "], "let/const declarations")
}

/// M03-008: Functions
fn run_m03_008(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["function", "=>"], "function definitions")
}

/// M03-009: DOM Manipulation
fn run_m03_009(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["document.", "createElement"], "DOM manipulation")
}

#[cfg(test)]
mod tests {
    use crate::assignments::testing::{grade, problems};
    use crate::submission::ArtifactKind::{Markup, Script};

    const HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
  <form id="todo-form"><input id="todo-input"><button>Add</button></form>
  <div>
    <button class="filter-btn">All</button>
    <button class="filter-btn">Active</button>
    <button class="filter-btn">Completed</button>
  </div>
  <ul id="todo-list"></ul>
  <script src="script.js"></script>
</body>
</html>"#;

    const JS: &str = r#"let todos = [];
const form = document.getElementById('todo-form');
form.addEventListener('submit', (event) => {
  event.preventDefault();
  const li = document.createElement('li');
  todos.push(li);
});
"#;

    #[test]
    fn todo_app_passes() {
        let report = grade("module-03", &[(Markup, HTML), (Script, JS)]);
        assert!(problems(&report).is_empty(), "{:?}", problems(&report));
    }

    #[test]
    fn missing_ids_and_filters_fail() {
        let html = HTML
            .replace(r#" id="todo-list""#, "")
            .replace(r#"class="filter-btn">Completed"#, r#"class="btn">Completed"#);
        let report = grade("module-03", &[(Markup, &html), (Script, JS)]);
        assert_eq!(problems(&report), vec!["M03-003", "M03-004"]);
        let failure = report.find("M03-004").unwrap().result.as_ref().unwrap().to_string();
        assert!(failure.contains("found 2"), "{}", failure);
    }

    #[test]
    fn commented_out_listener_does_not_count() {
        let js = "let todos = [];\n// form.addEventListener('submit', add)\nfunction add() { document.title = 'x'; }";
        let report = grade("module-03", &[(Markup, HTML), (Script, js)]);
        assert_eq!(problems(&report), vec!["M03-006"]);
    }
}
