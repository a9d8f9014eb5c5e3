//! Curriculum catalog
//!
//! One entry per module: where its fixtures live under `homework/` and which
//! check battery grades it.

use crate::assignments;
use crate::engine::orchestrator::RegisteredCheck;
use crate::error::{GraderError, Result};
use crate::submission::{ArtifactKind, ArtifactSpec, FixtureLayout};
use crate::FixtureOverride;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-module directory that holds the submission.
pub const HOMEWORK_DIR: &str = "homework";

/// A fixture the assignment expects: kind, path under `homework/`, required.
pub type ArtifactDecl = (ArtifactKind, &'static str, bool);

/// Static description of one assignment.
#[derive(Debug, Clone, Copy)]
pub struct AssignmentSpec {
    /// Module identifier (e.g., "module-01")
    pub id: &'static str,
    pub title: &'static str,
    pub artifacts: &'static [ArtifactDecl],
    pub checks: fn() -> Vec<RegisteredCheck>,
}

impl AssignmentSpec {
    pub fn layout(&self) -> FixtureLayout {
        FixtureLayout::new(
            self.artifacts
                .iter()
                .map(|(kind, path, required)| {
                    if *required {
                        ArtifactSpec::required(*kind, *path)
                    } else {
                        ArtifactSpec::optional(*kind, *path)
                    }
                })
                .collect(),
        )
    }

    /// Number of checks in the battery.
    pub fn check_count(&self) -> usize {
        (self.checks)().len()
    }
}

const MARKUP: &str = "starter/index.html";
const STYLESHEET: &str = "starter/styles.css";
const SCRIPT: &str = "starter/script.js";

static CATALOG: [AssignmentSpec; 8] = [
    AssignmentSpec {
        id: "module-01",
        title: "Personal Profile Page",
        artifacts: &[
            (ArtifactKind::Markup, MARKUP, true),
            (ArtifactKind::Stylesheet, STYLESHEET, true),
        ],
        checks: assignments::module01::checks,
    },
    AssignmentSpec {
        id: "module-02",
        title: "Responsive Interactive Portfolio",
        artifacts: &[
            (ArtifactKind::Markup, MARKUP, true),
            (ArtifactKind::Stylesheet, STYLESHEET, true),
            (ArtifactKind::Script, SCRIPT, true),
        ],
        checks: assignments::module02::checks,
    },
    AssignmentSpec {
        id: "module-03",
        title: "To-Do List Application",
        artifacts: &[
            (ArtifactKind::Markup, MARKUP, true),
            (ArtifactKind::Script, SCRIPT, true),
        ],
        checks: assignments::module03::checks,
    },
    AssignmentSpec {
        id: "module-04",
        title: "Typed Utility Functions",
        artifacts: &[(ArtifactKind::Script, "starter/index.ts", true)],
        checks: assignments::module04::checks,
    },
    AssignmentSpec {
        id: "module-05",
        title: "Component Library",
        artifacts: &[(ArtifactKind::Script, "starter/src/App.tsx", false)],
        checks: assignments::module05::checks,
    },
    AssignmentSpec {
        id: "module-06",
        title: "Task Manager with Hooks",
        artifacts: &[(ArtifactKind::Script, "starter/src/context/TaskContext.tsx", false)],
        checks: assignments::module06::checks,
    },
    AssignmentSpec {
        id: "module-07",
        title: "Task Manager Styling",
        artifacts: &[(ArtifactKind::Script, "starter/src/App.tsx", false)],
        checks: assignments::module07::checks,
    },
    AssignmentSpec {
        id: "module-08",
        title: "Product Search Application",
        artifacts: &[(ArtifactKind::Script, "starter/src/lib/products.ts", false)],
        checks: assignments::module08::checks,
    },
];

/// Every assignment, in curriculum order.
pub fn catalog() -> &'static [AssignmentSpec] {
    &CATALOG
}

/// Canonical `module-NN` id for a module name.
///
/// Accepts the id itself, a directory name such as
/// `module-03-javascript`, or a bare number (`3`, `03`).
pub fn canonical_id(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    let number: u32 = match name.strip_prefix("module-") {
        Some(rest) => rest.get(..2)?.parse().ok()?,
        None => name.parse().ok()?,
    };
    CATALOG
        .iter()
        .find(|a| a.id.strip_prefix("module-").and_then(|n| n.parse::<u32>().ok()) == Some(number))
        .map(|a| a.id)
}

/// Look up an assignment by id, directory name or number.
pub fn find(name: &str) -> Option<&'static AssignmentSpec> {
    let id = canonical_id(name)?;
    CATALOG.iter().find(|a| a.id == id)
}

/// The assignment's layout with any configured path overrides applied.
pub fn layout_with_overrides(
    assignment: &AssignmentSpec,
    overrides: Option<&FixtureOverride>,
) -> FixtureLayout {
    let mut layout = assignment.layout();
    if let Some(overrides) = overrides {
        let paths = [
            (ArtifactKind::Markup, &overrides.markup),
            (ArtifactKind::Stylesheet, &overrides.stylesheet),
            (ArtifactKind::Script, &overrides.script),
        ];
        for (kind, path) in paths {
            if let Some(path) = path {
                layout.override_path(kind, path.as_str());
            }
        }
    }
    layout
}

/// A module directory found under a curriculum root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub module_id: &'static str,
    pub homework: PathBuf,
}

/// Find every `module-NN*/homework` directory directly under `root`,
/// sorted by module.
pub fn discover(root: &Path) -> Result<Vec<Discovered>> {
    let entries = std::fs::read_dir(root)
        .map_err(|e| GraderError::io(format!("reading curriculum root {}", root.display()), e))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GraderError::io(format!("reading {}", root.display()), e))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with("module-") {
            continue;
        }
        let Some(module_id) = canonical_id(name) else {
            debug!(dir = %path.display(), "not a curriculum module");
            continue;
        };
        let homework = path.join(HOMEWORK_DIR);
        if homework.is_dir() {
            found.push(Discovered { module_id, homework });
        } else {
            debug!(dir = %path.display(), "module has no homework directory");
        }
    }

    found.sort_by(|a, b| a.module_id.cmp(b.module_id).then_with(|| a.homework.cmp(&b.homework)));
    Ok(found)
}

/// Work out which module a target path belongs to and where its homework
/// directory is.
///
/// `target` may be a module directory, its `homework` directory, or any
/// directory when `module` names the assignment explicitly.
pub fn resolve_target(target: &Path, module: Option<&str>) -> Result<Discovered> {
    let homework = if target.file_name().and_then(|n| n.to_str()) == Some(HOMEWORK_DIR) {
        target.to_path_buf()
    } else if target.join(HOMEWORK_DIR).is_dir() {
        target.join(HOMEWORK_DIR)
    } else {
        target.to_path_buf()
    };

    let module_id = match module {
        Some(name) => canonical_id(name).ok_or_else(|| GraderError::UnknownModule(name.to_string()))?,
        None => homework
            .ancestors()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter(|n| n.starts_with("module-"))
            .find_map(canonical_id)
            .ok_or_else(|| {
                GraderError::UnknownModule(format!(
                    "cannot infer module from {}; pass --module",
                    target.display()
                ))
            })?,
    };

    Ok(Discovered { module_id, homework })
}
