//! course-grader library
//!
//! Static-assertion grading harness for a web-development curriculum.
//!
//! The harness loads a submission's markup, stylesheet and script text,
//! parses the markup into a queryable document, runs a fixed battery of
//! independent checks and aggregates the outcomes into a report:
//! - Structural checks over the parsed document
//! - Permissive pattern checks over stylesheet and script text
//! - Interactive checks that mount components on a virtual clock
//!
//! # Example
//!
//! ```no_run
//! use course_grader::{grade_module, GraderConfig};
//! use std::path::Path;
//!
//! let config = GraderConfig::default();
//! let report = grade_module(Path::new("module-01-html/homework"), "module-01", &config)
//!     .expect("grading failed");
//! println!("Checks passed: {}", report.summary().passed);
//! ```

pub mod assignments;
pub mod checks;
pub mod cli;
pub mod components;
pub mod config;
pub mod data;
pub mod dom;
pub mod engine;
pub mod error;
pub mod interactive;
pub mod submission;
pub mod version;

use components::{ComponentKit, ReferenceKit};
use data::curriculum::{self, AssignmentSpec};
use engine::context::GradingContext;
use engine::orchestrator::{CheckOrchestrator, OrchestratorConfig};
use interactive::InteractionSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;
use submission::{loader, Submission};
use tracing::info;

// Re-exports for public API
pub use engine::orchestrator::CheckOrchestrator as Orchestrator;
pub use engine::result::{ComparisonResult, GradingReport as Report, GradingReport, ResultSummary};
pub use error::{GraderError, Result};

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckResult {
    /// Requirement met
    Pass { message: String, duration_ms: u64 },
    /// Advisory requirement not met
    Warn {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// Requirement not met
    Fail {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// An optional artifact the check needs is absent
    Skip { reason: String },
}

impl CheckResult {
    /// Lowercase status word used in comparisons and JUnit output.
    pub fn status(&self) -> &'static str {
        match self {
            CheckResult::Pass { .. } => "pass",
            CheckResult::Warn { .. } => "warn",
            CheckResult::Fail { .. } => "fail",
            CheckResult::Skip { .. } => "skip",
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            CheckResult::Pass { duration_ms, .. }
            | CheckResult::Warn { duration_ms, .. }
            | CheckResult::Fail { duration_ms, .. } => *duration_ms,
            CheckResult::Skip { .. } => 0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CheckResult::Fail { .. })
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Pass { message, .. } => write!(f, "PASS: {}", message),
            CheckResult::Warn { message, details, .. } if details.is_empty() => {
                write!(f, "WARN: {}", message)
            }
            CheckResult::Warn { message, details, .. } => {
                write!(f, "WARN: {} ({})", message, details)
            }
            CheckResult::Fail { message, details, .. } if details.is_empty() => {
                write!(f, "FAIL: {}", message)
            }
            CheckResult::Fail { message, details, .. } => {
                write!(f, "FAIL: {} ({})", message, details)
            }
            CheckResult::Skip { reason } => write!(f, "SKIP: {}", reason),
        }
    }
}

/// Check category, used for grouping in reports and for `--category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckCategory {
    #[serde(rename = "html-structure")]
    HtmlStructure,
    #[serde(rename = "required-elements")]
    RequiredElements,
    #[serde(rename = "semantic-html")]
    SemanticHtml,
    #[serde(rename = "navigation")]
    Navigation,
    #[serde(rename = "content")]
    Content,
    #[serde(rename = "css-styling")]
    CssStyling,
    #[serde(rename = "css-layout")]
    CssLayout,
    #[serde(rename = "responsive-design")]
    ResponsiveDesign,
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "code-quality")]
    CodeQuality,
    #[serde(rename = "typescript")]
    TypeScript,
    #[serde(rename = "components")]
    Components,
    #[serde(rename = "hooks")]
    Hooks,
    #[serde(rename = "styling")]
    Styling,
    #[serde(rename = "data-fetching")]
    DataFetching,
}

impl CheckCategory {
    pub const ALL: [CheckCategory; 15] = [
        CheckCategory::HtmlStructure,
        CheckCategory::RequiredElements,
        CheckCategory::SemanticHtml,
        CheckCategory::Navigation,
        CheckCategory::Content,
        CheckCategory::CssStyling,
        CheckCategory::CssLayout,
        CheckCategory::ResponsiveDesign,
        CheckCategory::JavaScript,
        CheckCategory::CodeQuality,
        CheckCategory::TypeScript,
        CheckCategory::Components,
        CheckCategory::Hooks,
        CheckCategory::Styling,
        CheckCategory::DataFetching,
    ];

    /// Command-line spelling.
    pub fn slug(&self) -> &'static str {
        match self {
            CheckCategory::HtmlStructure => "html-structure",
            CheckCategory::RequiredElements => "required-elements",
            CheckCategory::SemanticHtml => "semantic-html",
            CheckCategory::Navigation => "navigation",
            CheckCategory::Content => "content",
            CheckCategory::CssStyling => "css-styling",
            CheckCategory::CssLayout => "css-layout",
            CheckCategory::ResponsiveDesign => "responsive-design",
            CheckCategory::JavaScript => "javascript",
            CheckCategory::CodeQuality => "code-quality",
            CheckCategory::TypeScript => "typescript",
            CheckCategory::Components => "components",
            CheckCategory::Hooks => "hooks",
            CheckCategory::Styling => "styling",
            CheckCategory::DataFetching => "data-fetching",
        }
    }
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::HtmlStructure => write!(f, "HTML Structure"),
            CheckCategory::RequiredElements => write!(f, "Required Elements"),
            CheckCategory::SemanticHtml => write!(f, "Semantic HTML"),
            CheckCategory::Navigation => write!(f, "Navigation"),
            CheckCategory::Content => write!(f, "Content"),
            CheckCategory::CssStyling => write!(f, "CSS Styling"),
            CheckCategory::CssLayout => write!(f, "CSS Layout"),
            CheckCategory::ResponsiveDesign => write!(f, "Responsive Design"),
            CheckCategory::JavaScript => write!(f, "JavaScript"),
            CheckCategory::CodeQuality => write!(f, "Code Quality"),
            CheckCategory::TypeScript => write!(f, "TypeScript"),
            CheckCategory::Components => write!(f, "Components"),
            CheckCategory::Hooks => write!(f, "Hooks"),
            CheckCategory::Styling => write!(f, "Styling"),
            CheckCategory::DataFetching => write!(f, "Data Fetching"),
        }
    }
}

impl FromStr for CheckCategory {
    type Err = GraderError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        CheckCategory::ALL
            .iter()
            .copied()
            .find(|c| c.slug() == wanted)
            .ok_or_else(|| GraderError::InvalidConfig(format!("unknown category: {}", s)))
    }
}

/// Whether a failing check fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Required,
    /// Failures are reported as warnings.
    Advisory,
}

/// A check definition with its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Unique identifier (e.g., "M01-004")
    pub id: String,
    pub name: String,
    pub category: CheckCategory,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    /// Result of the check (None if not yet executed)
    pub result: Option<CheckResult>,
    /// Component kit the check mounted, when it graded bundled components
    /// rather than the submission's own files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_kit: Option<String>,
}

/// Per-module fixture path overrides, relative to the homework directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureOverride {
    pub markup: Option<String>,
    pub stylesheet: Option<String>,
    pub script: Option<String>,
}

/// Configuration for a grading run.
#[derive(Debug, Clone)]
pub struct GraderConfig {
    /// Categories to run (None = all)
    pub categories: Option<Vec<CheckCategory>>,
    /// Specific checks to skip (by ID)
    pub skip_checks: Vec<String>,
    /// Specific checks to run (by ID)
    pub only_checks: Vec<String>,
    /// Per-check wall-clock budget in milliseconds
    pub timeout_ms: u64,
    pub interaction: InteractionSettings,
    /// Keyed by module id
    pub fixtures: BTreeMap<String, FixtureOverride>,
}

impl Default for GraderConfig {
    fn default() -> Self {
        GraderConfig {
            categories: None,
            skip_checks: Vec::new(),
            only_checks: Vec::new(),
            timeout_ms: 30000,
            interaction: InteractionSettings::default(),
            fixtures: BTreeMap::new(),
        }
    }
}

/// Grade an already-loaded submission against one assignment.
///
/// Selection follows the same precedence as the command line: `only`
/// wins over `skip`, which wins over `categories`.
pub fn grade_submission(
    assignment: &AssignmentSpec,
    submission: Submission,
    config: &GraderConfig,
    kit: Rc<dyn ComponentKit>,
) -> Result<GradingReport> {
    let context = GradingContext::new(submission, config.interaction, kit);

    let mut orchestrator = CheckOrchestrator::new(OrchestratorConfig {
        timeout_ms: config.timeout_ms,
    });
    orchestrator.register_checks((assignment.checks)());

    let run = if !config.only_checks.is_empty() {
        orchestrator.run_specific(&context, &config.only_checks)
    } else if !config.skip_checks.is_empty() {
        orchestrator.run_excluding(&context, &config.skip_checks)
    } else {
        match config.categories.as_deref() {
            Some(categories) if !categories.is_empty() => {
                orchestrator.run_categories(&context, categories)
            }
            _ => orchestrator.run_all(&context),
        }
    }?;

    Ok(run.into_report(assignment.id, assignment.title, context.submission().root()))
}

/// Load and grade the homework directory of one module.
pub fn grade_module(homework: &Path, module_id: &str, config: &GraderConfig) -> Result<GradingReport> {
    grade_module_with_kit(homework, module_id, config, Rc::new(ReferenceKit))
}

pub fn grade_module_with_kit(
    homework: &Path,
    module_id: &str,
    config: &GraderConfig,
    kit: Rc<dyn ComponentKit>,
) -> Result<GradingReport> {
    let assignment = curriculum::find(module_id)
        .ok_or_else(|| GraderError::UnknownModule(module_id.to_string()))?;
    let layout = curriculum::layout_with_overrides(assignment, config.fixtures.get(module_id));
    let submission = loader::load(homework, &layout)?;
    info!(module = module_id, kit = kit.name(), "grading {}", homework.display());
    grade_submission(assignment, submission, config, kit)
}

/// Discover every `module-NN*/homework` directory under `root` and grade each.
pub fn grade_curriculum(root: &Path, config: &GraderConfig) -> Result<Vec<GradingReport>> {
    let discovered = curriculum::discover(root)?;
    if discovered.is_empty() {
        return Err(GraderError::NothingToGrade(root.to_path_buf()));
    }
    discovered
        .iter()
        .map(|found| grade_module(&found.homework, found.module_id, config))
        .collect()
}
