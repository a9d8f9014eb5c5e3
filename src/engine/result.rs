//! Result aggregation and reporting.
//!
//! Collects check results, generates summaries, and supports baseline comparison.

use crate::error::{GraderError, Result};
use crate::{Check, CheckCategory, CheckResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

fn summarize(checks: &[Check]) -> ResultSummary {
    let mut summary = ResultSummary::default();
    for check in checks {
        summary.total += 1;
        match &check.result {
            Some(CheckResult::Pass { duration_ms, .. }) => {
                summary.passed += 1;
                summary.total_duration_ms += duration_ms;
            }
            Some(CheckResult::Warn { duration_ms, .. }) => {
                summary.warned += 1;
                summary.total_duration_ms += duration_ms;
            }
            Some(CheckResult::Fail { duration_ms, .. }) => {
                summary.failed += 1;
                summary.total_duration_ms += duration_ms;
            }
            Some(CheckResult::Skip { .. }) | None => summary.skipped += 1,
        }
    }
    summary
}

/// Grading report for one module submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    pub module_id: String,
    pub module_title: String,
    pub submission_dir: PathBuf,
    /// RFC 3339
    pub timestamp: String,
    pub checks: Vec<Check>,
    pub total_duration_ms: u64,
}

impl GradingReport {
    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        summarize(&self.checks)
    }

    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|c| c.result.as_ref().map_or(false, CheckResult::is_failure))
    }

    /// `(check id, status)` pairs, free of timing data.
    pub fn outcomes(&self) -> Vec<(String, String)> {
        self.checks
            .iter()
            .map(|c| {
                let status = c.result.as_ref().map_or("skip", CheckResult::status);
                (c.id.clone(), status.to_string())
            })
            .collect()
    }

    /// Categories in order of first appearance.
    pub fn categories(&self) -> Vec<CheckCategory> {
        let mut seen = Vec::new();
        for check in &self.checks {
            if !seen.contains(&check.category) {
                seen.push(check.category);
            }
        }
        seen
    }

    /// Distinct component kits used by the run's checks.
    pub fn component_kits(&self) -> Vec<&str> {
        let mut kits: Vec<&str> = Vec::new();
        for kit in self.checks.iter().filter_map(|c| c.component_kit.as_deref()) {
            if !kits.contains(&kit) {
                kits.push(kit);
            }
        }
        kits
    }

    pub fn by_category(&self, category: CheckCategory) -> Vec<&Check> {
        self.checks.iter().filter(|c| c.category == category).collect()
    }

    pub fn failures(&self) -> Vec<&Check> {
        self.checks
            .iter()
            .filter(|c| matches!(&c.result, Some(CheckResult::Fail { .. })))
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.id == id)
    }

    /// Compare against a baseline report
    pub fn compare_to_baseline(&self, baseline: &GradingReport) -> ComparisonResult {
        compare(&self.checks, &baseline.checks)
    }
}

/// Baseline comparison result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub new_failures: Vec<String>,
    pub new_warnings: Vec<String>,
    pub resolved: Vec<String>,
    pub regressions: Vec<String>,
    pub unchanged: Vec<String>,
}

impl ComparisonResult {
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty() || !self.new_failures.is_empty()
    }
}

fn compare(current: &[Check], baseline: &[Check]) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    let baseline_results: HashMap<&str, &'static str> = baseline
        .iter()
        .filter_map(|c| c.result.as_ref().map(|r| (c.id.as_str(), r.status())))
        .collect();

    for check in current {
        let current_status = check.result.as_ref().map(CheckResult::status);
        let baseline_status = baseline_results.get(check.id.as_str()).copied();

        match (baseline_status, current_status) {
            (Some("pass"), Some("fail")) | (Some("warn"), Some("fail")) => {
                result.regressions.push(check.id.clone())
            }
            (Some("pass"), Some("warn")) => result.new_warnings.push(check.id.clone()),
            (Some("fail"), Some("pass")) | (Some("warn"), Some("pass")) => {
                result.resolved.push(check.id.clone())
            }
            (None, Some("fail")) | (Some("skip"), Some("fail")) => {
                result.new_failures.push(check.id.clone())
            }
            (None, Some("warn")) | (Some("skip"), Some("warn")) => {
                result.new_warnings.push(check.id.clone())
            }
            _ => result.unchanged.push(check.id.clone()),
        }
    }

    result
}

/// Result aggregator for collecting check results
#[derive(Debug, Default)]
pub struct ResultAggregator {
    checks: Vec<Check>,
    total_duration_ms: u64,
}

impl ResultAggregator {
    /// Create a new result aggregator
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_total_duration(&mut self, total_duration_ms: u64) {
        self.total_duration_ms = total_duration_ms;
    }

    /// Add a completed check result
    pub fn add_result(&mut self, check: Check) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Check if there are any failures
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(&c.result, Some(CheckResult::Fail { .. })))
    }

    /// Get summary statistics
    pub fn get_summary(&self) -> ResultSummary {
        summarize(&self.checks)
    }

    /// Get only warning checks
    pub fn get_warnings(&self) -> Vec<&Check> {
        self.checks
            .iter()
            .filter(|c| matches!(&c.result, Some(CheckResult::Warn { .. })))
            .collect()
    }

    /// Create final grading report
    pub fn into_report(self, module_id: &str, module_title: &str, submission_dir: &Path) -> GradingReport {
        GradingReport {
            module_id: module_id.to_string(),
            module_title: module_title.to_string(),
            submission_dir: submission_dir.to_path_buf(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            checks: self.checks,
            total_duration_ms: self.total_duration_ms,
        }
    }
}

/// Save grading reports as a JSON baseline
pub fn save_baseline(reports: &[GradingReport], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    std::fs::write(path, json).map_err(|e| GraderError::io(format!("writing baseline {}", path.display()), e))
}

/// Load grading reports from a JSON baseline.
///
/// Accepts either a single report object or an array of reports, so both
/// `--format json` output shapes can be used as baselines.
pub fn load_baseline(path: &Path) -> Result<Vec<GradingReport>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GraderError::io(format!("reading baseline {}", path.display()), e))?;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Baseline {
        Many(Vec<GradingReport>),
        One(Box<GradingReport>),
    }

    Ok(match serde_json::from_str(&content)? {
        Baseline::Many(reports) => reports,
        Baseline::One(report) => vec![*report],
    })
}
