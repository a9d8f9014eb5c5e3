//! Check execution orchestrator.
//!
//! Manages check registration, selection and execution.
//!
//! # Graceful Degradation
//!
//! - Check panics: caught via `std::panic::catch_unwind`, converted to a Fail result
//! - Check over budget: Fail result naming the elapsed time
//! - Unmet requirement: Fail, or Warn for advisory checks
//! - Optional artifact absent: Skip
//! - Invalid check ID: silently skipped in run_specific/run_excluding
//! - Empty check list: returns an empty aggregate (not an error)
//!
//! Harness errors raised by a check (a malformed selector or pattern) abort
//! the run, since every later result would be equally untrustworthy.

use crate::checks::{CheckError, CheckOutcome};
use crate::engine::context::GradingContext;
use crate::engine::result::ResultAggregator;
use crate::error::Result;
use crate::{Check, CheckCategory, CheckResult, Severity};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Per-check wall-clock budget
    pub timeout_ms: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        OrchestratorConfig { timeout_ms: 30000 }
    }
}

pub type CheckFn = Box<dyn Fn(&GradingContext) -> CheckOutcome>;

/// A registered check with its execution function
pub struct RegisteredCheck {
    pub id: String,
    pub name: String,
    pub category: CheckCategory,
    pub description: String,
    pub severity: Severity,
    pub check_fn: CheckFn,
}

impl RegisteredCheck {
    pub fn new(
        id: &str,
        name: &str,
        category: CheckCategory,
        description: &str,
        check_fn: impl Fn(&GradingContext) -> CheckOutcome + 'static,
    ) -> Self {
        RegisteredCheck {
            id: id.to_string(),
            name: name.to_string(),
            category,
            description: description.to_string(),
            severity: Severity::Required,
            check_fn: Box::new(check_fn),
        }
    }

    /// Report failures of this check as warnings.
    pub fn advisory(mut self) -> Self {
        self.severity = Severity::Advisory;
        self
    }

    fn definition(&self, result: CheckResult, component_kit: Option<String>) -> Check {
        Check {
            id: self.id.clone(),
            name: self.name.clone(),
            category: self.category,
            description: self.description.clone(),
            severity: self.severity,
            result: Some(result),
            component_kit,
        }
    }
}

/// Check orchestrator
pub struct CheckOrchestrator {
    config: OrchestratorConfig,
    checks: Vec<RegisteredCheck>,
}

impl CheckOrchestrator {
    /// Create a new orchestrator with the given configuration
    pub fn new(config: OrchestratorConfig) -> Self {
        CheckOrchestrator {
            config,
            checks: Vec::new(),
        }
    }

    /// Register checks for execution
    pub fn register_checks(&mut self, checks: Vec<RegisteredCheck>) {
        self.checks.extend(checks);
    }

    /// Register a single check
    pub fn register_check(&mut self, check: RegisteredCheck) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[RegisteredCheck] {
        &self.checks
    }

    /// Run all registered checks
    pub fn run_all(&self, ctx: &GradingContext) -> Result<ResultAggregator> {
        self.run_matching(ctx, |_| true)
    }

    /// Run checks in a specific category
    pub fn run_category(&self, ctx: &GradingContext, category: CheckCategory) -> Result<ResultAggregator> {
        self.run_matching(ctx, |c| c.category == category)
    }

    /// Run checks in multiple categories
    pub fn run_categories(
        &self,
        ctx: &GradingContext,
        categories: &[CheckCategory],
    ) -> Result<ResultAggregator> {
        self.run_matching(ctx, |c| categories.contains(&c.category))
    }

    /// Run specific checks by ID
    pub fn run_specific(&self, ctx: &GradingContext, check_ids: &[String]) -> Result<ResultAggregator> {
        self.run_matching(ctx, |c| check_ids.iter().any(|id| id.eq_ignore_ascii_case(&c.id)))
    }

    /// Run all checks except specified IDs
    pub fn run_excluding(&self, ctx: &GradingContext, skip_ids: &[String]) -> Result<ResultAggregator> {
        self.run_matching(ctx, |c| !skip_ids.iter().any(|id| id.eq_ignore_ascii_case(&c.id)))
    }

    /// Execute the selected checks sequentially, in registration order
    fn run_matching(
        &self,
        ctx: &GradingContext,
        selected: impl Fn(&RegisteredCheck) -> bool,
    ) -> Result<ResultAggregator> {
        let start = Instant::now();
        let mut aggregator = ResultAggregator::new();

        for check in self.checks.iter().filter(|c| selected(c)) {
            ctx.take_kit_use();
            let result = self.execute_check(check, ctx)?;
            let component_kit = ctx.take_kit_use();
            debug!(check = %check.id, status = result.status(), kit = ?component_kit, "{}", result);
            aggregator.add_result(check.definition(result, component_kit));
        }

        let total_duration_ms = start.elapsed().as_millis() as u64;
        aggregator.set_total_duration(total_duration_ms);

        let summary = aggregator.get_summary();
        info!(
            passed = summary.passed,
            warned = summary.warned,
            failed = summary.failed,
            skipped = summary.skipped,
            duration_ms = total_duration_ms,
            "run complete"
        );
        Ok(aggregator)
    }

    /// Execute a single check with panic and budget handling
    fn execute_check(&self, check: &RegisteredCheck, ctx: &GradingContext) -> Result<CheckResult> {
        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| (check.check_fn)(ctx)));
        let elapsed = start.elapsed().as_millis() as u64;

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(payload) => {
                let details = panic_message(payload.as_ref());
                warn!(check = %check.id, %details, "check panicked");
                return Ok(CheckResult::Fail {
                    message: "Check panicked during execution".to_string(),
                    details,
                    duration_ms: elapsed,
                });
            }
        };

        if elapsed > self.config.timeout_ms {
            warn!(check = %check.id, elapsed_ms = elapsed, budget_ms = self.config.timeout_ms, "check over budget");
            return Ok(CheckResult::Fail {
                message: format!("Check timed out after {}ms", elapsed),
                details: format!("budget is {}ms", self.config.timeout_ms),
                duration_ms: elapsed,
            });
        }

        let result = match outcome {
            Ok(message) => CheckResult::Pass {
                message,
                duration_ms: elapsed,
            },
            Err(CheckError::Unmet(failure)) => match check.severity {
                Severity::Required => CheckResult::Fail {
                    message: failure.message,
                    details: failure.details,
                    duration_ms: elapsed,
                },
                Severity::Advisory => CheckResult::Warn {
                    message: failure.message,
                    details: failure.details,
                    duration_ms: elapsed,
                },
            },
            Err(CheckError::Skipped(reason)) => CheckResult::Skip { reason },
            Err(CheckError::Harness(err)) => return Err(err),
        };
        Ok(result)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "An unexpected error occurred".to_string()
    }
}
