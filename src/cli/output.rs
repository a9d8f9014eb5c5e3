//! Output formatting for course-grader.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! All formatters produce valid output for any set of reports, including
//! an empty one or a report with zero checks.

use crate::config::{OutputFormat, OutputSettings};
use crate::engine::result::{ComparisonResult, GradingReport, ResultSummary};
use crate::error::Result;
use crate::{Check, CheckResult};
use colored::{Color, Colorize};
use serde::Serialize;

const RULE: &str =
    "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render the reports of one run.
    fn format(&self, reports: &[GradingReport]) -> Result<String>;
}

/// Combined counts across reports.
pub fn overall_summary(reports: &[GradingReport]) -> ResultSummary {
    let mut total = ResultSummary::default();
    for report in reports {
        let s = report.summary();
        total.passed += s.passed;
        total.warned += s.warned;
        total.failed += s.failed;
        total.skipped += s.skipped;
        total.total += s.total;
        total.total_duration_ms += s.total_duration_ms;
    }
    total
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn status(&self, result: Option<&CheckResult>) -> String {
        match result {
            Some(CheckResult::Pass { .. }) => self.paint("[PASS]", Color::Green),
            Some(CheckResult::Warn { .. }) => self.paint("[WARN]", Color::Yellow),
            Some(CheckResult::Fail { .. }) => self.paint("[FAIL]", Color::Red),
            Some(CheckResult::Skip { .. }) => self.paint("[SKIP]", Color::BrightBlack),
            None => self.paint("[----]", Color::BrightBlack),
        }
    }

    fn message(&self, result: Option<&CheckResult>) -> String {
        match result {
            Some(CheckResult::Pass { message, duration_ms }) => {
                if self.verbose {
                    format!("{} ({}ms)", message, duration_ms)
                } else {
                    message.clone()
                }
            }
            Some(CheckResult::Warn {
                message,
                details,
                duration_ms,
            })
            | Some(CheckResult::Fail {
                message,
                details,
                duration_ms,
            }) => {
                let mut text = message.clone();
                if self.verbose && !details.is_empty() {
                    text.push_str(&format!(" - {}", details));
                }
                if self.verbose {
                    text.push_str(&format!(" ({}ms)", duration_ms));
                }
                text
            }
            Some(CheckResult::Skip { reason }) => reason.clone(),
            None => "Not executed".to_string(),
        }
    }

    fn hidden_in_quiet(check: &Check) -> bool {
        !matches!(
            check.result,
            Some(CheckResult::Fail { .. }) | Some(CheckResult::Warn { .. })
        )
    }

    fn format_report(&self, report: &GradingReport, output: &mut String) {
        output.push_str(RULE);
        output.push('\n');
        output.push_str(&format!("{} - {}\n", report.module_id, report.module_title));
        output.push_str(&format!("Submission: {}\n", report.submission_dir.display()));
        output.push_str(&format!("Timestamp: {}\n", report.timestamp));
        for kit in report.component_kits() {
            output.push_str(&format!(
                "Components: {} kit (checks marked [{}] grade bundled components)\n",
                kit, kit
            ));
        }
        output.push_str(RULE);
        output.push_str("\n\n");

        for category in report.categories() {
            let checks: Vec<&Check> = report
                .by_category(category)
                .into_iter()
                .filter(|c| !self.quiet || !Self::hidden_in_quiet(c))
                .collect();
            if checks.is_empty() {
                continue;
            }

            output.push_str(&format!("{}\n", category.to_string().to_uppercase()));
            for check in checks {
                let kit = check
                    .component_kit
                    .as_ref()
                    .map(|kit| format!(" [{}]", kit))
                    .unwrap_or_default();
                output.push_str(&format!(
                    "  {} {}: {}{} ({})\n",
                    self.status(check.result.as_ref()),
                    check.id,
                    check.name,
                    kit,
                    self.message(check.result.as_ref())
                ));
            }
            output.push('\n');
        }

        let summary = report.summary();
        output.push_str(&format!(
            "SUMMARY: {} passed, {} warnings, {} failed, {} skipped\n",
            summary.passed, summary.warned, summary.failed, summary.skipped
        ));
        output.push_str(&format!(
            "Total time: {:.1}s\n",
            report.total_duration_ms as f64 / 1000.0
        ));
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, reports: &[GradingReport]) -> Result<String> {
        let mut output = String::new();

        for report in reports {
            self.format_report(report, &mut output);
            output.push('\n');
        }

        let summary = overall_summary(reports);
        output.push_str(RULE);
        output.push('\n');
        if reports.len() > 1 {
            output.push_str(&format!(
                "OVERALL: {} modules, {} passed, {} warnings, {} failed, {} skipped\n",
                reports.len(),
                summary.passed,
                summary.warned,
                summary.failed,
                summary.skipped
            ));
        }

        let verdict = if summary.failed > 0 {
            self.paint("FAILED", Color::Red)
        } else if summary.warned > 0 {
            self.paint("PASSED with warnings", Color::Yellow)
        } else {
            self.paint("PASSED", Color::Green)
        };
        let exit_code = if summary.failed > 0 { 1 } else { 0 };
        output.push_str(&format!("Result: {} (exit code {})\n", verdict, exit_code));
        output.push_str(RULE);

        Ok(output)
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

/// A report with its summary attached, as written by `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a GradingReport,
    summary: ResultSummary,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, reports: &[GradingReport]) -> Result<String> {
        let wrapped: Vec<JsonReport<'_>> = reports
            .iter()
            .map(|report| JsonReport {
                report,
                summary: report.summary(),
            })
            .collect();

        match wrapped.as_slice() {
            [single] => self.render(single),
            _ => self.render(&wrapped),
        }
    }
}

/// JUnit XML formatter
pub struct JunitFormatter;

impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c if c.is_control() && c != '\n' && c != '\t' => {}
                c => result.push(c),
            }
        }
        result
    }

    fn seconds(ms: u64) -> String {
        format!("{:.3}", ms as f64 / 1000.0)
    }

    fn format_properties(check: &Check, output: &mut String) {
        if let Some(kit) = &check.component_kit {
            output.push_str("      <properties>\n");
            output.push_str(&format!(
                "        <property name=\"component_kit\" value=\"{}\" />\n",
                Self::escape_xml(kit)
            ));
            output.push_str("      </properties>\n");
        }
    }

    fn format_case(check: &Check, classname: &str, output: &mut String) {
        let time = check.result.as_ref().map_or(0, CheckResult::duration_ms);
        output.push_str(&format!(
            "    <testcase name=\"{}\" classname=\"{}\" time=\"{}\"",
            Self::escape_xml(&format!("{}: {}", check.id, check.name)),
            classname,
            Self::seconds(time)
        ));

        match &check.result {
            Some(CheckResult::Pass { message, .. }) => {
                output.push_str(">\n");
                Self::format_properties(check, output);
                output.push_str(&format!(
                    "      <system-out>{}</system-out>\n",
                    Self::escape_xml(message)
                ));
                output.push_str("    </testcase>\n");
            }
            Some(CheckResult::Warn { message, details, .. }) => {
                output.push_str(">\n");
                Self::format_properties(check, output);
                output.push_str(&format!(
                    "      <system-out>WARNING: {}{}</system-out>\n",
                    Self::escape_xml(message),
                    if details.is_empty() {
                        String::new()
                    } else {
                        format!(" - {}", Self::escape_xml(details))
                    }
                ));
                output.push_str("    </testcase>\n");
            }
            Some(CheckResult::Fail { message, details, .. }) => {
                output.push_str(">\n");
                Self::format_properties(check, output);
                output.push_str(&format!(
                    "      <failure message=\"{}\">{}</failure>\n",
                    Self::escape_xml(message),
                    Self::escape_xml(details)
                ));
                output.push_str("    </testcase>\n");
            }
            Some(CheckResult::Skip { reason }) => {
                output.push_str(">\n");
                Self::format_properties(check, output);
                output.push_str(&format!(
                    "      <skipped message=\"{}\" />\n",
                    Self::escape_xml(reason)
                ));
                output.push_str("    </testcase>\n");
            }
            None => output.push_str(" />\n"),
        }
    }
}

impl Default for JunitFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, reports: &[GradingReport]) -> Result<String> {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = overall_summary(reports);
        output.push_str(&format!(
            "<testsuites name=\"course-grader\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{}\">\n",
            summary.total,
            summary.failed,
            summary.skipped,
            Self::seconds(reports.iter().map(|r| r.total_duration_ms).sum())
        ));

        // One suite per module and category
        for report in reports {
            for category in report.categories() {
                let checks = report.by_category(category);
                let failures = checks
                    .iter()
                    .filter(|c| matches!(c.result, Some(CheckResult::Fail { .. })))
                    .count();
                let skipped = checks
                    .iter()
                    .filter(|c| matches!(c.result, Some(CheckResult::Skip { .. }) | None))
                    .count();
                let time: u64 = checks
                    .iter()
                    .filter_map(|c| c.result.as_ref().map(CheckResult::duration_ms))
                    .sum();
                let suite = format!("{}.{}", report.module_id, category.slug());

                output.push_str(&format!(
                    "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{}\" timestamp=\"{}\">\n",
                    suite,
                    checks.len(),
                    failures,
                    skipped,
                    Self::seconds(time),
                    Self::escape_xml(&report.timestamp)
                ));

                let classname = format!("course-grader.{}", suite);
                for check in checks {
                    Self::format_case(check, &classname, &mut output);
                }

                output.push_str("  </testsuite>\n");
            }
        }

        output.push_str("</testsuites>");
        Ok(output)
    }
}

/// Get a formatter for the resolved output settings
pub fn get_formatter(settings: &OutputSettings) -> Box<dyn OutputFormatter> {
    match settings.format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(
            settings.color,
            settings.verbose,
            settings.quiet,
        )),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}

/// Render a baseline comparison for the terminal.
pub fn format_comparison(module_id: &str, comparison: &ComparisonResult, color: bool) -> String {
    let paint = |text: &str, c: Color| {
        if color {
            text.color(c).to_string()
        } else {
            text.to_string()
        }
    };

    let mut output = format!("BASELINE COMPARISON ({})\n", module_id);
    let groups = [
        ("Regressions", &comparison.regressions, Color::Red),
        ("New failures", &comparison.new_failures, Color::Red),
        ("New warnings", &comparison.new_warnings, Color::Yellow),
        ("Resolved", &comparison.resolved, Color::Green),
    ];
    for (label, ids, c) in groups {
        if ids.is_empty() {
            continue;
        }
        output.push_str(&format!("  {}: {}\n", paint(label, c), ids.join(", ")));
    }
    output.push_str(&format!("  Unchanged: {}\n", comparison.unchanged.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::result::ResultAggregator;
    use crate::{CheckCategory, Severity};
    use std::path::Path;

    fn check(id: &str, category: CheckCategory, result: CheckResult) -> Check {
        Check {
            id: id.to_string(),
            name: format!("Check {}", id),
            category,
            description: String::new(),
            severity: Severity::Required,
            result: Some(result),
            component_kit: None,
        }
    }

    fn sample() -> GradingReport {
        let mut agg = ResultAggregator::new();
        agg.add_result(check(
            "M01-001",
            CheckCategory::HtmlStructure,
            CheckResult::Pass {
                message: "doctype present".into(),
                duration_ms: 1,
            },
        ));
        agg.add_result(check(
            "M01-002",
            CheckCategory::HtmlStructure,
            CheckResult::Fail {
                message: "no <h1> element".into(),
                details: "expected exactly one <h1> & found 0".into(),
                duration_ms: 2,
            },
        ));
        agg.add_result(check(
            "M01-020",
            CheckCategory::SemanticHtml,
            CheckResult::Warn {
                message: "no <main> element".into(),
                details: String::new(),
                duration_ms: 0,
            },
        ));
        agg.add_result(check(
            "M01-015",
            CheckCategory::CssStyling,
            CheckResult::Skip {
                reason: "no stylesheet".into(),
            },
        ));
        agg.set_total_duration(3);
        agg.into_report("module-01", "Personal Profile Page", Path::new("module-01/homework"))
    }

    #[test]
    fn terminal_groups_by_category() {
        let out = TerminalFormatter::new(false, false, false)
            .format(&[sample()])
            .unwrap();
        assert!(out.contains("module-01 - Personal Profile Page"));
        assert!(out.contains("HTML STRUCTURE\n"));
        assert!(out.contains("SEMANTIC HTML\n"));
        assert!(out.contains("[PASS] M01-001: Check M01-001 (doctype present)"));
        assert!(out.contains("[FAIL] M01-002"));
        assert!(out.contains("[WARN] M01-020"));
        assert!(out.contains("[SKIP] M01-015"));
        assert!(out.contains("SUMMARY: 1 passed, 1 warnings, 1 failed, 1 skipped"));
        assert!(out.contains("Result: FAILED (exit code 1)"));
        assert!(!out.contains("\x1b["));
    }

    #[test]
    fn terminal_quiet_hides_passes_and_skips() {
        let out = TerminalFormatter::new(false, false, true)
            .format(&[sample()])
            .unwrap();
        assert!(!out.contains("M01-001"));
        assert!(!out.contains("M01-015"));
        assert!(!out.contains("CSS STYLING"));
        assert!(out.contains("M01-002"));
        assert!(out.contains("M01-020"));
    }

    #[test]
    fn terminal_verbose_shows_details() {
        let out = TerminalFormatter::new(false, true, false)
            .format(&[sample()])
            .unwrap();
        assert!(out.contains("expected exactly one <h1> & found 0"));
        assert!(out.contains("(2ms)"));
    }

    #[test]
    fn terminal_overall_line_for_several_modules() {
        let out = TerminalFormatter::new(false, false, false)
            .format(&[sample(), sample()])
            .unwrap();
        assert!(out.contains("OVERALL: 2 modules, 2 passed, 2 warnings, 2 failed, 2 skipped"));
    }

    #[test]
    fn terminal_empty_run() {
        let out = TerminalFormatter::new(false, false, false).format(&[]).unwrap();
        assert!(out.contains("Result: PASSED (exit code 0)"));
    }

    fn kit_backed() -> GradingReport {
        let mut report = sample();
        report.checks[0].component_kit = Some("reference".to_string());
        report
    }

    #[test]
    fn terminal_marks_kit_backed_checks() {
        let out = TerminalFormatter::new(false, false, false)
            .format(&[kit_backed()])
            .unwrap();
        assert!(out.contains("Components: reference kit (checks marked [reference] grade bundled components)"));
        assert!(out.contains("[PASS] M01-001: Check M01-001 [reference] (doctype present)"));
        assert!(out.contains("[FAIL] M01-002: Check M01-002 (no <h1> element)"));

        let plain = TerminalFormatter::new(false, false, false)
            .format(&[sample()])
            .unwrap();
        assert!(!plain.contains("Components:"));
    }

    #[test]
    fn json_and_junit_carry_component_kit() {
        let json = JsonFormatter::new(false).format(&[kit_backed()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["checks"][0]["component_kit"], "reference");
        assert!(value["checks"][1].get("component_kit").is_none());

        let xml = JunitFormatter::new().format(&[kit_backed()]).unwrap();
        assert_eq!(xml.matches("<property name=\"component_kit\" value=\"reference\" />").count(), 1);
    }

    #[test]
    fn json_single_report_is_an_object() {
        let out = JsonFormatter::new(true).format(&[sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["module_id"], "module-01");
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["checks"][1]["result"]["status"], "fail");
        assert_eq!(value["checks"][0]["category"], "html-structure");
    }

    #[test]
    fn json_several_reports_is_an_array() {
        let out = JsonFormatter::new(false).format(&[sample(), sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn json_output_loads_as_baseline() {
        let out = JsonFormatter::new(true).format(&[sample()]).unwrap();
        let report: GradingReport = serde_json::from_str(&out).unwrap();
        assert_eq!(report.outcomes(), sample().outcomes());
    }

    #[test]
    fn junit_suites_per_category() {
        let out = JunitFormatter::new().format(&[sample()]).unwrap();
        assert!(out.starts_with("<?xml"));
        assert!(out.contains("tests=\"4\" failures=\"1\" errors=\"0\" skipped=\"1\""));
        assert!(out.contains("<testsuite name=\"module-01.html-structure\" tests=\"2\" failures=\"1\""));
        assert!(out.contains("<testsuite name=\"module-01.semantic-html\""));
        assert!(out.contains("classname=\"course-grader.module-01.html-structure\""));
        assert!(out.contains("<failure message=\"no &lt;h1&gt; element\">"));
        assert!(out.contains("&amp; found 0"));
        assert!(out.contains("<skipped message=\"no stylesheet\" />"));
        assert!(out.ends_with("</testsuites>"));
    }

    #[test]
    fn formatter_follows_settings() {
        let settings = OutputSettings {
            format: OutputFormat::Json,
            ..OutputSettings::default()
        };
        let out = get_formatter(&settings).format(&[sample()]).unwrap();
        assert!(out.trim_start().starts_with('{'));
    }

    #[test]
    fn comparison_lists_changed_ids() {
        let comparison = ComparisonResult {
            regressions: vec!["M01-002".into()],
            resolved: vec!["M01-005".into()],
            unchanged: vec!["M01-001".into(), "M01-003".into()],
            ..ComparisonResult::default()
        };
        let out = format_comparison("module-01", &comparison, false);
        assert!(out.contains("Regressions: M01-002"));
        assert!(out.contains("Resolved: M01-005"));
        assert!(out.contains("Unchanged: 2"));
        assert!(!out.contains("New failures"));
    }
}
