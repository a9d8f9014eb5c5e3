//! Command line arguments for course-grader.

use crate::config::Settings;
use crate::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub use crate::config::OutputFormat;

/// Static-assertion grader for web development coursework
#[derive(Debug, Parser)]
#[command(name = "course-grader")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./grader.toml when present)
    #[arg(long, global = true, env = "COURSE_GRADER_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug logging and per-check timings
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Grade one module directory, or every module under a root
    Grade(GradeArgs),

    /// List registered checks
    List {
        /// Module to list (all modules if omitted)
        module: Option<String>,
    },

    /// List curriculum modules and their fixture layouts
    Modules,

    /// Print build information
    Version,
}

#[derive(Debug, Clone, Default, Args)]
pub struct GradeArgs {
    /// Module directory or its homework directory
    #[arg(value_name = "TARGET", conflicts_with = "all")]
    pub target: Option<PathBuf>,

    /// Grade TARGET as this module (id, directory name or number)
    #[arg(short, long, value_name = "MODULE")]
    pub module: Option<String>,

    /// Curriculum root to search with --all
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Grade every module-NN*/homework directory under --root
    #[arg(long)]
    pub all: bool,

    /// Run only these categories (e.g. css-layout)
    #[arg(short, long = "category", value_name = "SLUG", value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Skip checks by id
    #[arg(long, value_name = "ID", value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only these checks
    #[arg(long, value_name = "ID", value_delimiter = ',')]
    pub only: Vec<String>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Only show failures and warnings
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Per-check wall-clock budget
    #[arg(long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Virtual time allowed for an interaction to settle
    #[arg(long, value_name = "MS")]
    pub wait_timeout: Option<u64>,

    /// Virtual clock step between polls
    #[arg(long, value_name = "MS")]
    pub poll_interval: Option<u64>,

    /// Compare against a saved JSON report
    #[arg(long, value_name = "FILE")]
    pub baseline: Option<PathBuf>,

    /// Save this run's JSON report
    #[arg(long, value_name = "FILE")]
    pub save_baseline: Option<PathBuf>,
}

impl GradeArgs {
    /// Layer flags over settings already built from defaults, file and
    /// environment.
    pub fn apply(&self, settings: &mut Settings, verbose: bool) -> Result<()> {
        let grader = &mut settings.grader;

        if !self.categories.is_empty() {
            grader.categories = Some(crate::config::parse_categories(&self.categories)?);
        }
        if !self.skip.is_empty() {
            grader.skip_checks = normalize_ids(&self.skip);
        }
        if !self.only.is_empty() {
            grader.only_checks = normalize_ids(&self.only);
        }
        if let Some(ms) = self.timeout {
            grader.timeout_ms = ms;
        }
        if let Some(ms) = self.wait_timeout {
            grader.interaction.wait_timeout_ms = ms;
        }
        if let Some(ms) = self.poll_interval {
            grader.interaction.poll_interval_ms = ms;
        }

        let output = &mut settings.output;
        if let Some(format) = self.format {
            output.format = format;
        }
        if self.no_color {
            output.color = false;
        }
        if self.quiet {
            output.quiet = true;
        }
        if verbose {
            output.verbose = true;
        }

        Ok(())
    }
}

/// Trim and uppercase check ids ("m02-020 " -> "M02-020").
fn normalize_ids(ids: &[String]) -> Vec<String> {
    ids.iter()
        .map(|id| id.trim().to_ascii_uppercase())
        .filter(|id| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CheckCategory;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("course-grader").chain(args.iter().copied())).unwrap()
    }

    fn grade_args(args: &[&str]) -> GradeArgs {
        let mut full = vec!["grade"];
        full.extend_from_slice(args);
        match parse(&full).command {
            Commands::Grade(args) => args,
            other => panic!("expected grade, got {:?}", other),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn grade_defaults() {
        let args = grade_args(&[]);
        assert!(args.target.is_none());
        assert_eq!(args.root, PathBuf::from("."));
        assert!(!args.all);
        assert!(args.format.is_none());
    }

    #[test]
    fn grade_with_target_and_module() {
        let args = grade_args(&["module-03-js/homework", "--module", "3"]);
        assert_eq!(args.target, Some(PathBuf::from("module-03-js/homework")));
        assert_eq!(args.module.as_deref(), Some("3"));
    }

    #[test]
    fn lists_accept_commas_and_repeats() {
        let args = grade_args(&["--skip", "M01-001,M01-002", "--skip", "m01-003"]);
        assert_eq!(args.skip, vec!["M01-001", "M01-002", "m01-003"]);

        let mut settings = Settings::default();
        args.apply(&mut settings, false).unwrap();
        assert_eq!(settings.grader.skip_checks, vec!["M01-001", "M01-002", "M01-003"]);
    }

    #[test]
    fn flags_override_settings() {
        let args = grade_args(&[
            "--category",
            "javascript",
            "--format",
            "json",
            "--no-color",
            "--quiet",
            "--timeout",
            "500",
            "--wait-timeout",
            "3000",
            "--poll-interval",
            "10",
        ]);
        let mut settings = Settings::default();
        settings.output.format = OutputFormat::Junit;
        args.apply(&mut settings, true).unwrap();

        assert_eq!(settings.grader.categories, Some(vec![CheckCategory::JavaScript]));
        assert_eq!(settings.grader.timeout_ms, 500);
        assert_eq!(settings.grader.interaction.wait_timeout_ms, 3000);
        assert_eq!(settings.grader.interaction.poll_interval_ms, 10);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert!(!settings.output.color);
        assert!(settings.output.quiet);
        assert!(settings.output.verbose);
    }

    #[test]
    fn absent_flags_leave_settings_alone() {
        let mut settings = Settings::default();
        settings.output.format = OutputFormat::Junit;
        settings.grader.timeout_ms = 42;
        grade_args(&[]).apply(&mut settings, false).unwrap();
        assert_eq!(settings.output.format, OutputFormat::Junit);
        assert_eq!(settings.grader.timeout_ms, 42);
        assert!(settings.output.color);
    }

    #[test]
    fn unknown_category_is_an_error() {
        let args = grade_args(&["--category", "networking"]);
        assert!(args.apply(&mut Settings::default(), false).is_err());
    }

    #[test]
    fn all_conflicts_with_target() {
        let result = Cli::try_parse_from(["course-grader", "grade", "module-01", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["list", "module-02", "-v", "--config", "ci.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        assert!(matches!(cli.command, Commands::List { module: Some(ref m) } if m == "module-02"));
    }

    #[test]
    fn bad_format_is_rejected() {
        assert!(Cli::try_parse_from(["course-grader", "grade", "--format", "yaml"]).is_err());
    }
}
