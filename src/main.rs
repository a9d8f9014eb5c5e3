//! course-grader CLI entry point
//!
//! Grades web development coursework submissions against each module's
//! check battery.

use clap::Parser;
use course_grader::cli::args::{Cli, Commands, GradeArgs};
use course_grader::cli::output::{format_comparison, get_formatter};
use course_grader::config::{self, OutputFormat};
use course_grader::data::curriculum::{self, AssignmentSpec};
use course_grader::engine::result::{load_baseline, save_baseline};
use course_grader::version::get_build_info;
use course_grader::{grade_curriculum, grade_module, GraderError, GradingReport, Result, Severity};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too
            return if e.use_stderr() {
                ExitCode::from(3)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);

    let outcome = match &cli.command {
        Commands::Grade(args) => grade(&cli, args),
        Commands::List { module } => list(module.as_deref()).map(|_| ExitCode::SUCCESS),
        Commands::Modules => {
            print_modules();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Version => {
            println!("{}", get_build_info());
            Ok(ExitCode::SUCCESS)
        }
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(3)
        }
    }
}

/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn grade(cli: &Cli, args: &GradeArgs) -> Result<ExitCode> {
    let cwd = std::env::current_dir().map_err(|e| GraderError::io("reading working directory", e))?;
    let (mut settings, source) = config::load(cli.config.as_deref(), &cwd)?;
    if let Some(path) = source {
        debug!(config = %path.display(), "using config file");
    }
    args.apply(&mut settings, cli.verbose)?;
    config::validate(&settings)?;

    let reports = if args.all {
        grade_curriculum(&args.root, &settings.grader)?
    } else {
        let target = args.target.clone().unwrap_or_else(|| PathBuf::from("."));
        let found = curriculum::resolve_target(&target, args.module.as_deref())?;
        vec![grade_module(&found.homework, found.module_id, &settings.grader)?]
    };

    let formatter = get_formatter(&settings.output);
    println!("{}", formatter.format(&reports)?);

    if let Some(path) = &args.baseline {
        let baseline = load_baseline(path)?;
        compare_reports(&reports, &baseline, settings.output.format, settings.output.color);
    }

    if let Some(path) = &args.save_baseline {
        save_baseline(&reports, path)?;
        info!(path = %path.display(), "baseline saved");
    }

    let failed = reports.iter().filter(|r| r.has_failures()).count();
    info!(modules = reports.len(), failed, "grading complete");

    Ok(if failed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn compare_reports(
    reports: &[GradingReport],
    baseline: &[GradingReport],
    format: OutputFormat,
    color: bool,
) {
    for report in reports {
        let Some(previous) = baseline.iter().find(|b| b.module_id == report.module_id) else {
            warn!(module = %report.module_id, "module not present in baseline");
            continue;
        };
        let comparison = report.compare_to_baseline(previous);
        let text = format_comparison(&report.module_id, &comparison, color);
        // Keep structured output on stdout parseable
        if format == OutputFormat::Text {
            println!("{}", text);
        } else {
            eprintln!("{}", text);
        }
    }
}

fn list(module: Option<&str>) -> Result<()> {
    let assignments: Vec<&AssignmentSpec> = match module {
        Some(name) => {
            vec![curriculum::find(name).ok_or_else(|| GraderError::UnknownModule(name.to_string()))?]
        }
        None => curriculum::catalog().iter().collect(),
    };

    for assignment in assignments {
        println!("{} - {}", assignment.id, assignment.title);
        let checks = (assignment.checks)();

        let mut categories = Vec::new();
        for check in &checks {
            if !categories.contains(&check.category) {
                categories.push(check.category);
            }
        }

        for category in categories {
            println!("  {}:", category.to_string().to_uppercase());
            for check in checks.iter().filter(|c| c.category == category) {
                let marker = if check.severity == Severity::Advisory {
                    " (advisory)"
                } else {
                    ""
                };
                println!("    {:<9}{}{}", check.id, check.name, marker);
            }
        }
        println!();
    }

    Ok(())
}

fn print_modules() {
    for assignment in curriculum::catalog() {
        println!(
            "{:<10} {} ({} checks)",
            assignment.id,
            assignment.title,
            assignment.check_count()
        );
        for artifact in assignment.layout().artifacts {
            println!(
                "    {:<11} {}/{}{}",
                artifact.kind.to_string(),
                curriculum::HOMEWORK_DIR,
                artifact.relative_path.display(),
                if artifact.required { "" } else { " (optional)" }
            );
        }
    }
}
