//! File configuration.
//!
//! A `grader.toml` (or the file named by `--config`) supplies defaults for a
//! run. Values are layered: built-in defaults, then the file, then
//! environment, then command-line flags.
//!
//! ```toml
//! timeout_ms = 30000
//!
//! [interaction]
//! wait_timeout_ms = 1000
//! poll_interval_ms = 50
//!
//! [output]
//! format = "json"
//! color = false
//!
//! [grading]
//! skip = ["M02-020"]
//! categories = ["javascript"]
//!
//! [fixtures."module-03"]
//! markup = "solution/index.html"
//! ```

use crate::error::{GraderError, Result};
use crate::{CheckCategory, FixtureOverride, GraderConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "grader.toml";

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable, grouped by category
    #[default]
    Text,
    Json,
    /// JUnit XML for CI systems
    Junit,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Junit => write!(f, "junit"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = GraderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "junit" | "xml" => Ok(OutputFormat::Junit),
            other => Err(GraderError::InvalidConfig(format!(
                "unknown output format: {} (expected text, json or junit)",
                other
            ))),
        }
    }
}

/// Resolved output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub verbose: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            format: OutputFormat::Text,
            color: true,
            quiet: false,
            verbose: false,
        }
    }
}

/// Everything a run needs once every layer has been applied.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub grader: GraderConfig,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionSection {
    pub wait_timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub fetch_latency_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
    pub color: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradingSection {
    pub skip: Vec<String>,
    pub only: Vec<String>,
    /// Category slugs, e.g. "css-layout"
    pub categories: Vec<String>,
}

/// Contents of a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub timeout_ms: Option<u64>,
    pub interaction: InteractionSection,
    pub output: OutputSection,
    pub grading: GradingSection,
    /// Keyed by module name; any spelling `curriculum::canonical_id` accepts.
    pub fixtures: BTreeMap<String, FixtureOverride>,
}

impl FileConfig {
    /// Parse config text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| GraderError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GraderError::io(format!("reading config {}", path.display()), e))?;
        debug!(path = %path.display(), "loaded config file");
        Self::parse(&text, path)
    }

    /// Load the explicit file if one was named, else `grader.toml` in `dir`
    /// when it exists, else an empty config.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::from_file(&candidate)
        } else {
            debug!("no {} found; using defaults", DEFAULT_CONFIG_FILE);
            Ok(FileConfig::default())
        }
    }

    /// Layer this file over the built-in defaults.
    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        let grader = &mut settings.grader;

        if let Some(timeout_ms) = self.timeout_ms {
            grader.timeout_ms = timeout_ms;
        }
        if let Some(ms) = self.interaction.wait_timeout_ms {
            grader.interaction.wait_timeout_ms = ms;
        }
        if let Some(ms) = self.interaction.poll_interval_ms {
            grader.interaction.poll_interval_ms = ms;
        }
        if let Some(ms) = self.interaction.fetch_latency_ms {
            grader.interaction.fetch_latency_ms = ms;
        }

        if !self.grading.skip.is_empty() {
            grader.skip_checks = self.grading.skip.clone();
        }
        if !self.grading.only.is_empty() {
            grader.only_checks = self.grading.only.clone();
        }
        if !self.grading.categories.is_empty() {
            grader.categories = Some(parse_categories(&self.grading.categories)?);
        }

        for (module, fixture) in &self.fixtures {
            let id = crate::data::curriculum::canonical_id(module).ok_or_else(|| {
                GraderError::InvalidConfig(format!("[fixtures] names unknown module: {}", module))
            })?;
            grader.fixtures.insert(id.to_string(), fixture.clone());
        }

        let output = &mut settings.output;
        if let Some(format) = self.output.format {
            output.format = format;
        }
        if let Some(color) = self.output.color {
            output.color = color;
        }
        if let Some(quiet) = self.output.quiet {
            output.quiet = quiet;
        }
        if let Some(verbose) = self.output.verbose {
            output.verbose = verbose;
        }

        Ok(())
    }
}

/// Apply environment overrides through `lookup` (normally `std::env::var`).
///
/// `COURSE_GRADER_FORMAT` selects the output format; `NO_COLOR` set to any
/// non-empty value disables colour.
pub fn apply_env<F>(settings: &mut Settings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(format) = lookup("COURSE_GRADER_FORMAT").filter(|v| !v.is_empty()) {
        settings.output.format = format.parse()?;
    }
    if lookup("NO_COLOR").map_or(false, |v| !v.is_empty()) {
        settings.output.color = false;
    }
    Ok(())
}

/// Parse category slugs, rejecting unknown ones.
pub fn parse_categories(slugs: &[String]) -> Result<Vec<CheckCategory>> {
    slugs.iter().map(|s| s.parse()).collect()
}

/// Reject settings no run could satisfy.
pub fn validate(settings: &Settings) -> Result<()> {
    let grader = &settings.grader;
    if grader.timeout_ms == 0 {
        return Err(GraderError::InvalidConfig("timeout_ms must be greater than zero".into()));
    }
    if grader.interaction.poll_interval_ms == 0 {
        return Err(GraderError::InvalidConfig(
            "interaction.poll_interval_ms must be greater than zero".into(),
        ));
    }
    if grader.interaction.poll_interval_ms > grader.interaction.wait_timeout_ms {
        return Err(GraderError::InvalidConfig(format!(
            "interaction.poll_interval_ms ({}) exceeds wait_timeout_ms ({})",
            grader.interaction.poll_interval_ms, grader.interaction.wait_timeout_ms
        )));
    }
    Ok(())
}

/// Defaults layered with the config file and the process environment.
pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<(Settings, Option<PathBuf>)> {
    let mut settings = Settings::default();
    let source = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(dir.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
    };
    FileConfig::discover(explicit, dir)?.apply(&mut settings)?;
    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok((settings, source))
}
