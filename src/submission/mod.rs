//! Student submissions: the text artifacts a grading run inspects.

pub mod loader;

pub use loader::load;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The kind of text blob an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Markup,
    Stylesheet,
    Script,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Markup => write!(f, "markup"),
            ArtifactKind::Stylesheet => write!(f, "stylesheet"),
            ArtifactKind::Script => write!(f, "script"),
        }
    }
}

/// Where an artifact lives relative to the submission root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    pub relative_path: PathBuf,
    pub required: bool,
}

impl ArtifactSpec {
    pub fn required(kind: ArtifactKind, relative_path: impl Into<PathBuf>) -> Self {
        ArtifactSpec {
            kind,
            relative_path: relative_path.into(),
            required: true,
        }
    }

    pub fn optional(kind: ArtifactKind, relative_path: impl Into<PathBuf>) -> Self {
        ArtifactSpec {
            kind,
            relative_path: relative_path.into(),
            required: false,
        }
    }
}

/// The set of artifacts an assignment expects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureLayout {
    pub artifacts: Vec<ArtifactSpec>,
}

impl FixtureLayout {
    pub fn new(artifacts: Vec<ArtifactSpec>) -> Self {
        FixtureLayout { artifacts }
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&ArtifactSpec> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    /// Replace the path of `kind`, keeping its required flag. Adds an
    /// optional entry when the layout did not declare `kind`.
    pub fn override_path(&mut self, kind: ArtifactKind, relative_path: impl Into<PathBuf>) {
        let relative_path = relative_path.into();
        match self.artifacts.iter_mut().find(|a| a.kind == kind) {
            Some(spec) => spec.relative_path = relative_path,
            None => self
                .artifacts
                .push(ArtifactSpec::optional(kind, relative_path)),
        }
    }
}

/// One loaded text blob.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub text: String,
}

/// Immutable snapshot of a student's work, read once per run.
#[derive(Debug, Clone)]
pub struct Submission {
    root: PathBuf,
    artifacts: BTreeMap<ArtifactKind, Artifact>,
}

impl Submission {
    pub fn new(root: impl Into<PathBuf>, artifacts: BTreeMap<ArtifactKind, Artifact>) -> Self {
        Submission {
            root: root.into(),
            artifacts,
        }
    }

    /// Build a submission from in-memory text, for tests and tooling.
    pub fn from_texts(root: impl Into<PathBuf>, texts: &[(ArtifactKind, &str)]) -> Self {
        let root = root.into();
        let artifacts = texts
            .iter()
            .map(|(kind, text)| {
                (
                    *kind,
                    Artifact {
                        kind: *kind,
                        path: root.join(kind.to_string()),
                        text: (*text).to_string(),
                    },
                )
            })
            .collect();
        Submission { root, artifacts }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.get(&kind)
    }

    pub fn markup(&self) -> Option<&str> {
        self.artifact(ArtifactKind::Markup).map(|a| a.text.as_str())
    }

    pub fn stylesheet(&self) -> Option<&str> {
        self.artifact(ArtifactKind::Stylesheet).map(|a| a.text.as_str())
    }

    pub fn script(&self) -> Option<&str> {
        self.artifact(ArtifactKind::Script).map(|a| a.text.as_str())
    }

    pub fn kinds(&self) -> impl Iterator<Item = ArtifactKind> + '_ {
        self.artifacts.keys().copied()
    }
}
