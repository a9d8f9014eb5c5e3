//! Reads a submission's artifacts from disk.
//!
//! A missing required file is fatal: grading an empty string instead would
//! mask the real problem. Missing optional files are simply absent and the
//! checks that need them skip.

use crate::error::{GraderError, Result};
use crate::submission::{Artifact, FixtureLayout, Submission};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Load every artifact declared by `layout` relative to `root`.
pub fn load(root: &Path, layout: &FixtureLayout) -> Result<Submission> {
    let mut artifacts = BTreeMap::new();

    for spec in &layout.artifacts {
        let path = root.join(&spec.relative_path);

        if !path.exists() {
            if spec.required {
                return Err(GraderError::FixtureMissing { path });
            }
            debug!(kind = %spec.kind, path = %path.display(), "optional artifact absent");
            continue;
        }

        let text = std::fs::read_to_string(&path).map_err(|source| {
            GraderError::FixtureUnreadable {
                path: path.clone(),
                source,
            }
        })?;

        debug!(
            kind = %spec.kind,
            path = %path.display(),
            bytes = text.len(),
            "loaded artifact"
        );
        artifacts.insert(
            spec.kind,
            Artifact {
                kind: spec.kind,
                path,
                text,
            },
        );
    }

    Ok(Submission::new(root, artifacts))
}
