//! The snapshot every check in a run reads from.

use crate::checks::script::ScriptSource;
use crate::checks::stylesheet::Stylesheet;
use crate::checks::CheckError;
use crate::components::ComponentKit;
use crate::dom::Document;
use crate::interactive::{Component, InteractionSettings, Instance, Mount};
use crate::submission::Submission;
use std::cell::Cell;
use std::rc::Rc;

/// Parsed views of a submission, built once at the start of a run.
pub struct GradingContext {
    submission: Submission,
    document: Option<Document>,
    stylesheet: Option<Stylesheet>,
    script: Option<ScriptSource>,
    interaction: InteractionSettings,
    kit: Rc<dyn ComponentKit>,
    /// Set whenever a check asks for the kit; read back per check.
    kit_used: Cell<bool>,
}

impl GradingContext {
    pub fn new(
        submission: Submission,
        interaction: InteractionSettings,
        kit: Rc<dyn ComponentKit>,
    ) -> Self {
        let document = submission.markup().map(Document::parse);
        let stylesheet = submission.stylesheet().map(Stylesheet::new);
        let script = submission.script().map(ScriptSource::new);
        GradingContext {
            submission,
            document,
            stylesheet,
            script,
            interaction,
            kit,
            kit_used: Cell::new(false),
        }
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn raw_markup(&self) -> Result<&str, CheckError> {
        self.submission
            .markup()
            .ok_or_else(|| CheckError::Skipped("no markup file".to_string()))
    }

    pub fn document(&self) -> Result<&Document, CheckError> {
        self.document
            .as_ref()
            .ok_or_else(|| CheckError::Skipped("no markup file".to_string()))
    }

    pub fn stylesheet(&self) -> Result<&Stylesheet, CheckError> {
        self.stylesheet
            .as_ref()
            .ok_or_else(|| CheckError::Skipped("no stylesheet".to_string()))
    }

    pub fn script(&self) -> Result<&ScriptSource, CheckError> {
        self.script
            .as_ref()
            .ok_or_else(|| CheckError::Skipped("no script file".to_string()))
    }

    pub fn interaction(&self) -> InteractionSettings {
        self.interaction
    }

    pub fn kit(&self) -> &dyn ComponentKit {
        self.kit_used.set(true);
        self.kit.as_ref()
    }

    /// Name of the kit if it was used since the last call, then reset.
    pub fn take_kit_use(&self) -> Option<String> {
        self.kit_used
            .replace(false)
            .then(|| self.kit.name().to_string())
    }

    /// Mount a fresh instance with offline networking and empty storage.
    pub fn mount(&self, component: Box<dyn Component>) -> Instance {
        Mount::boxed(component).mount(self.interaction)
    }

    /// Mount a prepared builder with this run's interaction settings.
    pub fn mount_with(&self, mount: Mount) -> Instance {
        mount.mount(self.interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ReferenceKit;
    use crate::submission::ArtifactKind;

    #[test]
    fn absent_artifacts_skip() {
        let submission = Submission::from_texts("hw", &[(ArtifactKind::Markup, "<h1>Hi</h1>")]);
        let ctx = GradingContext::new(submission, InteractionSettings::default(), Rc::new(ReferenceKit));
        assert!(ctx.document().is_ok());
        assert!(matches!(ctx.stylesheet(), Err(CheckError::Skipped(_))));
        assert!(matches!(ctx.script(), Err(CheckError::Skipped(_))));
        assert_eq!(ctx.take_kit_use(), None);
        assert_eq!(ctx.kit().name(), "reference");
        assert_eq!(ctx.take_kit_use().as_deref(), Some("reference"));
        assert_eq!(ctx.take_kit_use(), None);
    }
}
