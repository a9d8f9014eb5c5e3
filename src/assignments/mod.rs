//! Check batteries, one module per curriculum assignment.
//!
//! Each module exposes `checks()`, which returns its battery in reporting
//! order. Ids follow `Mnn-xxx`.

pub mod module01;
pub mod module02;
pub mod module03;
pub mod module04;
pub mod module05;
pub mod module06;
pub mod module07;
pub mod module08;

use crate::checks::{fail, CheckOutcome, Failure};
use crate::engine::context::GradingContext;
use crate::interactive::{Instance, TextMatch};

/// The script uses at least one of `constructs`.
pub(crate) fn script_uses_any(ctx: &GradingContext, constructs: &[&str], what: &str) -> CheckOutcome {
    let script = ctx.script()?;
    match constructs.iter().find(|c| script.uses(c)) {
        Some(found) => Ok(format!("{} ({})", what, found)),
        None => Err(fail(format!("{} not found (looked for {})", what, constructs.join(", ")))),
    }
}

/// The script uses every one of `constructs`.
pub(crate) fn script_uses_all(ctx: &GradingContext, constructs: &[&str], what: &str) -> CheckOutcome {
    let script = ctx.script()?;
    let missing: Vec<&str> = constructs.iter().copied().filter(|c| !script.uses(c)).collect();
    if missing.is_empty() {
        Ok(what.to_string())
    } else {
        Err(fail(format!("{}: missing {}", what, missing.join(", "))))
    }
}

/// The script matches `pattern` once comments are stripped.
pub(crate) fn script_matches(ctx: &GradingContext, pattern: &str, what: &str) -> CheckOutcome {
    if ctx.script()?.matches(pattern)? {
        Ok(what.to_string())
    } else {
        Err(fail(format!("{} not found", what)))
    }
}

/// None of `constructs` appears outside comments.
pub(crate) fn script_avoids(ctx: &GradingContext, constructs: &[&str], what: &str) -> CheckOutcome {
    let script = ctx.script()?;
    match constructs.iter().find(|c| script.uses(c)) {
        Some(found) => Err(fail(format!("{}: found `{}`", what, found.trim()))),
        None => Ok(format!("{}: none found", what)),
    }
}

/// Click the single element whose text matches.
pub(crate) fn click_text(
    instance: &mut Instance,
    matcher: impl Into<TextMatch>,
) -> Result<(), Failure> {
    let node = instance.get_by_text(matcher)?;
    instance.click(node)
}

/// No element shows exactly `text`.
pub(crate) fn absent(instance: &Instance, text: &str) -> Result<(), Failure> {
    match instance.query_by_text(text)? {
        None => Ok(()),
        Some(_) => Err(Failure::new(format!("\"{}\" is still shown", text))),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::context;
    use super::*;
    use crate::checks::CheckError;
    use crate::submission::ArtifactKind;

    #[test]
    fn script_helpers() {
        let ctx = context(&[(ArtifactKind::Script, "// var x\nconst y = 1;")]);
        assert!(script_uses_any(&ctx, &["let ", "const "], "modern declarations").is_ok());
        assert!(script_avoids(&ctx, &["var "], "var declarations").is_ok());
        let err = script_uses_all(&ctx, &["const ", "fetch("], "fetch usage").unwrap_err();
        assert_eq!(err.to_string(), "fetch usage: missing fetch(");
    }

    #[test]
    fn missing_script_skips() {
        let ctx = context(&[]);
        assert!(matches!(
            script_uses_any(&ctx, &["x"], "x"),
            Err(CheckError::Skipped(_))
        ));
    }
}
