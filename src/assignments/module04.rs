//! Module 4: Typed Utility Functions.
//!
//! The TypeScript is never executed. Each utility must be exported and its
//! body must use the constructs its job calls for.

use crate::assignments::{script_avoids, script_matches};
use crate::checks::{fail, CheckError, CheckOutcome};
use crate::engine::context::GradingContext;
use crate::engine::orchestrator::RegisteredCheck;
use crate::error::GraderError;
use crate::CheckCategory;
use regex::Regex;

/// Get all module 4 checks
pub fn checks() -> Vec<RegisteredCheck> {
    use CheckCategory::TypeScript;
    vec![
        RegisteredCheck::new(
            "M04-001",
            "filterByProperty",
            TypeScript,
            "Exports filterByProperty built on Array.filter",
            run_m04_001,
        ),
        RegisteredCheck::new(
            "M04-002",
            "mapToProperty",
            TypeScript,
            "Exports mapToProperty built on Array.map",
            run_m04_002,
        ),
        RegisteredCheck::new(
            "M04-003",
            "removeDuplicates",
            TypeScript,
            "Exports removeDuplicates using a Set or filter",
            run_m04_003,
        ),
        RegisteredCheck::new(
            "M04-004",
            "capitalize",
            TypeScript,
            "Exports capitalize using toUpperCase",
            run_m04_004,
        ),
        RegisteredCheck::new(
            "M04-005",
            "slugify",
            TypeScript,
            "Exports slugify that lowercases and replaces",
            run_m04_005,
        ),
        RegisteredCheck::new(
            "M04-006",
            "truncate",
            TypeScript,
            "Exports truncate that slices and appends an ellipsis",
            run_m04_006,
        ),
        RegisteredCheck::new(
            "M04-007",
            "delay",
            TypeScript,
            "Exports delay wrapping setTimeout in a Promise",
            run_m04_007,
        ),
        RegisteredCheck::new(
            "M04-008",
            "Generics",
            TypeScript,
            "Declares generic functions",
            run_m04_008,
        ),
        RegisteredCheck::new(
            "M04-009",
            "Promise Types",
            TypeScript,
            "Async utilities declare Promise return types",
            run_m04_009,
        ),
        RegisteredCheck::new(
            "M04-010",
            "Typed Parameters",
            TypeScript,
            "Parameters carry primitive type annotations",
            run_m04_010,
        ),
        RegisteredCheck::new(
            "M04-011",
            "No any",
            TypeScript,
            "Avoids the any type",
            run_m04_011,
        )
        .advisory(),
        RegisteredCheck::new(
            "M04-012",
            "No Placeholders",
            TypeScript,
            "No 'Not implemented' stubs remain",
            run_m04_012,
        )
        .advisory(),
    ]
}

/// Body of `export function name`, up to the next top-level export.
fn exported_body<'a>(source: &'a str, name: &str) -> Result<Option<&'a str>, CheckError> {
    let pattern = format!(
        r"export\s+(?:async\s+)?(?:function\s+{0}\b|const\s+{0}\b)",
        regex::escape(name)
    );
    let start = Regex::new(&pattern)
        .map_err(|source| GraderError::InvalidPattern { pattern, source })?;
    Ok(start.find(source).map(|found| {
        let rest = &source[found.end()..];
        let end = rest.find("\nexport ").unwrap_or(rest.len());
        &rest[..end]
    }))
}

/// `name` is exported and its body satisfies every group of hints (any
/// member of a group counts).
fn implements(ctx: &GradingContext, name: &str, groups: &[&[&str]]) -> CheckOutcome {
    let script = ctx.script()?;
    let body = exported_body(script.stripped(), name)?
        .ok_or_else(|| fail(format!("{} is not exported", name)))?;
    for group in groups {
        if !group.iter().any(|hint| body.contains(hint)) {
            return Err(fail(format!(
                "{} does not look implemented: expected {}",
                name,
                group.join(" or ")
            )));
        }
    }
    Ok(format!("{} exported and implemented", name))
}

/// M04-001: filterByProperty
fn run_m04_001(ctx: &GradingContext) -> CheckOutcome {
    implements(ctx, "filterByProperty", &[&[".filter("]])
}

/// M04-002: mapToProperty
fn run_m04_002(ctx: &GradingContext) -> CheckOutcome {
    implements(ctx, "mapToProperty", &[&[".map("]])
}

/// M04-003: removeDuplicates
fn run_m04_003(ctx: &GradingContext) -> CheckOutcome {
    implements(ctx, "removeDuplicates", &[&["new Set", ".filter("]])
}

/// M04-004: capitalize
fn run_m04_004(ctx: &GradingContext) -> CheckOutcome {
    implements(ctx, "capitalize", &[&["toUpperCase"]])
}

/// M04-005: slugify
fn run_m04_005(ctx: &GradingContext) -> CheckOutcome {
    implements(ctx, "slugify", &[&["toLowerCase"], &[".replace"]])
}

/// M04-006: truncate
fn run_m04_006(ctx: &GradingContext) -> CheckOutcome {
    implements(
        ctx,
        "truncate",
        &[&[".slice(", ".substring(", ".substr("], &["..."]],
    )
}

/// M04-007: delay
fn run_m04_007(ctx: &GradingContext) -> CheckOutcome {
    implements(ctx, "delay", &[&["setTimeout"], &["Promise"]])
}

/// M04-008: Generics
fn run_m04_008(ctx: &GradingContext) -> CheckOutcome {
    script_matches(ctx, r"function\s+\w+\s*<\s*[A-Z]", "generic type parameters")
}

/// M04-009: Promise Types
fn run_m04_009(ctx: &GradingContext) -> CheckOutcome {
    script_matches(ctx, r"\)\s*:\s*Promise<", "Promise return type annotations")
}

/// M04-010: Typed Parameters
fn run_m04_010(ctx: &GradingContext) -> CheckOutcome {
    script_matches(
        ctx,
        r"\w+\s*:\s*(?:string|number|boolean)\b",
        "primitive type annotations",
    )
}

/// M04-011: No any
fn run_m04_011(ctx: &GradingContext) -> CheckOutcome {
    let script = ctx.script()?;
    if script.matches(r":\s*any\b")? {
        return Err(fail("the any type is used; prefer a generic or unknown"));
    }
    Ok("no any annotations".to_string())
}

/// M04-012: No Placeholders
fn run_m04_012(ctx: &GradingContext) -> CheckOutcome {
    script_avoids(ctx, &["Not implemented"], "placeholder stubs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignments::testing::{grade, problems, status};
    use crate::submission::ArtifactKind::Script;

    const SOLUTION: &str = r#"
export function filterByProperty<T>(arr: T[], key: keyof T, value: T[keyof T]): T[] {
  return arr.filter((item) => item[key] === value);
}

export function mapToProperty<T, K extends keyof T>(arr: T[], key: K): T[K][] {
  return arr.map((item) => item[key]);
}

export function removeDuplicates<T>(arr: T[]): T[] {
  return [...new Set(arr)];
}

export function capitalize(str: string): string {
  return str.charAt(0).toUpperCase() + str.slice(1);
}

export function slugify(str: string): string {
  return str.toLowerCase().trim().replace(/[^a-z0-9]+/g, '-').replace(/^-|-$/g, '');
}

export function truncate(str: string, maxLength: number): string {
  return str.length > maxLength ? str.slice(0, maxLength) + '...' : str;
}

export function delay(ms: number): Promise<void> {
  return new Promise((resolve) => setTimeout(resolve, ms));
}
"#;

    #[test]
    fn implemented_library_passes() {
        let report = grade("module-04", &[(Script, SOLUTION)]);
        assert!(problems(&report).is_empty(), "{:?}", problems(&report));
    }

    #[test]
    fn starter_stubs_fail() {
        let starter = r#"
// TODO: Implement with proper types
export function filterByProperty<T>(arr: T[], key: keyof T, value: any): T[] {
  // return arr.filter(...)
  return [];
}
export function capitalize(str: string): string {
  return '';
}
export async function retry<T>(fn: () => Promise<T>, maxAttempts: number): Promise<T> {
  throw new Error('Not implemented');
}
"#;
        let report = grade("module-04", &[(Script, starter)]);
        assert_eq!(status(&report, "M04-001"), "fail");
        assert_eq!(status(&report, "M04-004"), "fail");
        assert_eq!(status(&report, "M04-008"), "pass");
        assert_eq!(status(&report, "M04-011"), "warn");
        assert_eq!(status(&report, "M04-012"), "warn");
    }

    #[test]
    fn missing_export_is_named() {
        let report = grade("module-04", &[(Script, "function slugify(s: string) {}")]);
        let result = report.find("M04-005").unwrap().result.as_ref().unwrap();
        assert!(result.to_string().contains("slugify is not exported"));
    }

    #[test]
    fn body_ends_at_next_export() {
        let source = "export function a() { x }\nexport function b() { y }";
        assert_eq!(exported_body(source, "a").unwrap(), Some("() { x }"));
        assert_eq!(exported_body(source, "b").unwrap(), Some("() { y }"));
        assert_eq!(exported_body(source, "c").unwrap(), None);
    }
}
