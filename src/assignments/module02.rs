//! Module 2: Responsive Interactive Portfolio.

use crate::assignments::{script_avoids, script_uses_any};
use crate::checks::markup::{require_count_at_least, require_doctype, require_element};
use crate::checks::{ensure, fail, CheckOutcome};
use crate::engine::context::GradingContext;
use crate::engine::orchestrator::RegisteredCheck;
use crate::CheckCategory;

/// Get all module 2 checks
pub fn checks() -> Vec<RegisteredCheck> {
    use CheckCategory::*;
    vec![
        RegisteredCheck::new(
            "M02-001",
            "HTML5 Doctype",
            HtmlStructure,
            "Markup starts with <!DOCTYPE html>",
            run_m02_001,
        ),
        RegisteredCheck::new(
            "M02-002",
            "Viewport Meta",
            HtmlStructure,
            "A viewport meta tag with width=device-width",
            run_m02_002,
        ),
        RegisteredCheck::new(
            "M02-003",
            "Stylesheet Link",
            HtmlStructure,
            "Links an external stylesheet",
            run_m02_003,
        ),
        RegisteredCheck::new(
            "M02-004",
            "Script Link",
            HtmlStructure,
            "Loads an external script",
            run_m02_004,
        ),
        RegisteredCheck::new(
            "M02-005",
            "Header",
            SemanticHtml,
            "A <header> element",
            run_m02_005,
        ),
        RegisteredCheck::new(
            "M02-006",
            "Nav",
            SemanticHtml,
            "A <nav> element",
            run_m02_006,
        ),
        RegisteredCheck::new(
            "M02-007",
            "Main",
            SemanticHtml,
            "A <main> element",
            run_m02_007,
        ),
        RegisteredCheck::new(
            "M02-008",
            "Sections",
            SemanticHtml,
            "At least three <section> elements",
            run_m02_008,
        ),
        RegisteredCheck::new(
            "M02-009",
            "Footer",
            SemanticHtml,
            "A <footer> element",
            run_m02_009,
        ),
        RegisteredCheck::new(
            "M02-010",
            "Navigation Links",
            Navigation,
            "At least three links inside nav",
            run_m02_010,
        ),
        RegisteredCheck::new(
            "M02-011",
            "Anchor Links",
            Navigation,
            "A nav link pointing at an in-page anchor",
            run_m02_011,
        ),
        RegisteredCheck::new(
            "M02-012",
            "Section Ids",
            Content,
            "At least two sections carry an id",
            run_m02_012,
        ),
        RegisteredCheck::new(
            "M02-013",
            "Project Cards",
            Content,
            "At least three card-like repeated items",
            run_m02_013,
        ),
        RegisteredCheck::new(
            "M02-014",
            "Flexbox",
            CssLayout,
            "Uses display: flex",
            run_m02_014,
        ),
        RegisteredCheck::new(
            "M02-015",
            "Layout System",
            CssLayout,
            "Uses grid or flexbox",
            run_m02_015,
        ),
        RegisteredCheck::new(
            "M02-016",
            "Layout Spacing",
            CssLayout,
            "Uses gap, or both margin and padding",
            run_m02_016,
        ),
        RegisteredCheck::new(
            "M02-017",
            "Media Queries",
            ResponsiveDesign,
            "At least two @media rules",
            run_m02_017,
        ),
        RegisteredCheck::new(
            "M02-018",
            "Mobile First",
            ResponsiveDesign,
            "Media queries use min-width",
            run_m02_018,
        ),
        RegisteredCheck::new(
            "M02-019",
            "Responsive Images",
            ResponsiveDesign,
            "Some width control for images",
            run_m02_019,
        ),
        RegisteredCheck::new(
            "M02-020",
            "Breakpoints",
            ResponsiveDesign,
            "A 768px or 1024px breakpoint",
            run_m02_020,
        ),
        RegisteredCheck::new(
            "M02-021",
            "Script Content",
            JavaScript,
            "script.js has code outside comments",
            run_m02_021,
        ),
        RegisteredCheck::new(
            "M02-022",
            "DOM Selection",
            JavaScript,
            "Selects elements with getElementById or querySelector",
            run_m02_022,
        ),
        RegisteredCheck::new(
            "M02-023",
            "Event Listener",
            JavaScript,
            "Registers an event listener",
            run_m02_023,
        ),
        RegisteredCheck::new(
            "M02-024",
            "Interactive Button",
            JavaScript,
            "The page has a button",
            run_m02_024,
        ),
        RegisteredCheck::new(
            "M02-025",
            "Modern Declarations",
            JavaScript,
            "Uses let or const",
            run_m02_025,
        ),
        RegisteredCheck::new(
            "M02-026",
            "No var",
            JavaScript,
            "Does not declare with var",
            run_m02_026,
        ),
        RegisteredCheck::new(
            "M02-027",
            "Stylesheet Comments",
            CodeQuality,
            "The stylesheet is organised with comments",
            run_m02_027,
        ),
        RegisteredCheck::new(
            "M02-028",
            "Indentation",
            CodeQuality,
            "The markup is indented",
            run_m02_028,
        ),
        RegisteredCheck::new(
            "M02-029",
            "Meaningful Class Names",
            CodeQuality,
            "The stylesheet uses descriptive class selectors",
            run_m02_029,
        ),
    ]
}

fn css_literal(ctx: &GradingContext, literals: &[&str], what: &str) -> CheckOutcome {
    let css = ctx.stylesheet()?;
    match literals.iter().find(|l| css.contains(l)) {
        Some(found) => Ok(format!("{} ({})", what, found)),
        None => Err(fail(format!("{} not found (looked for {})", what, literals.join(", ")))),
    }
}

fn element(ctx: &GradingContext, tag: &str) -> CheckOutcome {
    require_element(ctx.document()?, tag, &format!("<{}> element", tag))?;
    Ok(format!("<{}> present", tag))
}

/// M02-001: HTML5 Doctype
fn run_m02_001(ctx: &GradingContext) -> CheckOutcome {
    require_doctype(ctx.raw_markup()?)
}

/// M02-002: Viewport Meta
fn run_m02_002(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    let meta = require_element(doc, r#"meta[name="viewport"]"#, "viewport meta tag")?;
    let content = doc.attr(meta, "content").unwrap_or_default();
    ensure(
        content.contains("width=device-width"),
        format!("viewport content \"{}\" lacks width=device-width", content),
    )?;
    Ok(format!("viewport: {}", content))
}

/// M02-003: Stylesheet Link
fn run_m02_003(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    let link = require_element(doc, r#"link[rel="stylesheet"]"#, "stylesheet link")?;
    match doc.attr(link, "href") {
        Some(href) if !href.is_empty() => Ok(format!("links {}", href)),
        _ => Err(fail("stylesheet link has no href")),
    }
}

/// M02-004: Script Link
fn run_m02_004(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    let script = require_element(doc, "script[src]", "external script")?;
    match doc.attr(script, "src") {
        Some(src) if !src.is_empty() => Ok(format!("loads {}", src)),
        _ => Err(fail("script tag has an empty src")),
    }
}

/// M02-005: Header
fn run_m02_005(ctx: &GradingContext) -> CheckOutcome {
    element(ctx, "header")
}

/// M02-006: Nav
fn run_m02_006(ctx: &GradingContext) -> CheckOutcome {
    element(ctx, "nav")
}

/// M02-007: Main
fn run_m02_007(ctx: &GradingContext) -> CheckOutcome {
    element(ctx, "main")
}

/// M02-008: Sections
fn run_m02_008(ctx: &GradingContext) -> CheckOutcome {
    let sections = require_count_at_least(ctx.document()?, "section", 3, "sections")?;
    Ok(format!("{} sections", sections.len()))
}

/// M02-009: Footer
fn run_m02_009(ctx: &GradingContext) -> CheckOutcome {
    element(ctx, "footer")
}

/// M02-010: Navigation Links
fn run_m02_010(ctx: &GradingContext) -> CheckOutcome {
    let links = require_count_at_least(ctx.document()?, "nav a", 3, "navigation links")?;
    Ok(format!("{} navigation links", links.len()))
}

/// M02-011: Anchor Links
fn run_m02_011(ctx: &GradingContext) -> CheckOutcome {
    let anchors = require_count_at_least(ctx.document()?, r##"nav a[href^="#"]"##, 1, "in-page nav links")?;
    Ok(format!("{} in-page nav link(s)", anchors.len()))
}

/// M02-012: Section Ids
fn run_m02_012(ctx: &GradingContext) -> CheckOutcome {
    let sections = require_count_at_least(ctx.document()?, "section[id]", 2, "sections with an id")?;
    Ok(format!("{} sections with an id", sections.len()))
}

/// M02-013: Project Cards
fn run_m02_013(ctx: &GradingContext) -> CheckOutcome {
    let cards = require_count_at_least(
        ctx.document()?,
        r#".project-card, .card, [class*="card"]"#,
        3,
        "card-like items",
    )?;
    Ok(format!("{} cards", cards.len()))
}

/// M02-014: Flexbox
fn run_m02_014(ctx: &GradingContext) -> CheckOutcome {
    css_literal(ctx, &["display: flex", "display:flex"], "flexbox")
}

/// M02-015: Layout System
fn run_m02_015(ctx: &GradingContext) -> CheckOutcome {
    css_literal(
        ctx,
        &["display: grid", "display:grid", "display: flex", "display:flex"],
        "grid or flexbox layout",
    )
}

/// M02-016: Layout Spacing
fn run_m02_016(ctx: &GradingContext) -> CheckOutcome {
    let css = ctx.stylesheet()?;
    if css.contains_any(&["gap:", "gap "]) {
        return Ok("uses gap".to_string());
    }
    ensure(
        css.contains("margin") && css.contains("padding"),
        "no gap, and margin and padding are not both used",
    )?;
    Ok("uses margin and padding".to_string())
}

/// M02-017: Media Queries
fn run_m02_017(ctx: &GradingContext) -> CheckOutcome {
    let count = ctx.stylesheet()?.count("@media");
    ensure(count >= 2, format!("expected at least 2 media queries, found {}", count))?;
    Ok(format!("{} media queries", count))
}

/// M02-018: Mobile First
fn run_m02_018(ctx: &GradingContext) -> CheckOutcome {
    css_literal(ctx, &["min-width"], "min-width media queries")
}

/// M02-019: Responsive Images
fn run_m02_019(ctx: &GradingContext) -> CheckOutcome {
    css_literal(
        ctx,
        &["max-width: 100%", "max-width:100%", "width: 100%", "width:100%", "width"],
        "width control",
    )
}

/// M02-020: Breakpoints
fn run_m02_020(ctx: &GradingContext) -> CheckOutcome {
    css_literal(ctx, &["768px", "1024px"], "tablet or desktop breakpoint")
}

/// M02-021: Script Content
fn run_m02_021(ctx: &GradingContext) -> CheckOutcome {
    ensure(
        !ctx.script()?.is_effectively_empty(),
        "script.js contains only comments or whitespace",
    )?;
    Ok("script has code".to_string())
}

/// M02-022: DOM Selection
fn run_m02_022(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(
        ctx,
        &["getElementById", "querySelector", "querySelectorAll"],
        "DOM selection",
    )
}

/// M02-023: Event Listener
fn run_m02_023(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["addEventListener"], "event listener")
}

/// M02-024: Interactive Button
fn run_m02_024(ctx: &GradingContext) -> CheckOutcome {
    element(ctx, "button")
}

/// M02-025: Modern Declarations
fn run_m02_025(ctx: &GradingContext) -> CheckOutcome {
    script_uses_any(ctx, &["let ", "const "], "let/const declarations")
}

/// M02-026: No var
fn run_m02_026(ctx: &GradingContext) -> CheckOutcome {
    script_avoids(ctx, &["var "], "var declarations")
}

/// M02-027: Stylesheet Comments
fn run_m02_027(ctx: &GradingContext) -> CheckOutcome {
    css_literal(ctx, &["/*"], "stylesheet comments")
}

/// M02-028: Indentation
fn run_m02_028(ctx: &GradingContext) -> CheckOutcome {
    let markup = ctx.raw_markup()?;
    ensure(
        markup.contains("  ") || markup.contains('\t'),
        "markup has no indentation",
    )?;
    Ok("markup is indented".to_string())
}

/// M02-029: Meaningful Class Names
fn run_m02_029(ctx: &GradingContext) -> CheckOutcome {
    css_literal(
        ctx,
        &[".nav", ".header", ".project", ".section", ".card", ".button"],
        "descriptive class selectors",
    )
}

#[cfg(test)]
mod tests {
    use crate::assignments::testing::{grade, problems, status};
    use crate::submission::ArtifactKind::{Markup, Script, Stylesheet};

    const HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <link rel="stylesheet" href="styles.css">
</head>
<body>
  <header>
    <nav>
      <a href="#about">About</a>
      <a href="#projects">Projects</a>
      <a href="#contact">Contact</a>
    </nav>
  </header>
  <main>
    <section id="about"><h2>About</h2></section>
    <section id="projects">
      <div class="project-card">One</div>
      <div class="project-card">Two</div>
      <div class="project-card">Three</div>
    </section>
    <section id="contact"><button id="theme">Theme</button></section>
  </main>
  <footer>Made by me</footer>
  <script src="script.js"></script>
</body>
</html>"##;

    const CSS: &str = r#"/* Layout */
.nav { display: flex; gap: 1rem; }
.project-card { padding: 1rem; max-width: 100%; }
@media (min-width: 768px) { .projects { display: grid; } }
@media (min-width: 1024px) { body { margin: 0 auto; } }
"#;

    const JS: &str = r#"// var was used here before
const button = document.getElementById('theme');
button.addEventListener('click', () => {
  document.body.classList.toggle('dark');
});
"#;

    #[test]
    fn complete_portfolio_passes() {
        let report = grade("module-02", &[(Markup, HTML), (Stylesheet, CSS), (Script, JS)]);
        assert!(problems(&report).is_empty(), "{:?}", problems(&report));
        assert_eq!(report.summary().total, 29);
    }

    #[test]
    fn min_width_anywhere_is_mobile_first() {
        let css = "/* x */ .card { min-width: 10px; }";
        let report = grade("module-02", &[(Markup, HTML), (Stylesheet, css), (Script, JS)]);
        assert_eq!(status(&report, "M02-018"), "pass");
        assert_eq!(status(&report, "M02-017"), "fail");
    }

    #[test]
    fn var_outside_comments_fails() {
        let js = format!("{}\nvar legacy = 1;\n", JS);
        let report = grade("module-02", &[(Markup, HTML), (Stylesheet, CSS), (Script, &js)]);
        assert_eq!(problems(&report), vec!["M02-026"]);
    }

    #[test]
    fn comment_only_script_is_empty() {
        let js = "// TODO: write the script\n/* soon */\n";
        let report = grade("module-02", &[(Markup, HTML), (Stylesheet, CSS), (Script, js)]);
        assert_eq!(
            problems(&report),
            vec!["M02-021", "M02-022", "M02-023", "M02-025"]
        );
    }
}
