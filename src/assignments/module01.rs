//! Module 1: Personal Profile Page.
//!
//! Static checks over `index.html` and `styles.css`.

use crate::checks::markup::{
    require_attr, require_attrs, require_count_at_least, require_doctype, require_each_nonempty,
    require_element, require_nonempty_text,
};
use crate::checks::{ensure, fail, CheckOutcome};
use crate::engine::context::GradingContext;
use crate::engine::orchestrator::RegisteredCheck;
use crate::CheckCategory;

/// Title the starter file ships with.
const PLACEHOLDER_TITLE: &str = "my profile page";

/// Get all module 1 checks
pub fn checks() -> Vec<RegisteredCheck> {
    use CheckCategory::*;
    vec![
        RegisteredCheck::new(
            "M01-001",
            "HTML5 Doctype",
            HtmlStructure,
            "Markup starts with <!DOCTYPE html>",
            run_m01_001,
        ),
        RegisteredCheck::new(
            "M01-002",
            "Language Attribute",
            HtmlStructure,
            "The html element declares a lang",
            run_m01_002,
        ),
        RegisteredCheck::new(
            "M01-003",
            "Head Element",
            HtmlStructure,
            "Document has a head",
            run_m01_003,
        ),
        RegisteredCheck::new(
            "M01-004",
            "Body Element",
            HtmlStructure,
            "Document has a body",
            run_m01_004,
        ),
        RegisteredCheck::new(
            "M01-005",
            "Page Title",
            HtmlStructure,
            "A personalised title in the head",
            run_m01_005,
        ),
        RegisteredCheck::new(
            "M01-006",
            "Meta Charset",
            HtmlStructure,
            "A meta charset tag",
            run_m01_006,
        ),
        RegisteredCheck::new(
            "M01-007",
            "Main Heading",
            RequiredElements,
            "At least one non-empty h1",
            run_m01_007,
        ),
        RegisteredCheck::new(
            "M01-008",
            "Subheading",
            RequiredElements,
            "At least one non-empty h2",
            run_m01_008,
        ),
        RegisteredCheck::new(
            "M01-009",
            "Paragraphs",
            RequiredElements,
            "At least three non-empty paragraphs",
            run_m01_009,
        ),
        RegisteredCheck::new(
            "M01-010",
            "Images",
            RequiredElements,
            "At least one image, each with src and alt",
            run_m01_010,
        ),
        RegisteredCheck::new(
            "M01-011",
            "Unordered List",
            RequiredElements,
            "A list with at least three non-empty items",
            run_m01_011,
        ),
        RegisteredCheck::new(
            "M01-012",
            "Links",
            RequiredElements,
            "At least one link, each with href and text",
            run_m01_012,
        ),
        RegisteredCheck::new(
            "M01-013",
            "Stylesheet Link",
            CssStyling,
            "Links an external CSS file",
            run_m01_013,
        ),
        RegisteredCheck::new(
            "M01-014",
            "Stylesheet Content",
            CssStyling,
            "styles.css is not empty",
            run_m01_014,
        ),
        RegisteredCheck::new(
            "M01-015",
            "Body Styles",
            CssStyling,
            "A body rule block",
            run_m01_015,
        ),
        RegisteredCheck::new(
            "M01-016",
            "Heading Colour",
            CssStyling,
            "h1 or h2 sets color",
            run_m01_016,
        ),
        RegisteredCheck::new(
            "M01-017",
            "Font Family",
            CssStyling,
            "Sets a font-family",
            run_m01_017,
        ),
        RegisteredCheck::new(
            "M01-018",
            "Spacing",
            CssStyling,
            "Uses padding or margin",
            run_m01_018,
        ),
        RegisteredCheck::new(
            "M01-019",
            "Link Styles",
            CssStyling,
            "An a rule block",
            run_m01_019,
        ),
        RegisteredCheck::new(
            "M01-020",
            "Semantic Elements",
            SemanticHtml,
            "Uses header, main, section, article or footer",
            run_m01_020,
        )
        .advisory(),
    ]
}

/// M01-001: HTML5 Doctype
fn run_m01_001(ctx: &GradingContext) -> CheckOutcome {
    require_doctype(ctx.raw_markup()?)
}

/// M01-002: Language Attribute
fn run_m01_002(ctx: &GradingContext) -> CheckOutcome {
    require_attr(ctx.document()?, "html", "lang", "html element")
}

/// M01-003: Head Element
fn run_m01_003(ctx: &GradingContext) -> CheckOutcome {
    require_element(ctx.document()?, "head", "head element")?;
    Ok("head present".to_string())
}

/// M01-004: Body Element
fn run_m01_004(ctx: &GradingContext) -> CheckOutcome {
    require_element(ctx.document()?, "body", "body element")?;
    Ok("body present".to_string())
}

/// M01-005: Page Title
fn run_m01_005(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    let title = require_element(doc, "head > title", "page title")?;
    let text = doc.trimmed_text(title);
    ensure(!text.is_empty(), "page title is empty")?;
    ensure(
        text.to_lowercase() != PLACEHOLDER_TITLE,
        format!("page title is still the placeholder \"{}\"", text),
    )?;
    Ok(format!("title: \"{}\"", text))
}

/// M01-006: Meta Charset
fn run_m01_006(ctx: &GradingContext) -> CheckOutcome {
    require_element(ctx.document()?, "meta[charset]", "meta charset tag")?;
    Ok("charset declared".to_string())
}

/// M01-007: Main Heading
fn run_m01_007(ctx: &GradingContext) -> CheckOutcome {
    require_nonempty_text(ctx.document()?, "h1", "h1 heading")
}

/// M01-008: Subheading
fn run_m01_008(ctx: &GradingContext) -> CheckOutcome {
    require_nonempty_text(ctx.document()?, "h2", "h2 heading")
}

/// M01-009: Paragraphs
fn run_m01_009(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    let paragraphs = require_count_at_least(doc, "p", 3, "paragraphs")?;
    require_each_nonempty(doc, &paragraphs, "paragraph")?;
    Ok(format!("{} paragraphs", paragraphs.len()))
}

/// M01-010: Images
fn run_m01_010(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    let images = require_count_at_least(doc, "img", 1, "images")?;
    require_attrs(doc, &images, "image", &["src", "alt"])?;
    Ok(format!("{} image(s) with src and alt", images.len()))
}

/// M01-011: Unordered List
fn run_m01_011(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    let list = require_element(doc, "ul", "unordered list")?;
    let items = doc.query_all_within(list, "li")?;
    ensure(
        items.len() >= 3,
        format!("expected at least 3 list items, found {}", items.len()),
    )?;
    require_each_nonempty(doc, &items, "list item")?;
    Ok(format!("{} list items", items.len()))
}

/// M01-012: Links
fn run_m01_012(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    let links = require_count_at_least(doc, "a", 1, "links")?;
    require_attrs(doc, &links, "link", &["href"])?;
    for (index, link) in links.iter().enumerate() {
        ensure(
            !doc.trimmed_text(*link).is_empty(),
            format!("link {} has no text content", index + 1),
        )?;
    }
    Ok(format!("{} link(s)", links.len()))
}

/// M01-013: Stylesheet Link
fn run_m01_013(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    let link = require_element(doc, r#"link[rel="stylesheet"]"#, "stylesheet link")?;
    let href = doc.attr(link, "href").unwrap_or_default();
    ensure(
        href.contains("css"),
        format!("stylesheet href \"{}\" does not point at a CSS file", href),
    )?;
    Ok(format!("links {}", href))
}

/// M01-014: Stylesheet Content
fn run_m01_014(ctx: &GradingContext) -> CheckOutcome {
    ensure(!ctx.stylesheet()?.is_blank(), "stylesheet is empty")?;
    Ok("stylesheet has content".to_string())
}

/// M01-015: Body Styles
fn run_m01_015(ctx: &GradingContext) -> CheckOutcome {
    ensure(ctx.stylesheet()?.has_rule_block("body")?, "no body rule block")?;
    Ok("body is styled".to_string())
}

/// M01-016: Heading Colour
fn run_m01_016(ctx: &GradingContext) -> CheckOutcome {
    let css = ctx.stylesheet()?;
    for heading in ["h1", "h2"] {
        if css.rule_sets_property(heading, "color")? {
            return Ok(format!("{} sets color", heading));
        }
    }
    Err(fail("neither h1 nor h2 sets color"))
}

/// M01-017: Font Family
fn run_m01_017(ctx: &GradingContext) -> CheckOutcome {
    ensure(ctx.stylesheet()?.has_property("font-family")?, "no font-family declaration")?;
    Ok("font-family set".to_string())
}

/// M01-018: Spacing
fn run_m01_018(ctx: &GradingContext) -> CheckOutcome {
    ensure(
        ctx.stylesheet()?.matches(r"(?i)padding|margin")?,
        "no padding or margin anywhere in the stylesheet",
    )?;
    Ok("spacing present".to_string())
}

/// M01-019: Link Styles
fn run_m01_019(ctx: &GradingContext) -> CheckOutcome {
    ensure(ctx.stylesheet()?.has_rule_block("a")?, "no rule block for links (a { ... })")?;
    Ok("links are styled".to_string())
}

/// M01-020: Semantic Elements
fn run_m01_020(ctx: &GradingContext) -> CheckOutcome {
    let doc = ctx.document()?;
    for tag in ["header", "main", "section", "article", "footer"] {
        if doc.exists(tag)? {
            return Ok(format!("uses <{}>", tag));
        }
    }
    Err(fail("consider semantic elements like <header>, <main> or <section>"))
}
