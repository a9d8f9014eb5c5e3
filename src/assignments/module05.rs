//! Module 5: Component Library.
//!
//! Interactive checks mount each component from the kit, drive it with
//! events and query the rendered document. `App.tsx` gets pattern checks.

use crate::assignments::{click_text, script_uses_all};
use crate::checks::{ensure, CheckOutcome, Failure};
use crate::components::{
    ButtonProps, CardProps, CounterProps, InputProps, Size, ToggleSwitchProps, Variant,
};
use crate::engine::context::GradingContext;
use crate::engine::orchestrator::RegisteredCheck;
use crate::error::Result;
use crate::interactive::{el, noop, Instance, MockFn, TextMatch};
use crate::CheckCategory;

/// Get all module 5 checks
pub fn checks() -> Vec<RegisteredCheck> {
    use CheckCategory::{Components, TypeScript};
    vec![
        RegisteredCheck::new(
            "M05-001",
            "Button Label",
            Components,
            "Button renders its label",
            run_m05_001,
        ),
        RegisteredCheck::new(
            "M05-002",
            "Button Click",
            Components,
            "Clicking calls onClick once",
            run_m05_002,
        ),
        RegisteredCheck::new(
            "M05-003",
            "Disabled Button",
            Components,
            "A disabled button ignores clicks",
            run_m05_003,
        ),
        RegisteredCheck::new(
            "M05-004",
            "Button Variants",
            Components,
            "Every variant renders",
            run_m05_004,
        ),
        RegisteredCheck::new(
            "M05-005",
            "Button Sizes",
            Components,
            "Every size renders",
            run_m05_005,
        ),
        RegisteredCheck::new(
            "M05-006",
            "Card Content",
            Components,
            "Card renders title and children",
            run_m05_006,
        ),
        RegisteredCheck::new(
            "M05-007",
            "Card Footer",
            Components,
            "Footer renders when given",
            run_m05_007,
        ),
        RegisteredCheck::new(
            "M05-008",
            "Card Without Footer",
            Components,
            "No footer when none is given",
            run_m05_008,
        ),
        RegisteredCheck::new(
            "M05-009",
            "Card Elevation",
            Components,
            "Accepts an elevation",
            run_m05_009,
        ),
        RegisteredCheck::new(
            "M05-010",
            "Input Label",
            Components,
            "Input renders a label and a textbox",
            run_m05_010,
        ),
        RegisteredCheck::new(
            "M05-011",
            "Input Value",
            Components,
            "Shows the current value",
            run_m05_011,
        ),
        RegisteredCheck::new(
            "M05-012",
            "Input Change",
            Components,
            "Typing calls onChange",
            run_m05_012,
        ),
        RegisteredCheck::new(
            "M05-013",
            "Input Error",
            Components,
            "Shows the error message",
            run_m05_013,
        ),
        RegisteredCheck::new(
            "M05-014",
            "Input Types",
            Components,
            "The type prop reaches the input",
            run_m05_014,
        ),
        RegisteredCheck::new(
            "M05-015",
            "Input Placeholder",
            Components,
            "Shows the placeholder",
            run_m05_015,
        ),
        RegisteredCheck::new(
            "M05-016",
            "Counter Initial Value",
            Components,
            "Counter starts at initialValue",
            run_m05_016,
        ),
        RegisteredCheck::new(
            "M05-017",
            "Counter Increment",
            Components,
            "+ adds one",
            run_m05_017,
        ),
        RegisteredCheck::new(
            "M05-018",
            "Counter Decrement",
            Components,
            "- subtracts one",
            run_m05_018,
        ),
        RegisteredCheck::new(
            "M05-019",
            "Counter Reset",
            Components,
            "Reset returns to initialValue",
            run_m05_019,
        ),
        RegisteredCheck::new(
            "M05-020",
            "Counter Max",
            Components,
            "Never exceeds max",
            run_m05_020,
        ),
        RegisteredCheck::new(
            "M05-021",
            "Counter Min",
            Components,
            "Never drops below min",
            run_m05_021,
        ),
        RegisteredCheck::new(
            "M05-022",
            "Counter Step",
            Components,
            "Steps by the step prop",
            run_m05_022,
        ),
        RegisteredCheck::new(
            "M05-023",
            "Counter onChange",
            Components,
            "Reports the new count",
            run_m05_023,
        ),
        RegisteredCheck::new(
            "M05-024",
            "Toggle Label",
            Components,
            "ToggleSwitch renders its label",
            run_m05_024,
        ),
        RegisteredCheck::new(
            "M05-025",
            "Toggle Change",
            Components,
            "Clicking reports the opposite value",
            run_m05_025,
        ),
        RegisteredCheck::new(
            "M05-026",
            "Disabled Toggle",
            Components,
            "A disabled toggle ignores clicks",
            run_m05_026,
        ),
        RegisteredCheck::new(
            "M05-027",
            "Toggle States",
            Components,
            "Renders both checked and unchecked",
            run_m05_027,
        ),
        RegisteredCheck::new(
            "M05-028",
            "Showcase Uses Components",
            TypeScript,
            "App.tsx renders every component",
            run_m05_028,
        ),
        RegisteredCheck::new(
            "M05-029",
            "Showcase State",
            TypeScript,
            "App.tsx keeps state with useState",
            run_m05_029,
        ),
    ]
}

fn counter(ctx: &GradingContext, props: CounterProps) -> Instance {
    ctx.mount(ctx.kit().counter(props))
}

fn plus() -> Result<TextMatch> {
    TextMatch::pattern(r"\+")
}

fn minus() -> Result<TextMatch> {
    TextMatch::pattern("-")
}

fn expect_count(instance: &Instance, expected: i64) -> std::result::Result<(), Failure> {
    instance.get_by_text(expected.to_string()).map(|_| ()).map_err(|failure| {
        let shown = instance
            .query_by_test_id("count")
            .ok()
            .flatten()
            .map(|node| instance.text(node))
            .unwrap_or_default();
        failure.with_details(format!("expected count {}, display shows \"{}\"", expected, shown))
    })
}

/// M05-001: Button Label
fn run_m05_001(ctx: &GradingContext) -> CheckOutcome {
    let instance = ctx.mount(ctx.kit().button(ButtonProps::new("Click me", noop())));
    instance.get_by_text("Click me")?;
    Ok("label rendered".to_string())
}

/// M05-002: Button Click
fn run_m05_002(ctx: &GradingContext) -> CheckOutcome {
    let on_click = MockFn::new();
    let props = ButtonProps::new("Click me", on_click.callback());
    let mut instance = ctx.mount(ctx.kit().button(props));
    click_text(&mut instance, "Click me")?;
    ensure(
        on_click.call_count() == 1,
        format!("onClick called {} times, expected 1", on_click.call_count()),
    )?;
    Ok("onClick called once".to_string())
}

/// M05-003: Disabled Button
fn run_m05_003(ctx: &GradingContext) -> CheckOutcome {
    let on_click = MockFn::new();
    let mut props = ButtonProps::new("Click me", on_click.callback());
    props.disabled = true;
    let mut instance = ctx.mount(ctx.kit().button(props));
    click_text(&mut instance, "Click me")?;
    ensure(!on_click.was_called(), "onClick fired on a disabled button")?;
    Ok("disabled button ignores clicks".to_string())
}

/// M05-004: Button Variants
fn run_m05_004(ctx: &GradingContext) -> CheckOutcome {
    let variants = [
        ("Primary", Variant::Primary),
        ("Secondary", Variant::Secondary),
        ("Success", Variant::Success),
        ("Danger", Variant::Danger),
    ];
    for (label, variant) in variants {
        let mut props = ButtonProps::new(label, noop());
        props.variant = variant;
        ctx.mount(ctx.kit().button(props)).get_by_text(label)?;
    }
    Ok("all four variants render".to_string())
}

/// M05-005: Button Sizes
fn run_m05_005(ctx: &GradingContext) -> CheckOutcome {
    for (label, size) in [("Small", Size::Small), ("Medium", Size::Medium), ("Large", Size::Large)] {
        let mut props = ButtonProps::new(label, noop());
        props.size = size;
        ctx.mount(ctx.kit().button(props)).get_by_text(label)?;
    }
    Ok("all three sizes render".to_string())
}

fn card_props(title: &str, body: &str) -> CardProps {
    CardProps::new(title, vec![el("p").text(body).into()])
}

/// M05-006: Card Content
fn run_m05_006(ctx: &GradingContext) -> CheckOutcome {
    let instance = ctx.mount(ctx.kit().card(card_props("Test Card", "Card content")));
    instance.get_by_text("Test Card")?;
    instance.get_by_text("Card content")?;
    Ok("title and children rendered".to_string())
}

/// M05-007: Card Footer
fn run_m05_007(ctx: &GradingContext) -> CheckOutcome {
    let mut props = card_props("Test Card", "Content");
    props.footer = Some("Footer text".to_string());
    ctx.mount(ctx.kit().card(props)).get_by_text("Footer text")?;
    Ok("footer rendered".to_string())
}

/// M05-008: Card Without Footer
fn run_m05_008(ctx: &GradingContext) -> CheckOutcome {
    let instance = ctx.mount(ctx.kit().card(card_props("Test Card", "Content")));
    ensure(
        instance.query_by_text("Footer text")?.is_none(),
        "footer rendered without a footer prop",
    )?;
    Ok("no footer".to_string())
}

/// M05-009: Card Elevation
fn run_m05_009(ctx: &GradingContext) -> CheckOutcome {
    let mut props = card_props("Elevated", "Content");
    props.elevation = 3;
    ctx.mount(ctx.kit().card(props)).get_by_text("Elevated")?;
    Ok("elevated card renders".to_string())
}

/// M05-010: Input Label
fn run_m05_010(ctx: &GradingContext) -> CheckOutcome {
    let instance = ctx.mount(ctx.kit().input(InputProps::new("Name", "", noop())));
    instance.get_by_text("Name")?;
    instance.get_by_role("textbox")?;
    Ok("label and textbox rendered".to_string())
}

/// M05-011: Input Value
fn run_m05_011(ctx: &GradingContext) -> CheckOutcome {
    let instance = ctx.mount(ctx.kit().input(InputProps::new("Name", "Alice", noop())));
    instance.get_by_display_value("Alice")?;
    Ok("value displayed".to_string())
}

/// M05-012: Input Change
fn run_m05_012(ctx: &GradingContext) -> CheckOutcome {
    let on_change = MockFn::new();
    let props = InputProps::new("Name", "", on_change.callback());
    let mut instance = ctx.mount(ctx.kit().input(props));
    let input = instance.get_by_role("textbox")?;
    instance.change(input, "Bob")?;
    ensure(on_change.was_called(), "onChange was not called")?;
    Ok("onChange called".to_string())
}

/// M05-013: Input Error
fn run_m05_013(ctx: &GradingContext) -> CheckOutcome {
    let mut props = InputProps::new("Email", "", noop());
    props.error = Some("Invalid email".to_string());
    ctx.mount(ctx.kit().input(props)).get_by_text("Invalid email")?;
    Ok("error displayed".to_string())
}

/// M05-014: Input Types
fn run_m05_014(ctx: &GradingContext) -> CheckOutcome {
    for (label, input_type) in [("Email", "email"), ("Password", "password")] {
        let mut props = InputProps::new(label, "", noop());
        props.input_type = input_type.to_string();
        let instance = ctx.mount(ctx.kit().input(props));
        let input = instance.get_by_label_text(label)?;
        let actual = instance.attr(input, "type").unwrap_or_default();
        ensure(
            actual == input_type,
            format!("{} input has type \"{}\", expected \"{}\"", label, actual, input_type),
        )?;
    }
    Ok("type attribute forwarded".to_string())
}

/// M05-015: Input Placeholder
fn run_m05_015(ctx: &GradingContext) -> CheckOutcome {
    let mut props = InputProps::new("Name", "", noop());
    props.placeholder = Some("Enter your name".to_string());
    ctx.mount(ctx.kit().input(props)).get_by_placeholder("Enter your name")?;
    Ok("placeholder displayed".to_string())
}

/// M05-016: Counter Initial Value
fn run_m05_016(ctx: &GradingContext) -> CheckOutcome {
    expect_count(&counter(ctx, CounterProps::starting_at(5)), 5)?;
    Ok("starts at 5".to_string())
}

/// M05-017: Counter Increment
fn run_m05_017(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = counter(ctx, CounterProps::starting_at(0));
    click_text(&mut instance, plus()?)?;
    expect_count(&instance, 1)?;
    Ok("0 -> 1".to_string())
}

/// M05-018: Counter Decrement
fn run_m05_018(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = counter(ctx, CounterProps::starting_at(5));
    click_text(&mut instance, minus()?)?;
    expect_count(&instance, 4)?;
    Ok("5 -> 4".to_string())
}

/// M05-019: Counter Reset
fn run_m05_019(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = counter(ctx, CounterProps::starting_at(10));
    click_text(&mut instance, plus()?)?;
    click_text(&mut instance, plus()?)?;
    expect_count(&instance, 12)?;
    click_text(&mut instance, TextMatch::pattern("(?i)reset")?)?;
    expect_count(&instance, 10)?;
    Ok("10 -> 12 -> reset -> 10".to_string())
}

/// M05-020: Counter Max
fn run_m05_020(ctx: &GradingContext) -> CheckOutcome {
    let props = CounterProps {
        max: Some(10),
        ..CounterProps::starting_at(9)
    };
    let mut instance = counter(ctx, props);
    click_text(&mut instance, plus()?)?;
    expect_count(&instance, 10)?;
    click_text(&mut instance, plus()?)?;
    expect_count(&instance, 10)?;
    Ok("stops at max 10".to_string())
}

/// M05-021: Counter Min
fn run_m05_021(ctx: &GradingContext) -> CheckOutcome {
    let props = CounterProps {
        min: Some(0),
        ..CounterProps::starting_at(1)
    };
    let mut instance = counter(ctx, props);
    click_text(&mut instance, minus()?)?;
    expect_count(&instance, 0)?;
    click_text(&mut instance, minus()?)?;
    expect_count(&instance, 0)?;
    Ok("stops at min 0".to_string())
}

/// M05-022: Counter Step
fn run_m05_022(ctx: &GradingContext) -> CheckOutcome {
    let props = CounterProps {
        step: 5,
        ..CounterProps::starting_at(0)
    };
    let mut instance = counter(ctx, props);
    click_text(&mut instance, TextMatch::pattern(r"\+ 5")?)?;
    expect_count(&instance, 5)?;
    click_text(&mut instance, TextMatch::pattern(r"\+ 5")?)?;
    expect_count(&instance, 10)?;
    Ok("steps by 5".to_string())
}

/// M05-023: Counter onChange
fn run_m05_023(ctx: &GradingContext) -> CheckOutcome {
    let on_change = MockFn::new();
    let props = CounterProps {
        on_change: Some(on_change.callback()),
        ..CounterProps::starting_at(0)
    };
    let mut instance = counter(ctx, props);
    click_text(&mut instance, plus()?)?;
    ensure(
        on_change.was_called_with(&1),
        format!("onChange calls: {:?}, expected a call with 1", on_change.calls()),
    )?;
    Ok("onChange(1)".to_string())
}

/// M05-024: Toggle Label
fn run_m05_024(ctx: &GradingContext) -> CheckOutcome {
    let props = ToggleSwitchProps::new("Notifications", false, noop());
    ctx.mount(ctx.kit().toggle_switch(props)).get_by_text("Notifications")?;
    Ok("label rendered".to_string())
}

/// Click the element wrapping the toggle's label.
fn click_toggle(instance: &mut Instance) -> std::result::Result<(), Failure> {
    let label = instance.get_by_text("Toggle")?;
    let toggle = instance
        .parent(label)
        .ok_or_else(|| Failure::new("toggle label has no parent element"))?;
    instance.click(toggle)
}

/// M05-025: Toggle Change
fn run_m05_025(ctx: &GradingContext) -> CheckOutcome {
    let on_change = MockFn::new();
    let props = ToggleSwitchProps::new("Toggle", false, on_change.callback());
    let mut instance = ctx.mount(ctx.kit().toggle_switch(props));
    click_toggle(&mut instance)?;
    ensure(
        on_change.was_called_with(&true),
        format!("onChange calls: {:?}, expected a call with true", on_change.calls()),
    )?;
    Ok("onChange(true)".to_string())
}

/// M05-026: Disabled Toggle
fn run_m05_026(ctx: &GradingContext) -> CheckOutcome {
    let on_change = MockFn::new();
    let mut props = ToggleSwitchProps::new("Toggle", false, on_change.callback());
    props.disabled = true;
    let mut instance = ctx.mount(ctx.kit().toggle_switch(props));
    click_toggle(&mut instance)?;
    ensure(!on_change.was_called(), "onChange fired on a disabled toggle")?;
    Ok("disabled toggle ignores clicks".to_string())
}

/// M05-027: Toggle States
fn run_m05_027(ctx: &GradingContext) -> CheckOutcome {
    for checked in [false, true] {
        let props = ToggleSwitchProps::new("Toggle", checked, noop());
        ctx.mount(ctx.kit().toggle_switch(props)).get_by_text("Toggle")?;
    }
    Ok("renders checked and unchecked".to_string())
}

/// M05-028: Showcase Uses Components
fn run_m05_028(ctx: &GradingContext) -> CheckOutcome {
    script_uses_all(
        ctx,
        &["<Button", "<Card", "<Input", "<Counter", "<ToggleSwitch"],
        "showcase renders every component",
    )
}

/// M05-029: Showcase State
fn run_m05_029(ctx: &GradingContext) -> CheckOutcome {
    script_uses_all(ctx, &["useState("], "showcase state")
}
