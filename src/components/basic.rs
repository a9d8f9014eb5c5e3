//! Presentational building blocks: button, card, input, counter, toggle.

use crate::components::{ButtonProps, CardProps, CounterProps, InputProps, ToggleSwitchProps};
use crate::dom::EventKind;
use crate::interactive::{el, Component, Context, Event, View};

pub struct Button {
    props: ButtonProps,
}

impl Button {
    pub fn new(props: ButtonProps) -> Self {
        Button { props }
    }
}

impl Component for Button {
    fn render(&self) -> View {
        el("button")
            .attr("type", "button")
            .class("btn")
            .class(&format!("btn-{}", self.props.variant.as_str()))
            .class(&format!("btn-{}", self.props.size.as_str()))
            .flag("disabled", self.props.disabled)
            .on(EventKind::Click, "click")
            .text(self.props.label.clone())
            .into()
    }

    fn handle(&mut self, handler: &str, _event: &Event, _ctx: &mut Context<'_>) {
        if handler == "click" && !self.props.disabled {
            (self.props.on_click)(());
        }
    }
}

pub struct Card {
    props: CardProps,
}

impl Card {
    pub fn new(props: CardProps) -> Self {
        Card { props }
    }
}

impl Component for Card {
    fn render(&self) -> View {
        let elevation = self.props.elevation.clamp(1, 5);
        el("div")
            .class("card")
            .class(&format!("elevation-{}", elevation))
            .child(el("h3").class("card-title").text(self.props.title.clone()))
            .child(el("div").class("card-body").children(self.props.children.clone()))
            .child(
                self.props
                    .footer
                    .clone()
                    .map(|footer| el("div").class("card-footer").text(footer)),
            )
            .into()
    }

    fn handle(&mut self, _handler: &str, _event: &Event, _ctx: &mut Context<'_>) {}
}

/// Controlled text input with a label and optional error message.
pub struct Input {
    props: InputProps,
}

impl Input {
    pub fn new(props: InputProps) -> Self {
        Input { props }
    }

    fn id(&self) -> String {
        let slug: String = self
            .props
            .label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        format!("input-{}", slug)
    }
}

impl Component for Input {
    fn render(&self) -> View {
        let id = self.id();
        let mut input = el("input")
            .attr("id", id.clone())
            .attr("type", self.props.input_type.clone())
            .attr("value", self.props.value.clone())
            .on(EventKind::Change, "change");
        if let Some(placeholder) = &self.props.placeholder {
            input = input.attr("placeholder", placeholder.clone());
        }
        if self.props.error.is_some() {
            input = input.attr("aria-invalid", "true");
        }

        el("div")
            .class("input-group")
            .child(el("label").attr("for", id).text(self.props.label.clone()))
            .child(input)
            .child(
                self.props
                    .error
                    .clone()
                    .map(|error| el("p").class("input-error").attr("role", "alert").text(error)),
            )
            .into()
    }

    fn handle(&mut self, handler: &str, event: &Event, _ctx: &mut Context<'_>) {
        if handler == "change" {
            (self.props.on_change)(event.value.clone());
        }
    }
}

/// Stepping counter clamped to optional bounds.
pub struct Counter {
    props: CounterProps,
    count: i64,
}

impl Counter {
    pub fn new(props: CounterProps) -> Self {
        let count = props.initial_value;
        Counter { props, count }
    }

    fn clamp(&self, value: i64) -> i64 {
        let value = self.props.min.map_or(value, |min| value.max(min));
        self.props.max.map_or(value, |max| value.min(max))
    }

    fn set(&mut self, value: i64) {
        let value = self.clamp(value);
        if value != self.count {
            self.count = value;
            if let Some(on_change) = &self.props.on_change {
                on_change(value);
            }
        }
    }
}

impl Component for Counter {
    fn render(&self) -> View {
        let step = self.props.step;
        el("div")
            .class("counter")
            .child(
                el("button")
                    .attr("type", "button")
                    .on(EventKind::Click, "decrement")
                    .text(format!("- {}", step)),
            )
            .child(
                el("span")
                    .class("counter-value")
                    .test_id("count")
                    .text(self.count.to_string()),
            )
            .child(
                el("button")
                    .attr("type", "button")
                    .on(EventKind::Click, "increment")
                    .text(format!("+ {}", step)),
            )
            .child(
                el("button")
                    .attr("type", "button")
                    .on(EventKind::Click, "reset")
                    .text("Reset"),
            )
            .into()
    }

    fn handle(&mut self, handler: &str, _event: &Event, _ctx: &mut Context<'_>) {
        match handler {
            "increment" => self.set(self.count.saturating_add(self.props.step)),
            "decrement" => self.set(self.count.saturating_sub(self.props.step)),
            "reset" => self.set(self.props.initial_value),
            _ => {}
        }
    }
}

pub struct ToggleSwitch {
    props: ToggleSwitchProps,
}

impl ToggleSwitch {
    pub fn new(props: ToggleSwitchProps) -> Self {
        ToggleSwitch { props }
    }
}

impl Component for ToggleSwitch {
    fn render(&self) -> View {
        let mut root = el("div")
            .class("toggle-switch")
            .attr("role", "switch")
            .attr("aria-checked", self.props.checked.to_string())
            .on(EventKind::Click, "toggle");
        if self.props.checked {
            root = root.class("checked");
        }
        if self.props.disabled {
            root = root.attr("aria-disabled", "true");
        }
        root.child(el("span").class("toggle-track"))
            .child(el("span").class("toggle-label").text(self.props.label.clone()))
            .into()
    }

    fn handle(&mut self, handler: &str, _event: &Event, _ctx: &mut Context<'_>) {
        if handler == "toggle" && !self.props.disabled {
            (self.props.on_change)(!self.props.checked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Size, Variant};
    use crate::interactive::{InteractionSettings, MockFn, Mount, TextMatch};

    #[test]
    fn button_classes_and_click() {
        let mock = MockFn::<()>::new();
        let mut props = ButtonProps::new("Save", mock.callback());
        props.variant = Variant::Danger;
        props.size = Size::Large;
        let mut instance = Mount::new(Button::new(props)).mount(InteractionSettings::default());
        let button = instance.get_by_text("Save").unwrap();
        assert!(instance.document().matches(button, "button.btn.btn-danger.btn-large").unwrap());
        instance.click(button).unwrap();
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn card_footer_is_optional() {
        let props = CardProps::new("Title", vec![el("p").text("Body").into()]);
        let instance = Mount::new(Card::new(props)).mount(InteractionSettings::default());
        assert!(instance.get_by_text("Body").is_ok());
        assert!(!instance.document().exists(".card-footer").unwrap());
    }

    #[test]
    fn input_label_and_error() {
        let mut props = InputProps::new("Email", "", MockFn::new().callback());
        props.input_type = "email".to_string();
        props.error = Some("Invalid email".to_string());
        let instance = Mount::new(Input::new(props)).mount(InteractionSettings::default());
        let input = instance.get_by_label_text("Email").unwrap();
        assert_eq!(instance.attr(input, "type").as_deref(), Some("email"));
        assert!(instance.get_by_role("alert").is_ok());
    }

    #[test]
    fn counter_clamps_and_reports_changes() {
        let mock = MockFn::<i64>::new();
        let props = CounterProps {
            initial_value: 9,
            max: Some(10),
            on_change: Some(mock.callback()),
            ..CounterProps::default()
        };
        let mut instance = Mount::new(Counter::new(props)).mount(InteractionSettings::default());
        for _ in 0..2 {
            let plus = instance.get_by_text(TextMatch::pattern(r"\+").unwrap()).unwrap();
            instance.click(plus).unwrap();
        }
        let count = instance.get_by_test_id("count").unwrap();
        assert_eq!(instance.text(count), "10");
        assert_eq!(mock.calls(), vec![10]);
    }

    #[test]
    fn disabled_toggle_ignores_clicks() {
        let mock = MockFn::<bool>::new();
        let mut props = ToggleSwitchProps::new("Toggle", false, mock.callback());
        props.disabled = true;
        let mut instance = Mount::new(ToggleSwitch::new(props)).mount(InteractionSettings::default());
        let label = instance.get_by_text("Toggle").unwrap();
        let toggle = instance.parent(label).unwrap();
        instance.click(toggle).unwrap();
        assert_eq!(mock.call_count(), 0);
    }
}
