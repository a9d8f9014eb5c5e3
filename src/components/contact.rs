//! Contact form with a self-dismissing confirmation.

use crate::dom::EventKind;
use crate::interactive::{el, Component, Context, Event, TaskOutcome, View, ViewElement};
use tracing::debug;

const CONFIRMATION_MS: u64 = 3000;
const HIDE_CONFIRMATION: &str = "hide-confirmation";

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    name: String,
    email: String,
    message: String,
    submitted: bool,
}

fn field(id: &str, label: &str, control: ViewElement) -> ViewElement {
    el("div")
        .class("form-field")
        .child(el("label").attr("for", id).text(label))
        .child(control.attr("id", id))
}

impl Component for ContactForm {
    fn render(&self) -> View {
        let confirmation = self.submitted.then(|| {
            el("p")
                .class("confirmation")
                .attr("role", "status")
                .text("Message sent successfully!")
        });
        el("div")
            .class("contact-form")
            .child(el("h2").text("Contact Us"))
            .child(confirmation)
            .child(
                el("form")
                    .on(EventKind::Submit, "submit")
                    .child(field(
                        "contact-name",
                        "Name",
                        el("input")
                            .attr("type", "text")
                            .attr("placeholder", "Your name")
                            .attr("value", self.name.clone())
                            .on(EventKind::Change, "name"),
                    ))
                    .child(field(
                        "contact-email",
                        "Email",
                        el("input")
                            .attr("type", "email")
                            .attr("placeholder", "your.email@example.com")
                            .attr("value", self.email.clone())
                            .on(EventKind::Change, "email"),
                    ))
                    .child(field(
                        "contact-message",
                        "Message",
                        el("textarea")
                            .attr("placeholder", "Your message")
                            .on(EventKind::Change, "message")
                            .text(self.message.clone()),
                    ))
                    .child(el("button").attr("type", "submit").text("Send Message")),
            )
            .into()
    }

    fn handle(&mut self, handler: &str, event: &Event, ctx: &mut Context<'_>) {
        match handler {
            "name" => self.name = event.value.clone(),
            "email" => self.email = event.value.clone(),
            "message" => self.message = event.value.clone(),
            "submit" => {
                debug!(name = %self.name, "contact form submitted");
                self.submitted = true;
                self.name.clear();
                self.email.clear();
                self.message.clear();
                ctx.set_timeout(CONFIRMATION_MS, HIDE_CONFIRMATION);
            }
            _ => {}
        }
    }

    fn on_task(&mut self, task: TaskOutcome, _ctx: &mut Context<'_>) {
        if let TaskOutcome::Timer { key } = task {
            if key == HIDE_CONFIRMATION {
                self.submitted = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::{InteractionSettings, Mount};

    #[test]
    fn confirmation_hides_after_three_seconds() {
        let mut instance = Mount::new(ContactForm::default()).mount(InteractionSettings::default());
        let name = instance.get_by_label_text("Name").unwrap();
        instance.change(name, "Ada").unwrap();
        let send = instance.get_by_role_named("button", "Send Message").unwrap();
        instance.click(send).unwrap();

        assert!(instance.get_by_text("Message sent successfully!").is_ok());
        let name = instance.get_by_label_text("Name").unwrap();
        assert_eq!(instance.attr(name, "value").as_deref(), Some(""));

        instance.advance(2999);
        assert!(instance.query_by_text("Message sent successfully!").unwrap().is_some());
        instance.advance(1);
        assert!(instance.query_by_text("Message sent successfully!").unwrap().is_none());
    }
}
