//! Mounted component instances and their virtual environment.
//!
//! An instance owns its component, a rendered [`Document`] and a virtual
//! clock. The document is rebuilt after every event and every delivered
//! task, so node handles from before an interaction must be re-queried.

use crate::checks::Failure;
use crate::dom::{Document, EventKind, NodeId};
use crate::interactive::fetch::{Fetch, FetchError, FetchRequest, FetchResponse, OfflineFetch};
use crate::interactive::storage::LocalStorage;
use crate::interactive::{Component, Event, InteractionSettings};
use std::rc::Rc;
use tracing::{debug, trace};

/// Something scheduled through [`Context`] that has completed.
#[derive(Debug)]
pub enum TaskOutcome {
    Timer {
        key: String,
    },
    Fetched {
        key: String,
        result: Result<FetchResponse, FetchError>,
    },
}

struct Scheduled {
    due_ms: u64,
    seq: u64,
    task: TaskOutcome,
}

struct Environment {
    now_ms: u64,
    next_seq: u64,
    queue: Vec<Scheduled>,
    fetch: Rc<dyn Fetch>,
    storage: LocalStorage,
    settings: InteractionSettings,
}

impl Environment {
    fn schedule(&mut self, delay_ms: u64, task: TaskOutcome) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            task,
        });
    }

    /// Remove the earliest task due at or before `limit_ms`.
    fn pop_due(&mut self, limit_ms: u64) -> Option<Scheduled> {
        let position = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= limit_ms)
            .min_by_key(|(_, s)| (s.due_ms, s.seq))
            .map(|(i, _)| i)?;
        Some(self.queue.remove(position))
    }
}

/// Capabilities available to a component while it handles an event or task.
pub struct Context<'a> {
    env: &'a mut Environment,
}

impl Context<'_> {
    pub fn now_ms(&self) -> u64 {
        self.env.now_ms
    }

    /// Deliver `TaskOutcome::Timer { key }` after `delay_ms`.
    pub fn set_timeout(&mut self, delay_ms: u64, key: impl Into<String>) {
        self.env
            .schedule(delay_ms, TaskOutcome::Timer { key: key.into() });
    }

    /// Issue a request; the result arrives as `TaskOutcome::Fetched { key, .. }`.
    pub fn fetch(&mut self, key: impl Into<String>, request: FetchRequest) {
        let result = self.env.fetch.fetch(&request);
        let latency = self
            .env
            .fetch
            .latency_ms()
            .unwrap_or(self.env.settings.fetch_latency_ms);
        debug!(url = %request.url, latency_ms = latency, ok = result.is_ok(), "fetch issued");
        self.env.schedule(
            latency,
            TaskOutcome::Fetched {
                key: key.into(),
                result,
            },
        );
    }

    pub fn storage(&self) -> LocalStorage {
        self.env.storage.clone()
    }
}

/// Builder for a mounted instance.
pub struct Mount {
    component: Box<dyn Component>,
    fetch: Rc<dyn Fetch>,
    storage: LocalStorage,
}

impl Mount {
    pub fn new(component: impl Component + 'static) -> Self {
        Self::boxed(Box::new(component))
    }

    pub fn boxed(component: Box<dyn Component>) -> Self {
        Mount {
            component,
            fetch: Rc::new(OfflineFetch),
            storage: LocalStorage::new(),
        }
    }

    pub fn with_fetch(mut self, fetch: impl Fetch + 'static) -> Self {
        self.fetch = Rc::new(fetch);
        self
    }

    pub fn with_storage(mut self, storage: LocalStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn mount(self, settings: InteractionSettings) -> Instance {
        let mut instance = Instance {
            component: self.component,
            env: Environment {
                now_ms: 0,
                next_seq: 0,
                queue: Vec::new(),
                fetch: self.fetch,
                storage: self.storage,
                settings,
            },
            document: Document::new(),
        };
        {
            let mut ctx = Context {
                env: &mut instance.env,
            };
            instance.component.on_mount(&mut ctx);
        }
        instance.rerender();
        instance
    }
}

/// Events a check can fire at a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSpec {
    Click,
    Change { value: String },
    Submit,
}

impl EventSpec {
    pub fn change(value: impl Into<String>) -> Self {
        EventSpec::Change {
            value: value.into(),
        }
    }
}

/// A mounted component plus its rendered document and virtual clock.
pub struct Instance {
    component: Box<dyn Component>,
    env: Environment,
    document: Document,
}

impl Instance {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn now_ms(&self) -> u64 {
        self.env.now_ms
    }

    pub fn settings(&self) -> InteractionSettings {
        self.env.settings
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.env.storage
    }

    pub fn pending_tasks(&self) -> usize {
        self.env.queue.len()
    }

    fn rerender(&mut self) {
        self.document = self.component.render().to_document();
    }

    /// Dispatch an event at `node`, then re-render.
    pub fn fire_event(&mut self, node: NodeId, spec: EventSpec) -> Result<(), Failure> {
        let element = self
            .document
            .element(node)
            .ok_or_else(|| Failure::new("event target is not an element"))?;
        let is_checkbox = element.tag == "input"
            && matches!(element.attr("type"), Some("checkbox") | Some("radio"));
        let current_value = element.attr("value").unwrap_or_default().to_string();
        let currently_checked = element.has_attr("checked")
            || element.attr("aria-checked") == Some("true");

        match spec {
            EventSpec::Click => {
                if self.is_disabled(node) {
                    debug!(node = %self.document.describe(node), "click suppressed on disabled control");
                    return Ok(());
                }
                let click = Event {
                    kind: EventKind::Click,
                    value: current_value.clone(),
                    checked: if is_checkbox { !currently_checked } else { currently_checked },
                };
                let handled = self.dispatch(node, &click, &[EventKind::Click]);
                if is_checkbox {
                    let change = Event {
                        kind: EventKind::Change,
                        ..click
                    };
                    self.dispatch(node, &change, &[EventKind::Change, EventKind::Input]);
                } else if !handled {
                    if let Some(form) = self.submitting_form(node) {
                        self.dispatch_submit(form);
                    }
                }
            }
            EventSpec::Change { value } => {
                let change = Event {
                    kind: EventKind::Change,
                    value,
                    checked: currently_checked,
                };
                self.dispatch(node, &change, &[EventKind::Change, EventKind::Input]);
            }
            EventSpec::Submit => {
                let form = self
                    .document
                    .closest(node, "form")
                    .ok()
                    .flatten()
                    .ok_or_else(|| Failure::new("submit target is not inside a form"))?;
                self.dispatch_submit(form);
            }
        }

        self.rerender();
        Ok(())
    }

    pub fn click(&mut self, node: NodeId) -> Result<(), Failure> {
        self.fire_event(node, EventSpec::Click)
    }

    pub fn change(&mut self, node: NodeId, value: impl Into<String>) -> Result<(), Failure> {
        self.fire_event(node, EventSpec::change(value))
    }

    fn dispatch_submit(&mut self, form: NodeId) {
        let submit = Event {
            kind: EventKind::Submit,
            value: String::new(),
            checked: false,
        };
        self.dispatch(form, &submit, &[EventKind::Submit]);
    }

    /// Bubble from `target` to the first element listening for one of `kinds`.
    fn dispatch(&mut self, target: NodeId, event: &Event, kinds: &[EventKind]) -> bool {
        let mut path = vec![target];
        path.extend(self.document.ancestors(target));

        let handler = path.iter().find_map(|node| {
            let element = self.document.element(*node)?;
            kinds
                .iter()
                .find_map(|kind| element.listener(*kind))
                .map(|listener| listener.handler.clone())
        });

        match handler {
            Some(handler) => {
                trace!(handler = %handler, kind = event.kind.as_str(), "dispatching event");
                let mut ctx = Context { env: &mut self.env };
                self.component.handle(&handler, event, &mut ctx);
                true
            }
            None => false,
        }
    }

    /// The form a click on `node` would submit, if any.
    fn submitting_form(&self, node: NodeId) -> Option<NodeId> {
        let doc = &self.document;
        let button = doc.closest(node, "button, input[type=submit]").ok().flatten()?;
        let kind = doc.attr(button, "type").unwrap_or("submit");
        if kind != "submit" {
            return None;
        }
        doc.closest(button, "form").ok().flatten()
    }

    /// Advance the virtual clock, delivering every task that falls due.
    pub fn advance(&mut self, ms: u64) {
        let target = self.env.now_ms.saturating_add(ms);
        while let Some(scheduled) = self.env.pop_due(target) {
            self.env.now_ms = self.env.now_ms.max(scheduled.due_ms);
            trace!(due_ms = scheduled.due_ms, "delivering task");
            let mut ctx = Context { env: &mut self.env };
            self.component.on_task(scheduled.task, &mut ctx);
            self.rerender();
        }
        self.env.now_ms = target;
    }

    /// Poll `probe` until it succeeds or the wait timeout elapses.
    pub fn wait_for<T>(
        &mut self,
        mut probe: impl FnMut(&Instance) -> Result<T, Failure>,
    ) -> Result<T, Failure> {
        let timeout = self.env.settings.wait_timeout_ms;
        let step = self.env.settings.poll_interval_ms.max(1);
        let deadline = self.env.now_ms.saturating_add(timeout);

        loop {
            match probe(self) {
                Ok(value) => return Ok(value),
                Err(last) => {
                    if self.env.now_ms >= deadline {
                        return Err(Failure::new(format!(
                            "condition not observed within {} ms",
                            timeout
                        ))
                        .with_details(last.to_string()));
                    }
                    let remaining = deadline - self.env.now_ms;
                    self.advance(step.min(remaining));
                }
            }
        }
    }

    /// Run `f` with `fetch` in place of the current capability, then restore it.
    pub fn with_fetch<R>(
        &mut self,
        fetch: impl Fetch + 'static,
        f: impl FnOnce(&mut Instance) -> R,
    ) -> R {
        let previous = std::mem::replace(&mut self.env.fetch, Rc::new(fetch));
        let result = f(self);
        self.env.fetch = previous;
        result
    }
}
