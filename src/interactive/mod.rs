//! Interactive component checks.
//!
//! A check mounts a fresh [`Instance`] of a component, fires events at the
//! rendered document, then queries the result the way testing-library does.
//! Timers and fetch completions run on a virtual clock owned by the
//! instance, so nothing here sleeps or touches the network.

pub mod fetch;
pub mod instance;
pub mod mock;
pub mod queries;
pub mod storage;
pub mod view;

pub use fetch::{FakeFetch, Fetch, FetchError, FetchRequest, FetchResponse, OfflineFetch};
pub use instance::{Context, EventSpec, Instance, Mount, TaskOutcome};
pub use mock::{noop, Callback, MockFn};
pub use queries::TextMatch;
pub use storage::{LocalStorage, PersistedState};
pub use view::{el, text, View, ViewElement};

use crate::dom::EventKind;
use serde::{Deserialize, Serialize};

/// Timing knobs for interaction checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Upper bound for `wait_for`, in virtual milliseconds.
    pub wait_timeout_ms: u64,
    /// Clock advance between `wait_for` polls.
    pub poll_interval_ms: u64,
    /// Default latency for fake network responses.
    pub fetch_latency_ms: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        InteractionSettings {
            wait_timeout_ms: 1000,
            poll_interval_ms: 50,
            fetch_latency_ms: 500,
        }
    }
}

/// What a handler sees when an event reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Current or new value of the target control.
    pub value: String,
    /// Checked state after the event, for checkboxes and switches.
    pub checked: bool,
}

/// A UI component that can be mounted and driven by events.
pub trait Component {
    fn render(&self) -> View;

    fn on_mount(&mut self, _ctx: &mut Context<'_>) {}

    /// Called with the name of the listener an event reached.
    fn handle(&mut self, handler: &str, event: &Event, ctx: &mut Context<'_>);

    /// Called when a timer or fetch scheduled through the context completes.
    fn on_task(&mut self, _task: TaskOutcome, _ctx: &mut Context<'_>) {}
}
