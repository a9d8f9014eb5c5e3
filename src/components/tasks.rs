//! Task manager: add, toggle, delete and filter tasks, with optional
//! statistics, theme switching and local-storage persistence.

use crate::components::{Filter, TaskManagerOptions, Theme};
use crate::dom::EventKind;
use crate::interactive::view::split_handler;
use crate::interactive::{el, Component, Context, Event, LocalStorage, PersistedState, View};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// Storage key for the task list.
pub const TASKS_KEY: &str = "tasks";
/// Storage key for the theme.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    /// Milliseconds on the instance clock.
    pub created_at: u64,
}

pub trait Identified {
    fn id(&self) -> u64;
}

impl Identified for Task {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Ordered entities with ids allocated from an owned counter.
///
/// Serialized as a plain array; the counter resumes after the largest id
/// on deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityList<T> {
    items: Vec<T>,
    next_id: u64,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        EntityList {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Identified> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<T>) -> Self {
        let next_id = items.iter().map(Identified::id).max().map_or(1, |max| max + 1);
        EntityList { items, next_id }
    }

    /// Build an entity with the next id and append it.
    pub fn insert_with(&mut self, build: impl FnOnce(u64) -> T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(build(id));
        id
    }

    pub fn remove(&mut self, id: u64) -> Option<T> {
        let position = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(position))
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

impl<T: Serialize> Serialize for EntityList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de> + Identified> Deserialize<'de> for EntityList<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(EntityList::from_items)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Rounded to the nearest whole percent; 0 for an empty list.
    pub completion_percentage: u32,
}

pub fn task_stats(tasks: &[Task]) -> TaskStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let completion_percentage = if total == 0 {
        0
    } else {
        (completed as f64 * 100.0 / total as f64).round() as u32
    };
    TaskStats {
        total,
        active: total - completed,
        completed,
        completion_percentage,
    }
}

pub struct TaskManager {
    options: TaskManagerOptions,
    tasks: PersistedState<EntityList<Task>>,
    theme: PersistedState<Theme>,
    filter: Filter,
    draft_title: String,
    draft_description: String,
}

impl TaskManager {
    /// State starts in detached storage; `on_mount` attaches the instance's
    /// storage when persistence is enabled.
    pub fn new(options: TaskManagerOptions) -> Self {
        let detached = LocalStorage::new();
        TaskManager {
            tasks: PersistedState::new(detached.clone(), TASKS_KEY, EntityList::new()),
            theme: PersistedState::new(detached, THEME_KEY, Theme::Light),
            options,
            filter: Filter::All,
            draft_title: String::new(),
            draft_description: String::new(),
        }
    }

    fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .get()
            .items()
            .iter()
            .filter(|task| match self.filter {
                Filter::All => true,
                Filter::Active => !task.completed,
                Filter::Completed => task.completed,
            })
            .collect()
    }

    fn add_task(&mut self, now_ms: u64) {
        let title = self.draft_title.trim().to_string();
        if title.is_empty() {
            debug!("ignoring task with empty title");
            return;
        }
        let description = self.draft_description.trim().to_string();
        self.tasks.update(|list| {
            list.insert_with(|id| Task {
                id,
                title,
                description,
                completed: false,
                created_at: now_ms,
            });
        });
        self.draft_title.clear();
        self.draft_description.clear();
    }

    fn empty_message(&self) -> &'static str {
        match self.filter {
            Filter::All => "No tasks yet. Add one above!",
            Filter::Active => "No active tasks",
            Filter::Completed => "No completed tasks yet",
        }
    }

    fn render_header(&self) -> View {
        let theme = *self.theme.get();
        let toggle = self.options.theme_toggle.then(|| {
            let label = match theme {
                Theme::Light => "Switch to Dark Mode",
                Theme::Dark => "Switch to Light Mode",
            };
            el("button")
                .attr("type", "button")
                .class("theme-toggle")
                .on(EventKind::Click, "theme")
                .text(label)
        });
        el("header")
            .child(el("h1").text("Task Manager"))
            .child(toggle)
            .into()
    }

    fn render_form(&self) -> View {
        let description = self.options.description_field.then(|| {
            el("textarea")
                .attr("placeholder", "Task description (optional)...")
                .attr("rows", "3")
                .on(EventKind::Change, "description")
                .text(self.draft_description.clone())
        });
        el("form")
            .class("task-form")
            .on(EventKind::Submit, "add")
            .child(self.options.description_field.then(|| el("h2").text("Add New Task")))
            .child(
                el("input")
                    .attr("type", "text")
                    .attr("placeholder", self.options.placeholder.clone())
                    .attr("value", self.draft_title.clone())
                    .on(EventKind::Change, "draft"),
            )
            .child(description)
            .child(el("button").attr("type", "submit").text("Add Task"))
            .into()
    }

    fn render_filters(&self) -> View {
        el("div")
            .class("filters")
            .children(Filter::ALL.iter().map(|filter| {
                let mut button = el("button")
                    .attr("type", "button")
                    .attr("aria-pressed", (*filter == self.filter).to_string())
                    .on(EventKind::Click, format!("filter:{}", filter.as_str()))
                    .text(filter.label());
                if *filter == self.filter {
                    button = button.class("active");
                }
                button
            }))
            .into()
    }

    fn render_stats(&self) -> View {
        let stats = task_stats(self.tasks.get().items());
        let stat = |test_id: &str, value: String, label: &str| {
            el("div")
                .class("stat")
                .child(el("span").class("stat-value").test_id(test_id).text(value))
                .child(el("span").class("stat-label").text(label))
        };
        el("div")
            .class("stats")
            .child(stat("total", stats.total.to_string(), "Total Tasks"))
            .child(stat("active", stats.active.to_string(), "Active Tasks"))
            .child(stat("completed", stats.completed.to_string(), "Completed Tasks"))
            .child(stat(
                "percentage",
                format!("{}%", stats.completion_percentage),
                "Completion Rate",
            ))
            .into()
    }

    fn render_task(task: &Task) -> View {
        let mut item = el("li").class("task-item");
        if task.completed {
            item = item.class("completed");
        }
        item.child(
            el("input")
                .attr("type", "checkbox")
                .flag("checked", task.completed)
                .on(EventKind::Change, format!("toggle:{}", task.id)),
        )
        .child(el("span").class("task-title").text(task.title.clone()))
        .child(
            (!task.description.is_empty())
                .then(|| el("p").class("task-description").text(task.description.clone())),
        )
        .child(
            el("button")
                .attr("type", "button")
                .on(EventKind::Click, format!("delete:{}", task.id))
                .text("Delete"),
        )
        .into()
    }

    fn render_list(&self) -> View {
        let visible = self.visible_tasks();
        if visible.is_empty() {
            return el("p").class("empty-state").text(self.empty_message()).into();
        }
        el("ul")
            .class("task-list")
            .children(visible.into_iter().map(Self::render_task))
            .into()
    }

    fn render_remaining(&self) -> Option<View> {
        if !self.options.remaining_counter {
            return None;
        }
        let active = task_stats(self.tasks.get().items()).active;
        let noun = if active == 1 { "task" } else { "tasks" };
        Some(
            el("p")
                .class("task-counter")
                .text(format!("{} {} remaining", active, noun))
                .into(),
        )
    }
}

impl Component for TaskManager {
    fn render(&self) -> View {
        let stats = self.options.stats.then(|| self.render_stats());
        el("div")
            .class("task-manager")
            .attr("data-theme", self.theme.get().as_str())
            .child(self.render_header())
            .child(self.render_form())
            .child(self.render_filters())
            .child(stats)
            .child(self.render_list())
            .child(self.render_remaining())
            .into()
    }

    fn on_mount(&mut self, ctx: &mut Context<'_>) {
        if self.options.persist {
            let storage = ctx.storage();
            self.tasks = PersistedState::new(storage.clone(), TASKS_KEY, EntityList::new());
            self.theme = PersistedState::new(storage, THEME_KEY, Theme::Light);
        }
    }

    fn handle(&mut self, handler: &str, event: &Event, ctx: &mut Context<'_>) {
        match split_handler(handler) {
            ("draft", _) => self.draft_title = event.value.clone(),
            ("description", _) => self.draft_description = event.value.clone(),
            ("add", _) => self.add_task(ctx.now_ms()),
            ("theme", _) => {
                let next = self.theme.get().toggled();
                self.theme.set(next);
            }
            ("filter", Some(name)) => {
                if let Some(filter) = Filter::parse(name) {
                    self.filter = filter;
                }
            }
            ("toggle", Some(id)) => {
                if let Ok(id) = id.parse::<u64>() {
                    self.tasks.update(|list| {
                        if let Some(task) = list.get_mut(id) {
                            task.completed = !task.completed;
                        }
                    });
                }
            }
            ("delete", Some(id)) => {
                if let Ok(id) = id.parse::<u64>() {
                    self.tasks.update(|list| {
                        list.remove(id);
                    });
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::{InteractionSettings, Instance, Mount};

    fn task(id: u64, completed: bool) -> Task {
        Task {
            id,
            title: format!("Task {}", id),
            description: String::new(),
            completed,
            created_at: 0,
        }
    }

    #[test]
    fn stats_round_to_nearest_percent() {
        let tasks = vec![task(1, false), task(2, true), task(3, true)];
        let stats = task_stats(&tasks);
        assert_eq!((stats.total, stats.active, stats.completed), (3, 1, 2));
        assert_eq!(stats.completion_percentage, 67);
        assert_eq!(task_stats(&[]).completion_percentage, 0);
    }

    #[test]
    fn entity_list_resumes_ids_after_load() {
        let json = serde_json::to_string(&vec![task(4, false), task(9, true)]).unwrap();
        let mut list: EntityList<Task> = serde_json::from_str(&json).unwrap();
        assert_eq!(list.next_id(), 10);
        let id = list.insert_with(|id| task(id, false));
        assert_eq!(id, 10);
        assert!(list.remove(4).is_some());
        assert_eq!(list.len(), 2);
    }

    fn add(instance: &mut Instance, title: &str) {
        let input = instance.get_by_placeholder("Task title...").unwrap();
        instance.change(input, title).unwrap();
        let add = instance.get_by_text("Add Task").unwrap();
        instance.click(add).unwrap();
    }

    #[test]
    fn add_toggle_filter_and_persist() {
        let storage = LocalStorage::new();
        let mut instance = Mount::new(TaskManager::new(TaskManagerOptions::hooks()))
            .with_storage(storage.clone())
            .mount(InteractionSettings::default());
        add(&mut instance, "Task 1");
        add(&mut instance, "Task 2");

        let first = instance.get_all_by_role("checkbox").unwrap()[0];
        instance.click(first).unwrap();
        let active = instance.get_by_text("Active").unwrap();
        instance.click(active).unwrap();
        assert!(instance.query_by_text("Task 1").unwrap().is_none());
        assert!(instance.get_by_text("Task 2").is_ok());

        let saved: Vec<Task> = storage.get_json(TASKS_KEY).unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved[0].completed);
    }

    #[test]
    fn blank_title_is_ignored() {
        let mut instance = Mount::new(TaskManager::new(TaskManagerOptions::styled()))
            .mount(InteractionSettings::default());
        let add = instance.get_by_text("Add Task").unwrap();
        instance.click(add).unwrap();
        assert!(instance.query_all_by_role("checkbox").is_empty());
        assert!(instance.get_by_text("0 tasks remaining").is_ok());
    }

    #[test]
    fn theme_toggle_persists() {
        let storage = LocalStorage::new();
        let mut instance = Mount::new(TaskManager::new(TaskManagerOptions::hooks()))
            .with_storage(storage.clone())
            .mount(InteractionSettings::default());
        let toggle = instance.get_by_text("Switch to Dark Mode").unwrap();
        instance.click(toggle).unwrap();
        assert_eq!(storage.get_item(THEME_KEY).as_deref(), Some("\"dark\""));
        assert!(instance.get_by_text("Switch to Light Mode").is_ok());
    }
}
