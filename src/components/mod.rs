//! Curriculum UI components.
//!
//! Interactive checks never construct components directly; they ask a
//! [`ComponentKit`] for them. [`ReferenceKit`] supplies the implementations
//! in this module. Other kits override individual factories to grade an
//! alternative implementation.

pub mod basic;
pub mod contact;
pub mod products;
pub mod tasks;

pub use basic::{Button, Card, Counter, Input, ToggleSwitch};
pub use contact::ContactForm;
pub use products::{Product, ProductCard, ProductCatalog, ProductDetail, SearchBar, PRODUCTS_URL};
pub use tasks::{task_stats, EntityList, Identified, Task, TaskManager, TaskStats};

use crate::interactive::{noop, Callback, Component, View};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Primary,
    Secondary,
    Success,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Primary => "primary",
            Variant::Secondary => "secondary",
            Variant::Success => "success",
            Variant::Danger => "danger",
        }
    }
}

impl Size {
    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
        }
    }
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Filter> {
        Filter::ALL.into_iter().find(|f| f.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct ButtonProps {
    pub label: String,
    pub on_click: Callback<()>,
    pub variant: Variant,
    pub size: Size,
    pub disabled: bool,
}

impl ButtonProps {
    pub fn new(label: &str, on_click: Callback<()>) -> Self {
        ButtonProps {
            label: label.to_string(),
            on_click,
            variant: Variant::default(),
            size: Size::default(),
            disabled: false,
        }
    }
}

#[derive(Clone)]
pub struct CardProps {
    pub title: String,
    pub children: Vec<View>,
    pub footer: Option<String>,
    /// Shadow depth, 1 to 5.
    pub elevation: u8,
}

impl CardProps {
    pub fn new(title: &str, children: Vec<View>) -> Self {
        CardProps {
            title: title.to_string(),
            children,
            footer: None,
            elevation: 1,
        }
    }
}

#[derive(Clone)]
pub struct InputProps {
    pub label: String,
    pub value: String,
    pub on_change: Callback<String>,
    /// The `type` attribute.
    pub input_type: String,
    pub placeholder: Option<String>,
    pub error: Option<String>,
}

impl InputProps {
    pub fn new(label: &str, value: &str, on_change: Callback<String>) -> Self {
        InputProps {
            label: label.to_string(),
            value: value.to_string(),
            on_change,
            input_type: "text".to_string(),
            placeholder: None,
            error: None,
        }
    }
}

#[derive(Clone)]
pub struct CounterProps {
    pub initial_value: i64,
    pub step: i64,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub on_change: Option<Callback<i64>>,
}

impl Default for CounterProps {
    fn default() -> Self {
        CounterProps {
            initial_value: 0,
            step: 1,
            min: None,
            max: None,
            on_change: None,
        }
    }
}

impl CounterProps {
    pub fn starting_at(initial_value: i64) -> Self {
        CounterProps {
            initial_value,
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct ToggleSwitchProps {
    pub label: String,
    pub checked: bool,
    pub on_change: Callback<bool>,
    pub disabled: bool,
}

impl ToggleSwitchProps {
    pub fn new(label: &str, checked: bool, on_change: Callback<bool>) -> Self {
        ToggleSwitchProps {
            label: label.to_string(),
            checked,
            on_change,
            disabled: false,
        }
    }
}

#[derive(Clone)]
pub struct SearchBarProps {
    pub value: String,
    pub on_change: Callback<String>,
}

impl Default for SearchBarProps {
    fn default() -> Self {
        SearchBarProps {
            value: String::new(),
            on_change: noop(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProductCardProps {
    pub product: Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductDetailProps {
    pub product_id: u64,
}

impl Default for ProductDetailProps {
    fn default() -> Self {
        ProductDetailProps { product_id: 1 }
    }
}

/// Which parts of the task manager to render, and whether to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskManagerOptions {
    pub placeholder: String,
    /// Mirror tasks to local storage under `tasks`.
    pub persist: bool,
    pub theme_toggle: bool,
    pub stats: bool,
    pub description_field: bool,
    pub remaining_counter: bool,
}

impl TaskManagerOptions {
    /// Context, hooks and local storage variant.
    pub fn hooks() -> Self {
        TaskManagerOptions {
            placeholder: "Task title...".to_string(),
            persist: true,
            theme_toggle: true,
            stats: true,
            description_field: true,
            remaining_counter: false,
        }
    }

    /// Single-page styled variant with a remaining counter.
    pub fn styled() -> Self {
        TaskManagerOptions {
            placeholder: "What needs to be done?".to_string(),
            persist: false,
            theme_toggle: false,
            stats: false,
            description_field: false,
            remaining_counter: true,
        }
    }
}

/// Factory for every component the interactive checks mount.
pub trait ComponentKit {
    fn name(&self) -> &str;

    fn button(&self, props: ButtonProps) -> Box<dyn Component> {
        Box::new(Button::new(props))
    }

    fn card(&self, props: CardProps) -> Box<dyn Component> {
        Box::new(Card::new(props))
    }

    fn input(&self, props: InputProps) -> Box<dyn Component> {
        Box::new(Input::new(props))
    }

    fn counter(&self, props: CounterProps) -> Box<dyn Component> {
        Box::new(Counter::new(props))
    }

    fn toggle_switch(&self, props: ToggleSwitchProps) -> Box<dyn Component> {
        Box::new(ToggleSwitch::new(props))
    }

    fn task_manager(&self, options: TaskManagerOptions) -> Box<dyn Component> {
        Box::new(TaskManager::new(options))
    }

    fn contact_form(&self) -> Box<dyn Component> {
        Box::new(ContactForm::default())
    }

    fn product_catalog(&self) -> Box<dyn Component> {
        Box::new(ProductCatalog::default())
    }

    fn product_card(&self, props: ProductCardProps) -> Box<dyn Component> {
        Box::new(ProductCard::new(props))
    }

    fn search_bar(&self, props: SearchBarProps) -> Box<dyn Component> {
        Box::new(SearchBar::new(props))
    }

    fn product_detail(&self, props: ProductDetailProps) -> Box<dyn Component> {
        Box::new(ProductDetail::new(props))
    }
}

/// The implementations shipped with the grader.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceKit;

impl ComponentKit for ReferenceKit {
    fn name(&self) -> &str {
        "reference"
    }
}
