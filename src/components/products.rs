//! Product catalog, card, search bar and detail page.

use crate::components::{ProductCardProps, ProductDetailProps, SearchBarProps};
use crate::dom::EventKind;
use crate::interactive::view::split_handler;
use crate::interactive::{el, Component, Context, Event, FetchRequest, TaskOutcome, View};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where the catalog and detail pages load products from.
pub const PRODUCTS_URL: &str = "/module-08-shadcn-fetch/mock-data/products.json";

const DESCRIPTION_PREVIEW_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
    pub image_url: String,
}

impl Product {
    pub fn price_label(&self) -> String {
        format!("${:.2}", self.price)
    }

    fn stock_label(&self) -> &'static str {
        if self.in_stock {
            "In Stock"
        } else {
            "Out of Stock"
        }
    }

    fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Load<T> {
    Loading,
    Failed(String),
    Ready(T),
}

/// Turn a completed fetch into a product list or a user-facing error.
fn products_from(outcome: TaskOutcome, failure: &str) -> Load<Vec<Product>> {
    let TaskOutcome::Fetched { result, .. } = outcome else {
        return Load::Loading;
    };
    let parsed = result.and_then(|response| {
        if response.ok() {
            response.json::<Vec<Product>>()
        } else {
            Err(crate::interactive::FetchError::Network(format!(
                "HTTP {}",
                response.status
            )))
        }
    });
    match parsed {
        Ok(products) => {
            debug!(count = products.len(), "products loaded");
            Load::Ready(products)
        }
        Err(err) => {
            warn!(error = %err, "failed to load products");
            Load::Failed(failure.to_string())
        }
    }
}

fn search_input(value: &str) -> View {
    el("div")
        .class("search-bar")
        .child(
            el("input")
                .attr("type", "text")
                .attr("placeholder", "Search products...")
                .attr("value", value)
                .on(EventKind::Change, "search"),
        )
        .into()
}

fn product_card_view(product: &Product) -> View {
    let href = format!("/products/{}", product.id);
    let preview: String = product.description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    el("div")
        .class("product-card")
        .child(
            el("a").attr("href", href.clone()).child(
                el("img")
                    .attr("src", product.image_url.clone())
                    .attr("alt", product.name.clone()),
            ),
        )
        .child(
            el("div")
                .class("product-card-header")
                .child(el("a").attr("href", href).child(el("h3").text(product.name.clone())))
                .child(el("p").class("product-description").text(format!("{}...", preview))),
        )
        .child(
            el("div")
                .class("product-card-content")
                .child(el("span").class("price").text(product.price_label()))
                .child(el("span").class("stock").text(product.stock_label()))
                .child(el("span").class("category").text(product.category.clone())),
        )
        .into()
}

pub struct ProductCard {
    props: ProductCardProps,
}

impl ProductCard {
    pub fn new(props: ProductCardProps) -> Self {
        ProductCard { props }
    }
}

impl Component for ProductCard {
    fn render(&self) -> View {
        product_card_view(&self.props.product)
    }

    fn handle(&mut self, _handler: &str, _event: &Event, _ctx: &mut Context<'_>) {}
}

/// Controlled search input that reports every change.
pub struct SearchBar {
    props: SearchBarProps,
}

impl SearchBar {
    pub fn new(props: SearchBarProps) -> Self {
        SearchBar { props }
    }
}

impl Component for SearchBar {
    fn render(&self) -> View {
        search_input(&self.props.value)
    }

    fn handle(&mut self, handler: &str, event: &Event, _ctx: &mut Context<'_>) {
        if handler == "search" {
            (self.props.on_change)(event.value.clone());
        }
    }
}

/// Home page: fetches products on mount, then filters by search text and
/// category.
pub struct ProductCatalog {
    products: Load<Vec<Product>>,
    query: String,
    category: String,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        ProductCatalog {
            products: Load::Loading,
            query: String::new(),
            category: "All".to_string(),
        }
    }
}

impl ProductCatalog {
    fn categories(products: &[Product]) -> Vec<String> {
        let mut categories = vec!["All".to_string()];
        for product in products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }

    fn render_loaded(&self, products: &[Product]) -> View {
        let filters = el("div").class("category-filters").children(
            Self::categories(products).into_iter().map(|category| {
                let selected = category == self.category;
                let mut button = el("button")
                    .attr("type", "button")
                    .attr("aria-pressed", selected.to_string())
                    .on(EventKind::Click, format!("category:{}", category))
                    .text(category);
                if selected {
                    button = button.class("selected");
                }
                button
            }),
        );

        let visible: Vec<&Product> = products
            .iter()
            .filter(|p| self.category == "All" || p.category == self.category)
            .filter(|p| p.matches_query(&self.query))
            .collect();

        let grid: View = if visible.is_empty() {
            el("p").class("empty-state").text("No products found").into()
        } else {
            el("div")
                .class("product-grid")
                .children(visible.into_iter().map(product_card_view))
                .into()
        };

        View::fragment(vec![filters.into(), grid])
    }
}

impl Component for ProductCatalog {
    fn render(&self) -> View {
        let body: View = match &self.products {
            Load::Loading => el("p").attr("role", "status").text("Loading products...").into(),
            Load::Failed(message) => el("p")
                .class("error")
                .attr("role", "alert")
                .text(format!("Error: {}", message))
                .into(),
            Load::Ready(products) => self.render_loaded(products),
        };
        el("div")
            .class("product-catalog")
            .child(el("header").child(el("h1").text("Product Store")))
            .child(search_input(&self.query))
            .child(body)
            .into()
    }

    fn on_mount(&mut self, ctx: &mut Context<'_>) {
        ctx.fetch("products", FetchRequest::get(PRODUCTS_URL));
    }

    fn handle(&mut self, handler: &str, event: &Event, _ctx: &mut Context<'_>) {
        match split_handler(handler) {
            ("search", _) => self.query = event.value.clone(),
            ("category", Some(category)) => self.category = category.to_string(),
            _ => {}
        }
    }

    fn on_task(&mut self, task: TaskOutcome, _ctx: &mut Context<'_>) {
        self.products = products_from(task, "Failed to load products");
    }
}

pub struct ProductDetail {
    props: ProductDetailProps,
    product: Load<Option<Product>>,
}

impl ProductDetail {
    pub fn new(props: ProductDetailProps) -> Self {
        ProductDetail {
            props,
            product: Load::Loading,
        }
    }
}

impl Component for ProductDetail {
    fn render(&self) -> View {
        let body: View = match &self.product {
            Load::Loading => el("p").attr("role", "status").text("Loading product...").into(),
            Load::Failed(message) => el("p")
                .class("error")
                .attr("role", "alert")
                .text(format!("Error: {}", message))
                .into(),
            Load::Ready(None) => el("p").text("Product not found").into(),
            Load::Ready(Some(product)) => el("article")
                .class("product-detail-body")
                .child(
                    el("img")
                        .attr("src", product.image_url.clone())
                        .attr("alt", product.name.clone()),
                )
                .child(el("h1").text(product.name.clone()))
                .child(el("p").class("price").text(product.price_label()))
                .child(el("p").class("product-description").text(product.description.clone()))
                .child(el("span").class("category").text(product.category.clone()))
                .child(el("span").class("stock").text(product.stock_label()))
                .into(),
        };
        el("div")
            .class("product-detail")
            .child(el("a").attr("href", "/").text("← Back to products"))
            .child(body)
            .into()
    }

    fn on_mount(&mut self, ctx: &mut Context<'_>) {
        ctx.fetch("product", FetchRequest::get(PRODUCTS_URL));
    }

    fn handle(&mut self, _handler: &str, _event: &Event, _ctx: &mut Context<'_>) {}

    fn on_task(&mut self, task: TaskOutcome, _ctx: &mut Context<'_>) {
        let id = self.props.product_id;
        self.product = match products_from(task, "Failed to load product") {
            Load::Ready(products) => Load::Ready(products.into_iter().find(|p| p.id == id)),
            Load::Failed(message) => Load::Failed(message),
            Load::Loading => Load::Loading,
        };
    }
}
