//! Module 8: Product Search Application.
//!
//! Every interactive check supplies its own [`FakeFetch`], so results never
//! depend on the network. Responses arrive after the configured fetch
//! latency and are awaited with `wait_for`.

use crate::assignments::{absent, script_matches, script_uses_all};
use crate::checks::{ensure, CheckError, CheckOutcome};
use crate::components::{
    Product, ProductCardProps, ProductDetailProps, SearchBarProps, PRODUCTS_URL,
};
use crate::engine::context::GradingContext;
use crate::engine::orchestrator::RegisteredCheck;
use crate::error::GraderError;
use crate::interactive::{FakeFetch, Instance, MockFn, Mount, TextMatch};
use crate::CheckCategory;

/// Get all module 8 checks
pub fn checks() -> Vec<RegisteredCheck> {
    use CheckCategory::{Components, DataFetching, TypeScript};
    vec![
        RegisteredCheck::new(
            "M08-001",
            "Catalog Loading State",
            DataFetching,
            "Shows a loading message before products arrive",
            run_m08_001,
        ),
        RegisteredCheck::new(
            "M08-002",
            "Catalog Products",
            DataFetching,
            "Fetched products are listed",
            run_m08_002,
        ),
        RegisteredCheck::new(
            "M08-003",
            "Catalog Network Error",
            DataFetching,
            "A failed request shows an error",
            run_m08_003,
        ),
        RegisteredCheck::new(
            "M08-004",
            "Catalog HTTP Error",
            DataFetching,
            "A non-2xx response shows an error",
            run_m08_004,
        ),
        RegisteredCheck::new(
            "M08-005",
            "Single Request",
            DataFetching,
            "Products are requested once from the data file",
            run_m08_005,
        ),
        RegisteredCheck::new(
            "M08-006",
            "Search Input",
            Components,
            "A search input renders",
            run_m08_006,
        ),
        RegisteredCheck::new(
            "M08-007",
            "Category Buttons",
            Components,
            "All plus one button per category",
            run_m08_007,
        ),
        RegisteredCheck::new(
            "M08-008",
            "Category Filter",
            Components,
            "Choosing a category hides the others",
            run_m08_008,
        ),
        RegisteredCheck::new(
            "M08-009",
            "SearchBar onChange",
            Components,
            "Typing reports the new text",
            run_m08_009,
        ),
        RegisteredCheck::new(
            "M08-010",
            "Search Filter",
            Components,
            "Search narrows the list by name",
            run_m08_010,
        ),
        RegisteredCheck::new(
            "M08-011",
            "No Results",
            Components,
            "A search with no match says so",
            run_m08_011,
        ),
        RegisteredCheck::new(
            "M08-012",
            "Card Information",
            Components,
            "Card shows name, price, category and stock",
            run_m08_012,
        ),
        RegisteredCheck::new(
            "M08-013",
            "Card Out of Stock",
            Components,
            "Unavailable products say Out of Stock",
            run_m08_013,
        ),
        RegisteredCheck::new(
            "M08-014",
            "Card Link",
            Components,
            "Card links to its detail page",
            run_m08_014,
        ),
        RegisteredCheck::new(
            "M08-015",
            "Card Description Preview",
            Components,
            "Long descriptions are shortened",
            run_m08_015,
        )
        .advisory(),
        RegisteredCheck::new(
            "M08-016",
            "Detail Loading State",
            DataFetching,
            "Detail page shows a loading message",
            run_m08_016,
        ),
        RegisteredCheck::new(
            "M08-017",
            "Detail Product",
            DataFetching,
            "Detail page shows the product",
            run_m08_017,
        ),
        RegisteredCheck::new(
            "M08-018",
            "Detail Back Link",
            Components,
            "Detail page links back",
            run_m08_018,
        ),
        RegisteredCheck::new(
            "M08-019",
            "Detail Not Found",
            DataFetching,
            "An unknown id says the product was not found",
            run_m08_019,
        ),
        RegisteredCheck::new(
            "M08-020",
            "Store Title",
            Components,
            "The home page is titled Product Store",
            run_m08_020,
        ),
        RegisteredCheck::new(
            "M08-021",
            "Contact Confirmation",
            Components,
            "Submitting shows a confirmation for three seconds",
            run_m08_021,
        ),
        RegisteredCheck::new(
            "M08-022",
            "Fetch Call",
            TypeScript,
            "Loads data with fetch",
            run_m08_022,
        ),
        RegisteredCheck::new(
            "M08-023",
            "Async Await",
            TypeScript,
            "Uses async functions and await",
            run_m08_023,
        ),
        RegisteredCheck::new(
            "M08-024",
            "Error Handling",
            TypeScript,
            "Wraps requests in try/catch",
            run_m08_024,
        ),
        RegisteredCheck::new(
            "M08-025",
            "JSON Parsing",
            TypeScript,
            "Parses the response with .json()",
            run_m08_025,
        ),
        RegisteredCheck::new(
            "M08-026",
            "Response Status",
            TypeScript,
            "Checks response.ok before parsing",
            run_m08_026,
        )
        .advisory(),
        RegisteredCheck::new(
            "M08-027",
            "Product Type",
            TypeScript,
            "Declares a Product type",
            run_m08_027,
        ),
    ]
}

fn product(id: u64, name: &str, description: &str, price: f64, category: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price,
        category: category.to_string(),
        in_stock: true,
        image_url: "https://via.placeholder.com/300".to_string(),
    }
}

fn store_products() -> Vec<Product> {
    vec![
        product(1, "Laptop Computer", "High performance laptop", 999.0, "Electronics"),
        Product {
            in_stock: false,
            ..product(2, "T-Shirt", "Cotton t-shirt", 20.0, "Clothing")
        },
    ]
}

fn serving(products: &[Product]) -> Result<FakeFetch, CheckError> {
    FakeFetch::json(&products.to_vec()).map_err(|err| GraderError::from(err).into())
}

fn catalog(ctx: &GradingContext, fetch: FakeFetch) -> Instance {
    ctx.mount_with(Mount::boxed(ctx.kit().product_catalog()).with_fetch(fetch))
}

/// Catalog with the store products loaded.
fn loaded_catalog(ctx: &GradingContext) -> Result<Instance, CheckError> {
    let mut instance = catalog(ctx, serving(&store_products())?);
    instance.wait_for(|i| i.get_by_text("Laptop Computer"))?;
    Ok(instance)
}

fn search(instance: &mut Instance, query: &str) -> Result<(), CheckError> {
    let input = instance.get_by_placeholder(TextMatch::pattern("(?i)search")?)?;
    instance.change(input, query)?;
    Ok(())
}

fn card(ctx: &GradingContext, product: Product) -> Instance {
    ctx.mount(ctx.kit().product_card(ProductCardProps { product }))
}

fn detail(ctx: &GradingContext, product_id: u64, fetch: FakeFetch) -> Instance {
    let component = ctx.kit().product_detail(ProductDetailProps { product_id });
    ctx.mount_with(Mount::boxed(component).with_fetch(fetch))
}

fn wait_for_error(instance: &mut Instance) -> Result<String, CheckError> {
    let pattern = TextMatch::pattern("(?i)error|failed")?;
    let node = instance.wait_for(|i| i.get_by_text(pattern.clone()))?;
    Ok(instance.text(node))
}

/// M08-001: Catalog Loading State
fn run_m08_001(ctx: &GradingContext) -> CheckOutcome {
    let instance = catalog(ctx, serving(&store_products())?);
    instance.get_by_text(TextMatch::pattern("(?i)loading")?)?;
    Ok("loading message shown".to_string())
}

/// M08-002: Catalog Products
fn run_m08_002(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = catalog(ctx, serving(&store_products())?);
    instance.wait_for(|i| {
        i.get_by_text("Laptop Computer")?;
        i.get_by_text("T-Shirt")
    })?;
    Ok(format!("products listed after {} ms", instance.now_ms()))
}

/// M08-003: Catalog Network Error
fn run_m08_003(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = catalog(ctx, FakeFetch::failing("Failed to fetch"));
    let shown = wait_for_error(&mut instance)?;
    Ok(format!("error shown: {}", shown))
}

/// M08-004: Catalog HTTP Error
fn run_m08_004(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = catalog(ctx, FakeFetch::respond(500, "Internal Server Error"));
    let shown = wait_for_error(&mut instance)?;
    Ok(format!("error shown: {}", shown))
}

/// M08-005: Single Request
fn run_m08_005(ctx: &GradingContext) -> CheckOutcome {
    let fetch = serving(&store_products())?;
    let mut instance = catalog(ctx, fetch.clone());
    instance.wait_for(|i| i.get_by_text("Laptop Computer"))?;
    search(&mut instance, "laptop")?;
    let calls = fetch.calls();
    ensure(
        calls.len() == 1,
        format!("{} requests made, expected 1", calls.len()),
    )?;
    ensure(
        calls[0].url == PRODUCTS_URL,
        format!("requested {}, expected {}", calls[0].url, PRODUCTS_URL),
    )?;
    Ok(format!("{} {}", calls[0].method, calls[0].url))
}

/// M08-006: Search Input
fn run_m08_006(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = catalog(ctx, serving(&[])?);
    let pattern = TextMatch::pattern("(?i)search")?;
    instance.wait_for(|i| i.get_by_placeholder(pattern.clone()))?;
    Ok("search input rendered".to_string())
}

/// M08-007: Category Buttons
fn run_m08_007(ctx: &GradingContext) -> CheckOutcome {
    let single = vec![product(1, "Electronics Item", "Test", 99.0, "Electronics")];
    let mut instance = catalog(ctx, serving(&single)?);
    instance.wait_for(|i| {
        i.get_by_role_named("button", "All")?;
        i.get_by_role_named("button", "Electronics")
    })?;
    Ok("All and Electronics buttons".to_string())
}

/// M08-008: Category Filter
fn run_m08_008(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = loaded_catalog(ctx)?;
    let clothing = instance.get_by_role_named("button", "Clothing")?;
    instance.click(clothing)?;
    instance.wait_for(|i| {
        absent(i, "Laptop Computer")?;
        i.get_by_text("T-Shirt")
    })?;
    Ok("category narrows the list".to_string())
}

/// M08-009: SearchBar onChange
fn run_m08_009(ctx: &GradingContext) -> CheckOutcome {
    let on_change = MockFn::new();
    let props = SearchBarProps {
        value: String::new(),
        on_change: on_change.callback(),
    };
    let mut instance = ctx.mount(ctx.kit().search_bar(props));
    search(&mut instance, "laptop")?;
    ensure(
        on_change.was_called_with(&"laptop".to_string()),
        format!("onChange calls: {:?}, expected \"laptop\"", on_change.calls()),
    )?;
    Ok("onChange(\"laptop\")".to_string())
}

/// M08-010: Search Filter
fn run_m08_010(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = loaded_catalog(ctx)?;
    search(&mut instance, "laptop")?;
    instance.wait_for(|i| {
        absent(i, "T-Shirt")?;
        i.get_by_text("Laptop Computer")
    })?;
    Ok("search narrows the list".to_string())
}

/// M08-011: No Results
fn run_m08_011(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = loaded_catalog(ctx)?;
    search(&mut instance, "zzz-no-such-product")?;
    let pattern = TextMatch::pattern("(?i)no products")?;
    instance.wait_for(|i| i.get_by_text(pattern.clone()))?;
    Ok("empty result message".to_string())
}

/// M08-012: Card Information
fn run_m08_012(ctx: &GradingContext) -> CheckOutcome {
    let instance = card(
        ctx,
        product(
            1,
            "Test Product",
            "This is a test product with a long description",
            49.99,
            "Electronics",
        ),
    );
    instance.get_by_text("Test Product")?;
    instance.get_by_text(TextMatch::pattern(r"\$49\.99")?)?;
    instance.get_by_text("Electronics")?;
    instance.get_by_text(TextMatch::pattern("(?i)in stock")?)?;
    Ok("name, price, category and stock".to_string())
}

/// M08-013: Card Out of Stock
fn run_m08_013(ctx: &GradingContext) -> CheckOutcome {
    let unavailable = Product {
        in_stock: false,
        ..product(1, "Unavailable Product", "Test", 29.99, "Electronics")
    };
    card(ctx, unavailable).get_by_text(TextMatch::pattern("(?i)out of stock")?)?;
    Ok("out of stock shown".to_string())
}

/// M08-014: Card Link
fn run_m08_014(ctx: &GradingContext) -> CheckOutcome {
    let instance = card(ctx, product(123, "Test Product", "Test", 29.99, "Electronics"));
    let links = instance.get_all_by_role("link")?;
    let href = instance.attr(links[0], "href").unwrap_or_default();
    ensure(
        href == "/products/123",
        format!("first link points to \"{}\", expected /products/123", href),
    )?;
    Ok("links to /products/123".to_string())
}

/// M08-015: Card Description Preview
fn run_m08_015(ctx: &GradingContext) -> CheckOutcome {
    let long = "word ".repeat(40);
    let instance = card(ctx, product(1, "Wordy", long.trim(), 10.0, "Books"));
    let full = TextMatch::from(long.trim());
    ensure(
        instance.query_all_by_text(full).is_empty(),
        "the full description is shown on the card",
    )?;
    instance.get_by_text(TextMatch::pattern(r"\.\.\.$")?)?;
    Ok("description shortened".to_string())
}

/// M08-016: Detail Loading State
fn run_m08_016(ctx: &GradingContext) -> CheckOutcome {
    let instance = detail(ctx, 1, serving(&store_products())?);
    instance.get_by_text(TextMatch::pattern("(?i)loading")?)?;
    Ok("loading message shown".to_string())
}

/// M08-017: Detail Product
fn run_m08_017(ctx: &GradingContext) -> CheckOutcome {
    let detailed = product(
        1,
        "Detailed Product",
        "This is a detailed product description",
        99.99,
        "Electronics",
    );
    let mut instance = detail(ctx, 1, serving(&[detailed])?);
    let price = TextMatch::pattern(r"\$99\.99")?;
    instance.wait_for(|i| {
        i.get_by_text("Detailed Product")?;
        i.get_by_text(price.clone())?;
        i.get_by_text("This is a detailed product description")
    })?;
    Ok("name, price and description".to_string())
}

/// M08-018: Detail Back Link
fn run_m08_018(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = detail(ctx, 1, serving(&store_products())?);
    let back = TextMatch::pattern("(?i)back")?;
    let node = instance.wait_for(|i| i.get_by_text(back.clone()))?;
    let href = instance.attr(node, "href");
    Ok(format!("back link to {}", href.as_deref().unwrap_or("(no href)")))
}

/// M08-019: Detail Not Found
fn run_m08_019(ctx: &GradingContext) -> CheckOutcome {
    let mut instance = detail(ctx, 99, serving(&store_products())?);
    let pattern = TextMatch::pattern("(?i)not found")?;
    instance.wait_for(|i| i.get_by_text(pattern.clone()))?;
    Ok("unknown id reported".to_string())
}

/// M08-020: Store Title
fn run_m08_020(ctx: &GradingContext) -> CheckOutcome {
    let instance = catalog(ctx, serving(&[])?);
    instance.get_by_text(TextMatch::pattern("(?i)product store")?)?;
    Ok("titled Product Store".to_string())
}

/// M08-021: Contact Confirmation
fn run_m08_021(ctx: &GradingContext) -> CheckOutcome {
    const CONFIRMATION: &str = "Message sent successfully!";
    let mut instance = ctx.mount(ctx.kit().contact_form());
    for (label, value) in [
        ("Name", "Ada"),
        ("Email", "ada@example.com"),
        ("Message", "Hello"),
    ] {
        let field = instance.get_by_label_text(label)?;
        instance.change(field, value)?;
    }
    let send = instance.get_by_role_named("button", "Send Message")?;
    instance.click(send)?;
    instance.get_by_text(CONFIRMATION)?;

    instance.advance(2999);
    ensure(
        instance.query_by_text(CONFIRMATION)?.is_some(),
        "confirmation hidden before three seconds",
    )?;
    instance.advance(1);
    absent(&instance, CONFIRMATION)?;
    Ok("confirmation shown for 3000 ms".to_string())
}

/// M08-022: Fetch Call
fn run_m08_022(ctx: &GradingContext) -> CheckOutcome {
    script_uses_all(ctx, &["fetch("], "fetch call")
}

/// M08-023: Async Await
fn run_m08_023(ctx: &GradingContext) -> CheckOutcome {
    script_uses_all(ctx, &["async ", "await "], "async/await")
}

/// M08-024: Error Handling
fn run_m08_024(ctx: &GradingContext) -> CheckOutcome {
    script_matches(ctx, r"(?s)\btry\s*\{.*\bcatch\b", "try/catch around requests")
}

/// M08-025: JSON Parsing
fn run_m08_025(ctx: &GradingContext) -> CheckOutcome {
    script_uses_all(ctx, &[".json()"], "JSON parsing")
}

/// M08-026: Response Status
fn run_m08_026(ctx: &GradingContext) -> CheckOutcome {
    script_matches(ctx, r"\.ok\b", "response status check")
}

/// M08-027: Product Type
fn run_m08_027(ctx: &GradingContext) -> CheckOutcome {
    script_matches(ctx, r"\b(?:interface|type)\s+Product\b", "Product type")
}
