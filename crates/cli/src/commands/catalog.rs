use clap::Args;
use shopkeep_catalog::{CatalogApp, CatalogError, CatalogEvent, CatalogRenderer};
use shopkeep_core::ProductId;

use crate::commands::CommandResult;

#[derive(Debug, Default, Args)]
pub struct CatalogArgs {
    #[arg(long, help = "Text typed into the search box")]
    pub search: Option<String>,
    #[arg(
        long = "add",
        value_name = "ID:QTY",
        help = "Type QTY into a product's quantity box and press Add to Cart (repeatable)"
    )]
    pub add: Vec<String>,
    #[arg(long = "remove", value_name = "ID", help = "Press Remove on a cart line (repeatable)")]
    pub remove: Vec<u32>,
    #[arg(long, help = "Print the rendered HTML page instead of the text view")]
    pub html: bool,
}

/// Replays the requested actions against the built-in catalog: adds, then
/// removals, then the search term. A rejected quantity shows up as the page
/// warning, not as a command failure.
pub fn run(args: &CatalogArgs) -> CommandResult {
    let mut app = CatalogApp::default();

    for raw in &args.add {
        let Some((product_id, quantity)) = parse_add(raw) else {
            return CommandResult::failure(
                "catalog",
                "invalid_argument",
                format!("`--add {raw}` must look like ID:QTY"),
                2,
            );
        };

        let events = [
            CatalogEvent::QuantityChanged { product_id, raw: quantity.to_string() },
            CatalogEvent::AddToCart(product_id),
        ];
        for event in events {
            match app.dispatch(event) {
                Ok(()) | Err(CatalogError::Cart(_)) => {}
                Err(error) => return invalid_argument(error),
            }
        }
    }

    for product_id in &args.remove {
        if let Err(error) = app.dispatch(CatalogEvent::RemoveFromCart(ProductId(*product_id))) {
            return invalid_argument(error);
        }
    }

    if let Some(term) = &args.search {
        if let Err(error) = app.dispatch(CatalogEvent::SearchChanged(term.clone())) {
            return invalid_argument(error);
        }
    }

    let view = app.view();
    if !args.html {
        return CommandResult { exit_code: 0, output: view.to_text() };
    }

    match CatalogRenderer::new().and_then(|renderer| renderer.render(&view)) {
        Ok(html) => CommandResult { exit_code: 0, output: html },
        Err(error) => CommandResult::failure("catalog", "render", error.to_string(), 3),
    }
}

fn invalid_argument(error: CatalogError) -> CommandResult {
    CommandResult::failure("catalog", "invalid_argument", error.to_string(), 2)
}

fn parse_add(raw: &str) -> Option<(ProductId, &str)> {
    let (id, quantity) = raw.split_once(':')?;
    let id = id.trim().parse::<u32>().ok()?;
    Some((ProductId(id), quantity))
}

#[cfg(test)]
mod tests {
    use shopkeep_core::ProductId;

    use super::{parse_add, run, CatalogArgs};

    #[test]
    fn add_arguments_split_id_from_raw_quantity() {
        assert_eq!(parse_add("2:3"), Some((ProductId(2), "3")));
        assert_eq!(parse_add("4:abc"), Some((ProductId(4), "abc")));
        assert_eq!(parse_add("laptop:1"), None);
        assert_eq!(parse_add("3"), None);
    }

    #[test]
    fn text_view_reflects_cart_and_search() {
        let result = run(&CatalogArgs {
            search: Some("smart".to_string()),
            add: vec!["2:2".to_string(), "1:1".to_string()],
            remove: vec![1],
            html: false,
        });

        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("Showing 2 products"));
        assert!(result.output.contains("🛒 Cart (2 items)"));
        assert!(result.output.contains("Smartphone (x2) - ₹1,000"));
        assert!(!result.output.contains("Laptop (x1)"));
    }

    #[test]
    fn rejected_quantity_is_a_page_warning() {
        let result = run(&CatalogArgs { add: vec!["3:-1".to_string()], ..CatalogArgs::default() });

        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("Your cart is empty."));
        assert!(result.output.contains("Please enter a valid quantity."));
    }

    #[test]
    fn unknown_products_fail_the_command() {
        let result = run(&CatalogArgs { add: vec!["9:1".to_string()], ..CatalogArgs::default() });

        assert_eq!(result.exit_code, 2);
        assert!(result.output.contains("\"error_class\":\"invalid_argument\""));
    }

    #[test]
    fn html_output_renders_the_page() {
        let result = run(&CatalogArgs { html: true, ..CatalogArgs::default() });

        assert_eq!(result.exit_code, 0);
        assert!(result.output.starts_with("<!DOCTYPE html>"));
        assert!(result.output.contains("Filterable Product List"));
    }
}
