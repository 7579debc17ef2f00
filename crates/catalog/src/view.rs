use std::fmt::Write as _;

use serde::Serialize;

use shopkeep_core::{format_inr, CartEntry, Product};

use crate::state::CatalogApp;

pub const PAGE_HEADING: &str = "Filterable Product List";
pub const EMPTY_CART_TEXT: &str = "Your cart is empty.";

/// Render-ready snapshot of the catalog page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    pub heading: &'static str,
    pub search_term: String,
    pub showing: String,
    pub products: Vec<ProductCard>,
    pub cart: CartPanel,
    pub warning: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub id: u32,
    pub name: String,
    pub price: String,
    pub image: String,
    pub quantity_input: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartPanel {
    pub title: String,
    pub total_items: u64,
    pub is_empty: bool,
    pub empty_text: &'static str,
    pub lines: Vec<CartLine>,
    pub subtotal: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product_id: u32,
    pub label: String,
    pub line_total: String,
}

impl CatalogView {
    pub fn build(app: &mut CatalogApp) -> Self {
        let shown: Vec<Product> = app.filtered_products().into_iter().cloned().collect();
        let products = shown
            .iter()
            .map(|product| ProductCard {
                id: product.id.0,
                name: product.name.clone(),
                price: format_inr(product.price),
                image: product.image.clone(),
                quantity_input: app.quantity_input(product.id).to_string(),
            })
            .collect::<Vec<_>>();

        let cart = app.cart();
        let total_items = cart.total_items();
        let cart = CartPanel {
            title: format!("🛒 Cart ({total_items} items)"),
            total_items,
            is_empty: cart.is_empty(),
            empty_text: EMPTY_CART_TEXT,
            lines: cart.entries().iter().map(CartLine::from_entry).collect(),
            subtotal: format_inr(cart.subtotal()),
        };

        Self {
            heading: PAGE_HEADING,
            search_term: app.search_term().to_string(),
            showing: format!("Showing {} products", products.len()),
            products,
            cart,
            warning: app.warning().map(str::to_string),
        }
    }

    /// Plain-text rendering used by the CLI.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.heading);
        if !self.search_term.is_empty() {
            let _ = writeln!(out, "Search: {}", self.search_term);
        }
        let _ = writeln!(out, "{}", self.showing);
        for card in &self.products {
            let _ = writeln!(out, "  [{}] {} - {}", card.id, card.name, card.price);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.cart.title);
        if self.cart.is_empty {
            let _ = writeln!(out, "  {}", self.cart.empty_text);
        } else {
            for line in &self.cart.lines {
                let _ = writeln!(out, "  {} - {}", line.label, line.line_total);
            }
            let _ = writeln!(out, "  Subtotal: {}", self.cart.subtotal);
        }
        if let Some(warning) = &self.warning {
            let _ = writeln!(out);
            let _ = writeln!(out, "! {warning}");
        }
        out
    }
}

impl CartLine {
    fn from_entry(entry: &CartEntry) -> Self {
        Self {
            product_id: entry.product.id.0,
            label: format!("{} (x{})", entry.product.name, entry.quantity),
            line_total: format_inr(entry.line_total()),
        }
    }
}
