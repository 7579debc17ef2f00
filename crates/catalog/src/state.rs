use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use shopkeep_core::{Cart, CartError, Catalog, Product, ProductId};

use crate::filter::FilteredView;
use crate::view::CatalogView;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogEvent {
    SearchChanged(String),
    ClearSearch,
    /// Raw text typed into a product's quantity box.
    QuantityChanged { product_id: ProductId, raw: String },
    /// Add the product using the quantity currently bound to its input.
    AddToCart(ProductId),
    RemoveFromCart(ProductId),
    DismissWarning,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error("template rendering failed: {0}")]
    Render(String),
}

/// Page state: catalog, search term, per-product quantity inputs, cart, and the
/// pending user-facing warning.
#[derive(Clone, Debug)]
pub struct CatalogApp {
    catalog: Catalog,
    catalog_revision: u64,
    search_term: String,
    quantity_inputs: BTreeMap<ProductId, String>,
    cart: Cart,
    warning: Option<String>,
    filtered: FilteredView,
}

impl Default for CatalogApp {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl CatalogApp {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            catalog_revision: 0,
            search_term: String::new(),
            quantity_inputs: BTreeMap::new(),
            cart: Cart::default(),
            warning: None,
            filtered: FilteredView::default(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn quantity_input(&self, product_id: ProductId) -> &str {
        self.quantity_inputs.get(&product_id).map(String::as_str).unwrap_or_default()
    }

    /// Swaps in a new product list; the next filter call recomputes.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
        self.catalog_revision += 1;
        self.quantity_inputs.retain(|id, _| self.catalog.find(*id).is_some());
    }

    /// Products matching the current search term, in catalog order.
    pub fn filtered_products(&mut self) -> Vec<&Product> {
        let ids = self.filtered.get(&self.catalog, self.catalog_revision, &self.search_term);
        ids.iter().filter_map(|id| self.catalog.find(*id)).collect()
    }

    pub fn filter_recomputations(&self) -> u64 {
        self.filtered.recomputations()
    }

    /// Applies one event. A rejected add leaves the cart untouched, records a
    /// warning for the next render, and returns the error.
    pub fn dispatch(&mut self, event: CatalogEvent) -> Result<(), CatalogError> {
        debug!(event_name = "catalog.event", event = ?event, "dispatching catalog event");

        match event {
            CatalogEvent::SearchChanged(term) => self.search_term = term,
            CatalogEvent::ClearSearch => self.search_term.clear(),
            CatalogEvent::QuantityChanged { product_id, raw } => {
                self.require_product(product_id)?;
                self.quantity_inputs.insert(product_id, raw);
            }
            CatalogEvent::AddToCart(product_id) => {
                let product = self.require_product(product_id)?.clone();
                let raw = self.quantity_input(product_id).to_string();
                if let Err(error) = self.cart.add_input(&product, &raw) {
                    warn!(
                        event_name = "catalog.cart.rejected",
                        product_id = %product_id,
                        raw_quantity = %raw,
                        error = %error,
                        "rejected add to cart"
                    );
                    self.warning = Some(error.to_string());
                    return Err(error.into());
                }
                self.warning = None;
            }
            CatalogEvent::RemoveFromCart(product_id) => {
                self.cart.remove(product_id);
            }
            CatalogEvent::DismissWarning => self.warning = None,
        }

        Ok(())
    }

    pub fn view(&mut self) -> CatalogView {
        CatalogView::build(self)
    }

    fn require_product(&self, product_id: ProductId) -> Result<&Product, CatalogError> {
        self.catalog.find(product_id).ok_or(CatalogError::UnknownProduct(product_id))
    }
}

#[cfg(test)]
mod tests {
    use shopkeep_core::{CartError, Catalog, ProductId};

    use super::{CatalogApp, CatalogError, CatalogEvent};

    fn set_quantity(app: &mut CatalogApp, id: u32, raw: &str) {
        app.dispatch(CatalogEvent::QuantityChanged {
            product_id: ProductId(id),
            raw: raw.to_string(),
        })
        .expect("known product");
    }

    #[test]
    fn search_narrows_and_clear_restores_the_list() {
        let mut app = CatalogApp::default();

        app.dispatch(CatalogEvent::SearchChanged("PHONE".to_string())).expect("search");
        let names: Vec<_> =
            app.filtered_products().iter().map(|product| product.name.clone()).collect();
        assert_eq!(names, vec!["Smartphone"]);

        app.dispatch(CatalogEvent::ClearSearch).expect("clear");
        assert_eq!(app.search_term(), "");
        assert_eq!(app.filtered_products().len(), 4);
    }

    #[test]
    fn cart_changes_do_not_recompute_the_filter() {
        let mut app = CatalogApp::default();
        app.filtered_products();
        set_quantity(&mut app, 1, "2");
        app.dispatch(CatalogEvent::AddToCart(ProductId(1))).expect("add");
        app.filtered_products();

        assert_eq!(app.filter_recomputations(), 1);
    }

    #[test]
    fn add_uses_the_bound_quantity_input() {
        let mut app = CatalogApp::default();
        set_quantity(&mut app, 2, "3");
        app.dispatch(CatalogEvent::AddToCart(ProductId(2))).expect("add");
        app.dispatch(CatalogEvent::AddToCart(ProductId(2))).expect("add again");

        assert_eq!(app.cart().quantity_of(ProductId(2)), Some(6));
        assert_eq!(app.cart().entries().len(), 1);
    }

    #[test]
    fn invalid_quantity_warns_without_touching_the_cart() {
        let mut app = CatalogApp::default();
        set_quantity(&mut app, 1, "1");
        app.dispatch(CatalogEvent::AddToCart(ProductId(1))).expect("add");
        let before = app.cart().clone();

        set_quantity(&mut app, 3, "0");
        let result = app.dispatch(CatalogEvent::AddToCart(ProductId(3)));
        assert_eq!(result, Err(CatalogError::Cart(CartError::InvalidQuantity)));
        assert_eq!(app.cart(), &before);
        assert_eq!(app.warning(), Some("Please enter a valid quantity."));

        let empty_input = app.dispatch(CatalogEvent::AddToCart(ProductId(4)));
        assert!(empty_input.is_err(), "an empty quantity box is non-numeric");
        assert_eq!(app.cart(), &before);

        app.dispatch(CatalogEvent::DismissWarning).expect("dismiss");
        assert_eq!(app.warning(), None);
    }

    #[test]
    fn removing_absent_product_keeps_cart() {
        let mut app = CatalogApp::default();
        set_quantity(&mut app, 4, "1");
        app.dispatch(CatalogEvent::AddToCart(ProductId(4))).expect("add");
        let before = app.cart().clone();

        app.dispatch(CatalogEvent::RemoveFromCart(ProductId(1))).expect("remove absent");
        assert_eq!(app.cart(), &before);

        app.dispatch(CatalogEvent::RemoveFromCart(ProductId(4))).expect("remove present");
        assert!(app.cart().is_empty());
    }

    #[test]
    fn unknown_products_are_rejected() {
        let mut app = CatalogApp::default();
        let result = app.dispatch(CatalogEvent::AddToCart(ProductId(99)));
        assert_eq!(result, Err(CatalogError::UnknownProduct(ProductId(99))));
    }

    #[test]
    fn replacing_the_catalog_recomputes_and_drops_stale_inputs() {
        let mut app = CatalogApp::default();
        set_quantity(&mut app, 4, "2");
        app.filtered_products();

        let first_two = Catalog::new(app.catalog().products()[..2].to_vec());
        app.replace_catalog(first_two);

        assert_eq!(app.filtered_products().len(), 2);
        assert_eq!(app.filter_recomputations(), 2);
        assert_eq!(app.quantity_input(ProductId(4)), "");
    }
}
