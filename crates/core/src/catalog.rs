use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId};

/// The fixed product list shown by the catalog page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The built-in catalog shipped with the storefront page.
    pub fn builtin() -> Self {
        Self::new(vec![
            Product::new(
                1,
                "Laptop",
                Decimal::from(800),
                "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcRr9DHAbX1RMK-jOq00ffQkM7fA3-0ZQGEeZw&s",
            ),
            Product::new(
                2,
                "Smartphone",
                Decimal::from(500),
                "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSlBWojpFb-lzcdasdfrPFlYlEKspQkYTLtUA&s",
            ),
            Product::new(
                3,
                "Tablet",
                Decimal::from(300),
                "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSxgc38vOUsSv8FxgoVdMFtcdMLFAChk3oMhg&s",
            ),
            Product::new(
                4,
                "Smartwatch",
                Decimal::from(200),
                "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQzgjh8eBir1oEJ-O7cK_gF5J3GJn7kLTLXOQ&s",
            ),
        ])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == product_id)
    }

    /// Products whose name contains `term`, ignoring case, in catalog order.
    pub fn filter(&self, term: &str) -> Vec<&Product> {
        let needle = term.to_lowercase();
        self.products.iter().filter(|product| product.name.to_lowercase().contains(&needle)).collect()
    }
}
