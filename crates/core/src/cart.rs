use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::domain::product::{Product, ProductId};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("Please enter a valid quantity.")]
    InvalidQuantity,
    #[error("quantity for product {0} would overflow")]
    QuantityOverflow(ProductId),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    pub product: Product,
    pub quantity: u32,
}

impl CartEntry {
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Products chosen on the catalog page with their quantities, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.entries.iter().find(|entry| entry.product.id == product_id).map(|entry| entry.quantity)
    }

    /// Adds `quantity` units. Non-positive quantities are rejected and leave the cart untouched.
    pub fn add(&mut self, product: &Product, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity);
        }
        let quantity = u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity)?;

        match self.entries.iter_mut().find(|entry| entry.product.id == product.id) {
            Some(entry) => {
                entry.quantity = entry
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartError::QuantityOverflow(product.id))?;
            }
            None => self.entries.push(CartEntry { product: product.clone(), quantity }),
        }
        Ok(())
    }

    /// Parses free-form quantity input and adds it.
    pub fn add_input(&mut self, product: &Product, raw_quantity: &str) -> Result<(), CartError> {
        let quantity = parse_quantity(raw_quantity)?;
        self.add(product, quantity)
    }

    /// Removes the entry for `product_id`; returns whether anything was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.product.id != product_id);
        self.entries.len() != before
    }

    pub fn total_items(&self) -> u64 {
        self.entries.iter().map(|entry| u64::from(entry.quantity)).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.entries.iter().map(CartEntry::line_total).sum()
    }
}

/// Reads a leading base-10 integer: surrounding whitespace and trailing junk are ignored,
/// so `" 3 pcs"` is 3 and `"2.7"` is 2. Input with no leading digits is non-numeric.
pub fn parse_quantity(raw: &str) -> Result<i64, CartError> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(CartError::InvalidQuantity);
    }

    let magnitude = digits.parse::<i64>().map_err(|_| CartError::InvalidQuantity)?;
    Ok(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{parse_quantity, Cart, CartError};
    use crate::catalog::Catalog;
    use crate::domain::product::{Product, ProductId};

    fn laptop() -> Product {
        Catalog::builtin().find(ProductId(1)).cloned().expect("laptop in catalog")
    }

    fn tablet() -> Product {
        Catalog::builtin().find(ProductId(3)).cloned().expect("tablet in catalog")
    }

    #[test]
    fn non_positive_quantities_leave_cart_unchanged() {
        let mut cart = Cart::default();
        cart.add(&laptop(), 1).expect("first add");
        let before = cart.clone();

        assert_eq!(cart.add(&laptop(), 0), Err(CartError::InvalidQuantity));
        assert_eq!(cart.add(&tablet(), -4), Err(CartError::InvalidQuantity));
        assert_eq!(cart, before);
    }

    #[test]
    fn repeated_adds_accumulate_instead_of_duplicating() {
        let mut cart = Cart::default();
        cart.add(&laptop(), 2).expect("add laptop");
        cart.add(&tablet(), 1).expect("add tablet");
        cart.add(&laptop(), 3).expect("add laptop again");

        assert_eq!(cart.entries().len(), 2);
        assert_eq!(cart.quantity_of(ProductId(1)), Some(5));
        assert_eq!(cart.entries()[0].product.name, "Laptop", "insertion order is kept");
        assert_eq!(cart.total_items(), 6);
    }

    #[test]
    fn removing_unknown_identifier_is_a_no_op() {
        let mut cart = Cart::default();
        cart.add(&tablet(), 1).expect("add tablet");
        let before = cart.clone();

        assert!(!cart.remove(ProductId(42)));
        assert_eq!(cart, before);

        assert!(cart.remove(ProductId(3)));
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn line_totals_and_subtotal_multiply_price_by_quantity() {
        let mut cart = Cart::default();
        cart.add(&laptop(), 2).expect("add laptop");
        cart.add(&tablet(), 3).expect("add tablet");

        assert_eq!(cart.entries()[0].line_total(), Decimal::from(1_600));
        assert_eq!(cart.subtotal(), Decimal::from(2_500));
    }

    #[test]
    fn quantity_overflow_is_rejected_without_mutation() {
        let mut cart = Cart::default();
        cart.add(&laptop(), i64::from(u32::MAX)).expect("max quantity fits");
        assert_eq!(cart.add(&laptop(), 1), Err(CartError::QuantityOverflow(ProductId(1))));
        assert_eq!(cart.quantity_of(ProductId(1)), Some(u32::MAX));
    }

    #[test]
    fn quantity_input_reads_leading_integer() {
        assert_eq!(parse_quantity("3"), Ok(3));
        assert_eq!(parse_quantity("  2 pcs"), Ok(2));
        assert_eq!(parse_quantity("2.7"), Ok(2));
        assert_eq!(parse_quantity("-1"), Ok(-1));
        assert_eq!(parse_quantity(""), Err(CartError::InvalidQuantity));
        assert_eq!(parse_quantity("abc"), Err(CartError::InvalidQuantity));
    }

    #[test]
    fn non_numeric_input_is_rejected_by_add_input() {
        let mut cart = Cart::default();
        assert_eq!(cart.add_input(&laptop(), "lots"), Err(CartError::InvalidQuantity));
        assert_eq!(cart.add_input(&laptop(), "0"), Err(CartError::InvalidQuantity));
        assert!(cart.is_empty());

        cart.add_input(&laptop(), "4").expect("numeric input");
        assert_eq!(cart.total_items(), 4);
    }
}
