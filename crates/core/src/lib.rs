//! Domain types shared by the shopkeep crates: catalog products and the cart used by the
//! catalog page, inventory items persisted by the server, configuration, and errors.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod money;

pub use cart::{Cart, CartEntry, CartError};
pub use catalog::Catalog;
pub use domain::item::{Item, ItemId, ItemPatch, NewItem};
pub use domain::product::{Product, ProductId};
pub use errors::{DomainError, FieldError, FieldErrorKind, ValidationError};
pub use money::format_inr;
