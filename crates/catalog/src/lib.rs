//! Filterable product list with a local cart.
//!
//! [`CatalogApp`] owns all page state. Every [`CatalogEvent`] mutates it
//! synchronously; callers render a fresh [`CatalogView`] afterwards.

pub mod filter;
pub mod render;
pub mod state;
pub mod view;

pub use filter::FilteredView;
pub use render::CatalogRenderer;
pub use state::{CatalogApp, CatalogError, CatalogEvent};
pub use view::CatalogView;
