pub mod item;
pub mod product;
