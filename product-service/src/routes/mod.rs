//! Route handlers for the product service
//!
//! - info: service info at `GET /`
//! - products: create, read-one, read-all

pub mod info;
pub mod products;

pub use info::*;
pub use products::*;
