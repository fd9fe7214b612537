//! Route handlers for the user service
//!
//! - info: service info at `GET /`
//! - users: create, read-one, read-all

pub mod info;
pub mod users;

pub use info::*;
pub use users::*;
