//! Storage backends for the user service
//!
//! Two implementations of the same seam:
//! - `sqlite`: file-backed, per-request connections, newest-first listing
//! - `memory`: in-process Vec, insertion-order listing

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use crate::error::ServerResult;
use crate::models::{NewUser, User};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Storage seam shared by both backends.
///
/// Operations are synchronous: SQLite calls are short single-row statements
/// and the memory backend is a mutex around a Vec.
pub trait UserStore: Send + Sync {
    /// Insert a validated user, assigning its id and creation timestamp.
    fn insert(&self, new: &NewUser) -> ServerResult<User>;

    /// Fetch a user by id. `None` when the id was never assigned.
    fn get(&self, id: i64) -> ServerResult<Option<User>>;

    /// List every user. Ordering is backend-defined: newest first for
    /// SQLite, insertion order for memory.
    fn list(&self) -> ServerResult<Vec<User>>;

    /// Human-readable description of the backing store for `GET /`.
    fn describe(&self) -> String;
}

/// Shared handle passed to handlers as axum state.
pub type SharedStore = Arc<dyn UserStore>;
