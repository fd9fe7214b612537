//! In-memory storage backend
//!
//! A Vec behind a mutex with a monotonic id counter. Listing preserves
//! insertion order and nothing survives a restart.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::UserStore;
use crate::error::ServerResult;
use crate::models::{NewUser, User};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<User>,
    next_id: i64,
}

/// Volatile user store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryStore {
    fn insert(&self, new: &NewUser) -> ServerResult<User> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;

        let user = User {
            id: inner.next_id,
            name: new.name.clone(),
            created_at: Utc::now(),
        };
        inner.rows.push(user.clone());

        Ok(user)
    }

    fn get(&self, id: i64) -> ServerResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.iter().find(|u| u.id == id).cloned())
    }

    fn list(&self) -> ServerResult<Vec<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
        }
    }

    #[test]
    fn ids_start_at_one_and_increment() {
        let store = MemoryStore::new();

        assert_eq!(store.insert(&new_user("alice")).unwrap().id, 1);
        assert_eq!(store.insert(&new_user("bob")).unwrap().id, 2);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = MemoryStore::new();

        store.insert(&new_user("first")).unwrap();
        store.insert(&new_user("second")).unwrap();

        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(1).unwrap().is_none());
    }
}
