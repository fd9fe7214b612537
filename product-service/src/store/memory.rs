//! In-memory storage backend
//!
//! A Vec behind a mutex with a monotonic id counter. Listing preserves
//! insertion order and nothing survives a restart.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::ProductStore;
use crate::error::{ServerError, ServerResult};
use crate::models::{NewProduct, Product};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Product>,
    next_id: i64,
}

/// Volatile product store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned mutex means a handler panicked mid-insert; surface it as
    /// a 500 instead of cascading the panic.
    fn lock(&self) -> ServerResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| ServerError::Internal("product store mutex poisoned".to_string()))
    }
}

impl ProductStore for MemoryStore {
    fn insert(&self, new: &NewProduct) -> ServerResult<Product> {
        let mut inner = self.lock()?;
        inner.next_id += 1;

        let product = Product {
            id: inner.next_id,
            name: new.name.clone(),
            price: new.price,
            created_at: Utc::now(),
        };
        inner.rows.push(product.clone());

        Ok(product)
    }

    fn get(&self, id: i64) -> ServerResult<Option<Product>> {
        let inner = self.lock()?;
        Ok(inner.rows.iter().find(|p| p.id == id).cloned())
    }

    fn list(&self) -> ServerResult<Vec<Product>> {
        let inner = self.lock()?;
        Ok(inner.rows.clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_product(name: &str, price: f64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price,
        }
    }

    #[test]
    fn ids_start_at_one_and_increment() {
        let store = MemoryStore::new();

        assert_eq!(store.insert(&new_product("a", 1.0)).unwrap().id, 1);
        assert_eq!(store.insert(&new_product("b", 2.0)).unwrap().id, 2);
        assert_eq!(store.insert(&new_product("c", 3.0)).unwrap().id, 3);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = MemoryStore::new();

        store.insert(&new_product("first", 1.0)).unwrap();
        store.insert(&new_product("second", 2.0)).unwrap();

        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let store = MemoryStore::new();
        assert!(store.get(1).unwrap().is_none());
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();

        store.insert(&new_product("Widget", 1.0)).unwrap();
        assert_eq!(clone.list().unwrap().len(), 1);
    }
}
