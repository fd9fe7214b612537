//! SQLite storage backend
//!
//! Holds only the database path: every operation opens its own connection
//! and releases it on drop. No connection is shared or pooled; the
//! lifecycle is open, execute, teardown, with rusqlite errors translated
//! to 500s by `ServerError`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::ProductStore;
use crate::error::ServerResult;
use crate::models::{NewProduct, Product};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    price       REAL NOT NULL,
    created_at  TEXT NOT NULL
);
"#;

/// File-backed product store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open or create the database at the given path.
    ///
    /// Creates parent directories and runs the idempotent schema setup on a
    /// short-lived connection that is dropped before serving begins.
    pub fn open(path: impl Into<PathBuf>) -> ServerResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self { path })
    }

    /// Get the database file path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Open a fresh connection for a single request.
    fn connect(&self) -> ServerResult<Connection> {
        Ok(Connection::open(&self.path)?)
    }
}

impl ProductStore for SqliteStore {
    fn insert(&self, new: &NewProduct) -> ServerResult<Product> {
        let conn = self.connect()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO products (name, price, created_at) VALUES (?, ?, ?)",
            params![new.name, new.price, format_datetime(created_at)],
        )?;

        Ok(Product {
            id: conn.last_insert_rowid(),
            name: new.name.clone(),
            price: new.price,
            created_at,
        })
    }

    fn get(&self, id: i64) -> ServerResult<Option<Product>> {
        let conn = self.connect()?;

        let product = conn
            .query_row(
                "SELECT id, name, price, created_at FROM products WHERE id = ?",
                [id],
                row_to_product,
            )
            .optional()?;

        Ok(product)
    }

    fn list(&self) -> ServerResult<Vec<Product>> {
        let conn = self.connect()?;

        // Timestamps have sub-second precision but ties are still possible
        // under load; id breaks them so ordering stays deterministic.
        let mut stmt = conn.prepare(
            "SELECT id, name, price, created_at FROM products ORDER BY created_at DESC, id DESC",
        )?;

        let products = stmt
            .query_map([], row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        created_at: parse_datetime(row.get::<_, String>(3)?),
    })
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(temp: &TempDir) -> SqliteStore {
        SqliteStore::open(temp.path().join("products.db")).unwrap()
    }

    fn new_product(name: &str, price: f64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price,
        }
    }

    #[test]
    fn insert_assigns_monotonic_ids() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let first = store.insert(&new_product("Widget", 1.0)).unwrap();
        let second = store.insert(&new_product("Gadget", 2.0)).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn get_returns_inserted_fields() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let created = store.insert(&new_product("Widget", 19.99)).unwrap();
        let fetched = store.get(created.id).unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.price, 19.99);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        assert!(store.get(42).unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        store.insert(&new_product("first", 1.0)).unwrap();
        store.insert(&new_product("second", 2.0)).unwrap();
        store.insert(&new_product("third", 3.0)).unwrap();

        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[test]
    fn data_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("products.db");

        let created = {
            let store = SqliteStore::open(&path).unwrap();
            store.insert(&new_product("Widget", 9.5)).unwrap()
        };

        // Schema setup is idempotent; existing rows are untouched.
        let store = SqliteStore::open(&path).unwrap();
        let fetched = store.get(created.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Widget");
        assert_eq!(fetched.price, 9.5);
    }

    #[test]
    fn creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("dir").join("products.db");

        let store = SqliteStore::open(&path).unwrap();
        store.insert(&new_product("Widget", 1.0)).unwrap();
        assert!(path.exists());
    }
}
