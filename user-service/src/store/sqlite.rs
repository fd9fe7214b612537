//! SQLite storage backend
//!
//! Holds only the database path: every operation opens its own connection
//! and releases it on drop. No connection is shared or pooled; the
//! lifecycle is open, execute, teardown, with rusqlite errors translated
//! to 500s by `ServerError`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::UserStore;
use crate::error::ServerResult;
use crate::models::{NewUser, User};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
"#;

/// File-backed user store.
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

impl UserStore for SqliteStore {
    fn insert(&self, new: &NewUser) -> ServerResult<User> {
        let conn = self.connect()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO users (name, created_at) VALUES (?, ?)",
            params![new.name, format_datetime(created_at)],
        )?;

        Ok(User {
            id: conn.last_insert_rowid(),
            name: new.name.clone(),
            created_at,
        })
    }

    fn get(&self, id: i64) -> ServerResult<Option<User>> {
        let conn = self.connect()?;

        let user = conn
            .query_row(
                "SELECT id, name, created_at FROM users WHERE id = ?",
                [id],
                row_to_user,
            )
            .optional()?;

        Ok(user)
    }

    fn list(&self) -> ServerResult<Vec<User>> {
        let conn = self.connect()?;

        // Timestamps have sub-second precision but ties are still possible
        // under load; id breaks them so ordering stays deterministic.
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at FROM users ORDER BY created_at DESC, id DESC",
        )?;

        let users = stmt
            .query_map([], row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(row.get::<_, String>(2)?),
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
        SqliteStore::open(temp.path().join("users.db")).unwrap()
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
        }
    }

    #[test]
    fn insert_assigns_monotonic_ids() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        assert_eq!(store.insert(&new_user("alice")).unwrap().id, 1);
        assert_eq!(store.insert(&new_user("bob")).unwrap().id, 2);
    }

    #[test]
    fn get_returns_inserted_fields() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        let created = store.insert(&new_user("alice")).unwrap();
        let fetched = store.get(created.id).unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "alice");
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

        store.insert(&new_user("first")).unwrap();
        store.insert(&new_user("second")).unwrap();

        let names: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn data_survives_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("users.db");

        let created = {
            let store = SqliteStore::open(&path).unwrap();
            store.insert(&new_user("alice")).unwrap()
        };

        // Schema setup is idempotent; existing rows are untouched.
        let store = SqliteStore::open(&path).unwrap();
        let fetched = store.get(created.id).unwrap().unwrap();
        assert_eq!(fetched.name, "alice");
    }
}
