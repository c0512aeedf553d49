//! The `users` table: record type, query helpers, and first-run seeding.

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Names inserted into an empty `users` table on first run, in order.
pub const DEFAULT_USER_NAMES: [&str; 2] = ["Atul", "Alice"];

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// System-assigned unique identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// Errors that can occur when querying the `users` table.
#[derive(Debug, Error)]
pub enum UserStoreError {
    /// The underlying SQLite query failed.
    #[error("users query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Inserts the default users if and only if the table is empty.
///
/// This is a single conditional INSERT rather than a separate existence check
/// followed by inserts: SQLite executes the statement atomically, so two
/// processes starting against the same database cannot both seed it. Rerunning
/// against a non-empty table (whatever its contents) inserts nothing.
///
/// Returns the number of rows inserted: 2 on first run, 0 otherwise.
///
/// # Errors
///
/// Returns `UserStoreError` if the statement fails, e.g. because the schema
/// has not been created yet.
pub fn seed_default_users(conn: &Connection) -> Result<usize, UserStoreError> {
    let inserted = conn.execute(
        "INSERT INTO users (name)
         SELECT name FROM (SELECT ?1 AS name UNION ALL SELECT ?2)
         WHERE NOT EXISTS (SELECT 1 FROM users)",
        [DEFAULT_USER_NAMES[0], DEFAULT_USER_NAMES[1]],
    )?;

    if inserted > 0 {
        tracing::info!(count = inserted, "seeded default users");
    } else {
        tracing::debug!("users table already populated, skipping seed");
    }

    Ok(inserted)
}

/// Returns all users in insertion (id) order.
///
/// # Errors
///
/// Returns `UserStoreError` if the query fails.
pub fn list_users(conn: &Connection) -> Result<Vec<User>, UserStoreError> {
    let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id")?;
    let users = stmt
        .query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

/// Returns the number of rows in the `users` table.
///
/// # Errors
///
/// Returns `UserStoreError` if the query fails.
pub fn user_count(conn: &Connection) -> Result<i64, UserStoreError> {
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

/// Inserts a user and returns it with its assigned id.
///
/// # Errors
///
/// Returns `UserStoreError` if the insert fails.
pub fn insert_user(conn: &Connection, name: &str) -> Result<User, UserStoreError> {
    conn.execute("INSERT INTO users (name) VALUES (?1)", [name])?;
    Ok(User {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Fetches a single user by id, or `None` if no such row exists.
///
/// # Errors
///
/// Returns `UserStoreError` if the query fails.
pub fn get_user(conn: &Connection, id: i64) -> Result<Option<User>, UserStoreError> {
    let user = conn
        .query_row("SELECT id, name FROM users WHERE id = ?1", [id], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .optional()?;
    Ok(user)
}
