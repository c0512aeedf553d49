//! Database layer for the roster application.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization,
//! embedded SQL migrations, and the `users` table with its query helpers.
//! The schema is created through versioned migrations managed by this crate.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: the application ships as a single process with
//!   a single data file — no external database server required. WAL mode
//!   allows concurrent readers with a single writer.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, so the schema ships with the server and cannot drift
//!   from the code that depends on it.
//! - **Atomic seeding**: the first-run seed is a single conditional INSERT
//!   statement, so two processes starting against the same database cannot
//!   both seed it.

mod migrations;
mod pool;
mod users;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbConn, DbPool, DbRuntimeSettings, PoolError};
pub use users::{
    get_user, insert_user, list_users, seed_default_users, user_count, User, UserStoreError,
    DEFAULT_USER_NAMES,
};
