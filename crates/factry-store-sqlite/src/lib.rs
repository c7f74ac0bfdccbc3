//! SQLite backend for the Factry fact store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The schema is self-migrating: opening
//! a store runs the additive [`schema::modernize`] pass before anything else
//! touches the file.

mod schema;
mod store;

pub use store::SqliteStore;
