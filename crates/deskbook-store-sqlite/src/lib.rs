//! SQLite backend for the Deskbook space catalog and reservation store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. That single connection also
//! serialises writers, which together with `BEGIN IMMEDIATE` makes the
//! overwrite-on-create step atomic per slot.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
