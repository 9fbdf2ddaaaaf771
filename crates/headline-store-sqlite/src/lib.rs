//! SQLite backend for the Headline news store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on dedicated
//! connection threads without blocking the async runtime. Connections are
//! handed out per operation by a small [`Pool`].

mod encode;
mod schema;
mod store;

pub mod error;
pub mod pool;

pub use error::{Error, Result};
pub use pool::{Pool, PooledConnection};
pub use store::SqliteStore;
