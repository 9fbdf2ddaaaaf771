//! Error type for `headline-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] headline_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A pool must hold at least one connection.
  #[error("connection pool size must be at least 1")]
  EmptyPool,

  #[error("connection pool is closed")]
  PoolClosed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
