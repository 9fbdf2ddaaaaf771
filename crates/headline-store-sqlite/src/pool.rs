//! A fixed-size pool of [`tokio_rusqlite::Connection`]s.
//!
//! Each request-scoped operation checks out one connection with
//! [`Pool::acquire`], uses it for a single read or a single write transaction,
//! and hands it back when the [`PooledConnection`] guard drops. The guard is
//! returned on every exit path, including `?` early returns and panics.

use std::{
  ops::Deref,
  path::Path,
  sync::{Arc, Mutex, PoisonError},
  time::Duration,
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_rusqlite::Connection;

use crate::{
  Error, Result,
  schema::{CONNECTION_PRAGMAS, SCHEMA},
};

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Whether every connection opened on `path` gets its own database.
fn is_private(path: &Path) -> bool {
  path.as_os_str().is_empty() || path == Path::new(":memory:")
}

// ─── Pool ────────────────────────────────────────────────────────────────────

/// Cloning is cheap — clones share the same connections.
#[derive(Clone)]
pub struct Pool {
  inner: Arc<Inner>,
}

struct Inner {
  /// Invariant: holds exactly as many connections as `permits` has available.
  idle:    Mutex<Vec<Connection>>,
  permits: Arc<Semaphore>,
  size:    usize,
}

impl Pool {
  /// Open `size` connections to the database file at `path`, creating it and
  /// applying the schema if necessary.
  ///
  /// `:memory:` and the empty path name a private database per connection, so
  /// they yield the single-connection pool of [`Pool::open_in_memory`]
  /// whatever `size` is.
  pub async fn open(path: impl AsRef<Path>, size: usize) -> Result<Self> {
    if size == 0 {
      return Err(Error::EmptyPool);
    }

    let path = path.as_ref();
    if is_private(path) {
      tracing::debug!(
        path = %path.display(),
        size,
        "private database, using one connection"
      );
      return Self::open_in_memory().await;
    }

    let mut conns = Vec::with_capacity(size);
    for _ in 0..size {
      let conn = Connection::open(path).await?;
      configure(&conn).await?;
      if conns.is_empty() {
        init_schema(&conn).await?;
      }
      conns.push(conn);
    }

    tracing::debug!(path = %path.display(), size, "opened connection pool");
    Ok(Self::from_connections(conns))
  }

  /// A single-connection pool over a private in-memory database. Every
  /// in-memory connection is its own database, so the size is fixed at 1.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().await?;
    configure(&conn).await?;
    init_schema(&conn).await?;
    Ok(Self::from_connections(vec![conn]))
  }

  fn from_connections(conns: Vec<Connection>) -> Self {
    let size = conns.len();
    Self {
      inner: Arc::new(Inner {
        idle: Mutex::new(conns),
        permits: Arc::new(Semaphore::new(size)),
        size,
      }),
    }
  }

  /// Wait for a free connection.
  pub async fn acquire(&self) -> Result<PooledConnection> {
    let permit = Arc::clone(&self.inner.permits)
      .acquire_owned()
      .await
      .map_err(|_| Error::PoolClosed)?;

    let conn = self
      .inner
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .pop()
      .ok_or(Error::PoolClosed)?;

    Ok(PooledConnection {
      conn:    Some(conn),
      pool:    Arc::clone(&self.inner),
      _permit: permit,
    })
  }

  /// Total number of connections owned by the pool.
  pub fn size(&self) -> usize { self.inner.size }

  /// Connections not currently checked out.
  pub fn idle(&self) -> usize { self.inner.permits.available_permits() }
}

async fn configure(conn: &Connection) -> Result<()> {
  conn
    .call(|conn| {
      conn.busy_timeout(BUSY_TIMEOUT)?;
      conn.execute_batch(CONNECTION_PRAGMAS)?;
      Ok(())
    })
    .await?;
  Ok(())
}

async fn init_schema(conn: &Connection) -> Result<()> {
  conn
    .call(|conn| {
      conn.execute_batch(SCHEMA)?;
      Ok(())
    })
    .await?;
  Ok(())
}

// ─── Guard ───────────────────────────────────────────────────────────────────

/// A checked-out connection. Dereferences to [`Connection`]; returns itself to
/// the pool on drop.
pub struct PooledConnection {
  conn:    Option<Connection>,
  pool:    Arc<Inner>,
  // Released after `drop` has pushed the connection back.
  _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
  type Target = Connection;

  fn deref(&self) -> &Connection {
    self.conn.as_ref().expect("connection is only taken in drop")
  }
}

impl Drop for PooledConnection {
  fn drop(&mut self) {
    if let Some(conn) = self.conn.take() {
      self
        .pool
        .idle
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(conn);
    }
  }
}
