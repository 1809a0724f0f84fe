//! SQLite-backed monitoring store
//!
//! Split read/write r2d2 pools over one database file. Blocking rusqlite
//! work runs on `spawn_blocking` so request handlers never stall the
//! runtime.

pub mod installations;
pub mod models;
pub mod readings;
pub mod schema;
pub mod sensors;
pub mod store;

pub use models::*;
pub use store::ReadingStore;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::errors::StoreError;
use crate::logger::{self, LogTag};

/// Pool checkout timeout
const CONNECTION_TIMEOUT_MS: u64 = 10_000;

#[derive(Clone)]
pub struct SqliteStore {
    write_pool: Pool<SqliteConnectionManager>,
    read_pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and apply the schema
    pub fn open(path: &Path, config: &DatabaseConfig) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);

        let write_manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA synchronous = NORMAL;")
        });
        let read_manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA query_only = 1;")
        });

        let write_pool = Pool::builder()
            .max_size(config.write_pool_size.max(1))
            .connection_timeout(Duration::from_millis(CONNECTION_TIMEOUT_MS))
            .build(write_manager)?;

        let read_pool = Pool::builder()
            .max_size(config.read_pool_size.max(1))
            .connection_timeout(Duration::from_millis(CONNECTION_TIMEOUT_MS))
            .build(read_manager)?;

        {
            let conn = write_pool.get()?;
            schema::initialize_schema(&conn)?;
        }

        logger::info(
            LogTag::Database,
            &format!("Database ready at {}", path.display()),
        );

        Ok(Self {
            write_pool,
            read_pool,
        })
    }

    /// Run `f` on a read connection off the async runtime
    pub(crate) async fn with_read<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.read_pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&conn)
        })
        .await?
    }

    /// Run `f` on a write connection off the async runtime
    pub(crate) async fn with_write<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.write_pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&conn)
        })
        .await?
    }
}

/// Convert a text column parse failure into a rusqlite error so it can be
/// raised from inside a row mapper.
pub(crate) fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A store in a fresh temporary directory; keep the TempDir alive
    pub fn temp_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("test.db"), &DatabaseConfig::default())
            .unwrap();
        (dir, store)
    }
}
