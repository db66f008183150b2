use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use crate::config::Config;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn create_pool(config: &Config) -> Result<DbPool, r2d2::Error> {
    let url = config.database_url.as_str();
    let path = url.strip_prefix("sqlite:").unwrap_or(url);
    // Remove query parameters (e.g., ?mode=rwc)
    let path = path.split('?').next().unwrap_or(path);

    if path == ":memory:" {
        return create_memory_pool();
    }

    Pool::builder()
        .max_size(config.pool_size.max(1))
        .build(with_foreign_keys(SqliteConnectionManager::file(Path::new(
            path,
        ))))
}

/// Every in-memory connection is its own database, so the pool holds one.
pub fn create_memory_pool() -> Result<DbPool, r2d2::Error> {
    Pool::builder()
        .max_size(1)
        .build(with_foreign_keys(SqliteConnectionManager::memory()))
}

// SQLite leaves foreign keys off per connection; the entry cascade needs them.
fn with_foreign_keys(manager: SqliteConnectionManager) -> SqliteConnectionManager {
    manager.with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"))
}
