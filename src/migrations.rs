//! Schema migrations read from a directory of `.sql` files.
//!
//! Files are applied in file-name order and recorded in a `_migrations`
//! table, so running the same directory twice only applies what is new.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::db::DbPool;

/// List the `.sql` files in `dir`, sorted by file name.
pub fn migration_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading migrations directory {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().map(|ext| ext == "sql").unwrap_or(false))
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Run all pending migrations from `dir` on the database pool.
///
/// Returns the number of migrations applied by this call.
pub fn run_migrations(pool: &DbPool, dir: &Path) -> anyhow::Result<usize> {
    tracing::info!("Running migrations from {}", dir.display());

    let files = migration_files(dir)?;
    let mut conn = pool.get()?;

    // Create migrations tracking table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let mut applied = 0;
    for path in files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?",
            [&filename],
            |row| row.get(0),
        )?;

        if already_applied {
            tracing::debug!("Skipping already applied migration: {}", filename);
            continue;
        }

        tracing::info!("Running migration: {}", filename);

        let sql = std::fs::read_to_string(&path)
            .with_context(|| format!("reading migration {}", path.display()))?;

        // The script and its bookkeeping row land together or not at all.
        let tx = conn.transaction()?;
        tx.execute_batch(&sql)
            .with_context(|| format!("applying migration {}", filename))?;
        tx.execute("INSERT INTO _migrations (name) VALUES (?)", [&filename])?;
        tx.commit()?;

        applied += 1;
    }

    tracing::info!("Migrations completed ({} applied)", applied);
    Ok(applied)
}
