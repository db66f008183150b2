use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub migrations_dir: PathBuf,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:workoutlog.db?mode=rwc".to_string()),
            migrations_dir: env::var("MIGRATIONS_DIR")
                .unwrap_or_else(|_| "migrations".to_string())
                .into(),
            pool_size: env::var("DB_POOL_SIZE")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
        })
    }
}

#[cfg(test)]
impl Config {
    /// In-memory database with the crate's own migrations.
    pub(crate) fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            migrations_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations"),
            pool_size: 1,
        }
    }
}
