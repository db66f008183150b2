use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workoutlog::config::Config;
use workoutlog::db;
use workoutlog::migrations::run_migrations;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workoutlog=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config)?;

    let applied = run_migrations(&pool, &config.migrations_dir)?;

    let conn = pool.get()?;
    let workouts: i64 = conn.query_row("SELECT COUNT(*) FROM workouts", [], |row| row.get(0))?;
    tracing::info!(
        "Database ready: {} migrations applied, {} workouts stored",
        applied,
        workouts
    );

    Ok(())
}
