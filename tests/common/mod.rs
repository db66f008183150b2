use std::path::PathBuf;

use workoutlog::config::Config;
use workoutlog::db::{create_pool, DbPool};
use workoutlog::migrations::run_migrations;
use workoutlog::models::{CreateWorkout, CreateWorkoutEntry};

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        migrations_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations"),
        pool_size: 1,
    }
}

pub fn setup_test_db() -> DbPool {
    let config = test_config();
    let pool = create_pool(&config).expect("Failed to create test database");
    run_migrations(&pool, &config.migrations_dir).expect("Failed to run migrations");
    pool
}

pub fn count_rows(pool: &DbPool, table: &str) -> i64 {
    let conn = pool.get().unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}

// Test data creation helpers
pub fn reps_entry(name: &str, sets: i64, reps: i64, order_index: i64) -> CreateWorkoutEntry {
    CreateWorkoutEntry {
        exercise_name: name.to_string(),
        sets,
        reps: Some(reps),
        order_index,
        ..Default::default()
    }
}

pub fn timed_entry(name: &str, sets: i64, seconds: i64, order_index: i64) -> CreateWorkoutEntry {
    CreateWorkoutEntry {
        exercise_name: name.to_string(),
        sets,
        duration_seconds: Some(seconds),
        order_index,
        ..Default::default()
    }
}

pub fn workout(title: &str, entries: Vec<CreateWorkoutEntry>) -> CreateWorkout {
    CreateWorkout {
        title: title.to_string(),
        description: format!("{} description", title),
        duration_minutes: 45,
        calories_burned: 300,
        entries,
    }
}
