use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{Result, StoreError};
use crate::models::{CreateWorkout, FromSqliteRow, Workout, WorkoutEntry};

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Persist a workout and all of its entries in one transaction.
    ///
    /// Validation runs first, so an invalid aggregate never reaches the
    /// database. Any failure while writing rolls the whole workout back.
    pub async fn create_workout(&self, workout: &CreateWorkout) -> Result<Workout> {
        workout.validate()?;

        let pool = self.pool.clone();
        let workout = workout.clone();
        tokio::task::spawn_blocking(move || -> Result<Workout> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO workouts (title, description, duration_minutes, calories_burned)
                 VALUES (?, ?, ?, ?)",
                rusqlite::params![
                    workout.title,
                    workout.description,
                    workout.duration_minutes,
                    workout.calories_burned
                ],
            )?;
            let id = tx.last_insert_rowid();
            let entries = insert_entries(&tx, id, &workout)?;

            tx.commit()?;
            tracing::debug!("Created workout {} with {} entries", id, entries.len());

            Ok(Workout {
                id,
                title: workout.title,
                description: workout.description,
                duration_minutes: workout.duration_minutes,
                calories_burned: workout.calories_burned,
                entries,
            })
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    /// Load a workout with its entries ordered by `order_index`.
    pub async fn get_workout_by_id(&self, id: i64) -> Result<Workout> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<Workout> {
            let conn = pool.get()?;
            find_workout(&conn, id)?
                .ok_or_else(|| StoreError::NotFound(format!("workout {}", id)))
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    /// Replace a workout's fields and its whole entry list.
    pub async fn update_workout(&self, id: i64, workout: &CreateWorkout) -> Result<Workout> {
        workout.validate()?;

        let pool = self.pool.clone();
        let workout = workout.clone();
        tokio::task::spawn_blocking(move || -> Result<Workout> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let rows = tx.execute(
                "UPDATE workouts
                 SET title = ?, description = ?, duration_minutes = ?, calories_burned = ?
                 WHERE id = ?",
                rusqlite::params![
                    workout.title,
                    workout.description,
                    workout.duration_minutes,
                    workout.calories_burned,
                    id
                ],
            )?;
            if rows == 0 {
                return Err(StoreError::NotFound(format!("workout {}", id)));
            }

            tx.execute("DELETE FROM workout_entries WHERE workout_id = ?", [id])?;
            insert_entries(&tx, id, &workout)?;

            let updated = find_workout(&tx, id)?
                .ok_or_else(|| StoreError::NotFound(format!("workout {}", id)))?;
            tx.commit()?;
            tracing::debug!("Updated workout {}", id);

            Ok(updated)
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }

    /// Delete a workout. Its entries are removed by the foreign-key cascade.
    pub async fn delete_workout(&self, id: i64) -> Result<bool> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let conn = pool.get()?;
            let rows = conn.execute("DELETE FROM workouts WHERE id = ?", [id])?;
            if rows > 0 {
                tracing::debug!("Deleted workout {}", id);
            }
            Ok(rows > 0)
        })
        .await
        .map_err(|e| StoreError::Internal(e.to_string()))?
    }
}

fn insert_entries(
    conn: &Connection,
    workout_id: i64,
    workout: &CreateWorkout,
) -> Result<Vec<WorkoutEntry>> {
    let mut stmt = conn.prepare(
        "INSERT INTO workout_entries
            (workout_id, exercise_name, sets, reps, duration_seconds, weight, notes, order_index)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )?;

    let mut entries = Vec::with_capacity(workout.entries.len());
    for entry in &workout.entries {
        stmt.execute(rusqlite::params![
            workout_id,
            entry.exercise_name,
            entry.sets,
            entry.reps,
            entry.duration_seconds,
            entry.weight,
            entry.notes,
            entry.order_index
        ])?;

        entries.push(WorkoutEntry {
            id: conn.last_insert_rowid(),
            workout_id,
            exercise_name: entry.exercise_name.clone(),
            sets: entry.sets,
            reps: entry.reps,
            duration_seconds: entry.duration_seconds,
            weight: entry.weight,
            notes: entry.notes.clone(),
            order_index: entry.order_index,
        });
    }

    entries.sort_by_key(|e| e.order_index);
    Ok(entries)
}

fn find_workout(conn: &Connection, id: i64) -> Result<Option<Workout>> {
    let workout = conn
        .query_row(
            "SELECT id, title, description, duration_minutes, calories_burned
             FROM workouts WHERE id = ?",
            [id],
            Workout::from_row,
        )
        .optional()?;

    let Some(mut workout) = workout else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT we.id, we.workout_id, we.exercise_name, we.sets, we.reps,
                we.duration_seconds, we.weight, we.notes, we.order_index
         FROM workout_entries we
         JOIN workouts w ON we.workout_id = w.id
         WHERE w.id = ?
         ORDER BY we.order_index",
    )?;
    workout.entries = stmt
        .query_map([id], WorkoutEntry::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Some(workout))
}
