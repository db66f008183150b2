use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration_minutes: i64,
    pub calories_burned: i64,
    pub entries: Vec<WorkoutEntry>,
}

impl FromSqliteRow for Workout {
    /// Entries are loaded separately and start out empty.
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            duration_minutes: row.get("duration_minutes")?,
            calories_burned: row.get("calories_burned")?,
            entries: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_name: String,
    pub sets: i64,
    pub reps: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub weight: Option<f64>,
    pub notes: String,
    pub order_index: i64,
}

impl FromSqliteRow for WorkoutEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            exercise_name: row.get("exercise_name")?,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            duration_seconds: row.get("duration_seconds")?,
            weight: row.get("weight")?,
            notes: row.get("notes")?,
            order_index: row.get("order_index")?,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWorkout {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub duration_minutes: i64,
    pub calories_burned: i64,
    pub entries: Vec<CreateWorkoutEntry>,
}

impl CreateWorkout {
    /// Check every field before anything touches the database.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(StoreError::Validation("title must not be empty".to_string()));
        }
        if self.duration_minutes < 0 {
            return Err(StoreError::Validation(
                "duration_minutes must not be negative".to_string(),
            ));
        }
        if self.calories_burned < 0 {
            return Err(StoreError::Validation(
                "calories_burned must not be negative".to_string(),
            ));
        }
        if self.entries.is_empty() {
            return Err(StoreError::Validation(
                "workout must have at least one entry".to_string(),
            ));
        }

        for (i, entry) in self.entries.iter().enumerate() {
            entry
                .validate()
                .map_err(|msg| StoreError::Validation(format!("entry {}: {}", i + 1, msg)))?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateWorkoutEntry {
    pub exercise_name: String,
    pub sets: i64,
    pub reps: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: String,
    pub order_index: i64,
}

impl CreateWorkoutEntry {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.exercise_name.trim().is_empty() {
            return Err("exercise_name must not be empty".to_string());
        }
        if self.sets < 1 {
            return Err("sets must be at least 1".to_string());
        }

        match (self.reps, self.duration_seconds) {
            (Some(_), Some(_)) => {
                return Err("reps and duration_seconds cannot both be set".to_string())
            }
            (None, None) => {
                return Err("either reps or duration_seconds must be set".to_string())
            }
            _ => {}
        }

        if self.reps.is_some_and(|r| r < 0) {
            return Err("reps must not be negative".to_string());
        }
        if self.duration_seconds.is_some_and(|d| d < 0) {
            return Err("duration_seconds must not be negative".to_string());
        }
        if self.weight.is_some_and(|w| !w.is_finite() || w < 0.0) {
            return Err("weight must be a non-negative number".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reps_entry() -> CreateWorkoutEntry {
        CreateWorkoutEntry {
            exercise_name: "Bench press".to_string(),
            sets: 3,
            reps: Some(10),
            weight: Some(135.5),
            order_index: 1,
            ..Default::default()
        }
    }

    fn workout_with(entries: Vec<CreateWorkoutEntry>) -> CreateWorkout {
        CreateWorkout {
            title: "Push Day".to_string(),
            description: "Upper body day".to_string(),
            duration_minutes: 60,
            calories_burned: 200,
            entries,
        }
    }

    #[test]
    fn test_entry_with_reps_only_is_valid() {
        assert!(reps_entry().validate().is_ok());
    }

    #[test]
    fn test_entry_with_duration_only_is_valid() {
        let entry = CreateWorkoutEntry {
            reps: None,
            duration_seconds: Some(60),
            weight: None,
            ..reps_entry()
        };

        assert!(entry.validate().is_ok());
    }

    #[test]
    fn test_entry_with_both_reps_and_duration_is_invalid() {
        let entry = CreateWorkoutEntry {
            duration_seconds: Some(60),
            ..reps_entry()
        };

        let err = entry.validate().unwrap_err();
        assert!(err.contains("cannot both be set"));
    }

    #[test]
    fn test_entry_with_neither_reps_nor_duration_is_invalid() {
        let entry = CreateWorkoutEntry {
            reps: None,
            ..reps_entry()
        };

        let err = entry.validate().unwrap_err();
        assert!(err.contains("either reps or duration_seconds"));
    }

    #[test]
    fn test_entry_rejects_zero_sets_and_blank_name() {
        let zero_sets = CreateWorkoutEntry {
            sets: 0,
            ..reps_entry()
        };
        let blank_name = CreateWorkoutEntry {
            exercise_name: "   ".to_string(),
            ..reps_entry()
        };

        assert!(zero_sets.validate().is_err());
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_entry_rejects_negative_weight() {
        let entry = CreateWorkoutEntry {
            weight: Some(-5.0),
            ..reps_entry()
        };

        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_workout_requires_entries() {
        let err = workout_with(vec![]).validate().unwrap_err();

        assert!(err.is_validation());
    }

    #[test]
    fn test_workout_requires_title() {
        let mut workout = workout_with(vec![reps_entry()]);
        workout.title = String::new();

        assert!(workout.validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_workout_error_names_offending_entry() {
        let bad = CreateWorkoutEntry {
            duration_seconds: Some(60),
            order_index: 2,
            ..reps_entry()
        };
        let err = workout_with(vec![reps_entry(), bad]).validate().unwrap_err();

        assert!(err.to_string().contains("entry 2"));
    }

    #[test]
    fn test_workout_entry_serializes_absent_fields_as_null() {
        let entry = WorkoutEntry {
            id: 1,
            workout_id: 1,
            exercise_name: "Plank".to_string(),
            sets: 3,
            reps: None,
            duration_seconds: Some(60),
            weight: None,
            notes: String::new(),
            order_index: 1,
        };

        let json = serde_json::to_value(&entry).unwrap();

        assert!(json["reps"].is_null());
        assert!(json["weight"].is_null());
        assert_eq!(json["duration_seconds"], 60);
    }
}
