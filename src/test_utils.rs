//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Date helpers

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::logs::WorkoutLogEntry;
use crate::models::plan::{DailyWorkout, Exercise, WorkoutPlan};
use crate::models::profile::{
  ActivityLevel, Equipment, FitnessLevel, Gender, TrainingGoal, UserProfile,
};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  // Run migrations
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed the database with one workout log per given day, logged at 18:00
pub async fn seed_test_workout_logs(pool: &SqlitePool, days: &[NaiveDate]) {
  for on in days {
    crate::logs::append_workout_log(pool, "Hétfő", "Mell & Tricepsz", datetime_on(*on, 18))
      .await
      .expect("Failed to seed workout log");
  }
}

/// ---------------------------------------------------------------------------
/// Date Helpers
/// ---------------------------------------------------------------------------

/// Shorthand for a calendar day
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("Invalid test date")
}

/// UTC instant on the given day at `hour`:00:00
pub fn datetime_on(on: NaiveDate, hour: u32) -> DateTime<Utc> {
  on.and_hms_opt(hour, 0, 0).expect("Invalid test hour").and_utc()
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// A workout log entry on the given day at `hour`:00
pub fn workout_entry(on: NaiveDate, hour: u32) -> WorkoutLogEntry {
  WorkoutLogEntry {
    logged_at: datetime_on(on, hour),
    workout_day: "Hétfő".to_string(),
    workout_title: "Mell & Tricepsz".to_string(),
  }
}

/// Create a mock user profile for testing
pub fn mock_profile() -> UserProfile {
  UserProfile {
    name: "Anna".to_string(),
    level: FitnessLevel::Intermediate,
    goal: TrainingGoal::MuscleGain,
    equipment: Equipment::Dumbbells,
    age: 29,
    gender: Gender::Female,
    height_cm: 168.0,
    current_weight_kg: 62.0,
    target_weight_kg: 65.0,
    activity_level: ActivityLevel::ModeratelyActive,
  }
}

/// Create a minimal two-day workout plan for testing
pub fn mock_workout_plan() -> WorkoutPlan {
  vec![
    DailyWorkout {
      day: "Hétfő".to_string(),
      title: "Mell & Tricepsz".to_string(),
      description: "Felsőtest erősítés kézisúlyzókkal.".to_string(),
      exercises: vec![Exercise {
        name: "Fekvőtámasz".to_string(),
        sets: "3-4".to_string(),
        reps: "8-12 ismétlés".to_string(),
        instructions: "Tartsd a törzsed feszesen, könyök a test mellett.".to_string(),
      }],
    },
    DailyWorkout {
      day: "Kedd".to_string(),
      title: "Pihenőnap".to_string(),
      description: "Könnyű séta vagy nyújtás.".to_string(),
      exercises: vec![],
    },
  ]
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    // Verify key tables exist
    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('workout_logs', 'water_logs', 'workout_goal', 'progress_data', 'chat_messages')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 5, "Expected 5 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_workout_logs_inserts_rows() {
    let pool = setup_test_db().await;

    seed_test_workout_logs(&pool, &[day(2024, 6, 3), day(2024, 6, 4)]).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workout_logs")
      .fetch_one(&pool)
      .await
      .expect("Failed to count workout logs");
    assert_eq!(count, 2);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_mock_factories_create_valid_data() {
    let profile = mock_profile();
    assert_eq!(profile.name, "Anna");
    assert_eq!(profile.level, FitnessLevel::Intermediate);

    let plan = mock_workout_plan();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].day, "Hétfő");

    let entry = workout_entry(day(2024, 6, 3), 18);
    assert_eq!(entry.logged_at.date_naive(), day(2024, 6, 3));
  }
}
