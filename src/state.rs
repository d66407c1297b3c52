//! Whole-state snapshot persistence
//!
//! The frontend restores a session from one `StateSnapshot` and every
//! mutation writes back through the per-domain save functions. Profile and
//! generated plans are stored as JSON columns; a parse failure surfaces as
//! an error and the caller decides whether to wipe and start fresh.

use serde::Serialize;
use sqlx::SqlitePool;

use crate::goals::{self, WorkoutGoal};
use crate::logs::{self, WaterLogEntry, WorkoutLogEntry};
use crate::models::{MealPlan, UserProfile, WorkoutPlan};
use crate::progress::{self, ProgressData};

/// Everything needed to restore a session, absent/empty on first run.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
  pub profile: Option<UserProfile>,
  pub workout_plan: Option<WorkoutPlan>,
  pub meal_plan: Option<MealPlan>,
  pub progress: ProgressData,
  pub workout_logs: Vec<WorkoutLogEntry>,
  pub water_logs: Vec<WaterLogEntry>,
  pub active_goal: Option<WorkoutGoal>,
}

pub async fn load_snapshot(pool: &SqlitePool) -> Result<StateSnapshot, String> {
  Ok(StateSnapshot {
    profile: load_profile(pool).await?,
    workout_plan: load_workout_plan(pool).await?,
    meal_plan: load_meal_plan(pool).await?,
    progress: progress::load_progress(pool).await?,
    workout_logs: logs::load_workout_logs(pool).await?,
    water_logs: logs::load_water_logs(pool).await?,
    active_goal: goals::load_active_goal(pool).await?,
  })
}

/// ---------------------------------------------------------------------------
/// Profile
/// ---------------------------------------------------------------------------

pub async fn load_profile(pool: &SqlitePool) -> Result<Option<UserProfile>, String> {
  let json: Option<String> =
    sqlx::query_scalar("SELECT profile_json FROM user_profile WHERE id = 1")
      .fetch_optional(pool)
      .await
      .map_err(|e| format!("Failed to load profile: {}", e))?;

  match json {
    Some(json) => serde_json::from_str(&json)
      .map(Some)
      .map_err(|e| format!("Failed to parse stored profile: {}", e)),
    None => Ok(None),
  }
}

pub async fn save_profile(pool: &SqlitePool, profile: &UserProfile) -> Result<(), String> {
  let json = serde_json::to_string(profile)
    .map_err(|e| format!("Failed to serialize profile: {}", e))?;

  sqlx::query(
    r#"
    INSERT INTO user_profile (id, profile_json)
    VALUES (1, ?1)
    ON CONFLICT(id) DO UPDATE SET profile_json = excluded.profile_json
    "#,
  )
  .bind(&json)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to save profile: {}", e))?;

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Generated Plans
/// ---------------------------------------------------------------------------

async fn load_plan_json(pool: &SqlitePool, kind: &str) -> Result<Option<String>, String> {
  sqlx::query_scalar("SELECT plan_json FROM plans WHERE kind = ?1")
    .bind(kind)
    .fetch_optional(pool)
    .await
    .map_err(|e| format!("Failed to load {} plan: {}", kind, e))
}

async fn save_plan_json(pool: &SqlitePool, kind: &str, json: &str) -> Result<(), String> {
  sqlx::query(
    r#"
    INSERT INTO plans (kind, plan_json, generated_at)
    VALUES (?1, ?2, CURRENT_TIMESTAMP)
    ON CONFLICT(kind) DO UPDATE SET
      plan_json = excluded.plan_json,
      generated_at = excluded.generated_at
    "#,
  )
  .bind(kind)
  .bind(json)
  .execute(pool)
  .await
  .map_err(|e| format!("Failed to save {} plan: {}", kind, e))?;

  Ok(())
}

pub async fn load_workout_plan(pool: &SqlitePool) -> Result<Option<WorkoutPlan>, String> {
  match load_plan_json(pool, "workout").await? {
    Some(json) => serde_json::from_str(&json)
      .map(Some)
      .map_err(|e| format!("Failed to parse stored workout plan: {}", e)),
    None => Ok(None),
  }
}

pub async fn save_workout_plan(pool: &SqlitePool, plan: &WorkoutPlan) -> Result<(), String> {
  let json = serde_json::to_string(plan)
    .map_err(|e| format!("Failed to serialize workout plan: {}", e))?;
  save_plan_json(pool, "workout", &json).await
}

pub async fn load_meal_plan(pool: &SqlitePool) -> Result<Option<MealPlan>, String> {
  match load_plan_json(pool, "meal").await? {
    Some(json) => serde_json::from_str(&json)
      .map(Some)
      .map_err(|e| format!("Failed to parse stored meal plan: {}", e)),
    None => Ok(None),
  }
}

pub async fn save_meal_plan(pool: &SqlitePool, plan: &MealPlan) -> Result<(), String> {
  let json = serde_json::to_string(plan)
    .map_err(|e| format!("Failed to serialize meal plan: {}", e))?;
  save_plan_json(pool, "meal", &json).await
}

/// ---------------------------------------------------------------------------
/// Resets
/// ---------------------------------------------------------------------------

/// Wipe logs, goal, progress, meal plan, chat and reminder state.
/// Runs when a new plan is generated; profile and workout plan survive only
/// because setup overwrites them right after.
pub async fn clear_user_data(pool: &SqlitePool) -> Result<(), String> {
  let statements = [
    "DELETE FROM workout_logs",
    "DELETE FROM water_logs",
    "DELETE FROM workout_goal",
    "DELETE FROM progress_data",
    "DELETE FROM chat_messages",
    "DELETE FROM reminder_state",
    "DELETE FROM plans WHERE kind = 'meal'",
  ];

  for statement in statements {
    sqlx::query(statement)
      .execute(pool)
      .await
      .map_err(|e| format!("Failed to reset state: {}", e))?;
  }

  Ok(())
}

/// Full reset: everything, including profile and generated plans.
pub async fn clear_all(pool: &SqlitePool) -> Result<(), String> {
  clear_user_data(pool).await?;

  for statement in ["DELETE FROM user_profile", "DELETE FROM plans"] {
    sqlx::query(statement)
      .execute(pool)
      .await
      .map_err(|e| format!("Failed to reset state: {}", e))?;
  }

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
