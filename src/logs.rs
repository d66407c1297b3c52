//! Workout and water logging
//!
//! Append-only workout completion log plus a per-calendar-day water intake
//! record. Multiple workout logs on the same day are allowed and all counted;
//! water keeps at most one row per day, with the amount clamped at zero.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

// ---------------------------------------------------------------------------
/// Log Entry Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkoutLogEntry {
    /// Instant of completion (the calendar day is derived from this)
    pub logged_at: DateTime<Utc>,
    /// Day-of-week label from the plan, e.g. "Hétfő"
    pub workout_day: String,
    /// e.g. "Mell & Tricepsz"
    pub workout_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WaterLogEntry {
    pub day: NaiveDate,
    pub amount_ml: i64,
}

// ---------------------------------------------------------------------------
/// Pure Helpers
// ---------------------------------------------------------------------------

/// Water amount after applying a signed delta, never below zero.
pub fn apply_water_delta(current: Option<i64>, delta: i64) -> i64 {
    (current.unwrap_or(0) + delta).max(0)
}

/// Distinct calendar days with at least one logged workout, ascending.
/// Drives the calendar view.
pub fn logged_dates(logs: &[WorkoutLogEntry]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = logs.iter().map(|log| log.logged_at.date_naive()).collect();
    dates.sort();
    dates.dedup();
    dates
}

/// Whether any workout was logged on the given calendar day.
pub fn has_log_on(logs: &[WorkoutLogEntry], day: NaiveDate) -> bool {
    logs.iter().any(|log| log.logged_at.date_naive() == day)
}

// ---------------------------------------------------------------------------
// Database Operations
// ---------------------------------------------------------------------------

/// Append a workout completion. Always succeeds, no dedup.
pub async fn append_workout_log(
    pool: &SqlitePool,
    day_label: &str,
    title: &str,
    now: DateTime<Utc>,
) -> Result<WorkoutLogEntry, String> {
    sqlx::query(
        "INSERT INTO workout_logs (logged_at, workout_day, workout_title) VALUES (?1, ?2, ?3)",
    )
    .bind(now)
    .bind(day_label)
    .bind(title)
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to append workout log: {}", e))?;

    Ok(WorkoutLogEntry {
        logged_at: now,
        workout_day: day_label.to_string(),
        workout_title: title.to_string(),
    })
}

/// All workout logs in insertion order.
pub async fn load_workout_logs(pool: &SqlitePool) -> Result<Vec<WorkoutLogEntry>, String> {
    sqlx::query_as::<_, WorkoutLogEntry>(
        "SELECT logged_at, workout_day, workout_title FROM workout_logs ORDER BY id",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| format!("Failed to load workout logs: {}", e))
}

/// Create or adjust the water record for `day` by `delta_ml` milliliters.
/// A negative delta can never push the amount below zero.
pub async fn upsert_water_log(
    pool: &SqlitePool,
    day: NaiveDate,
    delta_ml: i64,
) -> Result<WaterLogEntry, String> {
    let current: Option<i64> =
        sqlx::query_scalar("SELECT amount_ml FROM water_logs WHERE day = ?1")
            .bind(day)
            .fetch_optional(pool)
            .await
            .map_err(|e| format!("Failed to load water log: {}", e))?;

    let amount_ml = apply_water_delta(current, delta_ml);

    sqlx::query(
        r#"
        INSERT INTO water_logs (day, amount_ml)
        VALUES (?1, ?2)
        ON CONFLICT(day) DO UPDATE SET amount_ml = excluded.amount_ml
        "#,
    )
    .bind(day)
    .bind(amount_ml)
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to save water log: {}", e))?;

    Ok(WaterLogEntry { day, amount_ml })
}

/// All water records, oldest day first.
pub async fn load_water_logs(pool: &SqlitePool) -> Result<Vec<WaterLogEntry>, String> {
    sqlx::query_as::<_, WaterLogEntry>("SELECT day, amount_ml FROM water_logs ORDER BY day")
        .fetch_all(pool)
        .await
        .map_err(|e| format!("Failed to load water logs: {}", e))
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
