//! Weekly and monthly workout-count goals
//!
//! One goal may be active at a time; setting a new goal replaces the old one
//! wholesale. Evaluation is read-only and counts workout logs inside the
//! goal's half-open window.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

use crate::logs::WorkoutLogEntry;

// ---------------------------------------------------------------------------
/// Goal Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPeriod {
    Weekly,
    Monthly,
}

impl std::fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for GoalPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(format!("Unknown goal period: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutGoal {
    pub period: GoalPeriod,
    /// Number of workouts to complete, always positive
    pub target: i64,
    pub started_at: DateTime<Utc>,
}

impl WorkoutGoal {
    /// Exclusive end of the window workouts count in.
    ///
    /// Monthly goals advance the month field; the day of month is clamped on
    /// shorter months (Jan 31 -> Feb 29 in a leap year).
    pub fn window_end(&self) -> DateTime<Utc> {
        match self.period {
            GoalPeriod::Weekly => self.started_at + Duration::days(7),
            GoalPeriod::Monthly => self
                .started_at
                .checked_add_months(Months::new(1))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

// ---------------------------------------------------------------------------
/// Goal Evaluation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    pub completed_count: i64,
    /// Completion percentage, capped at 100
    pub percentage: f64,
    pub is_completed: bool,
}

/// Count workouts inside `[started_at, window_end)` against the target.
pub fn evaluate_goal(goal: &WorkoutGoal, logs: &[WorkoutLogEntry]) -> GoalProgress {
    let window_end = goal.window_end();
    let completed_count = logs
        .iter()
        .filter(|log| log.logged_at >= goal.started_at && log.logged_at < window_end)
        .count() as i64;

    let percentage = ((completed_count as f64 / goal.target as f64) * 100.0).min(100.0);

    GoalProgress {
        completed_count,
        percentage,
        is_completed: completed_count >= goal.target,
    }
}

// ---------------------------------------------------------------------------
// Database Operations
// ---------------------------------------------------------------------------

/// Load the active goal, if one is set.
pub async fn load_active_goal(pool: &SqlitePool) -> Result<Option<WorkoutGoal>, String> {
    let row = sqlx::query("SELECT period, target, started_at FROM workout_goal WHERE id = 1")
        .fetch_optional(pool)
        .await
        .map_err(|e| format!("Failed to load goal: {}", e))?;

    match row {
        Some(row) => {
            let period_str: String = row.get("period");
            let period: GoalPeriod = period_str.parse()?;
            Ok(Some(WorkoutGoal {
                period,
                target: row.get("target"),
                started_at: row.get("started_at"),
            }))
        }
        None => Ok(None),
    }
}

/// Replace the active goal.
pub async fn save_goal(pool: &SqlitePool, goal: &WorkoutGoal) -> Result<(), String> {
    sqlx::query(
        r#"
        INSERT INTO workout_goal (id, period, target, started_at)
        VALUES (1, ?1, ?2, ?3)
        ON CONFLICT(id) DO UPDATE SET
            period = excluded.period,
            target = excluded.target,
            started_at = excluded.started_at
        "#,
    )
    .bind(goal.period.to_string())
    .bind(goal.target)
    .bind(goal.started_at)
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to save goal: {}", e))?;

    Ok(())
}

/// Remove the active goal.
pub async fn clear_goal(pool: &SqlitePool) -> Result<(), String> {
    sqlx::query("DELETE FROM workout_goal")
        .execute(pool)
        .await
        .map_err(|e| format!("Failed to clear goal: {}", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
