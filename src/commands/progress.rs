//! Commands for workout/water logging, goals and the reminder signal

use chrono::{NaiveDate, Timelike, Utc};
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tauri::State;

use crate::db::AppState;
use crate::goals::{self, evaluate_goal, GoalPeriod, GoalProgress, WorkoutGoal};
use crate::logs::{self, WaterLogEntry};
use crate::progress::{self, ProgressData, WorkoutLogResult};

/// Hour of day (0-23) after which an unlogged day triggers a reminder
const REMINDER_HOUR: u32 = 20;

// ---------------------------------------------------------------------------
/// Logging
// ---------------------------------------------------------------------------

/// Record a completed workout and return the updated progress plus the
/// optional freshly unlocked achievement.
#[tauri::command]
pub async fn log_workout(
    state: State<'_, Arc<AppState>>,
    day_label: String,
    workout_title: String,
) -> Result<WorkoutLogResult, String> {
    progress::log_workout(&state.db, &day_label, &workout_title, Utc::now()).await
}

/// Adjust today's water intake by `delta_ml` (negative to undo), returning
/// the full per-day collection.
#[tauri::command]
pub async fn log_water(
    state: State<'_, Arc<AppState>>,
    delta_ml: i64,
) -> Result<Vec<WaterLogEntry>, String> {
    let today = Utc::now().date_naive();
    logs::upsert_water_log(&state.db, today, delta_ml).await?;
    logs::load_water_logs(&state.db).await
}

// ---------------------------------------------------------------------------
/// Goals
// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn set_goal(
    state: State<'_, Arc<AppState>>,
    period: GoalPeriod,
    target: i64,
) -> Result<WorkoutGoal, String> {
    if target <= 0 {
        return Err("Goal target must be a positive number".to_string());
    }

    let goal = WorkoutGoal {
        period,
        target,
        started_at: Utc::now(),
    };
    goals::save_goal(&state.db, &goal).await?;

    Ok(goal)
}

#[tauri::command]
pub async fn clear_goal(state: State<'_, Arc<AppState>>) -> Result<(), String> {
    goals::clear_goal(&state.db).await
}

/// Active goal together with its evaluation, `None` when no goal is set
#[derive(Debug, Clone, Serialize)]
pub struct GoalSummary {
    pub goal: WorkoutGoal,
    pub progress: GoalProgress,
}

#[tauri::command]
pub async fn get_goal_progress(
    state: State<'_, Arc<AppState>>,
) -> Result<Option<GoalSummary>, String> {
    let goal = match goals::load_active_goal(&state.db).await? {
        Some(goal) => goal,
        None => return Ok(None),
    };

    let all_logs = logs::load_workout_logs(&state.db).await?;
    let progress = evaluate_goal(&goal, &all_logs);

    Ok(Some(GoalSummary { goal, progress }))
}

// ---------------------------------------------------------------------------
/// Progress Queries
// ---------------------------------------------------------------------------

#[tauri::command]
pub async fn get_progress(state: State<'_, Arc<AppState>>) -> Result<ProgressData, String> {
    progress::load_progress(&state.db).await
}

/// Distinct days with at least one workout, for the calendar view
#[tauri::command]
pub async fn get_logged_dates(
    state: State<'_, Arc<AppState>>,
) -> Result<Vec<NaiveDate>, String> {
    let all_logs = logs::load_workout_logs(&state.db).await?;
    Ok(logs::logged_dates(&all_logs))
}

// ---------------------------------------------------------------------------
/// Reminder Signal
// ---------------------------------------------------------------------------

/// The scheduler lives outside the app; it polls this status and shows the
/// notification itself when `due` flips to true.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderStatus {
    pub due: bool,
    pub logged_today: bool,
    pub already_sent_today: bool,
}

fn reminder_due(hour: u32, logged_today: bool, already_sent_today: bool) -> bool {
    hour >= REMINDER_HOUR && !logged_today && !already_sent_today
}

#[tauri::command]
pub async fn get_reminder_status(
    state: State<'_, Arc<AppState>>,
) -> Result<ReminderStatus, String> {
    let now = Utc::now();
    let today = now.date_naive();

    let all_logs = logs::load_workout_logs(&state.db).await?;
    let logged_today = logs::has_log_on(&all_logs, today);
    let already_sent_today = last_reminder_date(&state.db).await? == Some(today);

    Ok(ReminderStatus {
        due: reminder_due(now.hour(), logged_today, already_sent_today),
        logged_today,
        already_sent_today,
    })
}

/// Record that today's reminder went out, so it is not repeated.
#[tauri::command]
pub async fn mark_reminder_sent(state: State<'_, Arc<AppState>>) -> Result<(), String> {
    let today = Utc::now().date_naive();

    sqlx::query(
        r#"
        INSERT INTO reminder_state (id, last_sent_date)
        VALUES (1, ?1)
        ON CONFLICT(id) DO UPDATE SET last_sent_date = excluded.last_sent_date
        "#,
    )
    .bind(today)
    .execute(&state.db)
    .await
    .map_err(|e| format!("Failed to record reminder: {}", e))?;

    Ok(())
}

async fn last_reminder_date(pool: &SqlitePool) -> Result<Option<NaiveDate>, String> {
    let row = sqlx::query("SELECT last_sent_date FROM reminder_state WHERE id = 1")
        .fetch_optional(pool)
        .await
        .map_err(|e| format!("Failed to load reminder state: {}", e))?;

    Ok(row.and_then(|row| row.get("last_sent_date")))
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::AchievementId;
    use crate::test_utils::*;
    use serial_test::serial;
    use tauri::Manager;

    #[test]
    fn test_reminder_due_only_after_reminder_hour() {
        assert!(!reminder_due(19, false, false));
        assert!(reminder_due(20, false, false));
        assert!(reminder_due(23, false, false));
    }

    #[test]
    fn test_reminder_suppressed_when_already_logged_or_sent() {
        assert!(!reminder_due(21, true, false));
        assert!(!reminder_due(21, false, true));
    }

    #[tokio::test]
    #[serial]
    async fn test_log_workout_command_returns_updated_progress() {
        let pool = setup_test_db().await;
        let state = Arc::new(AppState { db: pool.clone() });
        let app = tauri::test::mock_app();
        app.manage(state);

        let result = log_workout(app.state(), "Hétfő".to_string(), "Mell".to_string())
            .await
            .expect("Should log workout");

        assert_eq!(result.progress.current_streak, 1);
        assert_eq!(result.progress.total_workouts, 1);
        assert_eq!(
            result.unlocked.expect("Should unlock").id,
            AchievementId::FirstWorkout
        );

        teardown_test_db(pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_log_water_command_returns_full_collection() {
        let pool = setup_test_db().await;
        let state = Arc::new(AppState { db: pool.clone() });
        let app = tauri::test::mock_app();
        app.manage(state);

        log_water(app.state(), 250).await.expect("Should log water");
        let collection = log_water(app.state(), 250).await.expect("Should log water");

        assert_eq!(collection.len(), 1);
        assert_eq!(collection[0].amount_ml, 500);

        teardown_test_db(pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_set_goal_rejects_non_positive_target() {
        let pool = setup_test_db().await;
        let state = Arc::new(AppState { db: pool.clone() });
        let app = tauri::test::mock_app();
        app.manage(state);

        assert!(set_goal(app.state(), GoalPeriod::Weekly, 0).await.is_err());
        assert!(set_goal(app.state(), GoalPeriod::Weekly, -2).await.is_err());

        // Nothing was stored
        let summary = get_goal_progress(app.state()).await.expect("Should query");
        assert!(summary.is_none());

        teardown_test_db(pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_goal_progress_reflects_logged_workouts() {
        let pool = setup_test_db().await;
        let state = Arc::new(AppState { db: pool.clone() });
        let app = tauri::test::mock_app();
        app.manage(state);

        set_goal(app.state(), GoalPeriod::Weekly, 2)
            .await
            .expect("Should set goal");
        log_workout(app.state(), "Hétfő".to_string(), "Mell".to_string())
            .await
            .expect("Should log workout");

        let summary = get_goal_progress(app.state())
            .await
            .expect("Should query")
            .expect("Goal should be active");
        assert_eq!(summary.progress.completed_count, 1);
        assert!(!summary.progress.is_completed);

        clear_goal(app.state()).await.expect("Should clear goal");
        let summary = get_goal_progress(app.state()).await.expect("Should query");
        assert!(summary.is_none());

        teardown_test_db(pool).await;
    }

    #[tokio::test]
    #[serial]
    async fn test_reminder_not_repeated_after_marked_sent() {
        let pool = setup_test_db().await;
        let state = Arc::new(AppState { db: pool.clone() });
        let app = tauri::test::mock_app();
        app.manage(state);

        mark_reminder_sent(app.state()).await.expect("Should mark sent");

        let status = get_reminder_status(app.state()).await.expect("Should query");
        assert!(status.already_sent_today);
        assert!(!status.due);

        teardown_test_db(pool).await;
    }
}
