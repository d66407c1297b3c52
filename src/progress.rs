//! Streaks, totals and achievement bookkeeping
//!
//! Single mutation path for progress state: every workout completion flows
//! through `log_workout`, which appends the log entry, recomputes the streak,
//! bumps the total, evaluates achievement unlocks against the updated
//! snapshot and persists the result in one pass. Reads never mutate.
//!
//! Key principles:
//! - Streaks compare calendar days, not elapsed 24h windows
//! - A second log on the same day never double-increments
//! - The unlock decision is synchronous; when to show it is the frontend's call

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

use crate::achievements::{evaluate_unlocks, Achievement, AchievementId};
use crate::goals::{self, WorkoutGoal};
use crate::logs::{self, WorkoutLogEntry};

// ---------------------------------------------------------------------------
/// Progress Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub current_streak: i64,
    /// Never drops below `current_streak`
    pub longest_streak: i64,
    pub last_workout_date: Option<NaiveDate>,
    /// Insertion-ordered, duplicate-free; only grows until a full reset
    pub unlocked_achievements: Vec<AchievementId>,
    /// Count of workout logs since the last reset
    pub total_workouts: i64,
}

// ---------------------------------------------------------------------------
/// Streak Calculation
// ---------------------------------------------------------------------------

/// Streak value after logging a workout on `today`.
///
/// A log at 23:00 followed by one at 01:00 the next day counts as two
/// consecutive days; a gap of two or more days (or a recorded date in the
/// future) resets to 1.
pub fn compute_streak(progress: &ProgressData, today: NaiveDate) -> i64 {
    let yesterday = today.pred_opt();
    match progress.last_workout_date {
        Some(last) if Some(last) == yesterday => progress.current_streak + 1,
        Some(last) if last == today => progress.current_streak,
        Some(_) => 1,
        None => 1,
    }
}

// ---------------------------------------------------------------------------
/// Workout-Logged Transition
// ---------------------------------------------------------------------------

/// Apply one workout-completion event to the snapshot.
///
/// `logs` must already contain the entry for this event so that goal-based
/// unlock conditions see it. The returned unlock, if any, has already been
/// recorded in `unlocked_achievements`.
pub fn apply_workout_logged(
    progress: &mut ProgressData,
    logs: &[WorkoutLogEntry],
    goal: Option<&WorkoutGoal>,
    now: DateTime<Utc>,
) -> Option<Achievement> {
    let today = now.date_naive();

    progress.current_streak = compute_streak(progress, today);
    progress.longest_streak = progress.longest_streak.max(progress.current_streak);
    progress.last_workout_date = Some(today);
    progress.total_workouts += 1;

    let unlocked = evaluate_unlocks(progress, logs, goal);
    if let Some(achievement) = unlocked {
        progress.unlocked_achievements.push(achievement.id);
    }

    unlocked
}

/// Result of one logged workout, handed to the frontend in a single payload.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutLogResult {
    pub entry: WorkoutLogEntry,
    pub progress: ProgressData,
    /// At most one freshly unlocked achievement per logged workout
    pub unlocked: Option<Achievement>,
}

/// Record a workout completion: append the log, update the snapshot,
/// persist, and surface the optional unlock.
pub async fn log_workout(
    pool: &SqlitePool,
    day_label: &str,
    title: &str,
    now: DateTime<Utc>,
) -> Result<WorkoutLogResult, String> {
    let entry = logs::append_workout_log(pool, day_label, title, now).await?;
    let all_logs = logs::load_workout_logs(pool).await?;
    let goal = goals::load_active_goal(pool).await?;

    let mut progress = load_progress(pool).await?;
    let unlocked = apply_workout_logged(&mut progress, &all_logs, goal.as_ref(), now);
    save_progress(pool, &progress).await?;

    if let Some(achievement) = unlocked {
        tracing::info!(id = achievement.id.as_str(), "achievement unlocked");
    }

    Ok(WorkoutLogResult {
        entry,
        progress,
        unlocked,
    })
}

// ---------------------------------------------------------------------------
// Database Operations
// ---------------------------------------------------------------------------

/// Load the progress snapshot, zero-valued when nothing was saved yet.
pub async fn load_progress(pool: &SqlitePool) -> Result<ProgressData, String> {
    let row = sqlx::query(
        r#"
        SELECT current_streak, longest_streak, last_workout_date,
               total_workouts, unlocked_achievements
        FROM progress_data
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await
    .map_err(|e| format!("Failed to load progress: {}", e))?;

    match row {
        Some(row) => {
            let unlocked_json: String = row.get("unlocked_achievements");
            let unlocked_achievements: Vec<AchievementId> = serde_json::from_str(&unlocked_json)
                .map_err(|e| format!("Failed to parse unlocked achievements: {}", e))?;

            Ok(ProgressData {
                current_streak: row.get("current_streak"),
                longest_streak: row.get("longest_streak"),
                last_workout_date: row.get("last_workout_date"),
                unlocked_achievements,
                total_workouts: row.get("total_workouts"),
            })
        }
        None => Ok(ProgressData::default()),
    }
}

/// Persist the progress snapshot.
pub async fn save_progress(pool: &SqlitePool, progress: &ProgressData) -> Result<(), String> {
    let unlocked_json = serde_json::to_string(&progress.unlocked_achievements)
        .map_err(|e| format!("Failed to serialize unlocked achievements: {}", e))?;

    sqlx::query(
        r#"
        INSERT INTO progress_data
            (id, current_streak, longest_streak, last_workout_date, total_workouts, unlocked_achievements)
        VALUES (1, ?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(id) DO UPDATE SET
            current_streak = excluded.current_streak,
            longest_streak = excluded.longest_streak,
            last_workout_date = excluded.last_workout_date,
            total_workouts = excluded.total_workouts,
            unlocked_achievements = excluded.unlocked_achievements
        "#,
    )
    .bind(progress.current_streak)
    .bind(progress.longest_streak)
    .bind(progress.last_workout_date)
    .bind(progress.total_workouts)
    .bind(&unlocked_json)
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to save progress: {}", e))?;

    Ok(())
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::GoalPeriod;
    use crate::test_utils::{datetime_on, day, setup_test_db, teardown_test_db, workout_entry};
    use chrono::Duration;

    /// Drive the pure transition for one log on `on`, mirroring what
    /// `log_workout` does around it.
    fn log_on(
        progress: &mut ProgressData,
        logs: &mut Vec<WorkoutLogEntry>,
        on: NaiveDate,
    ) -> Option<Achievement> {
        let now = datetime_on(on, 18);
        logs.push(workout_entry(on, 18));
        apply_workout_logged(progress, logs, None, now)
    }

    #[test]
    fn test_first_workout_starts_streak_and_unlocks() {
        let mut progress = ProgressData::default();
        let mut logs = Vec::new();

        let unlocked = log_on(&mut progress, &mut logs, day(2024, 6, 3));

        assert_eq!(progress.current_streak, 1);
        assert_eq!(progress.longest_streak, 1);
        assert_eq!(progress.total_workouts, 1);
        assert_eq!(progress.last_workout_date, Some(day(2024, 6, 3)));
        assert_eq!(
            progress.unlocked_achievements,
            vec![AchievementId::FirstWorkout]
        );
        assert_eq!(unlocked.expect("Should unlock").id, AchievementId::FirstWorkout);
    }

    #[test]
    fn test_consecutive_days_build_streak() {
        let mut progress = ProgressData::default();
        let mut logs = Vec::new();
        let start = day(2024, 6, 3);

        for offset in 0..5 {
            log_on(&mut progress, &mut logs, start + Duration::days(offset));
        }

        assert_eq!(progress.current_streak, 5);
        assert_eq!(progress.total_workouts, 5);
    }

    #[test]
    fn test_seven_day_streak_unlocks_badge() {
        let mut progress = ProgressData::default();
        let mut logs = Vec::new();
        let start = day(2024, 6, 3);

        // Monday through Sunday, consecutive
        for offset in 0..7 {
            log_on(&mut progress, &mut logs, start + Duration::days(offset));
        }

        assert_eq!(progress.current_streak, 7);
        assert!(progress
            .unlocked_achievements
            .contains(&AchievementId::Streak7Days));
    }

    #[test]
    fn test_gap_resets_streak_to_one() {
        let mut progress = ProgressData::default();
        let mut logs = Vec::new();

        log_on(&mut progress, &mut logs, day(2024, 6, 3));
        log_on(&mut progress, &mut logs, day(2024, 6, 4));
        assert_eq!(progress.current_streak, 2);

        // Two-day gap
        log_on(&mut progress, &mut logs, day(2024, 6, 6));
        assert_eq!(progress.current_streak, 1);
        assert_eq!(progress.longest_streak, 2);
    }

    #[test]
    fn test_same_day_relog_does_not_advance_streak() {
        let mut progress = ProgressData::default();
        let mut logs = Vec::new();

        log_on(&mut progress, &mut logs, day(2024, 6, 3));
        log_on(&mut progress, &mut logs, day(2024, 6, 3));

        assert_eq!(progress.current_streak, 1);
        // Both logs still count toward the total
        assert_eq!(progress.total_workouts, 2);
    }

    #[test]
    fn test_late_night_then_early_morning_counts_as_consecutive() {
        let mut progress = ProgressData::default();

        // 23:00 on the 3rd, 01:00 on the 4th: under 24h apart but two days
        let mut logs = vec![workout_entry(day(2024, 6, 3), 23)];
        apply_workout_logged(&mut progress, &logs, None, datetime_on(day(2024, 6, 3), 23));

        logs.push(workout_entry(day(2024, 6, 4), 1));
        apply_workout_logged(&mut progress, &logs, None, datetime_on(day(2024, 6, 4), 1));

        assert_eq!(progress.current_streak, 2);
    }

    #[test]
    fn test_future_recorded_date_resets_streak() {
        let mut progress = ProgressData {
            current_streak: 4,
            longest_streak: 4,
            last_workout_date: Some(day(2024, 6, 10)),
            unlocked_achievements: vec![AchievementId::FirstWorkout],
            total_workouts: 4,
        };

        let logs = vec![workout_entry(day(2024, 6, 5), 9)];
        apply_workout_logged(&mut progress, &logs, None, datetime_on(day(2024, 6, 5), 9));

        assert_eq!(progress.current_streak, 1);
    }

    #[test]
    fn test_longest_streak_is_monotonic_and_bounds_current() {
        let mut progress = ProgressData::default();
        let mut logs = Vec::new();
        let mut longest_seen = 0;

        let days = [
            day(2024, 6, 3),
            day(2024, 6, 4),
            day(2024, 6, 5),
            day(2024, 6, 8),
            day(2024, 6, 9),
            day(2024, 6, 9),
            day(2024, 6, 12),
        ];

        for on in days {
            log_on(&mut progress, &mut logs, on);
            assert!(progress.longest_streak >= progress.current_streak);
            assert!(progress.longest_streak >= longest_seen);
            longest_seen = progress.longest_streak;
        }

        assert_eq!(progress.longest_streak, 3);
        assert_eq!(progress.total_workouts, days.len() as i64);
    }

    #[test]
    fn test_unlocked_set_never_shrinks_or_duplicates() {
        let mut progress = ProgressData::default();
        let mut logs = Vec::new();
        let start = day(2024, 6, 3);

        for offset in 0..10 {
            log_on(&mut progress, &mut logs, start + Duration::days(offset));
            let mut deduped = progress.unlocked_achievements.clone();
            deduped.dedup();
            assert_eq!(deduped, progress.unlocked_achievements);
        }

        assert_eq!(
            progress.unlocked_achievements,
            vec![AchievementId::FirstWorkout, AchievementId::Streak7Days]
        );
    }

    #[test]
    fn test_goal_completion_unlocks_goal_master() {
        let mut progress = ProgressData::default();
        let mut logs = Vec::new();
        let goal = WorkoutGoal {
            period: GoalPeriod::Weekly,
            target: 3,
            started_at: datetime_on(day(2024, 6, 3), 0),
        };

        // Two workouts inside the window: no goal unlock yet
        for on in [day(2024, 6, 3), day(2024, 6, 4)] {
            logs.push(workout_entry(on, 18));
            apply_workout_logged(&mut progress, &logs, Some(&goal), datetime_on(on, 18));
        }
        assert!(!progress
            .unlocked_achievements
            .contains(&AchievementId::GoalMaster));

        // Third workout completes the goal within [06-03, 06-10)
        logs.push(workout_entry(day(2024, 6, 5), 18));
        let unlocked = apply_workout_logged(
            &mut progress,
            &logs,
            Some(&goal),
            datetime_on(day(2024, 6, 5), 18),
        );

        assert_eq!(unlocked.expect("Should unlock").id, AchievementId::GoalMaster);
    }

    #[tokio::test]
    async fn test_log_workout_persists_snapshot() {
        let pool = setup_test_db().await;
        let now = datetime_on(day(2024, 6, 3), 18);

        let result = log_workout(&pool, "Hétfő", "Mell", now)
            .await
            .expect("Should log workout");

        assert_eq!(result.entry.workout_day, "Hétfő");
        assert_eq!(result.progress.current_streak, 1);
        assert_eq!(result.unlocked.expect("Should unlock").id, AchievementId::FirstWorkout);

        // Reload from the database to verify persistence
        let reloaded = load_progress(&pool).await.expect("Should reload");
        assert_eq!(reloaded, result.progress);
        assert_eq!(reloaded.total_workouts, 1);

        teardown_test_db(pool).await;
    }

    #[tokio::test]
    async fn test_log_workout_second_day_continues_streak() {
        let pool = setup_test_db().await;

        log_workout(&pool, "Hétfő", "Mell", datetime_on(day(2024, 6, 3), 18))
            .await
            .expect("Should log workout");
        let result = log_workout(&pool, "Kedd", "Hát", datetime_on(day(2024, 6, 4), 18))
            .await
            .expect("Should log workout");

        assert_eq!(result.progress.current_streak, 2);
        assert_eq!(result.progress.total_workouts, 2);
        assert!(result.unlocked.is_none());

        teardown_test_db(pool).await;
    }

    #[tokio::test]
    async fn test_load_progress_defaults_when_empty() {
        let pool = setup_test_db().await;

        let progress = load_progress(&pool).await.expect("Should load");
        assert_eq!(progress, ProgressData::default());

        teardown_test_db(pool).await;
    }

    #[tokio::test]
    async fn test_progress_save_load_roundtrip() {
        let pool = setup_test_db().await;

        let progress = ProgressData {
            current_streak: 3,
            longest_streak: 9,
            last_workout_date: Some(day(2024, 6, 3)),
            unlocked_achievements: vec![
                AchievementId::FirstWorkout,
                AchievementId::Streak7Days,
            ],
            total_workouts: 31,
        };

        save_progress(&pool, &progress).await.expect("Should save");
        let reloaded = load_progress(&pool).await.expect("Should reload");
        assert_eq!(reloaded, progress);

        teardown_test_db(pool).await;
    }
}
