//! Achievement catalog and unlock evaluation
//!
//! The catalog is fixed at five entries and its order is the evaluation
//! order: per workout-log event at most one new unlock is surfaced, the
//! first entry (in catalog order) that is not yet unlocked and whose
//! condition holds against the already-updated progress snapshot. Unlocks
//! are never revoked outside a full reset.

use serde::{Deserialize, Serialize};

use crate::goals::{evaluate_goal, WorkoutGoal};
use crate::logs::WorkoutLogEntry;
use crate::progress::ProgressData;

// ---------------------------------------------------------------------------
/// Achievement Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementId {
    #[serde(rename = "FIRST_WORKOUT")]
    FirstWorkout,
    #[serde(rename = "STREAK_7_DAYS")]
    Streak7Days,
    #[serde(rename = "WORKOUT_25")]
    Workout25,
    #[serde(rename = "WORKOUT_100")]
    Workout100,
    #[serde(rename = "GOAL_MASTER")]
    GoalMaster,
}

impl AchievementId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstWorkout => "FIRST_WORKOUT",
            Self::Streak7Days => "STREAK_7_DAYS",
            Self::Workout25 => "WORKOUT_25",
            Self::Workout100 => "WORKOUT_100",
            Self::GoalMaster => "GOAL_MASTER",
        }
    }
}

/// Static catalog entry. Only the unlocked id set is persisted, never the
/// catalog itself.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Catalog order doubles as unlock evaluation order.
pub const ALL_ACHIEVEMENTS: [Achievement; 5] = [
    Achievement {
        id: AchievementId::FirstWorkout,
        name: "Első lépések",
        description: "Teljesítsd az első edzésedet!",
        icon: "🚀",
    },
    Achievement {
        id: AchievementId::Streak7Days,
        name: "Kitartás Királya",
        description: "Tarts fenn egy 7 napos edzési sorozatot!",
        icon: "🔥",
    },
    Achievement {
        id: AchievementId::Workout25,
        name: "Vasember",
        description: "Teljesíts 25 edzést!",
        icon: "🏋️",
    },
    Achievement {
        id: AchievementId::Workout100,
        name: "Fitnesz Legenda",
        description: "Teljesíts 100 edzést!",
        icon: "🏆",
    },
    Achievement {
        id: AchievementId::GoalMaster,
        name: "Cél Mester",
        description: "Teljesíts egy heti vagy havi célt!",
        icon: "🎯",
    },
];

// ---------------------------------------------------------------------------
/// Unlock Evaluation
// ---------------------------------------------------------------------------

fn condition_met(
    id: AchievementId,
    progress: &ProgressData,
    logs: &[WorkoutLogEntry],
    goal: Option<&WorkoutGoal>,
) -> bool {
    match id {
        AchievementId::FirstWorkout => progress.total_workouts >= 1,
        AchievementId::Streak7Days => progress.current_streak >= 7,
        AchievementId::Workout25 => progress.total_workouts >= 25,
        AchievementId::Workout100 => progress.total_workouts >= 100,
        AchievementId::GoalMaster => goal.is_some_and(|g| evaluate_goal(g, logs).is_completed),
    }
}

/// First not-yet-unlocked catalog entry whose condition holds.
///
/// `progress` and `logs` must already reflect the triggering event: totals
/// and streak bumped, the new log entry appended. Returns at most one entry
/// per call even when several conditions became true at once.
pub fn evaluate_unlocks(
    progress: &ProgressData,
    logs: &[WorkoutLogEntry],
    goal: Option<&WorkoutGoal>,
) -> Option<Achievement> {
    ALL_ACHIEVEMENTS.iter().copied().find(|achievement| {
        !progress.unlocked_achievements.contains(&achievement.id)
            && condition_met(achievement.id, progress, logs, goal)
    })
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
