pub mod chat;
pub mod plan;
pub mod progress;
pub mod setup;

use crate::db::AppState;
use crate::logs::{self, WaterLogEntry, WorkoutLogEntry};
use crate::state::{self, StateSnapshot};
use std::sync::Arc;
use tauri::State;

/// Full session snapshot for frontend bootstrap
#[tauri::command]
pub async fn get_state(
  state: State<'_, Arc<AppState>>,
) -> Result<StateSnapshot, String> {
  state::load_snapshot(&state.db).await
}

#[tauri::command]
pub async fn get_workout_logs(
  state: State<'_, Arc<AppState>>,
) -> Result<Vec<WorkoutLogEntry>, String> {
  logs::load_workout_logs(&state.db).await
}

#[tauri::command]
pub async fn get_water_logs(
  state: State<'_, Arc<AppState>>,
) -> Result<Vec<WaterLogEntry>, String> {
  logs::load_water_logs(&state.db).await
}
