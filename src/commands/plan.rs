//! On-demand plan generation commands (quick workout, nutrition)

use std::sync::Arc;
use tauri::State;

use crate::db::AppState;
use crate::llm::GeminiClient;
use crate::models::plan::{CaloricNeeds, MealPlan, QuickWorkout};
use crate::models::profile::{DietaryProfile, UserProfile};
use crate::state;

async fn require_profile(state: &AppState) -> Result<UserProfile, String> {
  state::load_profile(&state.db)
    .await?
    .ok_or_else(|| "No profile configured yet".to_string())
}

/// Generate a 15-20 minute flash workout for the current profile.
/// Not persisted; regenerating is the intended flow.
#[tauri::command]
pub async fn generate_quick_workout(
  state: State<'_, Arc<AppState>>,
) -> Result<QuickWorkout, String> {
  let profile = require_profile(&state).await?;
  let client = GeminiClient::from_env().map_err(|e| e.to_string())?;

  client
    .generate_quick_workout(&profile)
    .await
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn calculate_caloric_needs(
  state: State<'_, Arc<AppState>>,
) -> Result<CaloricNeeds, String> {
  let profile = require_profile(&state).await?;
  let client = GeminiClient::from_env().map_err(|e| e.to_string())?;

  client
    .calculate_caloric_needs(&profile)
    .await
    .map_err(|e| e.to_string())
}

/// Generate and persist a 7-day meal plan around the calorie target.
#[tauri::command]
pub async fn generate_meal_plan(
  state: State<'_, Arc<AppState>>,
  dietary: DietaryProfile,
  target_calories: f64,
) -> Result<MealPlan, String> {
  let profile = require_profile(&state).await?;
  let client = GeminiClient::from_env().map_err(|e| e.to_string())?;

  let plan = client
    .generate_meal_plan(&profile, &dietary, target_calories)
    .await
    .map_err(|e| e.to_string())?;

  state::save_meal_plan(&state.db, &plan).await?;

  Ok(plan)
}

#[tauri::command]
pub async fn get_exercise_tip(
  state: State<'_, Arc<AppState>>,
  exercise_name: String,
) -> Result<String, String> {
  let profile = require_profile(&state).await?;
  let client = GeminiClient::from_env().map_err(|e| e.to_string())?;

  client
    .exercise_tip(&exercise_name, profile.level)
    .await
    .map_err(|e| e.to_string())
}
