//! Setup and reset commands
//!
//! Generating a new plan wipes all user data first; a failed generation
//! leaves existing state untouched because nothing is cleared until the
//! plan has arrived.

use std::sync::Arc;
use tauri::State;

use crate::commands::chat::insert_chat_message;
use crate::db::AppState;
use crate::llm::GeminiClient;
use crate::models::chat::MessageSender;
use crate::models::plan::WorkoutPlan;
use crate::models::profile::UserProfile;
use crate::state;

#[tauri::command]
pub async fn complete_setup(
  state: State<'_, Arc<AppState>>,
  profile: UserProfile,
) -> Result<WorkoutPlan, String> {
  let client = GeminiClient::from_env().map_err(|e| e.to_string())?;
  let plan = client
    .generate_workout_plan(&profile)
    .await
    .map_err(|e| e.to_string())?;

  state::clear_user_data(&state.db).await?;
  state::save_profile(&state.db, &profile).await?;
  state::save_workout_plan(&state.db, &plan).await?;

  // Seed the chat so it opens with the bot introducing itself
  let welcome = format!(
    "Szia {}! Én FitBot vagyok, a személyi motivációs partnered. Elkészítettem neked egy edzéstervet. Ha bármi kérdésed van, vagy csak egy kis bátorításra van szükséged, szólj bátran!",
    profile.name
  );
  insert_chat_message(&state.db, MessageSender::Bot, &welcome).await?;

  tracing::info!(user = %profile.name, "new workout plan generated");

  Ok(plan)
}

/// Full reset: profile, plans and all logged progress
#[tauri::command]
pub async fn reset_app(state: State<'_, Arc<AppState>>) -> Result<(), String> {
  state::clear_all(&state.db).await?;
  tracing::info!("application state reset");
  Ok(())
}
