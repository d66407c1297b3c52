mod achievements;
mod commands;
mod db;
mod goals;
mod llm;
mod logs;
mod models;
mod progress;
mod state;
#[cfg(test)]
mod test_utils;

use db::AppState;
use std::sync::Arc;
use tauri::Manager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  tauri::Builder::default()
    .plugin(tauri_plugin_opener::init())
    .setup(|app| {
      // Initialize database
      let app_handle = app.handle().clone();
      tauri::async_runtime::block_on(async move {
        match db::initialize_db(&app_handle).await {
          Ok(pool) => {
            let state = Arc::new(AppState { db: pool });
            app_handle.manage(state);
          }
          Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
          }
        }
      });
      Ok(())
    })
    .invoke_handler(tauri::generate_handler![
      commands::get_state,
      commands::get_workout_logs,
      commands::get_water_logs,
      // Setup & reset
      commands::setup::complete_setup,
      commands::setup::reset_app,
      // Progress & gamification
      commands::progress::log_workout,
      commands::progress::log_water,
      commands::progress::set_goal,
      commands::progress::clear_goal,
      commands::progress::get_progress,
      commands::progress::get_goal_progress,
      commands::progress::get_logged_dates,
      commands::progress::get_reminder_status,
      commands::progress::mark_reminder_sent,
      // Plan generation
      commands::plan::generate_quick_workout,
      commands::plan::calculate_caloric_needs,
      commands::plan::generate_meal_plan,
      commands::plan::get_exercise_tip,
      // Chat
      commands::chat::get_chat_messages,
      commands::chat::send_chat_message,
    ])
    .run(tauri::generate_context!())
    .expect("error while running tauri application");
}
