use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use tauri::Manager;

pub type DbPool = SqlitePool;

const DB_FILE: &str = "fitbot.db";

/// Application state holding the database connection pool
pub struct AppState {
  pub db: DbPool,
}

/// Open (or create) the SQLite database in the per-user app data dir and
/// bring the schema up to date.
pub async fn initialize_db<R: tauri::Runtime>(
  app: &tauri::AppHandle<R>,
) -> Result<DbPool, Box<dyn std::error::Error>> {
  let data_dir = app
    .path()
    .app_data_dir()
    .map_err(|e| format!("Failed to get app data dir: {}", e))?;
  fs::create_dir_all(&data_dir)?;

  let db_path = data_dir.join(DB_FILE);
  tracing::info!("Initializing database at: {}", db_path.display());

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&format!("sqlite://{}?mode=rwc", db_path.display()))
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;
  tracing::info!("Database ready");

  Ok(pool)
}
