//! Motivational chat commands backed by the Gemini conversation call

use std::sync::Arc;
use tauri::State;

use crate::db::AppState;
use crate::llm::GeminiClient;
use crate::models::chat::{ChatMessage, MessageSender};
use crate::state;

/// Shown instead of an error when the model call fails mid-conversation
const FALLBACK_REPLY: &str = "Bocsi, valami hiba történt. Próbáld újra később.";

pub async fn insert_chat_message(
  pool: &sqlx::SqlitePool,
  sender: MessageSender,
  body: &str,
) -> Result<(), String> {
  sqlx::query("INSERT INTO chat_messages (sender, body) VALUES (?1, ?2)")
    .bind(sender.as_str())
    .bind(body)
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to store chat message: {}", e))?;

  Ok(())
}

async fn load_chat_messages(pool: &sqlx::SqlitePool) -> Result<Vec<ChatMessage>, String> {
  let rows: Vec<(String, String)> =
    sqlx::query_as("SELECT sender, body FROM chat_messages ORDER BY id")
      .fetch_all(pool)
      .await
      .map_err(|e| format!("Failed to load chat messages: {}", e))?;

  rows
    .into_iter()
    .map(|(sender, body)| Ok(ChatMessage { sender: sender.parse()?, body }))
    .collect()
}

#[tauri::command]
pub async fn get_chat_messages(
  state: State<'_, Arc<AppState>>,
) -> Result<Vec<ChatMessage>, String> {
  load_chat_messages(&state.db).await
}

/// Store the user's message, ask the model for a reply over the full
/// history, store and return the bot's turn. A failed model call degrades
/// into a stored apology so the conversation never errors out.
#[tauri::command]
pub async fn send_chat_message(
  state: State<'_, Arc<AppState>>,
  message: String,
) -> Result<ChatMessage, String> {
  let profile = state::load_profile(&state.db)
    .await?
    .ok_or_else(|| "No profile configured yet".to_string())?;
  let client = GeminiClient::from_env().map_err(|e| e.to_string())?;

  insert_chat_message(&state.db, MessageSender::User, &message).await?;
  let history = load_chat_messages(&state.db).await?;

  let body = match client.chat(&profile, &history).await {
    Ok(reply) => reply,
    Err(e) => {
      tracing::error!("chat completion failed: {}", e);
      FALLBACK_REPLY.to_string()
    }
  };

  insert_chat_message(&state.db, MessageSender::Bot, &body).await?;

  Ok(ChatMessage {
    sender: MessageSender::Bot,
    body,
  })
}
