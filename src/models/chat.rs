use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSender {
  User,
  Bot,
}

impl MessageSender {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::User => "user",
      Self::Bot => "bot",
    }
  }
}

impl std::str::FromStr for MessageSender {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "user" => Ok(Self::User),
      "bot" => Ok(Self::Bot),
      _ => Err(format!("Unknown message sender: {}", s)),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
  pub sender: MessageSender,
  pub body: String,
}
