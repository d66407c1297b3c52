//! Gemini integration for plan generation and chat
//!
//! This module handles communication with the Gemini API for generating
//! workout plans, meal plans, quick workouts and motivational chat replies.
//! Structured answers are requested as JSON in the prompt and parsed
//! defensively.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::chat::{ChatMessage, MessageSender};
use crate::models::plan::{CaloricNeeds, MealPlan, QuickWorkout, WorkoutPlan};
use crate::models::profile::{DietaryProfile, FitnessLevel, UserProfile};

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Serialize)]
pub enum LlmError {
  #[error("API key not configured")]
  MissingApiKey,

  #[error("Request failed: {0}")]
  Request(String),

  #[error("API error: {0}")]
  Api(String),

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Gemini API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GeminiRequest {
  contents: Vec<Content>,
  #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
  system_instruction: Option<Content>,
  #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
  generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
  #[serde(skip_serializing_if = "Option::is_none")]
  role: Option<String>,
  parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
  text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
  #[serde(rename = "responseMimeType")]
  response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
  text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
  error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
  message: String,
}

/// ---------------------------------------------------------------------------
/// Gemini Client
/// ---------------------------------------------------------------------------

pub struct GeminiClient {
  client: Client,
  api_key: String,
  base_url: String,
}

impl GeminiClient {
  /// Create a new Gemini client, loading the API key from the environment
  pub fn from_env() -> Result<Self, LlmError> {
    let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| LlmError::MissingApiKey)?;

    Ok(Self {
      client: Client::new(),
      api_key,
      base_url: GEMINI_API_BASE.to_string(),
    })
  }

  #[cfg(test)]
  fn with_base_url(api_key: &str, base_url: &str) -> Self {
    Self {
      client: Client::new(),
      api_key: api_key.to_string(),
      base_url: base_url.to_string(),
    }
  }

  /// Low-level generateContent call, returns the concatenated candidate text
  async fn generate(&self, request: &GeminiRequest) -> Result<String, LlmError> {
    let url = format!("{}/models/{}:generateContent", self.base_url, GEMINI_MODEL);

    let response = self
      .client
      .post(&url)
      .header("x-goog-api-key", &self.api_key)
      .header("content-type", "application/json")
      .json(request)
      .send()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| LlmError::Request(e.to_string()))?;

    if !status.is_success() {
      // Try to parse error response
      if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
        return Err(LlmError::Api(error_resp.error.message));
      }
      return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
    }

    let gemini_response: GeminiResponse =
      serde_json::from_str(&body).map_err(|e| LlmError::Parse(e.to_string()))?;

    let text = gemini_response
      .candidates
      .first()
      .map(|candidate| {
        candidate
          .content
          .parts
          .iter()
          .filter_map(|part| part.text.as_deref())
          .collect::<Vec<_>>()
          .join("")
      })
      .filter(|text| !text.is_empty())
      .ok_or_else(|| LlmError::Parse("No text content in response".to_string()))?;

    Ok(text)
  }

  /// Single-turn completion with an optional system instruction
  async fn complete(
    &self,
    system_instruction: Option<&str>,
    prompt: &str,
    json_response: bool,
  ) -> Result<String, LlmError> {
    let request = GeminiRequest {
      contents: vec![Content {
        role: Some("user".to_string()),
        parts: vec![Part {
          text: prompt.to_string(),
        }],
      }],
      system_instruction: system_instruction.map(|text| Content {
        role: None,
        parts: vec![Part {
          text: text.to_string(),
        }],
      }),
      generation_config: json_response.then(|| GenerationConfig {
        response_mime_type: "application/json".to_string(),
      }),
    };

    self.generate(&request).await
  }

  /// Generate the 7-day workout plan the whole app is built around
  pub async fn generate_workout_plan(&self, profile: &UserProfile) -> Result<WorkoutPlan, LlmError> {
    let prompt = format!(
      r#"Generálj egy részletes, 7 napos edzéstervet egy felhasználó számára a következő adatok alapján:
- Név: {}
- Fittségi szint: {}
- Elsődleges cél: {}
- Rendelkezésre álló eszközök: {}
- Kor: {}, Nem: {}, Súly: {} kg, Magasság: {} cm

Az edzésterv tartalmazzon bemelegítést és nyújtást is, ahol releváns. Legyen benne legalább 1-2 pihenőnap.
A nyelv legyen magyar. A válasz kizárólag érvényes JSON legyen, magyarázó szöveg nélkül, pontosan ebben a formában:
[
  {{
    "day": "A hét napja (pl. Hétfő)",
    "title": "Az edzésnap címe (pl. Mell & Tricepsz)",
    "description": "Rövid leírás az edzésnapról.",
    "exercises": [
      {{"name": "A gyakorlat neve.", "sets": "3-4", "reps": "8-12 ismétlés", "instructions": "Rövid útmutató a helyes végrehajtáshoz."}}
    ]
  }}
]"#,
      profile.name,
      profile.level,
      profile.goal,
      profile.equipment,
      profile.age,
      profile.gender,
      profile.current_weight_kg,
      profile.height_cm,
    );

    let response_text = self.complete(None, &prompt, true).await?;
    let json_str = extract_json(&response_text)?;

    serde_json::from_str(&json_str).map_err(|e| LlmError::Parse(format!("{}: {}", e, json_str)))
  }

  /// Generate a short, intense 15-20 minute flash workout
  pub async fn generate_quick_workout(
    &self,
    profile: &UserProfile,
  ) -> Result<QuickWorkout, LlmError> {
    let prompt = format!(
      r#"Generálj egy rövid, 15-20 perces "villámedzést" egy felhasználó számára. Ennek az edzésnek gyorsnak, intenzívnek és hatékonynak kell lennie, minimális bemelegítést igényelve.
A felhasználó adatai:
- Fittségi szint: {}
- Elsődleges cél: {}
- Rendelkezésre álló eszközök: {}

Az edzés 3-4 gyakorlatból álljon, amelyek az egész testet megmozgatják, vagy a felhasználó fő céljára fókuszálnak. Az instrukciók legyenek világosak és tömörek.
Adj az edzésnek egy frappáns címet és egy rövid, motiváló leírást.
A nyelv legyen magyar. A válasz kizárólag érvényes JSON legyen, magyarázó szöveg nélkül, pontosan ebben a formában:
{{
  "title": "A villámedzés fantázianeve",
  "description": "Az edzés rövid, motiváló leírása.",
  "exercises": [
    {{"name": "A gyakorlat neve.", "sets": "3", "reps": "12 ismétlés", "instructions": "Rövid útmutató."}}
  ]
}}"#,
      profile.level, profile.goal, profile.equipment,
    );

    let response_text = self.complete(None, &prompt, true).await?;
    let json_str = extract_json(&response_text)?;

    serde_json::from_str(&json_str).map_err(|e| LlmError::Parse(format!("{}: {}", e, json_str)))
  }

  /// Daily caloric needs from the Mifflin-St Jeor equation
  pub async fn calculate_caloric_needs(
    &self,
    profile: &UserProfile,
  ) -> Result<CaloricNeeds, LlmError> {
    let prompt = format!(
      r#"Viselkedj mint egy táplálkozási tanácsadó kalkulátor. Számítsd ki egy felhasználó napi kalóriaszükségletét a Mifflin-St Jeor egyenlet alapján.
A felhasználó adatai:
- Kor: {} év
- Nem: {}
- Jelenlegi testsúly: {} kg
- Magasság: {} cm
- Aktivitási szint: {}
- Cél: {}
- Cél testsúly: {} kg

A számítás lépései:
1. Számítsd ki a BMR-t (Basal Metabolic Rate).
2. Számítsd ki a TDEE-t az aktivitási szint szorzójával (Sedentary: 1.2, Lightly active: 1.375, Moderately active: 1.55, Very active: 1.725, Extra active: 1.9). Ez lesz a "maintenance" (súlyfenntartó) kalória.
3. A cél alapján határozd meg a "target" kalóriát. Ha a cél a "Fogyás", a "target" legyen a "maintenance" - 500 kcal. Ha a cél "Izomépítés", a "target" legyen a "maintenance" + 300 kcal. Más célok esetén a "target" legyen egyenlő a "maintenance" értékkel. A target kalória ne legyen 1200 kcal alatt.

A válasz kizárólag érvényes JSON legyen, egész számokra kerekítve, magyarázat nélkül, pontosan ebben a formában:
{{"bmr": 0, "maintenance": 0, "target": 0}}"#,
      profile.age,
      profile.gender,
      profile.current_weight_kg,
      profile.height_cm,
      profile.activity_level,
      profile.goal,
      profile.target_weight_kg,
    );

    let response_text = self.complete(None, &prompt, true).await?;
    let json_str = extract_json(&response_text)?;

    serde_json::from_str(&json_str).map_err(|e| LlmError::Parse(format!("{}: {}", e, json_str)))
  }

  /// Generate a 7-day meal plan around a daily calorie target
  pub async fn generate_meal_plan(
    &self,
    profile: &UserProfile,
    dietary: &DietaryProfile,
    target_calories: f64,
  ) -> Result<MealPlan, LlmError> {
    let allergies = if dietary.allergies.trim().is_empty() {
      "Nincs megadva"
    } else {
      dietary.allergies.trim()
    };

    let prompt = format!(
      r#"Viselkedj mint egy profi táplálkozási szakértő. Generálj egy változatos, 7 napos étkezési tervet egy felhasználó számára a következő adatok alapján:
- Fittségi cél: {}
- Étrend típusa: {}
- Kerülendő ételek / Allergiák: {}
- Napi kalóriacél: Körülbelül {} kcal. A napi összesített kalóriának nagyon közel kell lennie ehhez az értékhez (+/- 50 kcal eltérés megengedett).

A terv legyen tápláló, kiegyensúlyozott (megfelelő makrotápanyag-aránnyal) és támogassa a felhasználó fitnesz céljait.
Minden napra javasolj reggelit, ebédet, vacsorát és valamilyen egészséges nassolnivalót.
Az ételek legyenek egyszerűen elkészíthetők, hétköznapi hozzávalókból. A leírás tartalmazza a főbb összetevőket.
Nagyon fontos: Minden egyes étkezéshez és a nap végösszegéhez is számold ki és add meg a becsült kalóriaértéket!
A nyelv legyen magyar. A válasz kizárólag érvényes JSON legyen, magyarázó szöveg nélkül, pontosan ebben a formában:
[
  {{
    "day": "A hét napja (pl. Hétfő)",
    "breakfast": {{"name": "A reggeli neve.", "description": "Rövid leírás hozzávalókkal.", "calories": 0}},
    "lunch": {{"name": "Az ebéd neve.", "description": "Rövid leírás hozzávalókkal.", "calories": 0}},
    "dinner": {{"name": "A vacsora neve.", "description": "Rövid leírás hozzávalókkal.", "calories": 0}},
    "snacks": {{"name": "A nassolnivalók neve.", "description": "Rövid leírás hozzávalókkal.", "calories": 0}},
    "daily_total_calories": 0
  }}
]"#,
      profile.goal, dietary.preference, allergies, target_calories,
    );

    let response_text = self.complete(None, &prompt, true).await?;
    let json_str = extract_json(&response_text)?;

    serde_json::from_str(&json_str).map_err(|e| LlmError::Parse(format!("{}: {}", e, json_str)))
  }

  /// One short, level-appropriate tip for an exercise, plain text
  pub async fn exercise_tip(
    &self,
    exercise_name: &str,
    level: FitnessLevel,
  ) -> Result<String, LlmError> {
    let prompt = format!(
      r#"Viselkedj mint egy tapasztalt személyi edző.
Adj egyetlen, rövid, de nagyon hasznos tippet a "{}" nevű gyakorlathoz.
A tipp legyen kifejezetten egy "{}" szintű felhasználó számára releváns.
Például egy kezdőnek a helyes formára, egy haladónak a teljesítményfokozásra fókuszálj.
A válaszod kizárólag a tipp szövege legyen, mindenféle bevezető vagy extra formázás nélkül. Legyen tömör és könnyen érthető. A nyelv legyen magyar."#,
      exercise_name, level,
    );

    let tip = self.complete(None, &prompt, false).await?;
    if tip.trim().is_empty() {
      return Err(LlmError::Parse("Empty tip in response".to_string()));
    }
    Ok(tip.trim().to_string())
  }

  /// Multi-turn chat reply over the stored conversation history
  pub async fn chat(
    &self,
    profile: &UserProfile,
    history: &[ChatMessage],
  ) -> Result<String, LlmError> {
    // Gemini requires the transcript to start with a user turn, so the
    // seeded welcome message is dropped from the replayed history
    let contents: Vec<Content> = history
      .iter()
      .skip_while(|message| message.sender == MessageSender::Bot)
      .map(|message| Content {
        role: Some(
          match message.sender {
            MessageSender::User => "user",
            MessageSender::Bot => "model",
          }
          .to_string(),
        ),
        parts: vec![Part {
          text: message.body.clone(),
        }],
      })
      .collect();

    if contents.is_empty() {
      return Err(LlmError::Request("Chat history has no user message".to_string()));
    }

    let request = GeminiRequest {
      contents,
      system_instruction: Some(Content {
        role: None,
        parts: vec![Part {
          text: chat_system_prompt(profile),
        }],
      }),
      generation_config: None,
    };

    self.generate(&request).await
  }
}

/// System instruction for the motivational chat persona
fn chat_system_prompt(profile: &UserProfile) -> String {
  include_str!("prompts/chat_system.txt")
    .replace("{name}", &profile.name)
    .replace("{goal}", &profile.goal.to_string())
    .replace("{level}", &profile.level.to_string())
    .trim()
    .to_string()
}

/// Extract JSON from a model response (handles markdown code blocks)
fn extract_json(text: &str) -> Result<String, LlmError> {
  // Try direct parse first; plans arrive as arrays, the rest as objects
  let trimmed = text.trim();
  if trimmed.starts_with('{') || trimmed.starts_with('[') {
    return Ok(trimmed.to_string());
  }

  // Look for JSON in code blocks
  if let Some(start) = text.find("```json") {
    let start = start + 7;
    if let Some(end) = text[start..].find("```") {
      return Ok(text[start..start + end].trim().to_string());
    }
  }

  // Look for plain code blocks
  if let Some(start) = text.find("```") {
    let start = start + 3;
    // Skip language identifier if present
    let content_start = text[start..]
      .find('\n')
      .map(|i| start + i + 1)
      .unwrap_or(start);
    if let Some(end) = text[content_start..].find("```") {
      return Ok(text[content_start..content_start + end].trim().to_string());
    }
  }

  // Last resort: outermost object or array
  if let Some(start) = text.find(['{', '[']) {
    let end = if text[start..].starts_with('[') {
      text.rfind(']')
    } else {
      text.rfind('}')
    };
    if let Some(end) = end {
      if end > start {
        return Ok(text[start..=end].to_string());
      }
    }
  }

  Err(LlmError::Parse("Could not extract JSON from response".to_string()))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
