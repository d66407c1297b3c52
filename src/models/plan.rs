use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
  pub name: String,
  /// e.g. "3-4"
  pub sets: String,
  /// Repetitions or duration, e.g. "8-12 ismétlés" or "30 mp"
  pub reps: String,
  pub instructions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyWorkout {
  /// Day of week label, e.g. "Hétfő"
  pub day: String,
  /// e.g. "Mell & Tricepsz"
  pub title: String,
  pub description: String,
  pub exercises: Vec<Exercise>,
}

pub type WorkoutPlan = Vec<DailyWorkout>;

/// Short 15-20 minute flash workout, generated on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickWorkout {
  pub title: String,
  pub description: String,
  pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
  pub name: String,
  pub description: String,
  pub calories: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMealPlan {
  pub day: String,
  pub breakfast: Meal,
  pub lunch: Meal,
  pub dinner: Meal,
  pub snacks: Meal,
  pub daily_total_calories: f64,
}

pub type MealPlan = Vec<DailyMealPlan>;

/// Daily caloric needs computed from the profile (Mifflin-St Jeor based).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaloricNeeds {
  pub bmr: f64,
  pub maintenance: f64,
  pub target: f64,
}
