use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
  Beginner,
  Intermediate,
  Advanced,
}

impl std::fmt::Display for FitnessLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Self::Beginner => "Kezdő",
      Self::Intermediate => "Középhaladó",
      Self::Advanced => "Haladó",
    };
    write!(f, "{}", label)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingGoal {
  WeightLoss,
  MuscleGain,
  Endurance,
  GeneralFitness,
}

impl std::fmt::Display for TrainingGoal {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Self::WeightLoss => "Fogyás",
      Self::MuscleGain => "Izomépítés",
      Self::Endurance => "Állóképesség javítása",
      Self::GeneralFitness => "Általános fittség",
    };
    write!(f, "{}", label)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
  Bodyweight,
  Dumbbells,
  FullGym,
}

impl std::fmt::Display for Equipment {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Self::Bodyweight => "Saját testsúly",
      Self::Dumbbells => "Kézisúlyzók",
      Self::FullGym => "Teljes edzőterem",
    };
    write!(f, "{}", label)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
  Male,
  Female,
}

impl std::fmt::Display for Gender {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Self::Male => "Férfi",
      Self::Female => "Nő",
    };
    write!(f, "{}", label)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
  Sedentary,
  LightlyActive,
  ModeratelyActive,
  VeryActive,
  ExtraActive,
}

impl std::fmt::Display for ActivityLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Self::Sedentary => "Ülőmunka (kevés vagy semmi testmozgás)",
      Self::LightlyActive => "Enyhén aktív (könnyű testmozgás/sport heti 1-3 nap)",
      Self::ModeratelyActive => "Mérsékelten aktív (mérsékelt testmozgás/sport heti 3-5 nap)",
      Self::VeryActive => "Nagyon aktív (nehéz testmozgás/sport heti 6-7 nap)",
      Self::ExtraActive => "Extra aktív (nagyon nehéz testmozgás/sport és fizikai munka)",
    };
    write!(f, "{}", label)
  }
}

/// Profile collected during setup, drives every plan generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
  pub name: String,
  pub level: FitnessLevel,
  pub goal: TrainingGoal,
  pub equipment: Equipment,
  pub age: i64,
  pub gender: Gender,
  pub height_cm: f64,
  pub current_weight_kg: f64,
  pub target_weight_kg: f64,
  pub activity_level: ActivityLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
  Omnivore,
  Vegetarian,
  Vegan,
}

impl std::fmt::Display for DietaryPreference {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      Self::Omnivore => "Mindenevő",
      Self::Vegetarian => "Vegetáriánus",
      Self::Vegan => "Vegán",
    };
    write!(f, "{}", label)
  }
}

/// Dietary constraints passed to meal plan generation, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietaryProfile {
  pub preference: DietaryPreference,
  /// Comma-separated list or free text, empty when nothing to avoid
  pub allergies: String,
}
