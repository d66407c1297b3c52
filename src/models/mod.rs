pub mod chat;
pub mod plan;
pub mod profile;

pub use chat::{ChatMessage, MessageSender};
pub use plan::{CaloricNeeds, MealPlan, QuickWorkout, WorkoutPlan};
pub use profile::{DietaryProfile, UserProfile};
