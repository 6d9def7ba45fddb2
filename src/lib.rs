// Library interface for FitTrack modules
// The binary and the integration tests both go through these exports

pub mod activity;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod enhancement;
pub mod error;
pub mod exercise;
pub mod export;
pub mod goals;
pub mod logging;
pub mod notify;
pub mod nutrition;
pub mod workout;

// Re-export commonly used types for convenience
pub use activity::{Activity, ActivityEvent, ActivityRegistry, ExerciseRecord};
pub use config::AppConfig;
pub use dashboard::DashboardSummary;
pub use database::{ActivityStore, Database, GoalStore};
pub use enhancement::{Enhance, EquipmentEnhancement, MusicEnhancement};
pub use error::{DatabaseError, FitTrackError, Result, ValidationError};
pub use exercise::{create_exercise, Exercise, ExerciseCategory, StandardExercise};
pub use export::{export_activities, ExportFormat};
pub use goals::{FitnessGoal, GoalEvent, GoalRegistry};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use notify::{ListenerId, ListenerList};
pub use nutrition::{create_default_nutrition_plan, create_nutrition_plan, NutritionPlan, PlanType};
pub use workout::{
    generate_workout, AdvancedStrategy, BeginnerStrategy, GeneratedWorkout, StrategyLevel,
    WorkoutFocus, WorkoutStrategy,
};
