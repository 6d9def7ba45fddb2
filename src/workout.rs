//! Workout generation strategies
//!
//! A strategy turns a duration and a focus area into an ordered list of
//! exercises from fixed templates. Block counts come from integer division,
//! so leftover minutes are dropped rather than redistributed, and blocks that
//! would last zero minutes are left out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::exercise::{Exercise, ExerciseCategory, StandardExercise};

/// Area a generated workout concentrates on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutFocus {
    Cardio,
    Strength,
    Mixed,
}

impl WorkoutFocus {
    pub const ALL: [WorkoutFocus; 3] = [WorkoutFocus::Cardio, WorkoutFocus::Strength, WorkoutFocus::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutFocus::Cardio => "CARDIO",
            WorkoutFocus::Strength => "STRENGTH",
            WorkoutFocus::Mixed => "MIXED",
        }
    }
}

impl fmt::Display for WorkoutFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutFocus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CARDIO" => Ok(WorkoutFocus::Cardio),
            "STRENGTH" => Ok(WorkoutFocus::Strength),
            "MIXED" => Ok(WorkoutFocus::Mixed),
            _ => Err(ValidationError::UnknownFocus {
                tag: s.trim().to_string(),
            }),
        }
    }
}

/// Pluggable workout generation algorithm
pub trait WorkoutStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Ordered exercises for roughly `duration_minutes` of training
    fn generate(&self, duration_minutes: u32, focus: WorkoutFocus) -> Vec<StandardExercise>;
}

/// Appends a template block unless it would last zero minutes
fn push_block(
    workout: &mut Vec<StandardExercise>,
    category: ExerciseCategory,
    name: &str,
    minutes: u32,
    intensity: u8,
) {
    if minutes > 0 {
        workout.push(StandardExercise::planned(category, name, minutes, intensity));
    }
}

/// Low intensity, longer blocks, bodyweight movements and stretching
#[derive(Debug, Clone, Copy, Default)]
pub struct BeginnerStrategy;

impl BeginnerStrategy {
    /// Longest single walk
    pub const MAX_WALK_MINUTES: u32 = 20;
    /// Stretch reserved at the end of a cardio session
    pub const MIN_STRETCH_MINUTES: u32 = 5;
}

impl WorkoutStrategy for BeginnerStrategy {
    fn name(&self) -> &'static str {
        "Beginner Friendly"
    }

    fn description(&self) -> &'static str {
        "Low-intensity workouts focusing on form and building base fitness. \
         Perfect for those new to exercise or returning after a break."
    }

    fn generate(&self, duration_minutes: u32, focus: WorkoutFocus) -> Vec<StandardExercise> {
        use ExerciseCategory::*;

        let mut workout = Vec::new();

        match focus {
            WorkoutFocus::Cardio => {
                let walk = duration_minutes
                    .saturating_sub(Self::MIN_STRETCH_MINUTES)
                    .min(Self::MAX_WALK_MINUTES);
                push_block(&mut workout, Cardio, "Walking", walk, 4);
                push_block(&mut workout, Flexibility, "Light Stretching", duration_minutes - walk, 3);
            }
            WorkoutFocus::Strength => {
                let per_exercise = duration_minutes / 4;
                push_block(&mut workout, Strength, "Bodyweight Squats", per_exercise, 4);
                push_block(&mut workout, Strength, "Wall Push-ups", per_exercise, 4);
                push_block(&mut workout, Strength, "Plank", per_exercise, 4);
                push_block(&mut workout, Flexibility, "Cool Down Stretch", per_exercise, 3);
            }
            WorkoutFocus::Mixed => {
                let cardio = duration_minutes / 2;
                push_block(&mut workout, Cardio, "Light Jogging", cardio, 4);
                push_block(&mut workout, Flexibility, "Full Body Stretch", duration_minutes - cardio, 3);
            }
        }

        workout
    }
}

/// High intensity intervals, circuits and compound lifts
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvancedStrategy;

impl AdvancedStrategy {
    pub const INTERVAL_MINUTES: u32 = 5;
    pub const CIRCUIT_MINUTES: u32 = 15;
}

impl WorkoutStrategy for AdvancedStrategy {
    fn name(&self) -> &'static str {
        "Advanced Performance"
    }

    fn description(&self) -> &'static str {
        "High-intensity workouts with complex movements and minimal rest. \
         Designed for experienced athletes seeking maximum performance gains."
    }

    fn generate(&self, duration_minutes: u32, focus: WorkoutFocus) -> Vec<StandardExercise> {
        use ExerciseCategory::*;

        let mut workout = Vec::new();

        match focus {
            WorkoutFocus::Cardio => {
                let intervals = duration_minutes / Self::INTERVAL_MINUTES;
                for _ in 0..intervals {
                    push_block(&mut workout, Cardio, "Sprint Intervals", Self::INTERVAL_MINUTES, 9);
                }
            }
            WorkoutFocus::Strength => {
                let per_exercise = duration_minutes / 5;
                for lift in ["Barbell Squats", "Deadlifts", "Bench Press", "Pull-ups", "Overhead Press"] {
                    push_block(&mut workout, Strength, lift, per_exercise, 8);
                }
            }
            WorkoutFocus::Mixed => {
                let rounds = duration_minutes / Self::CIRCUIT_MINUTES;
                for _ in 0..rounds {
                    push_block(&mut workout, Cardio, "Burpees", 3, 9);
                    push_block(&mut workout, Strength, "Weighted Squats", 4, 8);
                    push_block(&mut workout, Cardio, "Mountain Climbers", 3, 9);
                    push_block(&mut workout, Strength, "Push-ups", 3, 8);
                    push_block(&mut workout, Flexibility, "Dynamic Stretch", 2, 6);
                }
            }
        }

        workout
    }
}

/// Selectable strategy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyLevel {
    Beginner,
    Advanced,
}

impl StrategyLevel {
    pub fn strategy(&self) -> Box<dyn WorkoutStrategy> {
        match self {
            StrategyLevel::Beginner => Box::new(BeginnerStrategy),
            StrategyLevel::Advanced => Box::new(AdvancedStrategy),
        }
    }
}

impl FromStr for StrategyLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(StrategyLevel::Beginner),
            "advanced" => Ok(StrategyLevel::Advanced),
            _ => Err(ValidationError::UnknownLevel {
                tag: s.trim().to_string(),
            }),
        }
    }
}

/// A generated workout with its totals
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedWorkout {
    pub strategy: &'static str,
    pub focus: WorkoutFocus,
    pub requested_minutes: u32,
    pub exercises: Vec<StandardExercise>,
}

impl GeneratedWorkout {
    /// Minutes actually scheduled (may be below the request)
    pub fn scheduled_minutes(&self) -> u32 {
        self.exercises.iter().map(|e| e.duration()).sum()
    }

    pub fn estimated_calories(&self) -> f64 {
        self.exercises.iter().map(|e| e.calories()).sum()
    }
}

/// Run a strategy and collect its output with totals
pub fn generate_workout(
    strategy: &dyn WorkoutStrategy,
    duration_minutes: u32,
    focus: WorkoutFocus,
) -> GeneratedWorkout {
    let exercises = strategy.generate(duration_minutes, focus);

    tracing::debug!(
        strategy = strategy.name(),
        focus = %focus,
        requested = duration_minutes,
        exercises = exercises.len(),
        "Generated workout"
    );

    GeneratedWorkout {
        strategy: strategy.name(),
        focus,
        requested_minutes: duration_minutes,
        exercises,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_minutes(workout: &[StandardExercise]) -> u32 {
        workout.iter().map(|e| e.duration()).sum()
    }

    #[test]
    fn test_beginner_cardio_twenty_minutes() {
        let workout = BeginnerStrategy.generate(20, WorkoutFocus::Cardio);
        assert_eq!(workout.len(), 2);
        assert_eq!(workout[0].name(), "Walking");
        assert_eq!(workout[1].category(), ExerciseCategory::Flexibility);
        assert!(total_minutes(&workout) <= 20);
    }

    #[test]
    fn test_beginner_cardio_caps_walk() {
        let workout = BeginnerStrategy.generate(45, WorkoutFocus::Cardio);
        assert_eq!(workout[0].duration(), 20);
        assert_eq!(workout[1].duration(), 25);
        assert!(workout.iter().all(|e| (3..=4).contains(&e.intensity())));
    }

    #[test]
    fn test_beginner_strength_drops_remainder() {
        let workout = BeginnerStrategy.generate(30, WorkoutFocus::Strength);
        assert_eq!(workout.len(), 4);
        assert!(workout.iter().all(|e| e.duration() == 7));
        assert_eq!(total_minutes(&workout), 28);
    }

    #[test]
    fn test_beginner_strength_too_short_is_empty() {
        assert!(BeginnerStrategy.generate(3, WorkoutFocus::Strength).is_empty());
    }

    #[test]
    fn test_beginner_mixed_splits_evenly() {
        let workout = BeginnerStrategy.generate(31, WorkoutFocus::Mixed);
        assert_eq!(workout[0].duration(), 15);
        assert_eq!(workout[1].duration(), 16);
    }

    #[test]
    fn test_advanced_cardio_intervals() {
        let workout = AdvancedStrategy.generate(25, WorkoutFocus::Cardio);
        assert_eq!(workout.len(), 5);
        assert!(workout.iter().all(|e| e.name() == "Sprint Intervals" && e.intensity() == 9));

        assert_eq!(AdvancedStrategy.generate(29, WorkoutFocus::Cardio).len(), 5);
        assert!(AdvancedStrategy.generate(4, WorkoutFocus::Cardio).is_empty());
    }

    #[test]
    fn test_advanced_strength_compound_lifts() {
        let workout = AdvancedStrategy.generate(50, WorkoutFocus::Strength);
        assert_eq!(workout.len(), 5);
        assert!(workout.iter().all(|e| e.duration() == 10 && e.intensity() == 8));
    }

    #[test]
    fn test_advanced_mixed_circuits() {
        let workout = AdvancedStrategy.generate(40, WorkoutFocus::Mixed);
        assert_eq!(workout.len(), 10);
        assert_eq!(total_minutes(&workout), 30);
    }

    #[test]
    fn test_focus_and_level_parsing() {
        assert_eq!("cardio".parse::<WorkoutFocus>().unwrap(), WorkoutFocus::Cardio);
        assert!("yoga".parse::<WorkoutFocus>().is_err());
        assert_eq!("Advanced".parse::<StrategyLevel>().unwrap(), StrategyLevel::Advanced);
        assert_eq!(StrategyLevel::Beginner.strategy().name(), "Beginner Friendly");
    }

    #[test]
    fn test_generated_workout_totals() {
        let generated = generate_workout(&AdvancedStrategy, 25, WorkoutFocus::Cardio);
        assert_eq!(generated.strategy, "Advanced Performance");
        assert_eq!(generated.scheduled_minutes(), 25);
        assert!((generated.estimated_calories() - 5.0 * 8.0 * 5.0 * 1.8).abs() < 1e-9);
    }
}
