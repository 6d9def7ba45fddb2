//! Exercise model and creation
//!
//! Every exercise, plain or wrapped, is seen through the [`Exercise`] trait.
//! [`StandardExercise`] is the only concrete base type: its calorie rate is
//! chosen by its [`ExerciseCategory`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Intensity used when none is given (the calibration point of the calorie formula)
pub const DEFAULT_INTENSITY: u8 = 5;
pub const MIN_INTENSITY: u8 = 1;
pub const MAX_INTENSITY: u8 = 10;

/// Exercise categories with their own calorie burn rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExerciseCategory {
    Cardio,
    Strength,
    Flexibility,
}

impl ExerciseCategory {
    /// All categories, in the order offered to users
    pub const ALL: [ExerciseCategory; 3] = [
        ExerciseCategory::Cardio,
        ExerciseCategory::Strength,
        ExerciseCategory::Flexibility,
    ];

    /// Calories burned per minute at intensity 5
    pub fn base_calories_per_minute(&self) -> f64 {
        match self {
            ExerciseCategory::Cardio => 8.0,
            ExerciseCategory::Strength => 6.0,
            ExerciseCategory::Flexibility => 3.5,
        }
    }

    /// Canonical upper-case tag, as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Cardio => "CARDIO",
            ExerciseCategory::Strength => "STRENGTH",
            ExerciseCategory::Flexibility => "FLEXIBILITY",
        }
    }

    /// What kind of movement belongs in this category
    pub fn summary(&self) -> &'static str {
        match self {
            ExerciseCategory::Cardio => {
                "Cardiovascular exercises that increase heart rate (running, cycling, swimming)"
            }
            ExerciseCategory::Strength => {
                "Resistance training for building muscle strength (weight lifting, bodyweight exercises)"
            }
            ExerciseCategory::Flexibility => {
                "Exercises that improve flexibility and range of motion (yoga, stretching, pilates)"
            }
        }
    }
}

impl fmt::Display for ExerciseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        match tag.to_uppercase().as_str() {
            "CARDIO" => Ok(ExerciseCategory::Cardio),
            "STRENGTH" => Ok(ExerciseCategory::Strength),
            "FLEXIBILITY" => Ok(ExerciseCategory::Flexibility),
            _ => Err(ValidationError::UnknownCategory {
                tag: tag.to_string(),
            }),
        }
    }
}

/// Read interface shared by plain exercises and every enhancement layer
pub trait Exercise: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Duration in minutes
    fn duration(&self) -> u32;

    /// Intensity on a 1-10 scale
    fn intensity(&self) -> u8;

    fn category(&self) -> ExerciseCategory;

    /// Estimated calories burned
    fn calories(&self) -> f64;

    /// Human-readable description, extended by each enhancement layer
    fn description(&self) -> String;
}

impl<E: Exercise + ?Sized> Exercise for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn duration(&self) -> u32 {
        (**self).duration()
    }

    fn intensity(&self) -> u8 {
        (**self).intensity()
    }

    fn category(&self) -> ExerciseCategory {
        (**self).category()
    }

    fn calories(&self) -> f64 {
        (**self).calories()
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

/// A single exercise performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardExercise {
    name: String,
    duration_minutes: u32,
    intensity: u8,
    category: ExerciseCategory,
}

impl StandardExercise {
    /// Create an exercise at the default intensity
    pub fn new(
        category: ExerciseCategory,
        name: impl Into<String>,
        duration_minutes: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if duration_minutes == 0 {
            return Err(ValidationError::NonPositiveDuration {
                minutes: duration_minutes,
            });
        }

        Ok(Self {
            name,
            duration_minutes,
            intensity: DEFAULT_INTENSITY,
            category,
        })
    }

    /// Template exercise used by workout strategies; inputs are known-valid constants
    pub(crate) fn planned(
        category: ExerciseCategory,
        name: &str,
        duration_minutes: u32,
        intensity: u8,
    ) -> Self {
        debug_assert!(duration_minutes > 0);
        debug_assert!((MIN_INTENSITY..=MAX_INTENSITY).contains(&intensity));
        Self {
            name: name.to_string(),
            duration_minutes,
            intensity,
            category,
        }
    }

    pub fn with_intensity(mut self, intensity: u8) -> Result<Self, ValidationError> {
        self.set_intensity(intensity)?;
        Ok(self)
    }

    pub fn set_intensity(&mut self, intensity: u8) -> Result<(), ValidationError> {
        if !(MIN_INTENSITY..=MAX_INTENSITY).contains(&intensity) {
            return Err(ValidationError::IntensityOutOfRange { value: intensity });
        }
        self.intensity = intensity;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    pub fn boxed(self) -> Box<dyn Exercise> {
        Box::new(self)
    }
}

impl Exercise for StandardExercise {
    fn name(&self) -> &str {
        &self.name
    }

    fn duration(&self) -> u32 {
        self.duration_minutes
    }

    fn intensity(&self) -> u8 {
        self.intensity
    }

    fn category(&self) -> ExerciseCategory {
        self.category
    }

    fn calories(&self) -> f64 {
        let intensity_multiplier = f64::from(self.intensity) / f64::from(DEFAULT_INTENSITY);
        self.category.base_calories_per_minute() * f64::from(self.duration_minutes) * intensity_multiplier
    }

    fn description(&self) -> String {
        format!(
            "{} ({}) - {} minutes, Intensity: {}/10 - Burns ~{:.0} calories",
            self.name,
            self.category,
            self.duration_minutes,
            self.intensity,
            self.calories()
        )
    }
}

/// Build an exercise from a category tag
///
/// Fails when the tag is empty or unrecognized, the name is empty, the
/// duration is zero, or the intensity lies outside 1-10.
pub fn create_exercise(
    category: &str,
    name: &str,
    duration_minutes: u32,
    intensity: Option<u8>,
) -> Result<StandardExercise, ValidationError> {
    if category.trim().is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if duration_minutes == 0 {
        return Err(ValidationError::NonPositiveDuration {
            minutes: duration_minutes,
        });
    }

    let category: ExerciseCategory = category.parse()?;
    let mut exercise = StandardExercise::new(category, name.trim(), duration_minutes)?;
    if let Some(intensity) = intensity {
        exercise.set_intensity(intensity)?;
    }

    tracing::debug!(
        category = %category,
        name = exercise.name(),
        duration = duration_minutes,
        intensity = exercise.intensity(),
        "Created exercise"
    );

    Ok(exercise)
}
