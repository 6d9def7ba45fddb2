//! Nutrition plans built from a Mifflin-St Jeor BMR estimate
//!
//! A plan is computed once at construction and never changes afterwards.
//! Carbohydrates are always the residual after protein and fat, so the three
//! macros add up to the daily calorie target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
pub const CARB_KCAL_PER_GRAM: f64 = 4.0;
pub const FAT_KCAL_PER_GRAM: f64 = 9.0;

/// Goal a nutrition plan is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    WeightLoss,
    MuscleGain,
    Maintenance,
}

/// Multipliers that distinguish one plan type from another
#[derive(Debug, Clone, Copy, PartialEq)]
struct MacroProfile {
    /// BMR multiplier giving maintenance calories
    activity_factor: f64,
    /// Deficit or surplus applied on top of maintenance
    calorie_adjustment: f64,
    protein_grams_per_kg: f64,
    /// Share of daily calories taken by fat
    fat_share: f64,
}

impl PlanType {
    pub const ALL: [PlanType; 3] = [PlanType::WeightLoss, PlanType::MuscleGain, PlanType::Maintenance];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::WeightLoss => "WEIGHT_LOSS",
            PlanType::MuscleGain => "MUSCLE_GAIN",
            PlanType::Maintenance => "MAINTENANCE",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            PlanType::WeightLoss => "Weight Loss",
            PlanType::MuscleGain => "Muscle Gain",
            PlanType::Maintenance => "Maintenance",
        }
    }

    /// Short description offered next to a plan selector
    pub fn summary(&self) -> &'static str {
        match self {
            PlanType::WeightLoss => "Caloric deficit plan designed for fat loss while preserving muscle",
            PlanType::MuscleGain => "Caloric surplus plan with high protein for muscle building",
            PlanType::Maintenance => {
                "Balanced nutrition plan for maintaining current weight and composition"
            }
        }
    }

    fn profile(&self) -> MacroProfile {
        match self {
            PlanType::WeightLoss => MacroProfile {
                activity_factor: 1.375,
                calorie_adjustment: 0.8,
                protein_grams_per_kg: 2.2,
                fat_share: 0.25,
            },
            PlanType::MuscleGain => MacroProfile {
                activity_factor: 1.55,
                calorie_adjustment: 1.15,
                protein_grams_per_kg: 2.0,
                fat_share: 0.25,
            },
            PlanType::Maintenance => MacroProfile {
                activity_factor: 1.55,
                calorie_adjustment: 1.0,
                protein_grams_per_kg: 1.8,
                fat_share: 0.30,
            },
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlanType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        if tag.is_empty() {
            return Err(ValidationError::EmptyPlanType);
        }

        match tag.to_uppercase().replace(['-', ' '], "_").as_str() {
            "WEIGHT_LOSS" => Ok(PlanType::WeightLoss),
            "MUSCLE_GAIN" => Ok(PlanType::MuscleGain),
            "MAINTENANCE" => Ok(PlanType::Maintenance),
            _ => Err(ValidationError::UnknownPlanType {
                tag: tag.to_string(),
            }),
        }
    }
}

/// Basal metabolic rate via Mifflin-St Jeor
///
/// Only a case-insensitive "female" label selects the -161 term; every other
/// label takes the +5 branch.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: &str) -> f64 {
    let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);

    if gender.trim().eq_ignore_ascii_case("female") {
        bmr - 161.0
    } else {
        bmr + 5.0
    }
}

/// Daily calorie and macro targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionPlan {
    plan_type: PlanType,
    daily_calories: f64,
    protein_grams: f64,
    carbs_grams: f64,
    fat_grams: f64,
    user_weight_kg: f64,
}

/// One macro line of a plan report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroShare {
    pub name: &'static str,
    pub grams: f64,
    pub calories: f64,
    /// Share of the daily calorie target, in percent
    pub percent: f64,
}

impl NutritionPlan {
    /// Compute the macro split for `plan_type` from a BMR and body weight
    pub fn from_bmr(plan_type: PlanType, bmr: f64, user_weight_kg: f64) -> Self {
        let profile = plan_type.profile();

        let maintenance_calories = bmr * profile.activity_factor;
        let daily_calories = maintenance_calories * profile.calorie_adjustment;

        let protein_grams = user_weight_kg * profile.protein_grams_per_kg;
        let protein_calories = protein_grams * PROTEIN_KCAL_PER_GRAM;

        let fat_calories = daily_calories * profile.fat_share;
        let fat_grams = fat_calories / FAT_KCAL_PER_GRAM;

        let carb_calories = daily_calories - protein_calories - fat_calories;
        let carbs_grams = carb_calories / CARB_KCAL_PER_GRAM;

        Self {
            plan_type,
            daily_calories,
            protein_grams,
            carbs_grams,
            fat_grams,
            user_weight_kg,
        }
    }

    pub fn plan_type(&self) -> PlanType {
        self.plan_type
    }

    pub fn daily_calories(&self) -> f64 {
        self.daily_calories
    }

    pub fn protein_grams(&self) -> f64 {
        self.protein_grams
    }

    pub fn carbs_grams(&self) -> f64 {
        self.carbs_grams
    }

    pub fn fat_grams(&self) -> f64 {
        self.fat_grams
    }

    pub fn user_weight_kg(&self) -> f64 {
        self.user_weight_kg
    }

    /// Protein, carbohydrate and fat with their calorie share
    pub fn macro_breakdown(&self) -> [MacroShare; 3] {
        let share = |name, grams: f64, kcal_per_gram: f64| {
            let calories = grams * kcal_per_gram;
            let percent = if self.daily_calories > 0.0 {
                calories / self.daily_calories * 100.0
            } else {
                0.0
            };
            MacroShare {
                name,
                grams,
                calories,
                percent,
            }
        };

        [
            share("Protein", self.protein_grams, PROTEIN_KCAL_PER_GRAM),
            share("Carbohydrates", self.carbs_grams, CARB_KCAL_PER_GRAM),
            share("Fats", self.fat_grams, FAT_KCAL_PER_GRAM),
        ]
    }

    pub fn summary(&self) -> String {
        format!(
            "{} Plan\nCalories: {:.0} kcal/day\nProtein: {:.0}g | Carbs: {:.0}g | Fats: {:.0}g",
            self.plan_type.label(),
            self.daily_calories,
            self.protein_grams,
            self.carbs_grams,
            self.fat_grams
        )
    }

    pub fn description(&self) -> &'static str {
        match self.plan_type {
            PlanType::WeightLoss => {
                "Weight Loss Plan: Designed for fat loss while preserving muscle mass. \
                 Features a moderate caloric deficit with high protein intake. \
                 Recommended for sustainable weight loss of 0.5-1kg per week."
            }
            PlanType::MuscleGain => {
                "Muscle Gain Plan: Designed for building lean muscle mass. \
                 Features a moderate caloric surplus with high protein and carbohydrates. \
                 Optimal for strength training and muscle growth. Target: 0.25-0.5kg gain per week."
            }
            PlanType::Maintenance => {
                "Maintenance Plan: Designed for maintaining current weight and body composition. \
                 Features balanced macronutrients for sustained energy and health. \
                 Ideal for general fitness and long-term lifestyle maintenance."
            }
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveMetric { field, value })
    }
}

/// Build a nutrition plan from a plan tag and body metrics
pub fn create_nutrition_plan(
    plan_type: &str,
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    gender: &str,
) -> Result<NutritionPlan, ValidationError> {
    let plan_type: PlanType = plan_type.parse()?;
    require_positive("Weight", weight_kg)?;
    require_positive("Height", height_cm)?;
    require_positive("Age", f64::from(age_years))?;

    let bmr = calculate_bmr(weight_kg, height_cm, age_years, gender);
    let plan = NutritionPlan::from_bmr(plan_type, bmr, weight_kg);

    tracing::debug!(
        plan = %plan_type,
        bmr,
        daily_calories = plan.daily_calories(),
        "Created nutrition plan"
    );

    Ok(plan)
}

/// Plan for the reference profile: 70 kg, 170 cm, 30 years, male
pub fn create_default_nutrition_plan(plan_type: &str) -> Result<NutritionPlan, ValidationError> {
    create_nutrition_plan(plan_type, 70.0, 170.0, 30, "MALE")
}
