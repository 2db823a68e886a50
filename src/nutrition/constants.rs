use std::fmt;

use serde::{Deserialize, Serialize};

/// Calories per gram of each macronutrient.
pub const PROTEIN_KCAL_PER_G: f64 = 4.0;
pub const CARB_KCAL_PER_G: f64 = 4.0;
pub const FAT_KCAL_PER_G: f64 = 9.0;

/// Default macro-target parameters: grams of protein per kg of bodyweight,
/// and the share of remaining calories going to carbs and fats.
pub const PROTEIN_G_PER_KG: f64 = 2.0;
pub const DEFAULT_CARB_PERCENTAGE: f64 = 45.0;
pub const DEFAULT_FAT_PERCENTAGE: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ActivityLevel {
    Sedentary,
    #[serde(rename = "Lightly Active")]
    #[sqlx(rename = "Lightly Active")]
    LightlyActive,
    #[serde(rename = "Very Active")]
    #[sqlx(rename = "Very Active")]
    VeryActive,
    #[serde(rename = "Extremely Active")]
    #[sqlx(rename = "Extremely Active")]
    ExtremelyActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 4] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtremelyActive,
    ];

    /// TDEE multiplier applied to BMR.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.24,
            ActivityLevel::VeryActive => 1.4,
            ActivityLevel::ExtremelyActive => 1.62,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum GoalType {
    #[serde(rename = "Weight Loss")]
    #[sqlx(rename = "Weight Loss")]
    WeightLoss,
    Maintenance,
    #[serde(rename = "Weight Gain")]
    #[sqlx(rename = "Weight Gain")]
    WeightGain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum MealCategory {
    Breakfast,
    #[serde(rename = "Lunch/Dinner")]
    #[sqlx(rename = "Lunch/Dinner")]
    LunchDinner,
    Snacks,
}

/// Meal-time slots of a program day, in day order. The derived `Ord` follows
/// declaration order and is what schedule and report sorting rely on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
pub enum MealTime {
    Breakfast,
    #[serde(rename = "Morning Snack")]
    #[sqlx(rename = "Morning Snack")]
    MorningSnack,
    Lunch,
    #[serde(rename = "Afternoon Snack")]
    #[sqlx(rename = "Afternoon Snack")]
    AfternoonSnack,
    Dinner,
}

impl MealTime {
    pub const ALL: [MealTime; 5] = [
        MealTime::Breakfast,
        MealTime::MorningSnack,
        MealTime::Lunch,
        MealTime::AfternoonSnack,
        MealTime::Dinner,
    ];

    /// The meal category a slot draws its meals from.
    pub fn category(self) -> MealCategory {
        match self {
            MealTime::Breakfast => MealCategory::Breakfast,
            MealTime::MorningSnack | MealTime::AfternoonSnack => MealCategory::Snacks,
            MealTime::Lunch | MealTime::Dinner => MealCategory::LunchDinner,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MealTime::Breakfast => "Breakfast",
            MealTime::MorningSnack => "Morning Snack",
            MealTime::Lunch => "Lunch",
            MealTime::AfternoonSnack => "Afternoon Snack",
            MealTime::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum FoodCategory {
    #[serde(rename = "Protein Sources")]
    #[sqlx(rename = "Protein Sources")]
    ProteinSources,
    #[serde(rename = "Complex Carbohydrates")]
    #[sqlx(rename = "Complex Carbohydrates")]
    ComplexCarbohydrates,
    #[serde(rename = "Healthy Fats")]
    #[sqlx(rename = "Healthy Fats")]
    HealthyFats,
    Fruits,
}

/// Base unit a food's nutrient values are expressed against (per 100 g,
/// per 100 ml, or per unit converted to grams through `conversion_factor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum BaseUnit {
    #[serde(rename = "g")]
    #[sqlx(rename = "g")]
    Grams,
    #[serde(rename = "ml")]
    #[sqlx(rename = "ml")]
    Milliliters,
    #[serde(rename = "unit")]
    #[sqlx(rename = "unit")]
    Unit,
}
