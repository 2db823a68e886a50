use serde::Deserialize;

use crate::nutrition::constants::{BaseUnit, FoodCategory};

/// Shared body for creating and updating a food source. Nutrient values are
/// per 100 of the base unit; `conversion_factor` is grams per unit for
/// unit-based foods.
#[derive(Debug, Deserialize)]
pub struct FoodPayload {
    pub name: String,
    pub category: FoodCategory,
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
    pub portion_size: f64,
    pub base_unit: BaseUnit,
    #[serde(default = "default_conversion_factor")]
    pub conversion_factor: f64,
}

fn default_conversion_factor() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<FoodCategory>,
}
