use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::nutrition::aggregate::MacroTotals;
use crate::nutrition::constants::{BaseUnit, MealCategory};

use super::repo::MealKind;

/// Body for creating or updating a meal. The kind tag selects between a
/// constituent list and fixed macros; on update it must match the stored
/// kind.
#[derive(Debug, Deserialize)]
pub struct MealPayload {
    pub name: String,
    pub category: MealCategory,
    #[serde(flatten)]
    pub composition: CompositionPayload,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CompositionPayload {
    Regular { foods: Vec<FoodQuantity> },
    Custom { macros: MacroTotals },
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FoodQuantity {
    pub food_id: i64,
    pub quantity: f64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub kind: Option<MealKind>,
    pub category: Option<MealCategory>,
}

/// Compact meal view shared by meal listings, program schedules and tracking
/// entries. Totals are display-rounded.
#[derive(Debug, Clone, Serialize)]
pub struct MealSummary {
    pub id: i64,
    pub name: String,
    pub category: MealCategory,
    pub kind: MealKind,
    pub totals: MacroTotals,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    #[serde(flatten)]
    pub summary: MealSummary,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct MealDetails {
    #[serde(flatten)]
    pub summary: MealSummary,
    pub created_at: OffsetDateTime,
    /// Constituents of a regular meal; empty for custom meals.
    pub foods: Vec<MealConstituent>,
}

#[derive(Debug, Serialize)]
pub struct MealConstituent {
    pub food_id: i64,
    pub name: String,
    pub quantity: f64,
    pub base_unit: BaseUnit,
    pub totals: MacroTotals,
}
