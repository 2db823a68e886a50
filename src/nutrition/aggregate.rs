//! Macro aggregation: per-portion scaling and meal totals. Sums are kept at
//! full precision; `rounded` is for DTO construction only.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use super::constants::{BaseUnit, CARB_KCAL_PER_G, FAT_KCAL_PER_G, PROTEIN_KCAL_PER_G};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub proteins: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl MacroTotals {
    pub const ZERO: MacroTotals = MacroTotals {
        calories: 0.0,
        proteins: 0.0,
        carbs: 0.0,
        fats: 0.0,
    };

    pub fn new(calories: f64, proteins: f64, carbs: f64, fats: f64) -> Self {
        Self {
            calories,
            proteins,
            carbs,
            fats,
        }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            proteins: self.proteins * factor,
            carbs: self.carbs * factor,
            fats: self.fats * factor,
        }
    }

    /// One-decimal display rounding.
    pub fn rounded(self) -> Self {
        Self {
            calories: round1(self.calories),
            proteins: round1(self.proteins),
            carbs: round1(self.carbs),
            fats: round1(self.fats),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl Add for MacroTotals {
    type Output = MacroTotals;

    fn add(self, rhs: MacroTotals) -> MacroTotals {
        MacroTotals {
            calories: self.calories + rhs.calories,
            proteins: self.proteins + rhs.proteins,
            carbs: self.carbs + rhs.carbs,
            fats: self.fats + rhs.fats,
        }
    }
}

impl AddAssign for MacroTotals {
    fn add_assign(&mut self, rhs: MacroTotals) {
        *self = *self + rhs;
    }
}

impl Sub for MacroTotals {
    type Output = MacroTotals;

    fn sub(self, rhs: MacroTotals) -> MacroTotals {
        MacroTotals {
            calories: self.calories - rhs.calories,
            proteins: self.proteins - rhs.proteins,
            carbs: self.carbs - rhs.carbs,
            fats: self.fats - rhs.fats,
        }
    }
}

impl Sum for MacroTotals {
    fn sum<I: Iterator<Item = MacroTotals>>(iter: I) -> MacroTotals {
        iter.fold(MacroTotals::ZERO, Add::add)
    }
}

/// One constituent of a regular meal: a food's per-100 nutrient values plus
/// the consumed quantity in the food's base unit.
#[derive(Debug, Clone, Copy)]
pub struct FoodPortion {
    pub per_hundred: MacroTotals,
    pub base_unit: BaseUnit,
    /// Grams per unit, only meaningful for unit-based foods.
    pub conversion_factor: f64,
    pub quantity: f64,
}

pub fn portion_totals(portion: &FoodPortion) -> MacroTotals {
    let factor = match portion.base_unit {
        BaseUnit::Grams | BaseUnit::Milliliters => portion.quantity / 100.0,
        BaseUnit::Unit => portion.quantity * portion.conversion_factor / 100.0,
    };
    portion.per_hundred.scaled(factor)
}

/// A meal is either built from food constituents or carries fixed totals.
#[derive(Debug, Clone)]
pub enum MealComposition {
    Regular(Vec<FoodPortion>),
    Custom(MacroTotals),
}

pub fn meal_totals(composition: &MealComposition) -> MacroTotals {
    match composition {
        MealComposition::Regular(portions) => portions.iter().map(portion_totals).sum(),
        MealComposition::Custom(totals) => *totals,
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MacroDistribution {
    pub proteins_pct: f64,
    pub carbs_pct: f64,
    pub fats_pct: f64,
}

/// Share of calories contributed by each macro, using 4/4/9 weights. All
/// zeros when the macros carry no calories.
pub fn macro_distribution(totals: &MacroTotals) -> MacroDistribution {
    let protein_cals = totals.proteins * PROTEIN_KCAL_PER_G;
    let carb_cals = totals.carbs * CARB_KCAL_PER_G;
    let fat_cals = totals.fats * FAT_KCAL_PER_G;
    let total_cals = protein_cals + carb_cals + fat_cals;

    if total_cals == 0.0 {
        return MacroDistribution {
            proteins_pct: 0.0,
            carbs_pct: 0.0,
            fats_pct: 0.0,
        };
    }
    MacroDistribution {
        proteins_pct: round1(protein_cals / total_cals * 100.0),
        carbs_pct: round1(carb_cals / total_cals * 100.0),
        fats_pct: round1(fat_cals / total_cals * 100.0),
    }
}

/// Percentage of a target reached, capped at 100. `None` when there is no
/// target to compare against.
pub fn compliance_pct(actual: f64, target: f64) -> Option<f64> {
    (target > 0.0).then(|| round1((actual / target * 100.0).min(100.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chicken() -> FoodPortion {
        FoodPortion {
            per_hundred: MacroTotals::new(165.0, 31.0, 0.0, 3.6),
            base_unit: BaseUnit::Grams,
            conversion_factor: 1.0,
            quantity: 150.0,
        }
    }

    fn egg() -> FoodPortion {
        FoodPortion {
            per_hundred: MacroTotals::new(155.0, 13.0, 1.1, 11.0),
            base_unit: BaseUnit::Unit,
            conversion_factor: 50.0,
            quantity: 2.0,
        }
    }

    #[test]
    fn gram_foods_scale_against_hundred_grams() {
        let totals = portion_totals(&chicken());
        assert_eq!(totals.calories, 247.5);
        assert_eq!(totals.proteins, 46.5);
    }

    #[test]
    fn unit_foods_convert_through_grams() {
        // Two 50 g eggs: factor 1.0, so totals equal the per-100 values.
        let totals = portion_totals(&egg());
        assert_eq!(totals.calories, 155.0);
        assert_eq!(totals.fats, 11.0);
    }

    #[test]
    fn regular_meal_sum_is_order_independent() {
        let forward = meal_totals(&MealComposition::Regular(vec![chicken(), egg()]));
        let backward = meal_totals(&MealComposition::Regular(vec![egg(), chicken()]));
        assert_eq!(forward, backward);
        assert_eq!(forward.calories, 402.5);
    }

    #[test]
    fn custom_meal_totals_are_the_stored_values() {
        let stored = MacroTotals::new(612.0, 45.5, 70.0, 14.2);
        assert_eq!(meal_totals(&MealComposition::Custom(stored)), stored);
    }

    #[test]
    fn empty_regular_meal_sums_to_zero() {
        assert!(meal_totals(&MealComposition::Regular(vec![])).is_zero());
    }

    #[test]
    fn rounding_is_display_only() {
        let raw = MacroTotals::new(100.04, 9.96, 0.0, 0.0);
        let rounded = raw.rounded();
        assert_eq!(rounded.calories, 100.0);
        assert_eq!(rounded.proteins, 10.0);
        // The source values are untouched.
        assert_eq!(raw.calories, 100.04);
    }

    #[test]
    fn distribution_guards_division_by_zero() {
        let dist = macro_distribution(&MacroTotals::ZERO);
        assert_eq!(dist.proteins_pct, 0.0);

        let dist = macro_distribution(&MacroTotals::new(0.0, 25.0, 25.0, 0.0));
        assert_eq!(dist.proteins_pct, 50.0);
        assert_eq!(dist.carbs_pct, 50.0);
        assert_eq!(dist.fats_pct, 0.0);
    }

    #[test]
    fn compliance_caps_at_hundred_and_guards_zero_target() {
        assert_eq!(compliance_pct(50.0, 200.0), Some(25.0));
        assert_eq!(compliance_pct(250.0, 200.0), Some(100.0));
        assert_eq!(compliance_pct(50.0, 0.0), None);
    }
}
