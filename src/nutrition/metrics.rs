//! Metabolic target calculation: BMR (Mifflin-St Jeor), TDEE, goal-adjusted
//! calorie target and macro gram targets.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

use super::constants::{
    ActivityLevel, Gender, GoalType, CARB_KCAL_PER_G, DEFAULT_CARB_PERCENTAGE,
    DEFAULT_FAT_PERCENTAGE, FAT_KCAL_PER_G, PROTEIN_G_PER_KG, PROTEIN_KCAL_PER_G,
};

/// Anthropometric inputs. Weight in kg, height in meters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProfileInput {
    pub weight: f64,
    pub height: f64,
    pub age: i64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal_type: GoalType,
    pub goal_percentage: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsSummary {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MacroTargets {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Rejects inputs that would otherwise propagate as NaN or negative targets.
/// The `!(x > 0.0)` form also catches NaN.
pub fn validate(input: &ProfileInput) -> Result<(), ApiError> {
    if !(input.weight > 0.0) {
        return Err(ApiError::validation("weight", "must be positive"));
    }
    if !(input.height > 0.0) {
        return Err(ApiError::validation("height", "must be positive"));
    }
    if input.age <= 0 {
        return Err(ApiError::validation("age", "must be positive"));
    }
    if !(0.0..=100.0).contains(&input.goal_percentage) {
        return Err(ApiError::validation(
            "goal_percentage",
            "must be between 0 and 100",
        ));
    }
    Ok(())
}

pub fn bmr(input: &ProfileInput) -> f64 {
    let base = 10.0 * input.weight + 6.25 * input.height * 100.0 - 5.0 * input.age as f64;
    match input.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

pub fn tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

pub fn target_calories(tdee: f64, goal_type: GoalType, goal_percentage: f64) -> f64 {
    match goal_type {
        GoalType::WeightLoss => tdee * (1.0 - goal_percentage / 100.0),
        GoalType::WeightGain => tdee * (1.0 + goal_percentage / 100.0),
        GoalType::Maintenance => tdee,
    }
}

/// Validates and computes the full metric set, rounded to whole calories.
pub fn summary(input: &ProfileInput) -> Result<MetricsSummary, ApiError> {
    validate(input)?;
    let bmr = bmr(input);
    let tdee = tdee(bmr, input.activity_level);
    let target = target_calories(tdee, input.goal_type, input.goal_percentage);
    Ok(MetricsSummary {
        bmr: bmr.round(),
        tdee: tdee.round(),
        target_calories: target.round(),
    })
}

/// Protein comes from bodyweight; the remaining calories are split between
/// carbs and fats by the given percentages, re-normalized to sum to one.
pub fn macro_targets(
    weight: f64,
    target_calories: f64,
    protein_per_kg: Option<f64>,
    carb_percentage: Option<f64>,
    fat_percentage: Option<f64>,
) -> MacroTargets {
    let protein_per_kg = protein_per_kg.unwrap_or(PROTEIN_G_PER_KG);
    let carb_percentage = carb_percentage.unwrap_or(DEFAULT_CARB_PERCENTAGE);
    let fat_percentage = fat_percentage.unwrap_or(DEFAULT_FAT_PERCENTAGE);

    let protein = weight * protein_per_kg;
    let remaining = target_calories - protein * PROTEIN_KCAL_PER_G;
    let total_percentage = carb_percentage + fat_percentage;
    let carbs = remaining * (carb_percentage / total_percentage) / CARB_KCAL_PER_G;
    let fats = remaining * (fat_percentage / total_percentage) / FAT_KCAL_PER_G;

    MacroTargets {
        protein: protein.round(),
        carbs: carbs.round(),
        fats: fats.round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> ProfileInput {
        ProfileInput {
            weight: 67.0,
            height: 1.69,
            age: 23,
            gender: Gender::Male,
            activity_level: ActivityLevel::LightlyActive,
            goal_type: GoalType::WeightLoss,
            goal_percentage: 10.0,
        }
    }

    #[test]
    fn reference_profile_is_deterministic() {
        let summary = summary(&base_input()).unwrap();
        assert_eq!(summary.bmr, 1616.0);
        assert_eq!(summary.tdee, 2004.0);
        assert_eq!(summary.target_calories, 1804.0);
    }

    #[test]
    fn bmr_and_tdee_positive_for_valid_profiles() {
        for gender in [Gender::Male, Gender::Female] {
            for level in ActivityLevel::ALL {
                let input = ProfileInput {
                    gender,
                    activity_level: level,
                    ..base_input()
                };
                let bmr = bmr(&input);
                assert!(bmr > 0.0);
                assert!(tdee(bmr, level) > 0.0);
            }
        }
    }

    #[test]
    fn target_scales_monotonically_with_activity() {
        let input = base_input();
        let targets: Vec<f64> = ActivityLevel::ALL
            .iter()
            .map(|&level| {
                target_calories(
                    tdee(bmr(&input), level),
                    input.goal_type,
                    input.goal_percentage,
                )
            })
            .collect();
        assert!(targets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn maintenance_keeps_tdee_and_gain_exceeds_it() {
        let t = 2004.15;
        assert_eq!(target_calories(t, GoalType::Maintenance, 10.0), t);
        assert!(target_calories(t, GoalType::WeightGain, 10.0) > t);
        assert!(target_calories(t, GoalType::WeightLoss, 10.0) < t);
    }

    #[test]
    fn non_positive_measurements_are_rejected() {
        for (field, input) in [
            (
                "weight",
                ProfileInput {
                    weight: 0.0,
                    ..base_input()
                },
            ),
            (
                "height",
                ProfileInput {
                    height: -1.69,
                    ..base_input()
                },
            ),
            (
                "weight",
                ProfileInput {
                    weight: f64::NAN,
                    ..base_input()
                },
            ),
            (
                "age",
                ProfileInput {
                    age: 0,
                    ..base_input()
                },
            ),
            (
                "goal_percentage",
                ProfileInput {
                    goal_percentage: 120.0,
                    ..base_input()
                },
            ),
        ] {
            match validate(&input) {
                Err(crate::error::ApiError::Validation { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected validation error for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn macro_targets_use_renormalized_split() {
        // 67 kg at 1804 kcal: protein 134 g, remaining 1268 kcal split 45/25.
        let targets = macro_targets(67.0, 1804.0, None, None, None);
        assert_eq!(targets.protein, 134.0);
        assert_eq!(targets.carbs, 204.0);
        assert_eq!(targets.fats, 50.0);
    }
}
