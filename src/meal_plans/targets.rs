use tracing::debug;
use uuid::Uuid;

use crate::profile::{calculate_nutrition, NutritionNeeds};
use crate::store::Store;

pub const DEFAULT_PROTEIN_G: i32 = 120;
pub const DEFAULT_CARBOHYDRATES_G: i32 = 250;
pub const DEFAULT_FATS_G: i32 = 100;
pub const DEFAULT_MIN_KCAL: i32 = 1000;
pub const DEFAULT_MAX_KCAL: i32 = 5000;

/// Upper bounds accepted for client supplied daily targets and needs.
pub const MAX_DAILY_KCAL: i32 = 20_000;
pub const MAX_DAILY_MACRO_G: i32 = 2_000;

const CALORIE_SPREAD: i32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetOverrides {
    pub min_calories: Option<i32>,
    pub max_calories: Option<i32>,
    pub protein: Option<i32>,
    pub carbohydrates: Option<i32>,
    pub fats: Option<i32>,
}

impl TargetOverrides {
    pub fn is_complete(&self) -> bool {
        self.min_calories.is_some()
            && self.max_calories.is_some()
            && self.protein.is_some()
            && self.carbohydrates.is_some()
            && self.fats.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NutritionTargets {
    pub min_calories: i32,
    pub max_calories: i32,
    pub protein: i32,
    pub carbohydrates: i32,
    pub fats: i32,
}

/// One missing override discards them all in favour of the profile needs.
pub fn resolve_targets(overrides: &TargetOverrides, needs: Option<NutritionNeeds>) -> NutritionTargets {
    let mut t = *overrides;
    if !t.is_complete() {
        if let Some(n) = needs {
            t = TargetOverrides {
                min_calories: Some(n.calories.saturating_sub(CALORIE_SPREAD)),
                max_calories: Some(n.calories.saturating_add(CALORIE_SPREAD)),
                protein: Some(n.protein_grams),
                carbohydrates: Some(n.carb_grams),
                fats: Some(n.fat_grams),
            };
        }
    }

    NutritionTargets {
        min_calories: t.min_calories.unwrap_or(DEFAULT_MIN_KCAL),
        max_calories: t.max_calories.unwrap_or(DEFAULT_MAX_KCAL),
        protein: t.protein.unwrap_or(DEFAULT_PROTEIN_G),
        carbohydrates: t.carbohydrates.unwrap_or(DEFAULT_CARBOHYDRATES_G),
        fats: t.fats.unwrap_or(DEFAULT_FATS_G),
    }
}

pub async fn resolve(
    store: &dyn Store,
    user_id: Uuid,
    overrides: &TargetOverrides,
) -> anyhow::Result<NutritionTargets> {
    let needs = if overrides.is_complete() {
        None
    } else {
        store
            .get_profile(user_id)
            .await?
            .as_ref()
            .and_then(calculate_nutrition)
    };
    let targets = resolve_targets(overrides, needs);
    debug!(%user_id, from_profile = needs.is_some(), ?targets, "nutrition targets resolved");
    Ok(targets)
}
