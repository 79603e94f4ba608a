use serde::{Deserialize, Serialize};

use super::services::{ActivityLevel, Gender, NutritionNeeds, WeightGoal};
use crate::meal_plans::targets::{MAX_DAILY_KCAL, MAX_DAILY_MACRO_G};
use crate::store::Profile;

/// Profile as exchanged with clients; enums are validated on the way in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileBody {
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub weight_goal: Option<WeightGoal>,
    pub needed_calories: Option<i32>,
    pub needed_protein: Option<i32>,
    pub needed_carbs: Option<i32>,
    pub needed_fats: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: ProfileBody,
    pub nutrition: Option<NutritionNeeds>,
}

impl From<ProfileBody> for Profile {
    fn from(b: ProfileBody) -> Self {
        Self {
            age: b.age,
            gender: b.gender.map(|g| g.as_str().to_string()),
            height_cm: b.height_cm,
            weight_kg: b.weight_kg,
            activity_level: b.activity_level.map(|a| a.as_str().to_string()),
            weight_goal: b.weight_goal.map(|g| g.as_str().to_string()),
            needed_calories: b.needed_calories,
            needed_protein: b.needed_protein,
            needed_carbs: b.needed_carbs,
            needed_fats: b.needed_fats,
        }
    }
}

impl From<&Profile> for ProfileBody {
    fn from(p: &Profile) -> Self {
        Self {
            age: p.age,
            gender: p.gender.as_deref().and_then(|s| s.parse().ok()),
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            activity_level: p.activity_level.as_deref().and_then(|s| s.parse().ok()),
            weight_goal: p.weight_goal.as_deref().and_then(|s| s.parse().ok()),
            needed_calories: p.needed_calories,
            needed_protein: p.needed_protein,
            needed_carbs: p.needed_carbs,
            needed_fats: p.needed_fats,
        }
    }
}

impl ProfileBody {
    /// Range check; returns the first offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.age.is_some_and(|a| !(10..=120).contains(&a)) {
            return Err("age must be between 10 and 120");
        }
        if self.height_cm.is_some_and(|h| !(h > 0.0 && h <= 300.0)) {
            return Err("height_cm must be between 0 and 300");
        }
        if self.weight_kg.is_some_and(|w| !(w > 0.0 && w <= 300.0)) {
            return Err("weight_kg must be between 0 and 300");
        }
        if self.needed_calories.is_some_and(|c| !(0..=MAX_DAILY_KCAL).contains(&c)) {
            return Err("needed_calories must be between 0 and 20000");
        }
        let macros = [self.needed_protein, self.needed_carbs, self.needed_fats];
        if macros.iter().flatten().any(|v| !(0..=MAX_DAILY_MACRO_G).contains(v)) {
            return Err("needed macros must be between 0 and 2000");
        }
        Ok(())
    }
}
