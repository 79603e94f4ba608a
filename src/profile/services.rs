use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::Profile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightGoal {
    Lose,
    Maintain,
    Gain,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => anyhow::bail!("unknown gender {}", other),
        }
    }
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtraActive => "extra_active",
        }
    }

    // McArdle et al. activity multipliers
    fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extra_active" => Ok(ActivityLevel::ExtraActive),
            other => anyhow::bail!("unknown activity level {}", other),
        }
    }
}

impl WeightGoal {
    pub fn as_str(self) -> &'static str {
        match self {
            WeightGoal::Lose => "lose",
            WeightGoal::Maintain => "maintain",
            WeightGoal::Gain => "gain",
        }
    }

    fn calorie_adjustment(self) -> f64 {
        match self {
            WeightGoal::Lose => -500.0,
            WeightGoal::Maintain => 0.0,
            WeightGoal::Gain => 300.0,
        }
    }

    fn protein_g_per_kg(self) -> f64 {
        match self {
            WeightGoal::Lose => 2.0,
            WeightGoal::Maintain => 1.6,
            WeightGoal::Gain => 1.8,
        }
    }
}

impl FromStr for WeightGoal {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lose" => Ok(WeightGoal::Lose),
            "maintain" => Ok(WeightGoal::Maintain),
            "gain" => Ok(WeightGoal::Gain),
            other => anyhow::bail!("unknown weight goal {}", other),
        }
    }
}

/// Daily energy and macro needs of a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NutritionNeeds {
    pub calories: i32,
    pub protein_grams: i32,
    pub carb_grams: i32,
    pub fat_grams: i32,
}

const MIN_DAILY_KCAL: f64 = 1200.0;
const FAT_SHARE: f64 = 0.25;

/// Daily needs for a profile.
///
/// Explicitly stored needs win. Otherwise they are derived from biometrics:
/// Mifflin-St Jeor BMR times the activity factor, shifted by the weight goal,
/// with protein per kg of body weight, 25% of energy from fat and carbohydrate
/// filling the remainder. Returns `None` when the biometrics are incomplete or
/// out of range.
pub fn calculate_nutrition(profile: &Profile) -> Option<NutritionNeeds> {
    if let (Some(calories), Some(protein_grams), Some(carb_grams), Some(fat_grams)) = (
        profile.needed_calories,
        profile.needed_protein,
        profile.needed_carbs,
        profile.needed_fats,
    ) {
        return Some(NutritionNeeds {
            calories,
            protein_grams,
            carb_grams,
            fat_grams,
        });
    }

    let weight = profile.weight_kg.filter(|w| *w > 0.0 && *w <= 300.0)?;
    let height = profile.height_cm.filter(|h| *h > 0.0 && *h <= 300.0)?;
    let age = profile.age.filter(|a| (10..=120).contains(a))?;
    let gender: Gender = profile.gender.as_deref()?.parse().ok()?;
    let activity = profile
        .activity_level
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(ActivityLevel::Sedentary);
    let goal = profile
        .weight_goal
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(WeightGoal::Maintain);

    let gender_constant = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    let bmr = (10.0 * weight + 6.25 * height - 5.0 * f64::from(age) + gender_constant).max(1000.0);
    let calories = (bmr * activity.factor() + goal.calorie_adjustment()).max(MIN_DAILY_KCAL);

    let protein = weight * goal.protein_g_per_kg();
    let fat = calories * FAT_SHARE / 9.0;
    let carbs = ((calories - protein * 4.0 - fat * 9.0) / 4.0).max(0.0);

    Some(NutritionNeeds {
        calories: calories.round() as i32,
        protein_grams: protein.round() as i32,
        carb_grams: carbs.round() as i32,
        fat_grams: fat.round() as i32,
    })
}
