use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub created_at: OffsetDateTime,
}

/// Biometrics and goals stored on the user row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub weight_goal: Option<String>,
    pub needed_calories: Option<i32>,
    pub needed_protein: Option<i32>,
    pub needed_carbs: Option<i32>,
    pub needed_fats: Option<i32>,
}

/// Recipe row. Macros and calories are per serving, in whole grams/kcal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub kcal: i32,
    pub servings: i32,
    pub carbohydrates: i32,
    pub fats: i32,
    pub protein: i32,
    pub ingredient_lines: String,
    pub edamam_id: Option<String>,
    pub image_key: Option<String>,
    pub user_id: Option<Uuid>,
    pub finished: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub name: String,
    pub kcal: i32,
    pub servings: i32,
    pub carbohydrates: i32,
    pub fats: i32,
    pub protein: i32,
    pub ingredient_lines: String,
    pub edamam_id: Option<String>,
    pub image_key: Option<String>,
    pub user_id: Option<Uuid>,
}

impl NewRecipe {
    pub fn into_recipe(self, id: Uuid, created_at: OffsetDateTime) -> Recipe {
        Recipe {
            id,
            name: self.name,
            kcal: self.kcal,
            servings: self.servings,
            carbohydrates: self.carbohydrates,
            fats: self.fats,
            protein: self.protein,
            ingredient_lines: self.ingredient_lines,
            edamam_id: self.edamam_id,
            image_key: self.image_key,
            user_id: self.user_id,
            finished: false,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub days: i32,
    pub meals_per_day: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMealPlan {
    pub user_id: Uuid,
    pub name: String,
    pub days: i32,
    pub meals_per_day: i32,
}

/// Plan/recipe association; `position` keeps the day order of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MealPlanRecipe {
    pub meal_plan_id: Uuid,
    pub recipe_id: Uuid,
    pub is_completed: bool,
    pub position: i32,
}
