use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::PlanError;
use super::targets::{MAX_DAILY_KCAL, MAX_DAILY_MACRO_G};
use crate::recipes::dto::RecipeView;
use crate::store::{MealPlan, MealPlanRecipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "OK")]
    Ok,
    InvalidParameters,
    DbError,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub error_code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_string: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            error_code: ErrorCode::Ok,
            error_string: None,
            data: Some(data),
        }
    }

    pub fn failed(err: &PlanError) -> Self {
        let error_string = match err {
            PlanError::Upstream(_) | PlanError::NameTaken(_) => Some(err.to_string()),
            _ => None,
        };
        Self {
            error_code: err.code(),
            error_string,
            data: None,
        }
    }
}

impl<T> From<Result<T, PlanError>> for Envelope<T> {
    fn from(res: Result<T, PlanError>) -> Self {
        match res {
            Ok(data) => Envelope::ok(data),
            Err(e) => Envelope::failed(&e),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateMealPlanRequest {
    pub meal_plan_name: String,
    pub days: i32,
    pub meals_per_day: i32,
    #[serde(default)]
    pub diet_type: Option<String>,
    #[serde(default)]
    pub min_calories: Option<i32>,
    #[serde(default)]
    pub max_calories: Option<i32>,
    #[serde(default)]
    pub proteins: Option<i32>,
    #[serde(default)]
    pub carbohydrates: Option<i32>,
    #[serde(default)]
    pub fats: Option<i32>,
}

impl GenerateMealPlanRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.meal_plan_name.trim().is_empty() {
            return Err("meal_plan_name is required");
        }
        if self.days < 1 {
            return Err("days must be at least 1");
        }
        if self.meals_per_day < 1 {
            return Err("meals_per_day must be at least 1");
        }
        let calories = [self.min_calories, self.max_calories];
        if calories.iter().flatten().any(|v| !(0..=MAX_DAILY_KCAL).contains(v)) {
            return Err("calories must be between 0 and 20000");
        }
        if let (Some(min), Some(max)) = (self.min_calories, self.max_calories) {
            if min > max {
                return Err("min_calories must not exceed max_calories");
            }
        }
        let macros = [self.proteins, self.carbohydrates, self.fats];
        if macros.iter().flatten().any(|v| !(0..=MAX_DAILY_MACRO_G).contains(v)) {
            return Err("macro targets must be between 0 and 2000");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub meal_plan_id: Uuid,
    pub recipes: Vec<RecipeView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealPlanView {
    pub id: Uuid,
    pub name: String,
    pub days: i32,
    pub meals_per_day: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<MealPlan> for MealPlanView {
    fn from(p: MealPlan) -> Self {
        Self {
            id: p.id,
            name: p.name,
            days: p.days,
            meals_per_day: p.meals_per_day,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MealPlanWithRecipes {
    pub meal_plan: MealPlanView,
    pub recipes: Vec<RecipeView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MealPlanNames {
    pub meal_plan_names: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AddRecipeRequest {
    pub meal_plan_id: Uuid,
    pub recipe_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddedRecipe {
    pub added: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetCompletionRequest {
    pub meal_plan_id: Uuid,
    pub recipe_id: Uuid,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompletionQuery {
    pub meal_plan_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionStatus {
    pub recipe_id: Uuid,
    pub is_completed: bool,
}

impl From<MealPlanRecipe> for CompletionStatus {
    fn from(l: MealPlanRecipe) -> Self {
        Self {
            recipe_id: l.recipe_id,
            is_completed: l.is_completed,
        }
    }
}
