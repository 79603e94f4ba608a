use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub name: String,
    pub kcal: i32,
    pub servings: i32,
    pub carbohydrates: i32,
    pub fats: i32,
    pub protein: i32,
    #[serde(default)]
    pub ingredient_lines: String,
}

/// Recipe as returned to clients; the stored image key is replaced by a presigned link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeView {
    pub id: Uuid,
    pub name: String,
    pub kcal: i32,
    pub servings: i32,
    pub carbohydrates: i32,
    pub fats: i32,
    pub protein: i32,
    pub ingredient_lines: String,
    pub edamam_id: Option<String>,
    pub image_url: Option<String>,
    pub finished: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FinishRecipeResponse {
    pub id: Uuid,
    pub finished: bool,
}
