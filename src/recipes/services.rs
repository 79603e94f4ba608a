use uuid::Uuid;

use super::dto::{CreateRecipeRequest, RecipeView};
use crate::images::presign_image;
use crate::storage::StorageClient;
use crate::store::{NewRecipe, Recipe, Store};

/// Ingredient lines are stored one per line, `\n` separated.
///
/// Accepts the legacy `&&` separator and CRLF line endings.
pub fn normalize_ingredient_lines(raw: &str) -> String {
    raw.replace("&&", "\n")
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn validate_custom_recipe(req: &CreateRecipeRequest) -> Result<(), &'static str> {
    if req.name.trim().is_empty() {
        return Err("name is required");
    }
    if req.servings <= 0 {
        return Err("servings must be positive");
    }
    if [req.kcal, req.carbohydrates, req.fats, req.protein]
        .iter()
        .any(|v| *v < 0)
    {
        return Err("nutrition values must not be negative");
    }
    Ok(())
}

pub async fn create_custom_recipe(
    store: &dyn Store,
    user_id: Uuid,
    req: CreateRecipeRequest,
) -> anyhow::Result<Recipe> {
    let recipe = NewRecipe {
        name: req.name.trim().to_string(),
        kcal: req.kcal,
        servings: req.servings,
        carbohydrates: req.carbohydrates,
        fats: req.fats,
        protein: req.protein,
        ingredient_lines: normalize_ingredient_lines(&req.ingredient_lines),
        edamam_id: None,
        image_key: None,
        user_id: Some(user_id),
    };
    let mut rows = store.insert_recipes(vec![recipe]).await?;
    rows.pop()
        .ok_or_else(|| anyhow::anyhow!("recipe insert returned no row"))
}

pub async fn to_view(storage: &dyn StorageClient, recipe: Recipe) -> RecipeView {
    let image_url = match recipe.image_key.as_deref() {
        Some(key) if !key.is_empty() => presign_image(storage, key).await,
        _ => None,
    };
    RecipeView {
        id: recipe.id,
        name: recipe.name,
        kcal: recipe.kcal,
        servings: recipe.servings,
        carbohydrates: recipe.carbohydrates,
        fats: recipe.fats,
        protein: recipe.protein,
        ingredient_lines: recipe.ingredient_lines,
        edamam_id: recipe.edamam_id,
        image_url,
        finished: recipe.finished,
    }
}

pub async fn to_views(storage: &dyn StorageClient, recipes: Vec<Recipe>) -> Vec<RecipeView> {
    let mut out = Vec::with_capacity(recipes.len());
    for r in recipes {
        out.push(to_view(storage, r).await);
    }
    out
}
