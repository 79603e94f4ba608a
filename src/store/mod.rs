use axum::async_trait;
use uuid::Uuid;

mod models;
mod pg;

#[cfg(test)]
pub mod memory;

pub use models::{MealPlan, MealPlanRecipe, NewMealPlan, NewRecipe, Profile, Recipe, User};
pub use pg::PgStore;

/// Persistence seam for users, recipes and meal plans.
///
/// Every call is its own commit point; only [`Store::create_meal_plan`] spans
/// several rows (plan plus associations) and does so atomically.
#[async_trait]
pub trait Store: Send + Sync {
    // ---- users ----

    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_user(&self, user_id: Uuid) -> anyhow::Result<Option<User>>;
    async fn create_user(&self, email: &str, password_hash: &str) -> anyhow::Result<User>;
    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>>;
    /// Returns false when the user does not exist.
    async fn update_profile(&self, user_id: Uuid, profile: &Profile) -> anyhow::Result<bool>;

    // ---- recipes ----

    /// Recipes whose non-empty external id is one of `edamam_ids`.
    async fn find_recipes_by_edamam_ids(&self, edamam_ids: &[String]) -> anyhow::Result<Vec<Recipe>>;
    async fn insert_recipes(&self, recipes: Vec<NewRecipe>) -> anyhow::Result<Vec<Recipe>>;
    async fn find_recipe(&self, recipe_id: Uuid) -> anyhow::Result<Option<Recipe>>;
    async fn list_user_recipes(&self, user_id: Uuid) -> anyhow::Result<Vec<Recipe>>;
    /// Flips `finished` on a shared recipe or one owned by `user_id`.
    /// Returns the new value, or None when no such recipe is visible.
    async fn toggle_recipe_finished(&self, recipe_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<bool>>;

    // ---- meal plans ----

    async fn find_meal_plan_by_name(&self, user_id: Uuid, name: &str) -> anyhow::Result<Option<MealPlan>>;
    async fn find_meal_plan(&self, user_id: Uuid, meal_plan_id: Uuid) -> anyhow::Result<Option<MealPlan>>;
    async fn list_meal_plan_names(&self, user_id: Uuid) -> anyhow::Result<Vec<String>>;
    /// Inserts the plan and one association per recipe, positions following slice order.
    async fn create_meal_plan(&self, plan: NewMealPlan, recipe_ids: &[Uuid]) -> anyhow::Result<MealPlan>;
    /// Recipes of a plan in position order.
    async fn list_plan_recipes(&self, meal_plan_id: Uuid) -> anyhow::Result<Vec<Recipe>>;
    /// Appends a recipe to the end of a plan. False when already attached.
    async fn add_recipe_to_plan(&self, meal_plan_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool>;
    /// False when the (plan, recipe) pair does not exist.
    async fn set_completion(&self, meal_plan_id: Uuid, recipe_id: Uuid, completed: bool) -> anyhow::Result<bool>;
    async fn list_completions(&self, meal_plan_id: Uuid) -> anyhow::Result<Vec<MealPlanRecipe>>;
}
