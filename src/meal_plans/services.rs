use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{GenerateMealPlanRequest, MealPlanNames};
use super::error::PlanError;
use super::ordering::order_by_day;
use super::reconcile::{ids_per_day, reconcile};
use super::request::build_plan_request;
use super::targets::{self, TargetOverrides};
use crate::edamam::MealPlanner;
use crate::images::ImageSource;
use crate::storage::StorageClient;
use crate::store::{MealPlan, MealPlanRecipe, NewMealPlan, Recipe, Store};

/// Collaborators of one generation run, borrowed from the app state.
pub struct GenerationContext<'a> {
    pub store: &'a dyn Store,
    pub planner: &'a dyn MealPlanner,
    pub storage: &'a dyn StorageClient,
    pub images: &'a dyn ImageSource,
}

impl From<&GenerateMealPlanRequest> for TargetOverrides {
    fn from(req: &GenerateMealPlanRequest) -> Self {
        Self {
            min_calories: req.min_calories,
            max_calories: req.max_calories,
            protein: req.proteins,
            carbohydrates: req.carbohydrates,
            fats: req.fats,
        }
    }
}

#[instrument(skip(ctx, req), fields(name = %req.meal_plan_name))]
pub async fn generate_meal_plan(
    ctx: &GenerationContext<'_>,
    user_id: Uuid,
    req: &GenerateMealPlanRequest,
) -> Result<(MealPlan, Vec<Recipe>), PlanError> {
    let name = req.meal_plan_name.trim();
    if ctx.store.find_meal_plan_by_name(user_id, name).await?.is_some() {
        return Err(PlanError::NameTaken(name.to_string()));
    }

    let targets = targets::resolve(ctx.store, user_id, &TargetOverrides::from(req)).await?;
    let request = build_plan_request(req.days, req.meals_per_day, &targets, req.diet_type.as_deref());

    let plan = ctx
        .planner
        .generate_meal_plan(&request)
        .await
        .map_err(|e| PlanError::Upstream(e.to_string()))?;
    if !plan.is_ok() {
        let status = plan.status.unwrap_or_default();
        warn!(%user_id, status = %status, "meal planner did not return a plan");
        return Err(PlanError::Upstream(status));
    }

    let days = ids_per_day(&plan);
    let recipes = reconcile(ctx, &days).await?;
    let ordered = order_by_day(recipes, &days);
    if ordered.is_empty() {
        warn!(%user_id, "no recipes resolved for meal plan");
        return Err(PlanError::Empty);
    }

    let recipe_ids: Vec<Uuid> = ordered.iter().map(|r| r.id).collect();
    let meal_plan = ctx
        .store
        .create_meal_plan(
            NewMealPlan {
                user_id,
                name: name.to_string(),
                days: req.days,
                meals_per_day: req.meals_per_day,
            },
            &recipe_ids,
        )
        .await?;

    info!(%user_id, meal_plan_id = %meal_plan.id, recipes = ordered.len(), "meal plan created");
    Ok((meal_plan, ordered))
}

pub async fn get_meal_plan(
    store: &dyn Store,
    user_id: Uuid,
    name: &str,
) -> Result<(MealPlan, Vec<Recipe>), PlanError> {
    let plan = store
        .find_meal_plan_by_name(user_id, name)
        .await?
        .ok_or(PlanError::NotFound)?;
    let recipes = store.list_plan_recipes(plan.id).await?;
    Ok((plan, recipes))
}

pub async fn list_meal_plan_names(store: &dyn Store, user_id: Uuid) -> Result<MealPlanNames, PlanError> {
    let names = store.list_meal_plan_names(user_id).await?;
    if names.is_empty() {
        return Err(PlanError::NotFound);
    }
    Ok(MealPlanNames {
        count: names.len(),
        meal_plan_names: names,
    })
}

pub async fn add_recipe_to_plan(
    store: &dyn Store,
    user_id: Uuid,
    meal_plan_id: Uuid,
    recipe_id: Uuid,
) -> Result<bool, PlanError> {
    if store.find_meal_plan(user_id, meal_plan_id).await?.is_none()
        || store.find_recipe(recipe_id).await?.is_none()
    {
        return Err(PlanError::NotFound);
    }
    Ok(store.add_recipe_to_plan(meal_plan_id, recipe_id).await?)
}

pub async fn set_completion_status(
    store: &dyn Store,
    user_id: Uuid,
    meal_plan_id: Uuid,
    recipe_id: Uuid,
    completed: bool,
) -> anyhow::Result<bool> {
    if store.find_meal_plan(user_id, meal_plan_id).await?.is_none() {
        return Ok(false);
    }
    store.set_completion(meal_plan_id, recipe_id, completed).await
}

pub async fn get_completion_statuses(
    store: &dyn Store,
    user_id: Uuid,
    meal_plan_id: Uuid,
) -> anyhow::Result<Vec<MealPlanRecipe>> {
    if store.find_meal_plan(user_id, meal_plan_id).await?.is_none() {
        return Ok(Vec::new());
    }
    store.list_completions(meal_plan_id).await
}
