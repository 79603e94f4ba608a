//! In-memory [`Store`] used by unit and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{MealPlan, MealPlanRecipe, NewMealPlan, NewRecipe, Profile, Recipe, Store, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    profiles: HashMap<Uuid, Profile>,
    recipes: Vec<Recipe>,
    meal_plans: Vec<MealPlan>,
    meal_plan_recipes: Vec<MealPlanRecipe>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a recipe row directly, bypassing the batch insert.
    pub fn seed_recipe(&self, recipe: NewRecipe) -> Recipe {
        let row = recipe.into_recipe(Uuid::new_v4(), OffsetDateTime::now_utc());
        self.tables.lock().unwrap().recipes.push(row.clone());
        row
    }

    pub fn seed_profile(&self, user_id: Uuid, profile: Profile) {
        self.tables.lock().unwrap().profiles.insert(user_id, profile);
    }

    pub fn recipe_count(&self) -> usize {
        self.tables.lock().unwrap().recipes.len()
    }

    pub fn meal_plan_count(&self) -> usize {
        self.tables.lock().unwrap().meal_plans.len()
    }

    pub fn association_count(&self) -> usize {
        self.tables.lock().unwrap().meal_plan_recipes.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> anyhow::Result<User> {
        let mut t = self.tables.lock().unwrap();
        anyhow::ensure!(
            !t.users.iter().any(|u| u.email == email),
            "duplicate email {}",
            email
        );
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        t.profiles.insert(user.id, Profile::default());
        Ok(user)
    }

    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let t = self.tables.lock().unwrap();
        Ok(t.profiles.get(&user_id).cloned())
    }

    async fn update_profile(&self, user_id: Uuid, profile: &Profile) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().unwrap();
        if !t.users.iter().any(|u| u.id == user_id) {
            return Ok(false);
        }
        t.profiles.insert(user_id, profile.clone());
        Ok(true)
    }

    async fn find_recipes_by_edamam_ids(&self, edamam_ids: &[String]) -> anyhow::Result<Vec<Recipe>> {
        let t = self.tables.lock().unwrap();
        Ok(t.recipes
            .iter()
            .filter(|r| match r.edamam_id.as_deref() {
                Some(id) if !id.is_empty() => edamam_ids.iter().any(|wanted| wanted == id),
                _ => false,
            })
            .cloned()
            .collect())
    }

    async fn insert_recipes(&self, recipes: Vec<NewRecipe>) -> anyhow::Result<Vec<Recipe>> {
        let mut t = self.tables.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let rows: Vec<Recipe> = recipes
            .into_iter()
            .map(|r| r.into_recipe(Uuid::new_v4(), now))
            .collect();
        t.recipes.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn find_recipe(&self, recipe_id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let t = self.tables.lock().unwrap();
        Ok(t.recipes.iter().find(|r| r.id == recipe_id).cloned())
    }

    async fn list_user_recipes(&self, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let t = self.tables.lock().unwrap();
        Ok(t.recipes
            .iter()
            .filter(|r| r.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn toggle_recipe_finished(&self, recipe_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<bool>> {
        let mut t = self.tables.lock().unwrap();
        let Some(recipe) = t
            .recipes
            .iter_mut()
            .find(|r| r.id == recipe_id && r.user_id.map_or(true, |owner| owner == user_id))
        else {
            return Ok(None);
        };
        recipe.finished = !recipe.finished;
        Ok(Some(recipe.finished))
    }

    async fn find_meal_plan_by_name(&self, user_id: Uuid, name: &str) -> anyhow::Result<Option<MealPlan>> {
        let t = self.tables.lock().unwrap();
        Ok(t.meal_plans
            .iter()
            .find(|p| p.user_id == user_id && p.name == name)
            .cloned())
    }

    async fn find_meal_plan(&self, user_id: Uuid, meal_plan_id: Uuid) -> anyhow::Result<Option<MealPlan>> {
        let t = self.tables.lock().unwrap();
        Ok(t.meal_plans
            .iter()
            .find(|p| p.user_id == user_id && p.id == meal_plan_id)
            .cloned())
    }

    async fn list_meal_plan_names(&self, user_id: Uuid) -> anyhow::Result<Vec<String>> {
        let t = self.tables.lock().unwrap();
        Ok(t.meal_plans
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.name.clone())
            .collect())
    }

    async fn create_meal_plan(&self, plan: NewMealPlan, recipe_ids: &[Uuid]) -> anyhow::Result<MealPlan> {
        let mut t = self.tables.lock().unwrap();
        anyhow::ensure!(
            !t.meal_plans
                .iter()
                .any(|p| p.user_id == plan.user_id && p.name == plan.name),
            "duplicate meal plan name {}",
            plan.name
        );
        for id in recipe_ids {
            anyhow::ensure!(t.recipes.iter().any(|r| r.id == *id), "unknown recipe {}", id);
        }
        let created = MealPlan {
            id: Uuid::new_v4(),
            user_id: plan.user_id,
            name: plan.name,
            days: plan.days,
            meals_per_day: plan.meals_per_day,
            created_at: OffsetDateTime::now_utc(),
        };
        t.meal_plans.push(created.clone());
        for (position, recipe_id) in recipe_ids.iter().enumerate() {
            t.meal_plan_recipes.push(MealPlanRecipe {
                meal_plan_id: created.id,
                recipe_id: *recipe_id,
                is_completed: false,
                position: position as i32,
            });
        }
        Ok(created)
    }

    async fn list_plan_recipes(&self, meal_plan_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let t = self.tables.lock().unwrap();
        let mut links: Vec<&MealPlanRecipe> = t
            .meal_plan_recipes
            .iter()
            .filter(|l| l.meal_plan_id == meal_plan_id)
            .collect();
        links.sort_by_key(|l| l.position);
        Ok(links
            .into_iter()
            .filter_map(|l| t.recipes.iter().find(|r| r.id == l.recipe_id).cloned())
            .collect())
    }

    async fn add_recipe_to_plan(&self, meal_plan_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().unwrap();
        let links = t
            .meal_plan_recipes
            .iter()
            .filter(|l| l.meal_plan_id == meal_plan_id);
        if links.clone().any(|l| l.recipe_id == recipe_id) {
            return Ok(false);
        }
        let position = links.map(|l| l.position + 1).max().unwrap_or(0);
        t.meal_plan_recipes.push(MealPlanRecipe {
            meal_plan_id,
            recipe_id,
            is_completed: false,
            position,
        });
        Ok(true)
    }

    async fn set_completion(&self, meal_plan_id: Uuid, recipe_id: Uuid, completed: bool) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().unwrap();
        match t
            .meal_plan_recipes
            .iter_mut()
            .find(|l| l.meal_plan_id == meal_plan_id && l.recipe_id == recipe_id)
        {
            Some(link) => {
                link.is_completed = completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_completions(&self, meal_plan_id: Uuid) -> anyhow::Result<Vec<MealPlanRecipe>> {
        let t = self.tables.lock().unwrap();
        let mut links: Vec<MealPlanRecipe> = t
            .meal_plan_recipes
            .iter()
            .filter(|l| l.meal_plan_id == meal_plan_id)
            .cloned()
            .collect();
        links.sort_by_key(|l| l.position);
        Ok(links)
    }
}
