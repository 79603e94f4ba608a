use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{MealPlan, MealPlanRecipe, NewMealPlan, NewRecipe, Profile, Recipe, Store, User};

/// Postgres-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_user(&self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, email, password_hash, created_at FROM users WHERE id = $1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("find user")?;
        Ok(user)
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .context("create user")?;
        Ok(user)
    }

    async fn get_profile(&self, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT age, gender, height_cm, weight_kg, activity_level, weight_goal,
                   needed_calories, needed_protein, needed_carbs, needed_fats
              FROM users
             WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("get profile")?;
        Ok(profile)
    }

    async fn update_profile(&self, user_id: Uuid, profile: &Profile) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET age = $2, gender = $3, height_cm = $4, weight_kg = $5,
                   activity_level = $6, weight_goal = $7, needed_calories = $8,
                   needed_protein = $9, needed_carbs = $10, needed_fats = $11
             WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(profile.age)
        .bind(profile.gender.as_deref())
        .bind(profile.height_cm)
        .bind(profile.weight_kg)
        .bind(profile.activity_level.as_deref())
        .bind(profile.weight_goal.as_deref())
        .bind(profile.needed_calories)
        .bind(profile.needed_protein)
        .bind(profile.needed_carbs)
        .bind(profile.needed_fats)
        .execute(&self.db)
        .await
        .context("update profile")?;
        Ok(res.rows_affected() > 0)
    }

    async fn find_recipes_by_edamam_ids(&self, edamam_ids: &[String]) -> anyhow::Result<Vec<Recipe>> {
        if edamam_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, kcal, servings, carbohydrates, fats, protein, ingredient_lines,
                   edamam_id, image_key, user_id, finished, created_at
              FROM recipes
             WHERE edamam_id IS NOT NULL
               AND edamam_id <> ''
               AND edamam_id = ANY($1)
            "#,
        )
        .bind(edamam_ids)
        .fetch_all(&self.db)
        .await
        .context("find recipes by edamam ids")?;
        Ok(rows)
    }

    async fn insert_recipes(&self, recipes: Vec<NewRecipe>) -> anyhow::Result<Vec<Recipe>> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        let mut out = Vec::with_capacity(recipes.len());
        for r in recipes {
            let row = sqlx::query_as::<_, Recipe>(
                r#"
                INSERT INTO recipes (id, name, kcal, servings, carbohydrates, fats, protein,
                                     ingredient_lines, edamam_id, image_key, user_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING id, name, kcal, servings, carbohydrates, fats, protein, ingredient_lines,
                          edamam_id, image_key, user_id, finished, created_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&r.name)
            .bind(r.kcal)
            .bind(r.servings)
            .bind(r.carbohydrates)
            .bind(r.fats)
            .bind(r.protein)
            .bind(&r.ingredient_lines)
            .bind(r.edamam_id.as_deref())
            .bind(r.image_key.as_deref())
            .bind(r.user_id)
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("insert recipe {}", r.name))?;
            out.push(row);
        }
        tx.commit().await.context("commit tx")?;
        Ok(out)
    }

    async fn find_recipe(&self, recipe_id: Uuid) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, kcal, servings, carbohydrates, fats, protein, ingredient_lines,
                   edamam_id, image_key, user_id, finished, created_at
              FROM recipes
             WHERE id = $1
            "#,
        )
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await
        .context("find recipe")?;
        Ok(row)
    }

    async fn list_user_recipes(&self, user_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, name, kcal, servings, carbohydrates, fats, protein, ingredient_lines,
                   edamam_id, image_key, user_id, finished, created_at
              FROM recipes
             WHERE user_id = $1
             ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list user recipes")?;
        Ok(rows)
    }

    async fn toggle_recipe_finished(&self, recipe_id: Uuid, user_id: Uuid) -> anyhow::Result<Option<bool>> {
        let row = sqlx::query_as::<_, (bool,)>(
            r#"
            UPDATE recipes
               SET finished = NOT finished
             WHERE id = $1 AND (user_id IS NULL OR user_id = $2)
            RETURNING finished
            "#,
        )
        .bind(recipe_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("toggle recipe finished")?;
        Ok(row.map(|(finished,)| finished))
    }

    async fn find_meal_plan_by_name(&self, user_id: Uuid, name: &str) -> anyhow::Result<Option<MealPlan>> {
        let plan = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, name, days, meals_per_day, created_at
              FROM meal_plans
             WHERE user_id = $1 AND name = $2
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.db)
        .await
        .context("find meal plan by name")?;
        Ok(plan)
    }

    async fn find_meal_plan(&self, user_id: Uuid, meal_plan_id: Uuid) -> anyhow::Result<Option<MealPlan>> {
        let plan = sqlx::query_as::<_, MealPlan>(
            r#"
            SELECT id, user_id, name, days, meals_per_day, created_at
              FROM meal_plans
             WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id)
        .bind(meal_plan_id)
        .fetch_optional(&self.db)
        .await
        .context("find meal plan")?;
        Ok(plan)
    }

    async fn list_meal_plan_names(&self, user_id: Uuid) -> anyhow::Result<Vec<String>> {
        let rows = sqlx::query_as::<_, (String,)>(
            r#"
            SELECT name
              FROM meal_plans
             WHERE user_id = $1
             ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list meal plan names")?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    async fn create_meal_plan(&self, plan: NewMealPlan, recipe_ids: &[Uuid]) -> anyhow::Result<MealPlan> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let created = sqlx::query_as::<_, MealPlan>(
            r#"
            INSERT INTO meal_plans (id, user_id, name, days, meals_per_day)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, days, meals_per_day, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(plan.user_id)
        .bind(&plan.name)
        .bind(plan.days)
        .bind(plan.meals_per_day)
        .fetch_one(&mut *tx)
        .await
        .context("insert meal plan")?;

        for (position, recipe_id) in recipe_ids.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO meal_plan_recipes (meal_plan_id, recipe_id, is_completed, position)
                VALUES ($1, $2, FALSE, $3)
                "#,
            )
            .bind(created.id)
            .bind(recipe_id)
            .bind(position as i32)
            .execute(&mut *tx)
            .await
            .context("insert meal plan recipe")?;
        }

        tx.commit().await.context("commit tx")?;
        Ok(created)
    }

    async fn list_plan_recipes(&self, meal_plan_id: Uuid) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT r.id, r.name, r.kcal, r.servings, r.carbohydrates, r.fats, r.protein,
                   r.ingredient_lines, r.edamam_id, r.image_key, r.user_id, r.finished, r.created_at
              FROM meal_plan_recipes mpr
              JOIN recipes r ON r.id = mpr.recipe_id
             WHERE mpr.meal_plan_id = $1
             ORDER BY mpr.position ASC
            "#,
        )
        .bind(meal_plan_id)
        .fetch_all(&self.db)
        .await
        .context("list plan recipes")?;
        Ok(rows)
    }

    async fn add_recipe_to_plan(&self, meal_plan_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO meal_plan_recipes (meal_plan_id, recipe_id, is_completed, position)
            SELECT $1, $2, FALSE, COALESCE(MAX(position) + 1, 0)
              FROM meal_plan_recipes
             WHERE meal_plan_id = $1
            ON CONFLICT (meal_plan_id, recipe_id) DO NOTHING
            "#,
        )
        .bind(meal_plan_id)
        .bind(recipe_id)
        .execute(&self.db)
        .await
        .context("add recipe to plan")?;
        Ok(res.rows_affected() == 1)
    }

    async fn set_completion(&self, meal_plan_id: Uuid, recipe_id: Uuid, completed: bool) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE meal_plan_recipes
               SET is_completed = $3
             WHERE meal_plan_id = $1 AND recipe_id = $2
            "#,
        )
        .bind(meal_plan_id)
        .bind(recipe_id)
        .bind(completed)
        .execute(&self.db)
        .await
        .context("set completion")?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_completions(&self, meal_plan_id: Uuid) -> anyhow::Result<Vec<MealPlanRecipe>> {
        let rows = sqlx::query_as::<_, MealPlanRecipe>(
            r#"
            SELECT meal_plan_id, recipe_id, is_completed, position
              FROM meal_plan_recipes
             WHERE meal_plan_id = $1
             ORDER BY position ASC
            "#,
        )
        .bind(meal_plan_id)
        .fetch_all(&self.db)
        .await
        .context("list completions")?;
        Ok(rows)
    }
}
