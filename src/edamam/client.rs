use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use super::dto::{EdamamRecipe, MealPlanRequest, MealPlanResponse, RecipeInfoResponse};
use crate::config::EdamamConfig;

/// External meal planner. Transport failures surface as `Err`; a non-2xx
/// planner reply is reported through [`MealPlanResponse::status`].
#[async_trait]
pub trait MealPlanner: Send + Sync {
    async fn generate_meal_plan(&self, request: &MealPlanRequest) -> anyhow::Result<MealPlanResponse>;
    /// `Ok(None)` when the planner does not know the recipe.
    async fn get_recipe_info(&self, external_id: &str) -> anyhow::Result<Option<EdamamRecipe>>;
}

#[derive(Clone)]
pub struct EdamamClient {
    http: Client,
    config: EdamamConfig,
}

impl EdamamClient {
    pub fn new(config: EdamamConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("build edamam http client")?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn recipe_url(&self, external_id: &str) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.url("/api/recipes/v2")).context("parse edamam base url")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("edamam base url cannot carry a path"))?
            .push(external_id);
        Ok(url)
    }
}

#[async_trait]
impl MealPlanner for EdamamClient {
    async fn generate_meal_plan(&self, request: &MealPlanRequest) -> anyhow::Result<MealPlanResponse> {
        let url = self.url(&format!(
            "/api/meal-planner/v1/{}/select",
            self.config.app_id
        ));
        let res = self
            .http
            .post(&url)
            .query(&[("type", "public")])
            .basic_auth(&self.config.app_id, Some(&self.config.app_key))
            .header("Edamam-Account-User", &self.config.account_user)
            .json(request)
            .send()
            .await
            .context("edamam meal planner request")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, body = %body, "edamam meal planner rejected request");
            return Ok(MealPlanResponse {
                status: Some(status.to_string()),
                selection: Vec::new(),
            });
        }

        let plan = res
            .json::<MealPlanResponse>()
            .await
            .context("decode meal planner response")?;
        debug!(status = ?plan.status, days = plan.selection.len(), "meal plan received");
        Ok(plan)
    }

    async fn get_recipe_info(&self, external_id: &str) -> anyhow::Result<Option<EdamamRecipe>> {
        let url = self.recipe_url(external_id)?;
        let res = self
            .http
            .get(url)
            .query(&[
                ("type", "public"),
                ("app_id", self.config.app_id.as_str()),
                ("app_key", self.config.app_key.as_str()),
            ])
            .header("Edamam-Account-User", &self.config.account_user)
            .send()
            .await
            .with_context(|| format!("edamam recipe request {}", external_id))?;

        if res.status() == StatusCode::NOT_FOUND {
            debug!(external_id, "recipe unknown to edamam");
            return Ok(None);
        }
        let res = res
            .error_for_status()
            .with_context(|| format!("edamam recipe status {}", external_id))?;
        let info = res
            .json::<RecipeInfoResponse>()
            .await
            .with_context(|| format!("decode edamam recipe {}", external_id))?;
        Ok(Some(info.recipe))
    }
}
