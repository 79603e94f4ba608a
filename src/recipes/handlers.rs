use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{CreateRecipeRequest, FinishRecipeResponse, RecipeView};
use super::services::{create_custom_recipe, to_view, to_views, validate_custom_recipe};
use crate::{auth::AuthUser, state::AppState};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe))
        .route("/recipes/custom", get(list_custom_recipes))
        .route("/recipes/:id/finish", post(finish_recipe))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeView>), (StatusCode, String)> {
    if let Err(msg) = validate_custom_recipe(&body) {
        warn!(%user_id, reason = msg, "invalid recipe");
        return Err((StatusCode::BAD_REQUEST, msg.into()));
    }

    let recipe = create_custom_recipe(state.store.as_ref(), user_id, body)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "create_custom_recipe failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    info!(%user_id, recipe_id = %recipe.id, "custom recipe created");
    Ok((
        StatusCode::CREATED,
        Json(to_view(state.storage.as_ref(), recipe).await),
    ))
}

#[instrument(skip(state))]
pub async fn list_custom_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<RecipeView>>, (StatusCode, String)> {
    let recipes = state.store.list_user_recipes(user_id).await.map_err(|e| {
        error!(error = %e, %user_id, "list_user_recipes failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(to_views(state.storage.as_ref(), recipes).await))
}

#[instrument(skip(state))]
pub async fn finish_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FinishRecipeResponse>, (StatusCode, String)> {
    match state.store.toggle_recipe_finished(id, user_id).await {
        Ok(Some(finished)) => {
            info!(%user_id, recipe_id = %id, finished, "recipe finish toggled");
            Ok(Json(FinishRecipeResponse { id, finished }))
        }
        Ok(None) => Err((StatusCode::NOT_FOUND, "Recipe not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, recipe_id = %id, "toggle_recipe_finished failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
