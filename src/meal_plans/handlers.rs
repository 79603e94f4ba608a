use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::dto::{
    AddRecipeRequest, AddedRecipe, CompletionQuery, CompletionStatus, Envelope, GenerateMealPlanRequest,
    GeneratedPlan, MealPlanNames, MealPlanWithRecipes, SetCompletionRequest,
};
use super::error::PlanError;
use super::services;
use crate::{auth::AuthUser, recipes::services::to_views, state::AppState};

pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans", get(list_meal_plans))
        .route("/meal-plans/generate", post(generate_meal_plan))
        .route("/meal-plans/by-name/:name", get(get_meal_plan))
        .route("/meal-plans/recipes", post(add_recipe))
        .route(
            "/meal-plans/completion",
            put(set_completion).get(get_completions),
        )
}

fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn log_failure(err: &PlanError) {
    if let PlanError::Store(e) = err {
        error!(error = %e, "meal plan store failure");
    }
}

fn envelope<T>(res: Result<T, PlanError>) -> Json<Envelope<T>> {
    if let Err(e) = &res {
        log_failure(e);
    }
    Json(Envelope::from(res))
}

#[instrument(skip(state, body))]
pub async fn generate_meal_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<GenerateMealPlanRequest>,
) -> Result<Json<Envelope<GeneratedPlan>>, (StatusCode, String)> {
    if let Err(msg) = body.validate() {
        warn!(%user_id, reason = msg, "invalid generate request");
        return Err((StatusCode::BAD_REQUEST, msg.into()));
    }

    let res = match services::generate_meal_plan(&state.generation(), user_id, &body).await {
        Ok((plan, recipes)) => Ok(GeneratedPlan {
            meal_plan_id: plan.id,
            recipes: to_views(state.storage.as_ref(), recipes).await,
        }),
        Err(e) => Err(e),
    };
    Ok(envelope(res))
}

#[instrument(skip(state))]
pub async fn list_meal_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<Envelope<MealPlanNames>> {
    envelope(services::list_meal_plan_names(state.store.as_ref(), user_id).await)
}

#[instrument(skip(state))]
pub async fn get_meal_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(name): Path<String>,
) -> Json<Envelope<MealPlanWithRecipes>> {
    let res = match services::get_meal_plan(state.store.as_ref(), user_id, &name).await {
        Ok((plan, recipes)) => Ok(MealPlanWithRecipes {
            meal_plan: plan.into(),
            recipes: to_views(state.storage.as_ref(), recipes).await,
        }),
        Err(e) => Err(e),
    };
    envelope(res)
}

#[instrument(skip(state))]
pub async fn add_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<AddRecipeRequest>,
) -> Json<Envelope<AddedRecipe>> {
    let res = services::add_recipe_to_plan(state.store.as_ref(), user_id, body.meal_plan_id, body.recipe_id)
        .await
        .map(|added| AddedRecipe { added });
    envelope(res)
}

#[instrument(skip(state))]
pub async fn set_completion(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<SetCompletionRequest>,
) -> Result<Json<bool>, (StatusCode, String)> {
    let updated = services::set_completion_status(
        state.store.as_ref(),
        user_id,
        body.meal_plan_id,
        body.recipe_id,
        body.completed,
    )
    .await
    .map_err(internal)?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn get_completions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<CompletionQuery>,
) -> Result<Json<Vec<CompletionStatus>>, (StatusCode, String)> {
    let links = services::get_completion_statuses(state.store.as_ref(), user_id, q.meal_plan_id)
        .await
        .map_err(internal)?;
    Ok(Json(links.into_iter().map(CompletionStatus::from).collect()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{app::build_app, state::AppState};

    async fn call(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str, token: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    }

    async fn register(app: &axum::Router) -> String {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": "cook@example.com", "password": "s3cret-pass" }).to_string(),
            ))
            .unwrap();
        let (status, body) = call(app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        body["access_token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn generate_then_read_back_through_the_api() {
        let app = build_app(AppState::fake());
        let token = register(&app).await;

        let (status, body) = call(
            &app,
            json_request(
                "POST",
                "/api/v1/meal-plans/generate",
                &token,
                json!({ "meal_plan_name": "week", "days": 2, "meals_per_day": 2 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error_code"], "OK");
        let names: Vec<&str> = body["recipes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert!(body["recipes"][0]["image_url"]
            .as_str()
            .unwrap()
            .starts_with("https://fake.local/recipes/"));

        let (_, body) = call(&app, get("/api/v1/meal-plans", &token)).await;
        assert_eq!(body["meal_plan_names"], json!(["week"]));
        assert_eq!(body["count"], 1);

        let (_, body) = call(&app, get("/api/v1/meal-plans/by-name/week", &token)).await;
        assert_eq!(body["error_code"], "OK");
        assert_eq!(body["meal_plan"]["days"], 2);
        assert_eq!(body["recipes"].as_array().unwrap().len(), 3);

        let plan_id = body["meal_plan"]["id"].as_str().unwrap().to_string();
        let recipe_id = body["recipes"][2]["id"].as_str().unwrap().to_string();
        let (status, body) = call(
            &app,
            json_request(
                "PUT",
                "/api/v1/meal-plans/completion",
                &token,
                json!({ "meal_plan_id": plan_id, "recipe_id": recipe_id, "completed": true }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(true));

        let (_, body) = call(
            &app,
            get(&format!("/api/v1/meal-plans/completion?meal_plan_id={}", plan_id), &token),
        )
        .await;
        let flags: Vec<bool> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["is_completed"].as_bool().unwrap())
            .collect();
        assert_eq!(flags, [false, false, true]);
    }

    #[tokio::test]
    async fn errors_travel_in_the_envelope() {
        let app = build_app(AppState::fake());
        let token = register(&app).await;

        let (status, body) = call(&app, get("/api/v1/meal-plans", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error_code": "DbError" }));

        let (_, body) = call(&app, get("/api/v1/meal-plans/by-name/nope", &token)).await;
        assert_eq!(body["error_code"], "DbError");

        let generate = json!({ "meal_plan_name": "week", "days": 1, "meals_per_day": 1 });
        call(&app, json_request("POST", "/api/v1/meal-plans/generate", &token, generate.clone())).await;
        let (_, body) = call(&app, json_request("POST", "/api/v1/meal-plans/generate", &token, generate)).await;
        assert_eq!(body["error_code"], "InvalidParameters");
        assert!(body["error_string"].as_str().unwrap().contains("week"));
    }

    #[tokio::test]
    async fn invalid_generate_request_is_rejected() {
        let app = build_app(AppState::fake());
        let token = register(&app).await;
        let (status, _) = call(
            &app,
            json_request(
                "POST",
                "/api/v1/meal-plans/generate",
                &token,
                json!({ "meal_plan_name": "week", "days": 0, "meals_per_day": 3 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn plan_routes_require_a_token() {
        let app = build_app(AppState::fake());
        let req = Request::builder()
            .uri("/api/v1/meal-plans")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
