use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{error, info, instrument, warn};

use super::dto::{ProfileBody, ProfileResponse};
use super::services::calculate_nutrition;
use crate::{auth::AuthUser, state::AppState, store::Profile};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/me/profile", get(get_profile).put(put_profile))
}

fn respond(profile: &Profile) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        profile: ProfileBody::from(profile),
        nutrition: calculate_nutrition(profile),
    })
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    match state.store.get_profile(user_id).await {
        Ok(Some(profile)) => Ok(respond(&profile)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "User not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, "get_profile failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

#[instrument(skip(state, body))]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<ProfileBody>,
) -> Result<Json<ProfileResponse>, (StatusCode, String)> {
    if let Err(msg) = body.validate() {
        warn!(%user_id, reason = msg, "invalid profile");
        return Err((StatusCode::BAD_REQUEST, msg.into()));
    }

    let profile = Profile::from(body);
    match state.store.update_profile(user_id, &profile).await {
        Ok(true) => {
            info!(%user_id, "profile updated");
            Ok(respond(&profile))
        }
        Ok(false) => Err((StatusCode::NOT_FOUND, "User not found".into())),
        Err(e) => {
            error!(error = %e, %user_id, "update_profile failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
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

    async fn send(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn profile_update_yields_nutrition() {
        let app = build_app(AppState::fake());
        let (_, auth) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": "fit@example.com", "password": "long-enough" }).to_string(),
                ))
                .unwrap(),
        )
        .await;
        let bearer = format!("Bearer {}", auth["access_token"].as_str().unwrap());

        let (status, body) = send(
            &app,
            Request::builder()
                .uri("/api/v1/me/profile")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nutrition"], Value::Null);

        let (status, body) = send(
            &app,
            Request::builder()
                .method("PUT")
                .uri("/api/v1/me/profile")
                .header(header::AUTHORIZATION, &bearer)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "age": 30, "gender": "male", "height_cm": 180.0, "weight_kg": 80.0,
                        "activity_level": "moderately_active", "weight_goal": "maintain"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nutrition"]["calories"], 2759);
        assert_eq!(body["profile"]["gender"], "male");

        let (status, _) = send(
            &app,
            Request::builder()
                .method("PUT")
                .uri("/api/v1/me/profile")
                .header(header::AUTHORIZATION, &bearer)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "age": 3 }).to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
