pub mod dto;
pub mod error;
pub mod handlers;
pub mod ordering;
pub mod reconcile;
pub mod request;
pub mod services;
pub mod targets;

use crate::state::AppState;
use axum::Router;

pub use services::GenerationContext;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::meal_plan_routes())
}
