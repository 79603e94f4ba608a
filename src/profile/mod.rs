mod dto;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use services::{calculate_nutrition, NutritionNeeds};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::profile_routes())
}
