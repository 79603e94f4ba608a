use thiserror::Error;

use super::dto::ErrorCode;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Edamam MealPlanner Error Status: {0}")]
    Upstream(String),
    #[error("Meal plan name '{0}' is already in use")]
    NameTaken(String),
    #[error("No recipes to save for this meal plan")]
    Empty,
    #[error("Meal plan not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl PlanError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PlanError::Upstream(_) | PlanError::NameTaken(_) => ErrorCode::InvalidParameters,
            PlanError::Empty | PlanError::NotFound | PlanError::Store(_) => ErrorCode::DbError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_carries_status() {
        let err = PlanError::Upstream("TIME_OUT".into());
        assert_eq!(err.to_string(), "Edamam MealPlanner Error Status: TIME_OUT");
        assert_eq!(err.code(), ErrorCode::InvalidParameters);
    }

    #[test]
    fn persistence_failures_are_db_errors() {
        assert_eq!(PlanError::Empty.code(), ErrorCode::DbError);
        assert_eq!(PlanError::NotFound.code(), ErrorCode::DbError);
        assert_eq!(PlanError::from(anyhow::anyhow!("boom")).code(), ErrorCode::DbError);
        assert_eq!(PlanError::NameTaken("week".into()).code(), ErrorCode::InvalidParameters);
    }
}
