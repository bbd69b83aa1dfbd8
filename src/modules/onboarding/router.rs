use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_survey, delete_survey, get_survey, list_surveys, update_survey};

pub fn init_onboarding_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_survey).get(list_surveys))
        .route(
            "/{id}",
            get(get_survey).put(update_survey).delete(delete_survey),
        )
}
