use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    create_user, delete_user, get_user, list_users, set_user_role, update_user,
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/{id}/role", patch(set_user_role))
}
