use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_command, get_command, list_commands};

// No update or delete routes: the command log is append-only.
pub fn init_commands_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_command).get(list_commands))
        .route("/{id}", get(get_command))
}
