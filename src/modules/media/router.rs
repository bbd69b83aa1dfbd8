use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_media, delete_media, get_media, list_media, update_media};

pub fn init_media_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_media).get(list_media))
        .route(
            "/{id}",
            get(get_media).put(update_media).delete(delete_media),
        )
}
