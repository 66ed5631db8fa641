use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    complete_lesson, create_lesson, delete_lesson, get_lesson, list_lessons, uncomplete_lesson,
    update_lesson,
};
use crate::state::AppState;

pub fn init_lessons_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lessons).post(create_lesson))
        .route(
            "/{id}",
            get(get_lesson).put(update_lesson).delete(delete_lesson),
        )
        .route(
            "/{id}/complete",
            post(complete_lesson).delete(uncomplete_lesson),
        )
}
