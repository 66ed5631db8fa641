use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    create_lesson_plan, delete_lesson_plan, list_lesson_plans, update_lesson_plan,
};
use crate::state::AppState;

pub fn init_lesson_plans_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_lesson_plans).post(create_lesson_plan))
        .route("/{id}", put(update_lesson_plan).delete(delete_lesson_plan))
}
