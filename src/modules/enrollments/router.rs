use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{delete_enrollment, list_enrollments, update_enrollment, upsert_enrollment};
use crate::state::AppState;

pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments).post(upsert_enrollment))
        .route("/{id}", put(update_enrollment).delete(delete_enrollment))
}
