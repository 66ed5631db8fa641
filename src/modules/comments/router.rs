use axum::{
    Router,
    routing::{delete, get},
};

use super::controller::{create_comment, delete_comment, list_comments};
use crate::state::AppState;

pub fn init_comments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route("/{id}", delete(delete_comment))
}
