use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{delete_note, list_notes, update_note, upsert_note};
use crate::state::AppState;

pub fn init_notes_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notes).post(upsert_note))
        .route("/{id}", put(update_note).delete(delete_note))
}
