use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{current_user, login, logout, register};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/me", get(current_user))
}
