use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    get_profile, login_user, logout_user, refresh_token, register_user, update_profile,
};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
        .route("/logout", post(logout_user))
        .route("/profile", get(get_profile).put(update_profile))
}
