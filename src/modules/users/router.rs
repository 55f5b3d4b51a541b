use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{
    change_password, delete_user, get_current_user, get_user, list_users, update_current_user,
    update_user_role,
};
use crate::state::AppState;

/// Routes for the authenticated caller's own account.
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user).put(update_current_user))
        .route("/me/password", put(change_password))
}

/// Admin user management. The caller must layer an admin gate on top.
pub fn init_admin_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/{id}", get(get_user).delete(delete_user))
        .route("/{id}/role", put(update_user_role))
}
