//! Role-based authorization for Axum.
//!
//! Routes are gated with [`require_roles`] (or [`require_admin`]) as a
//! `route_layer`. [`check_role`], [`check_any_role`] and
//! [`check_minimum_role`] cover checks inside handlers.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use newsportal_auth::{AuthError, check_role_hierarchy, require_role};
use newsportal_core::AppError;
use newsportal_models::Role;

use crate::middleware::auth::{AuthUser, authenticate_parts};
use crate::state::AppState;

pub use newsportal_auth::role_hierarchy_level;

/// Checks that the caller holds one of `allowed_roles`.
///
/// Authentication failures are 401, a valid token with the wrong role is 403.
///
/// ```rust,ignore
/// let staff_routes = Router::new()
///     .route("/", get(list_users))
///     .route_layer(middleware::from_fn_with_state(state.clone(), |state, req, next| {
///         require_roles(state, req, next, vec![Role::Admin, Role::Editor])
///     }));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: Vec<Role>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let (token, auth_user) = authenticate_parts(&parts, &state).await?;

    if !require_role(&auth_user.0, &allowed_roles) {
        tracing::warn!(
            user_id = auth_user.user_id(),
            role = %auth_user.role(),
            "Access denied by role gate"
        );
        return Err(AuthError::Forbidden.into());
    }

    parts.extensions.insert(token);
    parts.extensions.insert(auth_user);
    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, vec![Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub fn check_role(auth_user: &AuthUser, required_role: Role) -> Result<(), AppError> {
    check_any_role(auth_user, &[required_role])
}

pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[Role]) -> Result<(), AppError> {
    newsportal_auth::check_any_role(&auth_user.0, allowed_roles).map_err(AppError::from)
}

/// Passes when the caller ranks at least `minimum` (admin > editor > user).
pub fn check_minimum_role(auth_user: &AuthUser, minimum: Role) -> Result<(), AppError> {
    check_role_hierarchy(&auth_user.0, minimum).map_err(AppError::from)
}
