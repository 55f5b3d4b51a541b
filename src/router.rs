use axum::{Router, middleware, routing::get};

use crate::docs::openapi_json;
use crate::logging::logging_middleware;
use crate::middleware::auth::require_auth;
use crate::middleware::role::require_admin;
use crate::modules::auth::router::init_auth_router;
use crate::modules::users::router::{init_admin_users_router, init_users_router};
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest(
                    "/users",
                    init_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth)),
                )
                .nest(
                    "/admin/users",
                    init_admin_users_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                ),
        )
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
}
