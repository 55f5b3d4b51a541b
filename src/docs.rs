use axum::Json;
use newsportal_models::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, RefreshTokenRequest,
    RegisterRequest, Role, TokenPair, UpdateProfileRequest, UpdateRoleRequest, UserProfile,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::get_profile,
        crate::modules::auth::controller::update_profile,
        crate::modules::users::controller::get_current_user,
        crate::modules::users::controller::update_current_user,
        crate::modules::users::controller::change_password,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user_role,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            Role,
            UserProfile,
            RegisterRequest,
            LoginRequest,
            RefreshTokenRequest,
            ChangePasswordRequest,
            UpdateProfileRequest,
            UpdateRoleRequest,
            TokenPair,
            AuthResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, token refresh and logout"),
        (name = "Users", description = "Self-service account endpoints"),
        (name = "Admin", description = "User administration, admin role required")
    ),
    info(
        title = "News Portal API",
        version = "0.1.0",
        description = "Authentication and user management for the news portal, with JWT access and refresh tokens.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
