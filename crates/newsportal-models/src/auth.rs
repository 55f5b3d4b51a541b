//! Authentication request and response payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::{Role, UserProfile};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Self-service registration.
///
/// `role` is optional and defaults to [`Role::User`].
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "username must be between 3 and 50 characters"
    ))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    #[schema(example = "password123")]
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "refresh_token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "current_password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub new_password: String,
}

/// Self-service profile update. Omitted fields keep their current value.
///
/// There is no `role` field; a role sent by the caller is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "username must be between 3 and 50 characters"
    ))]
    #[schema(example = "jdoe")]
    pub username: Option<String>,
    #[validate(email(message = "invalid email format"))]
    #[schema(example = "jdoe@example.com")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// Access and refresh token issued together.
///
/// Issuing a new pair never invalidates an older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    #[schema(example = 3600)]
    pub expires_in: i64,
    #[schema(example = "Bearer")]
    pub token_type: String,
}

/// Body returned by login and registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserProfile,
    pub tokens: TokenPair,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: None,
        }
    }

    #[test]
    fn test_register_request_valid() {
        assert!(register("jdoe", "jdoe@example.com", "password123").validate().is_ok());
    }

    #[test]
    fn test_register_request_username_bounds() {
        let errors = register("jd", "jdoe@example.com", "password123")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("username"));

        let long = "a".repeat(51);
        assert!(register(&long, "jdoe@example.com", "password123").validate().is_err());
        assert!(register(&"a".repeat(50), "jdoe@example.com", "password123").validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_bad_email_and_short_password() {
        let errors = register("jdoe", "not-an-email", "short").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_register_request_role_is_optional() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"username":"jdoe","email":"jdoe@example.com","password":"password123"}"#,
        )
        .unwrap();
        assert_eq!(request.role, None);

        let request: RegisterRequest = serde_json::from_str(
            r#"{"username":"jdoe","email":"jdoe@example.com","password":"password123","role":"editor"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Some(Role::Editor));
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let result: Result<RegisterRequest, _> = serde_json::from_str(
            r#"{"username":"jdoe","email":"jdoe@example.com","password":"password123","role":"root"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_change_password_requires_min_length() {
        let request = ChangePasswordRequest {
            current_password: "password123".to_string(),
            new_password: "short".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_profile_request_ignores_role() {
        let request: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "username": "newname",
            "role": "admin"
        }))
        .unwrap();

        assert_eq!(request.username.as_deref(), Some("newname"));
        assert!(request.email.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_profile_request_validates_present_fields() {
        let request = UpdateProfileRequest {
            username: Some("ab".to_string()),
            email: Some("nope".to_string()),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));

        assert!(UpdateProfileRequest::default().validate().is_ok());
    }
}
