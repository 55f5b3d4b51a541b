mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{
    TEST_PASSWORD, access_token_for, create_test_user, empty_request, generate_unique_email,
    json_request, login, send, setup_test_app, setup_test_app_with, get_test_jwt_config,
};
use newsportal_models::Role;
use serde_json::json;

#[tokio::test]
async fn test_register_success() {
    let app = setup_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "username": "newsreader",
                "email": "NewsReader@Example.com",
                "password": "password123"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["username"], "newsreader");
    assert_eq!(body["user"]["email"], "newsreader@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
    assert_eq!(body["tokens"]["token_type"], "Bearer");
    assert_eq!(body["tokens"]["expires_in"], 3600);
    assert!(body["tokens"]["access_token"].is_string());
    assert!(body["tokens"]["refresh_token"].is_string());
}

#[tokio::test]
async fn test_register_with_role() {
    let app = setup_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "username": "deskeditor",
                "email": generate_unique_email(),
                "password": "password123",
                "role": "editor"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "editor");
}

#[tokio::test]
async fn test_register_invalid_role() {
    let app = setup_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({
                "username": "someone",
                "email": generate_unique_email(),
                "password": "password123",
                "role": "superuser"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid role (must be admin, editor, or user)");
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = setup_test_app();

    let cases = [
        (
            json!({ "username": "ab", "email": generate_unique_email(), "password": "password123" }),
            "username must be between 3 and 50 characters",
        ),
        (
            json!({ "username": "valid", "email": "not-an-email", "password": "password123" }),
            "invalid email format",
        ),
        (
            json!({ "username": "valid", "email": generate_unique_email(), "password": "short" }),
            "password must be at least 8 characters",
        ),
        (
            json!({ "email": generate_unique_email(), "password": "password123" }),
            "username is required",
        ),
    ];

    for (payload, expected) in cases {
        let (status, body) = send(
            &app,
            json_request("POST", "/api/v1/auth/register", payload, None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], expected);
    }

    assert!(app.users.is_empty().await);
}

#[tokio::test]
async fn test_register_duplicate_email_and_username() {
    let app = setup_test_app();
    create_test_user(&app, "taken", "taken@example.com", Role::User).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({ "username": "fresh", "email": "TAKEN@example.com", "password": "password123" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({ "username": "taken", "email": "fresh@example.com", "password": "password123" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");
}

#[tokio::test]
async fn test_login_success() {
    let app = setup_test_app();
    let email = generate_unique_email();
    let user = create_test_user(&app, "reader", &email, Role::Editor).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": email, "password": TEST_PASSWORD }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], user.id);
    assert_eq!(body["user"]["role"], "editor");
    assert!(body["tokens"]["access_token"].is_string());
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = setup_test_app();
    let email = generate_unique_email();
    create_test_user(&app, "reader", &email, Role::User).await;

    let (wrong_status, wrong_body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": email, "password": "wrongpass" }),
            None,
        ),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": "nonexistent@test.com", "password": TEST_PASSWORD }),
            None,
        ),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["error"], "Invalid email or password");
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_missing_password() {
    let app = setup_test_app();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({ "email": "test@test.com" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "password is required");
}

#[tokio::test]
async fn test_login_without_content_type() {
    let app = setup_test_app();

    let (status, body) = send(&app, empty_request("POST", "/api/v1/auth/login", None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Missing 'Content-Type: application/json' header"
    );
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = setup_test_app();

    let (status, body) = send(&app, empty_request("GET", "/api/v1/auth/profile", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/auth/profile")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid authorization header format");

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/v1/auth/profile", Some("not.a.token")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_profile_returns_current_user() {
    let app = setup_test_app();
    let email = generate_unique_email();
    let user = create_test_user(&app, "reader", &email, Role::User).await;
    let token = access_token_for(&app, &email).await;

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/v1/auth/profile", Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id);
    assert_eq!(body["email"], email);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_update_profile() {
    let app = setup_test_app();
    let email = generate_unique_email();
    create_test_user(&app, "reader", &email, Role::Editor).await;
    create_test_user(&app, "taken", &generate_unique_email(), Role::User).await;
    let token = access_token_for(&app, &email).await;

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/v1/auth/profile",
            json!({ "username": "columnist", "role": "admin" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "columnist");
    assert_eq!(body["email"], email);
    assert_eq!(body["role"], "editor");

    let (status, body) = send(
        &app,
        json_request(
            "PUT",
            "/api/v1/auth/profile",
            json!({ "username": "taken" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            "/api/v1/auth/profile",
            json!({ "username": "ab" }),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request("PUT", "/api/v1/auth/profile", json!({ "username": "x-ray" }), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_access_token() {
    let app = setup_test_app();
    let email = generate_unique_email();
    create_test_user(&app, "reader", &email, Role::User).await;
    let tokens = login(&app, &email).await;
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let (status, body) = send(&app, empty_request("POST", "/api/v1/auth/logout", Some(access))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");
    assert_eq!(app.revocations.len().await, 1);

    let (status, body) = send(&app, empty_request("GET", "/api/v1/auth/profile", Some(access))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");

    let (status, _) = send(&app, empty_request("POST", "/api/v1/auth/logout", Some(access))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The paired refresh token is not revoked by logout.
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/refresh",
            json!({ "refresh_token": refresh }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_without_token() {
    let app = setup_test_app();

    let (status, body) = send(&app, empty_request("POST", "/api/v1/auth/logout", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = setup_test_app();
    let email = generate_unique_email();
    create_test_user(&app, "reader", &email, Role::User).await;
    let tokens = login(&app, &email).await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/refresh",
            json!({ "refresh_token": tokens["refresh_token"] }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    let new_access = body["access_token"].as_str().unwrap();
    assert_ne!(new_access, tokens["access_token"].as_str().unwrap());

    let (status, _) = send(
        &app,
        empty_request("GET", "/api/v1/auth/profile", Some(new_access)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_kinds_are_not_interchangeable() {
    let app = setup_test_app();
    let email = generate_unique_email();
    create_test_user(&app, "reader", &email, Role::User).await;
    let tokens = login(&app, &email).await;

    let (status, _) = send(
        &app,
        empty_request(
            "GET",
            "/api/v1/auth/profile",
            tokens["refresh_token"].as_str(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/auth/refresh",
            json!({ "refresh_token": tokens["access_token"] }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_token_expires() {
    let app = setup_test_app_with(newsportal_config::JwtConfig {
        access_token_expiry: 1,
        ..get_test_jwt_config()
    });
    let email = generate_unique_email();
    create_test_user(&app, "reader", &email, Role::User).await;
    let token = access_token_for(&app, &email).await;

    app.clock.advance(Duration::seconds(2));

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/v1/auth/profile", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app();

    let (status, body) = send(&app, empty_request("GET", "/api-docs/openapi.json", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "News Portal API");
    assert!(body["paths"].get("/api/v1/auth/login").is_some());
    assert!(body["components"]["securitySchemes"].get("bearer_auth").is_some());
}
