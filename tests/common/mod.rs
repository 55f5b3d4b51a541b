#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
const MIN_COST: u32 = 4; // bcrypt::MIN_COST is private in bcrypt 0.17
use http_body_util::BodyExt;
use newsportal::router::init_router;
use newsportal::state::AppState;
use newsportal_auth::{Clock, InMemoryRevocationRegistry, ManualClock, SessionManager};
use newsportal_config::{JwtConfig, PasswordConfig};
use newsportal_core::hash_password_with_cost;
use newsportal_db::{InMemoryUserStore, UserStore};
use newsportal_models::{NewUser, Role, User};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "testpass123";

pub fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
    }
}

pub struct TestApp {
    pub router: Router,
    pub clock: ManualClock,
    pub users: Arc<InMemoryUserStore>,
    pub revocations: Arc<InMemoryRevocationRegistry>,
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(get_test_jwt_config())
}

pub fn setup_test_app_with(jwt_config: JwtConfig) -> TestApp {
    let clock = ManualClock::default();
    let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());
    let users = Arc::new(InMemoryUserStore::new());
    let revocations = Arc::new(InMemoryRevocationRegistry::from_config(
        &jwt_config,
        shared_clock.clone(),
    ));

    let sessions = SessionManager::new(
        &jwt_config,
        &PasswordConfig {
            bcrypt_cost: MIN_COST,
        },
        users.clone(),
        revocations.clone(),
        shared_clock,
    )
    .unwrap();

    TestApp {
        router: init_router(AppState::new(sessions)),
        clock,
        users,
        revocations,
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@example.com", uuid::Uuid::new_v4().simple())
}

/// Inserts a user directly into the store, bypassing registration.
pub async fn create_test_user(app: &TestApp, username: &str, email: &str, role: Role) -> User {
    let password_hash = hash_password_with_cost(TEST_PASSWORD, MIN_COST).unwrap();

    app.users
        .create(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
        })
        .await
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    builder.body(Body::empty()).unwrap()
}

/// Sends `request` through the router and decodes the JSON body
/// (`Value::Null` for an empty body).
pub async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}

/// Logs in with [`TEST_PASSWORD`] and returns the `tokens` object.
pub async fn login(app: &TestApp, email: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/auth/login",
            serde_json::json!({ "email": email, "password": TEST_PASSWORD }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["tokens"].clone()
}

pub async fn access_token_for(app: &TestApp, email: &str) -> String {
    login(app, email).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}
