use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use prompt_moderation::{
    config::Config,
    domain::shared::clock::ManualClock,
    presentation::http::{
        middleware::user::{ADMIN_ROLE, UserClaims},
        routes::create_router,
        state::AppState,
    },
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const TEST_JWT_SECRET: &str = "test-jwt-secret";

pub struct TestApp {
    pub app: Router,
    pub clock: ManualClock,
    pub admin_token: String,
}

impl TestApp {
    pub fn token_for(&self, user_id: &str) -> String {
        mint_token(user_id, "user")
    }
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(Config::for_tests(TEST_JWT_SECRET))
}

pub fn spawn_app_with(config: Config) -> TestApp {
    let clock = ManualClock::starting_now();
    let state = AppState::in_memory(config, Arc::new(clock.clone()));

    TestApp {
        app: create_router(state),
        clock,
        admin_token: mint_token("moderator-1", ADMIN_ROLE),
    }
}

pub fn test_config() -> Config {
    Config::for_tests(TEST_JWT_SECRET)
}

fn mint_token(sub: &str, role: &str) -> String {
    // Signed against wall time; the manual clock only drives moderation rules.
    let exp = (Utc::now() + Duration::hours(1)).timestamp() as usize;
    let claims = UserClaims {
        sub: sub.to_string(),
        role: role.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("failed to sign token")
}

pub fn unique_user(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7())
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("failed to build GET request")
}

pub fn json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build JSON request")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();

    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

/// Issues an action through the admin API and returns its JSON.
pub async fn issue_action(app: &TestApp, body: Value) -> Value {
    let res = send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/admin/moderation/actions",
            &app.admin_token,
            body,
        ),
    )
    .await;
    read_json(expect_status(res, StatusCode::CREATED).await).await
}

/// Files an appeal as `user_id` and returns the raw response.
pub async fn file_appeal(
    app: &TestApp,
    user_id: &str,
    action_id: &str,
    explanation: &str,
) -> axum::response::Response {
    send(
        &app.app,
        json_request(
            "POST",
            "/api/v1/me/appeals",
            &app.token_for(user_id),
            serde_json::json!({
                "action_id": action_id,
                "explanation": explanation,
            }),
        ),
    )
    .await
}
