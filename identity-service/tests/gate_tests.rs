mod common;

use auth::Authenticator;
use auth::TokenLifetimes;
use chrono::Duration;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

async fn error_of(response: reqwest::Response) -> Value {
    let body: Value = response.json().await.expect("Failed to parse response");
    body["error"].clone()
}

#[tokio::test]
async fn test_gate_rejects_missing_header() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/users")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "token not provided");
}

#[tokio::test]
async fn test_gate_rejects_basic_scheme() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/users")
        .header("Authorization", "Basic xyz")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "token not provided");
}

#[tokio::test]
async fn test_gate_rejects_empty_bearer_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/users")
        .header("Authorization", "Bearer ")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "token not provided");
}

#[tokio::test]
async fn test_gate_rejects_token_signed_with_wrong_secret() {
    let app = TestApp::spawn().await;
    let foreign = Authenticator::new(b"a-completely-different-secret-of-32-bytes");
    let pair = foreign
        .issue_tokens(uuid::Uuid::new_v4(), "a@x.com")
        .unwrap();

    let response = app
        .get_authenticated("/users", &pair.access_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "invalid or expired token");
}

#[tokio::test]
async fn test_gate_rejects_expired_access_token() {
    let app = TestApp::spawn().await;
    let expired = Authenticator::new(common::JWT_SECRET).with_lifetimes(TokenLifetimes {
        access: Duration::minutes(-5),
        refresh: Duration::days(7),
    });
    let pair = expired
        .issue_tokens(uuid::Uuid::new_v4(), "a@x.com")
        .unwrap();

    let response = app
        .get_authenticated("/users", &pair.access_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "invalid or expired token");
}

#[tokio::test]
async fn test_gate_rejects_padded_bearer_token() {
    let app = TestApp::spawn().await;
    app.create_password_user("a@x.com", "Pass_w0rd!").await;
    let token = app.access_token("a@x.com", "Pass_w0rd!").await;

    let response = app
        .get("/users")
        .header("Authorization", format!("Bearer    {}", token))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "token not provided");
}

#[tokio::test]
async fn test_gate_rejects_malformed_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get_authenticated("/users", "not.a.jwt")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "invalid or expired token");
}

#[tokio::test]
async fn test_gate_rejects_refresh_token() {
    let app = TestApp::spawn().await;
    app.create_password_user("a@x.com", "Pass_w0rd!").await;
    let login: Value = app
        .login("a@x.com", "Pass_w0rd!")
        .await
        .json()
        .await
        .unwrap();

    let response = app
        .get_authenticated("/users", login["data"]["refreshToken"].as_str().unwrap())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(response).await, "invalid or expired token");
}

#[tokio::test]
async fn test_gate_rejects_reset_token() {
    let app = TestApp::spawn().await;
    app.create_password_user("a@x.com", "Pass_w0rd!").await;
    let ticket: Value = app
        .post("/auth/forgot-password/a@x.com")
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();

    let response = app
        .get_authenticated("/users", ticket["data"]["resetToken"].as_str().unwrap())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_routes_skip_gate() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/users")
        .json(&json!({
            "email": "a@x.com",
            "name": "Alice",
            "password": "Pass_w0rd!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_logged_out_token_still_accepted_without_enforcement() {
    let app = TestApp::spawn().await;
    app.create_password_user("a@x.com", "Pass_w0rd!").await;
    let token = app.access_token("a@x.com", "Pass_w0rd!").await;

    app.post_authenticated("/auth/logout", &token)
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .get_authenticated("/users", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logged_out_token_rejected_with_enforcement() {
    let app = TestApp::spawn_with(true).await;
    app.create_password_user("a@x.com", "Pass_w0rd!").await;
    let token = app.access_token("a@x.com", "Pass_w0rd!").await;

    let before = app
        .get_authenticated("/users", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(before.status(), StatusCode::OK);

    app.post_authenticated("/auth/logout", &token)
        .send()
        .await
        .expect("Failed to execute request");

    let after = app
        .get_authenticated("/users", &token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_of(after).await, "invalid or expired token");
}
