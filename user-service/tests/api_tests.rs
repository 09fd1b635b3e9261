mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

const STRONG_PASSWORD: &str = "Str0ng!Pass";

#[tokio::test]
async fn test_register_user_success() {
    let app = TestApp::spawn().await;

    let response = app
        .register("janedoe", "jane@example.com", STRONG_PASSWORD)
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["username"], "janedoe");
    assert_eq!(body["data"]["email"], "jane@example.com");
    assert_eq!(body["data"]["role"], "User");
    assert_eq!(body["data"]["message"], "User Registered!");
    assert!(body["data"]["id"].is_string());
    assert!(body["data"]["created_at"].is_string());
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_user_duplicate_username() {
    let app = TestApp::spawn().await;

    app.register("janedoe", "jane@example.com", STRONG_PASSWORD)
        .await;

    // Same username, different email
    let response = app
        .register("janedoe", "other@example.com", STRONG_PASSWORD)
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_user_duplicate_email() {
    let app = TestApp::spawn().await;

    app.register("janedoe", "jane@example.com", STRONG_PASSWORD)
        .await;

    // Different username, same email
    let response = app
        .register("johndoe", "jane@example.com", STRONG_PASSWORD)
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_user_invalid_username() {
    let app = TestApp::spawn().await;

    let response = app.register("ab", "jane@example.com", STRONG_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("minimum 3 characters"));
}

#[tokio::test]
async fn test_register_user_invalid_email() {
    let app = TestApp::spawn().await;

    let response = app.register("janedoe", "not-an-email", STRONG_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_user_weak_password() {
    let app = TestApp::spawn().await;

    let response = app.register("janedoe", "jane@example.com", "short").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let message = body["data"]["message"].as_str().unwrap();
    assert!(message.contains("Minimum password length should be 8 characters."));
    assert!(message.contains("at least one lowercase letter"));
    assert!(message.contains("at least one special character"));

    // Nothing was stored, so the username is still free
    let response = app
        .register("janedoe", "jane@example.com", STRONG_PASSWORD)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_user_missing_field() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/user/register")
        .json(&json!({
            "username": "janedoe",
            "password": STRONG_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;

    app.register("janedoe", "jane@example.com", STRONG_PASSWORD)
        .await;

    let response = app.login("janedoe", STRONG_PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Login Success!");
    assert_eq!(body["data"]["user"]["username"], "janedoe");
    assert!(body["data"]["user"].get("password_hash").is_none());

    let token = body["data"]["token"].as_str().expect("token in response");
    let claims = app.token_issuer.validate(token).expect("token validates");
    assert_eq!(claims.role, "User");
    assert_eq!(claims.display_name, "Jane:Doe");
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;

    app.register("janedoe", "jane@example.com", STRONG_PASSWORD)
        .await;

    let response = app.login("janedoe", "Wr0ng!Pass").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "Invalid credentials");
    assert!(body["data"].get("token").is_none());
}

#[tokio::test]
async fn test_login_unknown_user_looks_like_wrong_password() {
    let app = TestApp::spawn().await;

    app.register("janedoe", "jane@example.com", STRONG_PASSWORD)
        .await;

    let unknown = app.login("nobody", STRONG_PASSWORD).await;
    let wrong = app.login("janedoe", "Wr0ng!Pass").await;

    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let unknown: serde_json::Value = unknown.json().await.unwrap();
    let wrong: serde_json::Value = wrong.json().await.unwrap();
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn test_list_users_requires_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/user")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_users_with_token() {
    let app = TestApp::spawn().await;

    app.register("janedoe", "jane@example.com", STRONG_PASSWORD)
        .await;
    app.register("johndoe", "john@example.com", STRONG_PASSWORD)
        .await;

    let login: serde_json::Value = app
        .login("janedoe", STRONG_PASSWORD)
        .await
        .json()
        .await
        .unwrap();
    let token = login["data"]["token"].as_str().unwrap();

    let response = app
        .get_authenticated("/api/user", token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let users = body["data"].as_array().expect("list of users");
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password_hash").is_none());
        assert!(user["username"].is_string());
    }
}

#[tokio::test]
async fn test_list_users_with_tampered_token() {
    let app = TestApp::spawn().await;

    app.register("janedoe", "jane@example.com", STRONG_PASSWORD)
        .await;

    let login: serde_json::Value = app
        .login("janedoe", STRONG_PASSWORD)
        .await
        .json()
        .await
        .unwrap();
    let token = login["data"]["token"].as_str().unwrap();

    // Swap the first character of the signature
    let signature_start = token.rfind('.').unwrap() + 1;
    let original = &token[signature_start..signature_start + 1];
    let replacement = if original == "A" { "B" } else { "A" };
    let tampered = format!(
        "{}{}{}",
        &token[..signature_start],
        replacement,
        &token[signature_start + 1..]
    );

    let response = app
        .get_authenticated("/api/user", &tampered)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
