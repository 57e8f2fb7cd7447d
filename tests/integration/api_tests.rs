//! API integration tests
//!
//! Run against a live server with: cargo test -- --ignored

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Username unlikely to clash with earlier runs
fn unique_name(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_nanos();
    format!("{}_{}", prefix, nanos)
}

/// Register a fresh user and return its token
async fn register(client: &Client, prefix: &str) -> String {
    let password = "correct horse battery";
    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": unique_name(prefix),
            "password": password,
            "password_confirmation": password
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse register response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn create_book(client: &Client, token: &str) -> i64 {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "first_name": "George", "last_name": "Orwell" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let author: Value = response.json().await.expect("Failed to parse response");

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(token)
        .json(&json!({ "author_id": author["id"], "title": "1984" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let book: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(book["is_owner"], true);
    assert_eq!(book["is_borrowed"], false);
    book["id"].as_i64().expect("No book ID")
}

async fn borrow(client: &Client, token: &str, book_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/books/{}/borrow", BASE_URL, book_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_then_login() {
    let client = Client::new();
    let username = unique_name("login");

    let response = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&json!({
            "username": username,
            "password": "correct horse battery",
            "password_confirmation": "correct horse battery"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": username, "password": "correct horse battery" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["token_type"], "Bearer");
    let token = body["token"].as_str().expect("No token").to_string();

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], username.as_str());
    assert!(body.get("password").is_none());
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_username() {
    let client = Client::new();
    let username = unique_name("dup");
    let payload = json!({
        "username": username,
        "password": "correct horse battery",
        "password_confirmation": "correct horse battery"
    });

    let first = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("{}/auth/register", BASE_URL))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "username": "nobody", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_borrow_with_already_borrowed_book() {
    let client = Client::new();
    let owner = register(&client, "owner").await;
    let borrower = register(&client, "borrower").await;
    let latecomer = register(&client, "latecomer").await;
    let book_id = create_book(&client, &owner).await;

    let response = borrow(&client, &borrower, book_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let request: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(request["status"], "pending");

    let response = client
        .post(format!("{}/requests/{}/approve", BASE_URL, request["id"]))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = borrow(&client, &latecomer, book_id).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_borrow_already_requested_book() {
    let client = Client::new();
    let owner = register(&client, "owner").await;
    let borrower = register(&client, "borrower").await;
    let book_id = create_book(&client, &owner).await;

    assert_eq!(borrow(&client, &borrower, book_id).await.status(), StatusCode::CREATED);
    assert_eq!(borrow(&client, &borrower, book_id).await.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_owner_cannot_borrow_own_book() {
    let client = Client::new();
    let owner = register(&client, "owner").await;
    let book_id = create_book(&client, &owner).await;

    let response = borrow(&client, &owner, book_id).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore]
async fn test_approve_with_multiple_pending_requests() {
    let client = Client::new();
    let owner = register(&client, "owner").await;
    let book_id = create_book(&client, &owner).await;

    let mut request_ids = Vec::new();
    for prefix in ["borrower1", "borrower2", "borrower3"] {
        let token = register(&client, prefix).await;
        let response = borrow(&client, &token, book_id).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.expect("Failed to parse response");
        request_ids.push(body["id"].as_i64().expect("No request ID"));
    }

    let response = client
        .post(format!("{}/requests/{}/approve", BASE_URL, request_ids[0]))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "approved");

    let response = client
        .get(format!("{}/books/{}/requests", BASE_URL, book_id))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    let requests: Value = response.json().await.expect("Failed to parse response");
    let requests = requests.as_array().expect("Expected an array");

    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r["status"] != "pending"));
    assert_eq!(requests.iter().filter(|r| r["status"] == "approved").count(), 1);

    let response = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    let book: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(book["is_borrowed"], true);
}

#[tokio::test]
#[ignore]
async fn test_only_owner_can_decide() {
    let client = Client::new();
    let owner = register(&client, "owner").await;
    let borrower = register(&client, "borrower").await;
    let book_id = create_book(&client, &owner).await;

    let response = borrow(&client, &borrower, book_id).await;
    let request: Value = response.json().await.expect("Failed to parse response");

    let response = client
        .post(format!("{}/requests/{}/approve", BASE_URL, request["id"]))
        .bearer_auth(&borrower)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .post(format!("{}/requests/{}/decline", BASE_URL, request["id"]))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "declined");

    // Declined requests are final
    let response = client
        .post(format!("{}/requests/{}/approve", BASE_URL, request["id"]))
        .bearer_auth(&owner)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .get(format!("{}/requests/mine?status=declined", BASE_URL))
        .bearer_auth(&borrower)
        .send()
        .await
        .expect("Failed to send request");
    let mine: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
