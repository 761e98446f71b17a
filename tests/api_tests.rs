//! API integration tests
//!
//! These run against a live server with a migrated database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use reqwest::Client;
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("SHELFMARK_TEST_URL").unwrap_or_else(|_| "http://localhost:8000/api".to_string())
}

/// Unique suffix so runs against the same database never collide
fn unique(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Register a fresh user and return its bearer token
async fn get_auth_token(client: &Client) -> String {
    let email = format!("{}@example.com", unique("tester"));
    let response = client
        .post(format!("{}/register", base_url()))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "password123",
            "password_confirmation": "password123"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    let body: Value = response.json().await.expect("Failed to parse register response");
    body["token"].as_str().expect("No token in response").to_string()
}

async fn create_author(client: &Client, token: &str, name: &str) -> Value {
    let response = client
        .post(format!("{}/authors", base_url()))
        .bearer_auth(token)
        .json(&json!({"name": name, "bio": "A bio"}))
        .send()
        .await
        .expect("Failed to create author");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse author")
}

async fn create_publisher(client: &Client, token: &str, name: &str) -> Value {
    let response = client
        .post(format!("{}/publishers", base_url()))
        .bearer_auth(token)
        .json(&json!({"name": name, "address": "1 Example Street"}))
        .send()
        .await
        .expect("Failed to create publisher");
    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse publisher")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_ping() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ping", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "success");
}

#[tokio::test]
#[ignore]
async fn test_register_and_me() {
    let client = Client::new();
    let email = format!("{}@example.com", unique("ada"));

    let response = client
        .post(format!("{}/register", base_url()))
        .json(&json!({
            "name": "Ada",
            "email": email,
            "password": "secret1",
            "password_confirmation": "secret1"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let token = body["token"].as_str().expect("token is a string");
    assert!(!token.is_empty());
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["user"]["email"], email);
    assert!(body["user"].get("password").is_none());

    let response = client
        .get(format!("{}/me", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let profile: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(profile["name"], "Ada");
    assert_eq!(profile["email"], email);
}

#[tokio::test]
#[ignore]
async fn test_register_requires_name_email_password() {
    let client = Client::new();

    let response = client
        .post(format!("{}/register", base_url()))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_register_rejects_duplicate_email() {
    let client = Client::new();
    let email = format!("{}@example.com", unique("dup"));
    let payload = json!({
        "name": "First",
        "email": email,
        "password": "password123"
    });

    let response = client
        .post(format!("{}/register", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/register", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_register_rejects_short_password() {
    let client = Client::new();

    let response = client
        .post(format!("{}/register", base_url()))
        .json(&json!({
            "name": "Short",
            "email": format!("{}@example.com", unique("short")),
            "password": "12345"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_register_rejects_confirmation_mismatch() {
    let client = Client::new();

    let response = client
        .post(format!("{}/register", base_url()))
        .json(&json!({
            "name": "Mismatch",
            "email": format!("{}@example.com", unique("mismatch")),
            "password": "password123",
            "password_confirmation": "password456"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_invalid_credentials_are_indistinguishable() {
    let client = Client::new();
    let email = format!("{}@example.com", unique("indist"));

    client
        .post(format!("{}/register", base_url()))
        .json(&json!({
            "name": "Known",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    // wrong password for a known email
    let wrong_password = client
        .post(format!("{}/login", base_url()))
        .json(&json!({"email": email, "password": "wrongpassword"}))
        .send()
        .await
        .expect("Failed to send request");
    let wrong_password_status = wrong_password.status();
    let wrong_password_body: Value = wrong_password.json().await.expect("parse");

    // unknown email entirely
    let unknown_email = client
        .post(format!("{}/login", base_url()))
        .json(&json!({"email": "nobody@example.invalid", "password": "password123"}))
        .send()
        .await
        .expect("Failed to send request");
    let unknown_email_status = unknown_email.status();
    let unknown_email_body: Value = unknown_email.json().await.expect("parse");

    assert_eq!(wrong_password_status, 401);
    assert_eq!(unknown_email_status, 401);
    assert_eq!(wrong_password_body, unknown_email_body);
    assert_eq!(wrong_password_body["error"], "Invalid credentials");
}

#[tokio::test]
#[ignore]
async fn test_login_returns_token() {
    let client = Client::new();
    let email = format!("{}@example.com", unique("login"));

    client
        .post(format!("{}/register", base_url()))
        .json(&json!({
            "name": "Login",
            "email": email,
            "password": "password123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .post(format!("{}/login", base_url()))
        .json(&json!({"email": email, "password": "password123"}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_logout_requires_token() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/logout", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("parse");
    assert!(body["message"].is_string());

    let response = client
        .post(format!("{}/logout", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unauthenticated_list_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/authors", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    // query parameters make no difference
    let response = client
        .get(format!("{}/authors?page=1&name=John", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_author_crud_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let name = unique("Lifecycle Author");

    // create then get returns the payload plus a generated id
    let created = create_author(&client, &token, &name).await;
    let id = created["id"].as_i64().expect("id");
    assert_eq!(created["name"], name.as_str());
    assert_eq!(created["bio"], "A bio");

    let response = client
        .get(format!("{}/authors/{}", base_url(), id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let fetched: Value = response.json().await.expect("parse");
    assert_eq!(fetched["name"], created["name"]);
    assert_eq!(fetched["bio"], created["bio"]);

    // partial update: only the supplied field changes
    let response = client
        .put(format!("{}/authors/{}", base_url(), id))
        .bearer_auth(&token)
        .json(&json!({"bio": "Rewritten bio"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.expect("parse");
    assert_eq!(updated["name"], name.as_str());
    assert_eq!(updated["bio"], "Rewritten bio");

    // delete, then both get and a second delete are 404
    let response = client
        .delete(format!("{}/authors/{}", base_url(), id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("parse");
    assert_eq!(body["message"], "Author deleted");

    let response = client
        .get(format!("{}/authors/{}", base_url(), id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let response = client
        .delete(format!("{}/authors/{}", base_url(), id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_update_missing_author_is_404() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .put(format!("{}/authors/99999999", base_url()))
        .bearer_auth(&token)
        .json(&json!({"name": "Ghost"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_name_filter_and_legacy_search_precedence() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let john = unique("John");
    let jane = unique("Jane");
    create_author(&client, &token, &john).await;
    create_author(&client, &token, &jane).await;

    // case-insensitive substring match on the canonical parameter
    let response = client
        .get(format!("{}/authors", base_url()))
        .bearer_auth(&token)
        .query(&[("name", john.to_lowercase())])
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("parse");
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["name"], john.as_str());

    // the legacy alias works on its own
    let response = client
        .get(format!("{}/authors", base_url()))
        .bearer_auth(&token)
        .query(&[("search", jane.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("parse");
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["name"], jane.as_str());

    // when both are supplied, the canonical parameter wins
    let response = client
        .get(format!("{}/authors", base_url()))
        .bearer_auth(&token)
        .query(&[("name", john.as_str()), ("search", jane.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("parse");
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["name"], john.as_str());
}

#[tokio::test]
#[ignore]
async fn test_pagination_envelope_shape() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let marker = unique("Envelope");
    for i in 0..3 {
        create_author(&client, &token, &format!("{} {}", marker, i)).await;
    }

    let response = client
        .get(format!("{}/authors", base_url()))
        .bearer_auth(&token)
        .query(&[("page", "1"), ("name", marker.as_str())])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("parse");
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["last_page"], 1);
    assert_eq!(body["per_page"], 10);
    assert_eq!(body["from"], 1);
    assert_eq!(body["to"], 3);
    assert_eq!(body["data"].as_array().expect("data").len(), 3);
}

#[tokio::test]
#[ignore]
async fn test_book_requires_existing_references() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let publisher = create_publisher(&client, &token, &unique("Existing House")).await;

    let title = unique("Dangling Book");
    let response = client
        .post(format!("{}/books", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "title": title,
            "author_id": 99999999,
            "publisher_id": publisher["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.expect("parse");
    assert!(body["errors"]["author_id"].is_array());

    // no row was inserted
    let response = client
        .get(format!("{}/books", base_url()))
        .bearer_auth(&token)
        .query(&[("title", title.as_str())])
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("parse");
    assert_eq!(body["total"], 0);
}

#[tokio::test]
#[ignore]
async fn test_book_embeds_author_and_publisher() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let author = create_author(&client, &token, &unique("Embedded Author")).await;
    let publisher = create_publisher(&client, &token, &unique("Embedded House")).await;

    let response = client
        .post(format!("{}/books", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "title": unique("Embedded Book"),
            "description": "With relations",
            "author_id": author["id"],
            "publisher_id": publisher["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let book: Value = response.json().await.expect("parse");
    assert_eq!(book["author"]["name"], author["name"]);
    assert_eq!(book["publisher"]["name"], publisher["name"]);

    // the exact-match filter finds it and rows stay expanded
    let response = client
        .get(format!("{}/books", base_url()))
        .bearer_auth(&token)
        .query(&[("author_id", author["id"].to_string())])
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("parse");
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["author"]["name"], author["name"]);
}

#[tokio::test]
#[ignore]
async fn test_book_sort_by_title_descending() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let author = create_author(&client, &token, &unique("Sorted Author")).await;
    let publisher = create_publisher(&client, &token, &unique("Sorted House")).await;
    let marker = unique("Sortable");

    for title in ["Alpha", "Beta"] {
        let response = client
            .post(format!("{}/books", base_url()))
            .bearer_auth(&token)
            .json(&json!({
                "title": format!("{} {}", marker, title),
                "author_id": author["id"],
                "publisher_id": publisher["id"]
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
    }

    let response = client
        .get(format!("{}/books", base_url()))
        .bearer_auth(&token)
        .query(&[
            ("title", marker.as_str()),
            ("sort_by", "title"),
            ("order", "desc"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("parse");
    assert_eq!(body["total"], 2);
    assert_eq!(
        body["data"][0]["title"],
        format!("{} Beta", marker).as_str()
    );
}

#[tokio::test]
#[ignore]
async fn test_book_partial_update_keeps_other_fields() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let author = create_author(&client, &token, &unique("Stable Author")).await;
    let publisher = create_publisher(&client, &token, &unique("Stable House")).await;
    let title = unique("Stable Book");

    let response = client
        .post(format!("{}/books", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "title": title,
            "description": "First edition",
            "author_id": author["id"],
            "publisher_id": publisher["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");
    let book: Value = response.json().await.expect("parse");

    let response = client
        .put(format!("{}/books/{}", base_url(), book["id"]))
        .bearer_auth(&token)
        .json(&json!({"description": "Second edition"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.expect("parse");
    assert_eq!(updated["title"], title.as_str());
    assert_eq!(updated["description"], "Second edition");
    assert_eq!(updated["author_id"], book["author_id"]);
}

#[tokio::test]
#[ignore]
async fn test_referenced_author_cannot_be_deleted() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let author = create_author(&client, &token, &unique("Referenced Author")).await;
    let publisher = create_publisher(&client, &token, &unique("Referenced House")).await;

    let response = client
        .post(format!("{}/books", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "title": unique("Referencing Book"),
            "author_id": author["id"],
            "publisher_id": publisher["id"]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .delete(format!("{}/authors/{}", base_url(), author["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}
