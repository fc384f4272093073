//! HTTP surface checks against a live server.

#![allow(clippy::unwrap_used)]

use chef_em_casa_integration_tests::TestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn test_health_and_request_id() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(Uuid::parse_str(&id).is_ok());
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = client
        .get(server.url("/health"))
        .header("x-request-id", "edge-42")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "edge-42");
}

#[tokio::test]
async fn test_recipes_are_camel_case_json() {
    let server = TestServer::start().await;

    let recipes: Value = reqwest::get(server.url("/api/recipes"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let first = recipes.get(0).unwrap();
    assert_eq!(first["id"], "1");
    assert!(first.get("prepTime").is_some());
    assert!(first.get("cookTime").is_some());
}

#[tokio::test]
async fn test_create_recipe_statuses() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/recipes"))
        .json(&json!({
            "title": "Cuscuz Paulista",
            "image": "https://img/cuscuz.jpg",
            "authorId": "u1"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let recipe: Value = response.json().await.unwrap();
    assert_eq!(recipe["authorId"], "u1");
    assert_eq!(recipe["rating"], 5.0);

    let response = client
        .post(server.url("/api/recipes"))
        .json(&json!({ "title": "Sem foto", "image": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("image"));
}

#[tokio::test]
async fn test_user_endpoints() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/users"))
        .json(&json!({ "name": "Ana", "email": "ana@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user: Value = response.json().await.unwrap();
    assert_eq!(user["provider"], "email");
    assert_eq!(user["isVerified"], false);

    let response = client
        .get(server.url("/api/users/ana@example.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(server.url("/api/users/ANA@example.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .get(server.url(&format!("/api/users/{}@example.com", "a".repeat(260))))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(server.url("/api/users"))
        .json(&json!({ "name": "Sem email" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client
        .post(server.url("/api/users/verify"))
        .json(&json!({ "email": "nobody@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorites_and_shopping_endpoints() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let user: Value = client
        .post(server.url("/api/users"))
        .json(&json!({ "name": "Ana", "email": "ana@example.com" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let user_id = user["id"].as_str().unwrap();

    let favorites: Value = client
        .post(server.url(&format!("/api/favorites/{user_id}/2")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(favorites, json!({ "favorites": ["2"] }));

    let response = client
        .post(server.url("/api/favorites/ghost/2"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .post(server.url(&format!("/api/shopping-lists/{user_id}")))
        .json(&json!({ "items": [{ "name": "Farinha", "amount": "2 xícaras", "checked": true }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let items: Value = reqwest::get(server.url(&format!("/api/shopping-lists/{user_id}")))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        items,
        json!([{ "name": "Farinha", "amount": "2 xícaras", "checked": false }])
    );
}

#[tokio::test]
async fn test_chef_advice_endpoint() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/chef/advice"))
        .json(&json!({ "recipeTitle": "Bolo", "question": "Posso substituir o leite?" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(body["answer"].as_str().unwrap().starts_with("Sobre \"Bolo\""));

    let response = client
        .post(server.url("/api/chef/advice"))
        .json(&json!({ "recipeTitle": "Bolo", "question": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_google_sign_in_disabled_without_credentials() {
    let server = TestServer::start().await;
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let response = client
        .get(server.url("/auth/google/login"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_writes_reach_the_data_file() {
    let server = TestServer::start().await;
    reqwest::Client::new()
        .post(server.url("/api/users"))
        .json(&json!({ "name": "Ana", "email": "ana@example.com" }))
        .send()
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&server.data_file).unwrap();
    let document: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(document["users"][0]["email"], "ana@example.com");
    assert!(document.get("shoppingLists").is_some());
}
