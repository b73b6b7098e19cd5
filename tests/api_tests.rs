use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use card_advisor::{
    create_router,
    db::{seed, InMemoryStore},
    models::CardRecord,
    services::ScoringConfig,
    AppState,
};

fn create_server(store: InMemoryStore) -> TestServer {
    let state = AppState::in_memory(store, ScoringConfig::default());
    let app = create_router(Arc::new(state));
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_server(InMemoryStore::seeded())
}

fn names(cards: &Value) -> Vec<String> {
    cards
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "6f1c1a52-9d4e-4f5e-8c57-0a6b0d7b2f10";

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_list_categories() {
    let server = create_test_server();
    let response = server.get("/api/v1/categories").await;
    response.assert_status_ok();
    let categories: Vec<String> = response.json();
    assert_eq!(
        categories,
        vec!["Dining", "Gas", "Groceries", "Online Shopping", "Travel"]
    );
}

#[tokio::test]
async fn test_recommend_dining_without_user() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "category": "Dining" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ranked");
    assert_eq!(body["category"], "Dining");
    assert_eq!(body["best_card"]["name"], "Dining Plus");
    assert_eq!(body["best_card"]["is_owned"], false);
    assert!(body["best_card"].get("comparison_note").is_none());
    assert_eq!(
        names(&body["eligible_cards"]),
        vec!["Everyday Cash Back", "Voyager Preferred", "Grocery Rewards"]
    );
    assert!(body["best_owned_card"].is_null());
}

#[tokio::test]
async fn test_recommend_is_case_insensitive() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "category": "  dINING " }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["category"], "Dining");
    assert_eq!(body["best_card"]["name"], "Dining Plus");
}

#[tokio::test]
async fn test_recommend_unknown_category() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "category": "Pets" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["status"], "category_not_found");
    assert_eq!(body["eligible_cards"], json!([]));
    assert!(body["best_card"].is_null());
    assert!(body["message"].as_str().unwrap().contains("Pets"));
}

#[tokio::test]
async fn test_recommend_requires_category() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "user_id": 1 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("category"));
}

#[tokio::test]
async fn test_recommend_with_empty_catalog() {
    let server = create_server(InMemoryStore::with_catalog(seed::sample_categories(), vec![]));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "category": "Dining" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "no_cards_available");
    assert_eq!(body["category"], "Dining");
    assert_eq!(body["eligible_cards"], json!([]));
}

#[tokio::test]
async fn test_recommend_with_no_eligible_cards() {
    let gas_only = CardRecord {
        id: 1,
        name: "Gas Only".to_string(),
        issuer: None,
        annual_fee: 0.0,
        reward_rules: Some(r#"{"Gas": 0.04}"#.to_string()),
        benefits: None,
        image_url: None,
    };
    let server = create_server(InMemoryStore::with_catalog(
        seed::sample_categories(),
        vec![gas_only],
    ));

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "category": "Travel" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "no_eligible_cards");
    assert!(body["best_card"].is_null());
}

#[tokio::test]
async fn test_recommend_for_user_with_owned_card() {
    let server = create_test_server();

    server
        .put("/api/v1/users/7/cards/2")
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "category": "Travel", "user_id": 7 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["best_card"]["name"], "Everyday Cash Back");
    assert_eq!(
        body["best_card"]["comparison_note"],
        "Earns 1.5% on Travel, more than the 1% from your Dining Plus"
    );
    assert_eq!(body["best_owned_card"]["name"], "Dining Plus");
    assert_eq!(body["best_owned_card"]["is_owned"], true);
}

#[tokio::test]
async fn test_owned_top_card_is_best_and_best_owned() {
    let server = create_test_server();
    server.put("/api/v1/users/3/cards/2").await;

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "category": "Dining", "user_id": 3 }))
        .await;

    let body: Value = response.json();
    assert_eq!(body["best_card"]["id"], 2);
    assert_eq!(body["best_card"]["is_owned"], true);
    assert_eq!(body["best_owned_card"]["id"], 2);
}

#[tokio::test]
async fn test_ownership_lifecycle() {
    let server = create_test_server();

    server
        .put("/api/v1/users/7/cards/3")
        .await
        .assert_status(StatusCode::CREATED);
    server
        .put("/api/v1/users/7/cards/3")
        .await
        .assert_status_ok();
    server
        .put("/api/v1/users/7/cards/99")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = server.get("/api/v1/users/7/cards").await;
    response.assert_status_ok();
    let owned: Vec<Value> = response.json();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0]["card_id"], 3);

    let response = server.get("/api/v1/cards?user_id=7").await;
    response.assert_status_ok();
    let cards: Vec<Value> = response.json();
    assert_eq!(cards.len(), 5);
    let owned_names: Vec<&str> = cards
        .iter()
        .filter(|card| card["is_owned"] == true)
        .map(|card| card["name"].as_str().unwrap())
        .collect();
    assert_eq!(owned_names, vec!["Voyager Preferred"]);

    server
        .delete("/api/v1/users/7/cards/3")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete("/api/v1/users/7/cards/3")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let owned: Vec<Value> = server.get("/api/v1/users/7/cards").await.json();
    assert!(owned.is_empty());
}
