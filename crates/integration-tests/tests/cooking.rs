//! Cooking a saved recipe against live stock.

use axum::http::StatusCode;
use serde_json::{Value, json};

use pantry_integration_tests::{TestApp, recipe_requiring};

fn cook_uri(id: i64) -> String {
    format!("/api/recipes/{id}/cook")
}

#[tokio::test]
async fn test_cook_subtracts_exactly_and_marks_used() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;
    app.add_ingredient(&cookie, "Salt", "50", "g").await;
    let id = app
        .save_recipe(&cookie, recipe_requiring("Bread", &[("Flour", "200")]))
        .await;

    let response = app.post(&cook_uri(id), &cookie, Value::Null).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["recipe_id"], id);
    assert_eq!(
        response.body["consumed"],
        json!([{"name": "Flour", "quantity": "200"}])
    );
    assert_eq!(response.body["message"], "Recipe cooked");
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("300"));
    assert_eq!(app.stock_of(&cookie, "Salt").await.as_deref(), Some("50"));

    let recipe = app.get(&format!("/api/recipes/{id}"), &cookie).await;
    assert_eq!(recipe.body["is_used"], true);
    assert!(recipe.body["used_at"].is_string());
}

#[tokio::test]
async fn test_insufficient_stock_changes_nothing() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "100", "g").await;
    app.add_ingredient(&cookie, "Milk", "1000", "ml").await;
    let id = app
        .save_recipe(
            &cookie,
            recipe_requiring("Pancakes", &[("Milk", "300"), ("Flour", "200")]),
        )
        .await;

    let response = app.post(&cook_uri(id), &cookie, Value::Null).await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "insufficient_ingredient");
    assert!(response.body["message"].as_str().unwrap().contains("Flour"));
    assert_eq!(response.body["shortfalls"][0]["name"], "Flour");
    assert_eq!(response.body["shortfalls"][0]["required"], "200");
    assert_eq!(response.body["shortfalls"][0]["available"], "100");
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("100"));
    assert_eq!(app.stock_of(&cookie, "Milk").await.as_deref(), Some("1000"));

    let recipe = app.get(&format!("/api/recipes/{id}"), &cookie).await;
    assert_eq!(recipe.body["is_used"], false);
}

#[tokio::test]
async fn test_missing_ingredient_is_reported() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;
    let id = app
        .save_recipe(
            &cookie,
            recipe_requiring("Custard", &[("Flour", "10"), ("Vanilla", "1")]),
        )
        .await;

    let response = app.post(&cook_uri(id), &cookie, Value::Null).await;

    assert_eq!(response.error_code(), "insufficient_ingredient");
    assert_eq!(response.body["shortfalls"][0]["name"], "Vanilla");
    assert!(response.body["shortfalls"][0]["available"].is_null());
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("500"));
}

#[tokio::test]
async fn test_second_cook_is_already_used() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;
    let id = app
        .save_recipe(&cookie, recipe_requiring("Bread", &[("Flour", "200")]))
        .await;

    let first = app.post(&cook_uri(id), &cookie, Value::Null).await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app.post(&cook_uri(id), &cookie, Value::Null).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.error_code(), "already_used");
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("300"));
}

#[tokio::test]
async fn test_cook_retries_transient_failures() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;
    let id = app
        .save_recipe(&cookie, recipe_requiring("Bread", &[("Flour", "200")]))
        .await;
    app.store.fail_next_cooks(2);

    let response = app.post(&cook_uri(id), &cookie, Value::Null).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("300"));
}

#[tokio::test]
async fn test_lost_reply_is_not_applied_twice() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;
    let id = app
        .save_recipe(&cookie, recipe_requiring("Bread", &[("Flour", "200")]))
        .await;
    app.store.lose_next_cook_replies(1);

    let response = app.post(&cook_uri(id), &cookie, Value::Null).await;

    assert_eq!(response.error_code(), "already_used");
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("300"));
}

#[tokio::test]
async fn test_persistent_storage_failure_is_transient_error() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;
    let id = app
        .save_recipe(&cookie, recipe_requiring("Bread", &[("Flour", "200")]))
        .await;
    app.store.fail_next_cooks(10);

    let response = app.post(&cook_uri(id), &cookie, Value::Null).await;

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.error_code(), "transient");
    assert_eq!(response.body["retryable"], true);
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("500"));
}

#[tokio::test]
async fn test_cooking_someone_elses_recipe_is_not_found() {
    let app = TestApp::new();
    let owner = app.sign_up("owner@example.com").await;
    let other = app.sign_up("other@example.com").await;
    app.add_ingredient(&owner, "Flour", "500", "g").await;
    app.add_ingredient(&other, "Flour", "500", "g").await;
    let id = app
        .save_recipe(&owner, recipe_requiring("Bread", &[("Flour", "200")]))
        .await;

    let response = app.post(&cook_uri(id), &other, Value::Null).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.stock_of(&owner, "Flour").await.as_deref(), Some("500"));
    assert_eq!(app.stock_of(&other, "Flour").await.as_deref(), Some("500"));
}

#[tokio::test]
async fn test_duplicate_names_in_a_recipe_are_summed() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;
    let id = app
        .save_recipe(
            &cookie,
            recipe_requiring("Layered", &[("Flour", "200"), ("Flour", "250")]),
        )
        .await;

    let response = app.post(&cook_uri(id), &cookie, Value::Null).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["consumed"][0]["quantity"], "450");
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("50"));
}
