//! Recipe generation and storage.

use axum::http::StatusCode;
use serde_json::json;

use pantry_integration_tests::{TestApp, recipe_requiring};
use pantry_server::generator::StubGenerator;

#[tokio::test]
async fn test_generate_returns_two_candidates_from_stock() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.prepare_kitchen(&cookie).await;

    let response = app.post("/api/recipes/generate", &cookie, json!({})).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let candidates = response.body["candidates"].as_array().unwrap();
    assert_eq!(candidates.len(), 2);
    assert_ne!(candidates[0]["title"], candidates[1]["title"]);
    let stocked = ["Flour", "Eggs", "Milk"];
    for candidate in candidates {
        for item in candidate["ingredients"].as_array().unwrap() {
            assert!(stocked.contains(&item["name"].as_str().unwrap()));
        }
    }

    // Generation stores nothing.
    let saved = app.get("/api/recipes", &cookie).await;
    assert!(saved.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_with_empty_pantry_fails() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;

    let response = app.post("/api/recipes/generate", &cookie, json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.error_code(), "generation_failed");
    assert_eq!(response.body["retryable"], true);
}

#[tokio::test]
async fn test_generator_failure_is_bad_gateway() {
    let app = TestApp::with_generator(StubGenerator::Failing);
    let cookie = app.sign_up("cook@example.com").await;
    app.prepare_kitchen(&cookie).await;

    let response = app.post("/api/recipes/generate", &cookie, json!({})).await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.error_code(), "generation_failed");
    assert!(!response.body["message"].as_str().unwrap().contains("stub"));
}

#[tokio::test]
async fn test_generated_candidate_can_be_saved() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.prepare_kitchen(&cookie).await;
    let generated = app.post("/api/recipes/generate", &cookie, json!({})).await;
    let candidate = generated.body["candidates"][0].clone();

    let saved = app.post("/api/recipes", &cookie, candidate.clone()).await;

    assert_eq!(saved.status, StatusCode::CREATED);
    assert_eq!(saved.body["recipe"]["title"], candidate["title"]);
    assert_eq!(saved.body["recipe"]["is_used"], false);
    assert!(saved.body["recipe"]["used_at"].is_null());
}

#[tokio::test]
async fn test_save_validates_candidate() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;

    let mut no_steps = recipe_requiring("Toast", &[("Bread", "2")]);
    no_steps["instructions"] = json!([]);
    let response = app.post("/api/recipes", &cookie, no_steps).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let no_ingredients = recipe_requiring("Air", &[]);
    let response = app.post("/api/recipes", &cookie, no_ingredients).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let zero = recipe_requiring("Nothing", &[("Bread", "0")]);
    let response = app.post("/api/recipes", &cookie, zero).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recipes_list_get_and_delete() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    let first = app
        .save_recipe(&cookie, recipe_requiring("Crepes", &[("Flour", "100")]))
        .await;
    let second = app
        .save_recipe(&cookie, recipe_requiring("Omelette", &[("Eggs", "3")]))
        .await;

    let list = app.get("/api/recipes", &cookie).await;
    let ids: Vec<i64> = list
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, [second, first]);

    let shown = app.get(&format!("/api/recipes/{first}"), &cookie).await;
    assert_eq!(shown.body["title"], "Crepes");
    assert_eq!(shown.body["ingredients"][0]["quantity"], "100");

    let unconfirmed = app.delete(&format!("/api/recipes/{first}"), &cookie).await;
    assert_eq!(unconfirmed.status, StatusCode::PRECONDITION_REQUIRED);

    let deleted = app
        .delete(&format!("/api/recipes/{first}?confirm=true"), &cookie)
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let gone = app.get(&format!("/api/recipes/{first}"), &cookie).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recipes_are_private() {
    let app = TestApp::new();
    let owner = app.sign_up("owner@example.com").await;
    let other = app.sign_up("other@example.com").await;
    let id = app
        .save_recipe(&owner, recipe_requiring("Crepes", &[("Flour", "100")]))
        .await;

    let response = app.get(&format!("/api/recipes/{id}"), &other).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_code(), "not_found");
}
