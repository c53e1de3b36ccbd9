//! Ingredient and utensil routes.

use axum::http::{Method, StatusCode};
use serde_json::json;

use pantry_integration_tests::TestApp;

#[tokio::test]
async fn test_ingredients_list_newest_first() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;
    app.add_ingredient(&cookie, "Eggs", "6", "pcs").await;

    let response = app.get("/api/ingredients", &cookie).await;

    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Eggs", "Flour"]);
}

#[tokio::test]
async fn test_create_with_existing_name_is_conflict_and_keeps_row() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;

    let response = app
        .post(
            "/api/ingredients",
            &cookie,
            json!({"name": "Flour", "quantity": "1", "unit": "kg"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "duplicate_key");
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("500"));

    // An explicit edit is the way to change it.
    let id = app.get("/api/ingredients", &cookie).await.body[0]["id"]
        .as_i64()
        .unwrap();
    let edited = app
        .patch(
            &format!("/api/ingredients/{id}"),
            &cookie,
            json!({"quantity": 750}),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["quantity"], "750");
    assert_eq!(edited.body["unit"], "g");
}

#[tokio::test]
async fn test_upsert_by_name_never_adds_a_row() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    app.add_ingredient(&cookie, "Flour", "500", "g").await;

    for quantity in ["200", "900"] {
        let response = app
            .put(
                "/api/ingredients",
                &cookie,
                json!({"name": "Flour", "quantity": quantity, "unit": "g"}),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let list = app.get("/api/ingredients", &cookie).await;
    assert_eq!(list.body.as_array().unwrap().len(), 1);
    assert_eq!(app.stock_of(&cookie, "Flour").await.as_deref(), Some("900"));
}

#[tokio::test]
async fn test_ingredient_validation() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;

    for body in [
        json!({"name": "  ", "quantity": "1", "unit": "g"}),
        json!({"name": "Flour", "quantity": "0", "unit": "g"}),
        json!({"name": "Flour", "quantity": "-2", "unit": "g"}),
        json!({"name": "Flour", "quantity": "lots", "unit": "g"}),
        json!({"name": "Flour", "quantity": "1", "unit": ""}),
    ] {
        let response = app.post("/api/ingredients", &cookie, body.clone()).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response.error_code(), "validation_error");
    }

    let empty_patch = app.patch("/api/ingredients/1", &cookie, json!({})).await;
    assert_eq!(empty_patch.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_validation_error() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;

    let missing_field = app
        .post("/api/ingredients", &cookie, json!({"name": "Flour"}))
        .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field.error_code(), "validation_error");

    let bad_id = app.get("/api/recipes/not-a-number", &cookie).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_id.error_code(), "validation_error");
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;
    let id = app.add_ingredient(&cookie, "Flour", "500", "g").await["id"]
        .as_i64()
        .unwrap();

    let unconfirmed = app
        .delete(&format!("/api/ingredients/{id}"), &cookie)
        .await;
    assert_eq!(unconfirmed.status, StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(unconfirmed.error_code(), "confirmation_required");
    assert!(app.stock_of(&cookie, "Flour").await.is_some());

    let confirmed = app
        .delete(&format!("/api/ingredients/{id}?confirm=true"), &cookie)
        .await;
    assert_eq!(confirmed.status, StatusCode::NO_CONTENT);
    assert!(app.stock_of(&cookie, "Flour").await.is_none());

    let again = app
        .delete(&format!("/api/ingredients/{id}?confirm=true"), &cookie)
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_other_users_rows_are_not_found() {
    let app = TestApp::new();
    let owner = app.sign_up("owner@example.com").await;
    let other = app.sign_up("other@example.com").await;
    let id = app.add_ingredient(&owner, "Saffron", "1", "g").await["id"]
        .as_i64()
        .unwrap();

    let edit = app
        .patch(
            &format!("/api/ingredients/{id}"),
            &other,
            json!({"quantity": "100"}),
        )
        .await;
    assert_eq!(edit.status, StatusCode::NOT_FOUND);

    let delete = app
        .delete(&format!("/api/ingredients/{id}?confirm=true"), &other)
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    assert!(
        app.get("/api/ingredients", &other)
            .await
            .body
            .as_array()
            .unwrap()
            .is_empty()
    );
    assert_eq!(app.stock_of(&owner, "Saffron").await.as_deref(), Some("1"));
}

#[tokio::test]
async fn test_utensil_lifecycle() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;

    let created = app
        .post("/api/utensils", &cookie, json!({"name": "Whisk"}))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();

    let duplicate = app
        .post("/api/utensils", &cookie, json!({"name": "Whisk"}))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let upserted = app
        .put("/api/utensils", &cookie, json!({"name": "Whisk"}))
        .await;
    assert_eq!(upserted.status, StatusCode::OK);
    assert_eq!(upserted.body["id"], id);

    let renamed = app
        .patch(
            &format!("/api/utensils/{id}"),
            &cookie,
            json!({"name": "Balloon whisk"}),
        )
        .await;
    assert_eq!(renamed.body["name"], "Balloon whisk");

    let deleted = app
        .call(
            Method::DELETE,
            &format!("/api/utensils/{id}?confirm=true"),
            Some(&cookie),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(
        app.get("/api/utensils", &cookie)
            .await
            .body
            .as_array()
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_preferences_roundtrip() {
    let app = TestApp::new();
    let cookie = app.sign_up("cook@example.com").await;

    let initial = app.get("/api/preferences", &cookie).await;
    assert_eq!(initial.body["saved"], false);
    assert_eq!(initial.body["preferences"]["time_minutes"], 30);
    assert_eq!(initial.body["preferences"]["portions"], 2);

    let saved = app
        .put(
            "/api/preferences",
            &cookie,
            json!({
                "diet": ["Vegan"],
                "custom_diet": "Low sodium",
                "tastes": ["Thai", "Thai", "Indian"],
                "difficulty": "medium",
                "portions": 4,
            }),
        )
        .await;
    assert_eq!(saved.status, StatusCode::OK);
    assert_eq!(saved.body["saved"], true);
    assert_eq!(saved.body["complete"], true);
    assert_eq!(saved.body["preferences"]["diet"], "Vegan, Low sodium");
    assert_eq!(saved.body["preferences"]["tastes"], json!(["Thai", "Indian"]));
    assert_eq!(saved.body["preferences"]["portions"], 4);

    let out_of_range = app
        .put("/api/preferences", &cookie, json!({"portions": 0}))
        .await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);
}
