//! Integration test harness for Pantry.
//!
//! Drives the full router (sessions, request ids, tracing and every route)
//! in process with `tower::ServiceExt::oneshot`, backed by the in-memory
//! store and a stub generator. No database or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pantry-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::cookie::Key;

use pantry_server::db::memory::MemoryStore;
use pantry_server::generator::StubGenerator;
use pantry_server::middleware::session_layer;
use pantry_server::routes;
use pantry_server::state::AppState;

/// Upper bound on response bodies read by tests.
const MAX_BODY: usize = 1024 * 1024;

/// A router wired to an in-memory store.
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
}

/// A response with its body decoded.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// JSON body; plain text is wrapped in a string, empty bodies are `null`.
    pub body: Value,
    /// `name=value` of a `Set-Cookie` header, if any.
    pub cookie: Option<String>,
}

impl TestResponse {
    /// The stable error code of an error response.
    #[must_use]
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// App whose generator builds recipes from the pantry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_generator(StubGenerator::FromPantry)
    }

    #[must_use]
    pub fn with_generator(generator: StubGenerator) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), Arc::new(generator));
        let sessions = session_layer(
            tower_sessions::MemoryStore::default(),
            false,
            Key::from(&[7_u8; 64]),
        );
        Self {
            router: routes::app(state, sessions),
            store,
        }
    }

    /// Send a request, optionally with a session cookie and JSON body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_owned);
        let bytes = to_bytes(response.into_body(), MAX_BODY).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
            cookie,
        }
    }

    pub async fn get(&self, uri: &str, cookie: &str) -> TestResponse {
        self.call(Method::GET, uri, Some(cookie), None).await
    }

    pub async fn post(&self, uri: &str, cookie: &str, body: Value) -> TestResponse {
        self.call(Method::POST, uri, Some(cookie), Some(body)).await
    }

    pub async fn put(&self, uri: &str, cookie: &str, body: Value) -> TestResponse {
        self.call(Method::PUT, uri, Some(cookie), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, cookie: &str, body: Value) -> TestResponse {
        self.call(Method::PATCH, uri, Some(cookie), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, cookie: &str) -> TestResponse {
        self.call(Method::DELETE, uri, Some(cookie), None).await
    }

    /// Register an account and return its session cookie.
    pub async fn sign_up(&self, email: &str) -> String {
        let response = self
            .call(
                Method::POST,
                "/api/auth/sign-up",
                None,
                Some(json!({
                    "email": email,
                    "password": "correct horse battery",
                    "display_name": "Test Cook",
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.cookie.unwrap()
    }

    /// Stock one ingredient through the create path.
    pub async fn add_ingredient(&self, cookie: &str, name: &str, quantity: &str, unit: &str) -> Value {
        let response = self
            .post(
                "/api/ingredients",
                cookie,
                json!({"name": name, "quantity": quantity, "unit": unit}),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body
    }

    /// Clear the ingredient, utensil and preference steps.
    pub async fn prepare_kitchen(&self, cookie: &str) {
        for (name, quantity) in [("Flour", "500"), ("Eggs", "6"), ("Milk", "1000")] {
            self.add_ingredient(cookie, name, quantity, "g").await;
        }
        let response = self
            .post("/api/utensils", cookie, json!({"name": "Whisk"}))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        let response = self
            .put("/api/preferences", cookie, complete_preferences())
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    /// Save a recipe and return its id.
    pub async fn save_recipe(&self, cookie: &str, recipe: Value) -> i64 {
        let response = self.post("/api/recipes", cookie, recipe).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["recipe"]["id"].as_i64().unwrap()
    }

    /// Quantity of a stocked ingredient, as its decimal string.
    pub async fn stock_of(&self, cookie: &str, name: &str) -> Option<String> {
        let response = self.get("/api/ingredients", cookie).await;
        response
            .body
            .as_array()
            .unwrap()
            .iter()
            .find(|i| i["name"] == name)
            .map(|i| i["quantity"].as_str().unwrap().to_owned())
    }
}

/// A preference form that satisfies the onboarding gate.
#[must_use]
pub fn complete_preferences() -> Value {
    json!({
        "diet": ["Vegetarian"],
        "tastes": ["French"],
        "difficulty": "easy",
    })
}

/// A saveable recipe with the given requirements.
#[must_use]
pub fn recipe_requiring(title: &str, items: &[(&str, &str)]) -> Value {
    let ingredients: Vec<Value> = items
        .iter()
        .map(|(name, quantity)| json!({"name": name, "quantity": quantity}))
        .collect();
    json!({
        "title": title,
        "description": "Test recipe",
        "cuisine_type": "French",
        "difficulty": "easy",
        "ingredients": ingredients,
        "instructions": ["Mix.", "Cook."],
        "time_minutes": 20,
        "servings": 2,
    })
}
