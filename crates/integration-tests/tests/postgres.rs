//! Store behavior against a real `PostgreSQL` database.
//!
//! These exercise the migrations themselves: the profile trigger, the
//! one-way latches and the `pantry.cook_recipe` function.
//!
//! ```bash
//! PANTRY_TEST_DATABASE_URL=postgres://localhost/pantry_test \
//!     cargo test -p pantry-integration-tests --test postgres -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use sqlx::PgPool;

use pantry_core::store::{AccountStore, CookingStore, InventoryStore, ProfileStore, RecipeStore};
use pantry_core::{
    CookReply, Difficulty, Email, NewAccount, NewIngredient, NewRecipe, Recipe, RecipeIngredient,
    UserId,
};
use pantry_server::db::PgStore;
use pantry_server::services::CookingService;

async fn store() -> PgStore {
    let url = std::env::var("PANTRY_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("PANTRY_TEST_DATABASE_URL or DATABASE_URL must be set");
    let pool = PgPool::connect(&url).await.unwrap();
    sqlx::migrate!("../server/migrations").run(&pool).await.unwrap();
    PgStore::new(pool)
}

/// A fresh account; emails are unique so tests can share one database.
async fn account(store: &PgStore) -> UserId {
    let email = format!("cook-{}@example.com", uuid::Uuid::new_v4());
    store
        .create_account(&NewAccount {
            email: Email::parse(&email).unwrap(),
            display_name: "Test Cook".to_owned(),
            password_hash: "hash".to_owned(),
        })
        .await
        .unwrap()
        .id
}

async fn stock(store: &PgStore, user: UserId, name: &str, quantity: &str) {
    store
        .create_ingredient(
            user,
            &NewIngredient {
                name: name.to_owned(),
                quantity: quantity.parse().unwrap(),
                unit: "g".to_owned(),
            },
        )
        .await
        .unwrap();
}

async fn recipe(store: &PgStore, user: UserId, items: &[(&str, &str)]) -> Recipe {
    store
        .create_recipe(
            user,
            &NewRecipe {
                title: "Bread".to_owned(),
                description: String::new(),
                cuisine_type: "French".to_owned(),
                difficulty: Difficulty::Easy,
                ingredients: items
                    .iter()
                    .map(|(name, quantity)| RecipeIngredient {
                        name: (*name).to_owned(),
                        quantity: quantity.parse().unwrap(),
                    })
                    .collect(),
                instructions: vec!["Knead.".to_owned(), "Bake.".to_owned()],
                time_minutes: 60,
                servings: 4,
            },
        )
        .await
        .unwrap()
}

async fn stock_of(store: &PgStore, user: UserId, name: &str) -> Option<String> {
    store
        .list_ingredients(user)
        .await
        .unwrap()
        .into_iter()
        .find(|i| i.name == name)
        .map(|i| i.quantity.to_string())
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_account_insert_creates_profile() {
    let store = store().await;
    let user = account(&store).await;

    let profile = store.get_profile(user).await.unwrap();
    assert_eq!(profile.user_id, user);
    assert_eq!(profile.display_name, "Test Cook");
    assert!(!profile.onboarding_complete);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_cook_subtracts_exactly_and_marks_used() {
    let store = store().await;
    let user = account(&store).await;
    stock(&store, user, "Flour", "500").await;
    stock(&store, user, "Salt", "50").await;
    let bread = recipe(&store, user, &[("Flour", "200")]).await;

    let receipt = CookingService::new(&store).cook(user, bread.id).await.unwrap();

    assert_eq!(receipt.consumed.len(), 1);
    assert_eq!(receipt.consumed[0].quantity.to_string(), "200");
    assert_eq!(stock_of(&store, user, "Flour").await.as_deref(), Some("300"));
    assert_eq!(stock_of(&store, user, "Salt").await.as_deref(), Some("50"));
    let cooked = store.get_recipe(user, bread.id).await.unwrap();
    assert!(cooked.is_used);
    assert!(cooked.used_at.is_some());
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_insufficient_stock_reports_all_in_recipe_order() {
    let store = store().await;
    let user = account(&store).await;
    stock(&store, user, "Flour", "100").await;
    stock(&store, user, "Milk", "1000").await;
    let pancakes = recipe(
        &store,
        user,
        &[("Vanilla", "1"), ("Milk", "300"), ("Flour", "200")],
    )
    .await;

    let reply = store.cook_recipe(user, pancakes.id).await.unwrap();

    let CookReply::Insufficient(shortfalls) = reply else {
        panic!("expected shortfalls");
    };
    assert_eq!(shortfalls.len(), 2);
    assert_eq!(shortfalls[0].name, "Vanilla");
    assert!(shortfalls[0].available.is_none());
    assert_eq!(shortfalls[1].name, "Flour");
    assert_eq!(shortfalls[1].required.to_string(), "200");
    assert_eq!(shortfalls[1].available.unwrap().to_string(), "100");

    assert_eq!(stock_of(&store, user, "Flour").await.as_deref(), Some("100"));
    assert_eq!(stock_of(&store, user, "Milk").await.as_deref(), Some("1000"));
    assert!(!store.get_recipe(user, pancakes.id).await.unwrap().is_used);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_second_cook_is_already_used() {
    let store = store().await;
    let user = account(&store).await;
    stock(&store, user, "Flour", "500").await;
    let bread = recipe(&store, user, &[("Flour", "200")]).await;

    assert_eq!(store.cook_recipe(user, bread.id).await.unwrap(), CookReply::Cooked);
    assert_eq!(
        store.cook_recipe(user, bread.id).await.unwrap(),
        CookReply::AlreadyUsed
    );
    assert_eq!(stock_of(&store, user, "Flour").await.as_deref(), Some("300"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_duplicate_names_are_summed() {
    let store = store().await;
    let user = account(&store).await;
    stock(&store, user, "Flour", "500").await;
    let too_much = recipe(&store, user, &[("Flour", "300"), ("Flour", "300")]).await;
    let layered = recipe(&store, user, &[("Flour", "200"), ("Flour", "250")]).await;

    let CookReply::Insufficient(shortfalls) = store.cook_recipe(user, too_much.id).await.unwrap()
    else {
        panic!("expected shortfalls");
    };
    assert_eq!(shortfalls.len(), 1);
    assert_eq!(shortfalls[0].required.to_string(), "600");
    assert_eq!(shortfalls[0].available.unwrap().to_string(), "500");

    assert_eq!(store.cook_recipe(user, layered.id).await.unwrap(), CookReply::Cooked);
    assert_eq!(stock_of(&store, user, "Flour").await.as_deref(), Some("50"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_fractional_quantities_round_trip() {
    let store = store().await;
    let user = account(&store).await;
    stock(&store, user, "Milk", "1.5").await;
    let sauce = recipe(&store, user, &[("Milk", "0.25")]).await;

    assert_eq!(store.cook_recipe(user, sauce.id).await.unwrap(), CookReply::Cooked);
    assert_eq!(stock_of(&store, user, "Milk").await.as_deref(), Some("1.25"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_foreign_recipe_is_not_found() {
    let store = store().await;
    let owner = account(&store).await;
    let other = account(&store).await;
    stock(&store, owner, "Flour", "500").await;
    stock(&store, other, "Flour", "500").await;
    let bread = recipe(&store, owner, &[("Flour", "200")]).await;

    assert_eq!(
        store.cook_recipe(other, bread.id).await.unwrap(),
        CookReply::NotFound
    );
    assert_eq!(stock_of(&store, owner, "Flour").await.as_deref(), Some("500"));
    assert_eq!(stock_of(&store, other, "Flour").await.as_deref(), Some("500"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires running PostgreSQL database"]
async fn test_concurrent_cooks_never_overdraw() {
    let store = Arc::new(store().await);
    let user = account(&store).await;
    stock(&store, user, "Flour", "500").await;
    let first = recipe(&store, user, &[("Flour", "300")]).await;
    let second = recipe(&store, user, &[("Flour", "300")]).await;

    let tasks = [first.id, second.id].map(|id| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.cook_recipe(user, id).await.unwrap() })
    });
    let mut cooked = 0;
    for task in tasks {
        match task.await.unwrap() {
            CookReply::Cooked => cooked += 1,
            CookReply::Insufficient(_) => {}
            other => panic!("unexpected reply {other:?}"),
        }
    }

    assert_eq!(cooked, 1);
    assert_eq!(stock_of(&store, user, "Flour").await.as_deref(), Some("200"));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_onboarding_latch_cannot_be_reset() {
    let store = store().await;
    let user = account(&store).await;

    assert!(store.mark_onboarding_complete(user).await.unwrap());
    assert!(!store.mark_onboarding_complete(user).await.unwrap());

    let reset = sqlx::query("UPDATE pantry.profile SET onboarding_complete = FALSE WHERE user_id = $1")
        .bind(user.as_i64())
        .execute(store.pool())
        .await;
    assert!(reset.is_err());
    assert!(store.get_profile(user).await.unwrap().onboarding_complete);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL database"]
async fn test_cooked_recipe_cannot_be_unmarked() {
    let store = store().await;
    let user = account(&store).await;
    stock(&store, user, "Flour", "500").await;
    let bread = recipe(&store, user, &[("Flour", "200")]).await;
    store.cook_recipe(user, bread.id).await.unwrap();

    let reset = sqlx::query("UPDATE pantry.recipe SET is_used = FALSE, used_at = NULL WHERE id = $1")
        .bind(bread.id.as_i64())
        .execute(store.pool())
        .await;
    assert!(reset.is_err());
    assert!(store.get_recipe(user, bread.id).await.unwrap().is_used);
}
