//! Demo data for local development.
//!
//! Creates one account whose kitchen already clears the ingredient, utensil
//! and preference steps, so the next thing to try is generating a recipe.
//! Running it again leaves an existing demo account as it is.

use pantry_core::Difficulty;
use pantry_core::inventory::{IngredientInput, RawQuantity, UtensilInput};
use pantry_core::preferences::PreferencesInput;
use pantry_server::db::{self, PgStore};
use pantry_server::services::{AuthError, AuthService, InventoryService, PreferenceService};

use super::{CliError, database_url};

const INGREDIENTS: &[(&str, &str, &str)] = &[
    ("Flour", "1000", "g"),
    ("Eggs", "12", "pcs"),
    ("Milk", "1000", "ml"),
    ("Butter", "250", "g"),
    ("Tomatoes", "6", "pcs"),
    ("Rice", "500", "g"),
];

const UTENSILS: &[&str] = &["Frying pan", "Saucepan", "Whisk", "Oven"];

/// Create the demo account and stock its kitchen.
///
/// # Errors
///
/// Returns an error if the database is unreachable or any input is invalid.
pub async fn demo(email: &str, password: &str, display_name: &str) -> Result<(), CliError> {
    let database_url = database_url()?;
    let store = PgStore::new(db::create_pool(&database_url).await?);

    let account = match AuthService::new(&store)
        .sign_up(email, password, display_name)
        .await
    {
        Ok(account) => account,
        Err(AuthError::EmailTaken) => {
            tracing::info!(email, "Demo account already exists, nothing to do");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let user = account.id;
    tracing::info!(user_id = %user, email, "Demo account created");

    let inventory = InventoryService::new(&store);
    for (name, quantity, unit) in INGREDIENTS {
        inventory
            .put_ingredient(
                user,
                &IngredientInput {
                    name: (*name).to_owned(),
                    quantity: RawQuantity::Text((*quantity).to_owned()),
                    unit: (*unit).to_owned(),
                },
            )
            .await?;
    }
    for name in UTENSILS {
        inventory
            .put_utensil(
                user,
                &UtensilInput {
                    name: (*name).to_owned(),
                },
            )
            .await?;
    }

    PreferenceService::new(&store)
        .save(
            user,
            &PreferencesInput {
                diet: vec!["Vegetarian".to_owned()],
                tastes: vec!["Italian".to_owned(), "French".to_owned()],
                difficulty: Some(Difficulty::Easy),
                time_minutes: Some(30),
                portions: Some(2),
                ..PreferencesInput::default()
            },
        )
        .await?;

    tracing::info!(
        ingredients = INGREDIENTS.len(),
        utensils = UTENSILS.len(),
        "Demo kitchen stocked"
    );
    Ok(())
}
