//! In-process store for tests.
//!
//! Mirrors the `PostgreSQL` schema rules that callers can observe: per-user
//! unique names, the profile created alongside an account, the one-way
//! onboarding latch and all-or-nothing cooking under a single lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use pantry_core::cooking;
use pantry_core::inventory::IngredientChanges;
use pantry_core::onboarding::OnboardingSnapshot;
use pantry_core::store::{
    AccountStore, CookingStore, InventoryStore, PantryStore, PreferenceStore, ProfileStore,
    RecipeStore, StoreError,
};
use pantry_core::{
    Account, CookReply, Email, Ingredient, IngredientId, NewAccount, NewIngredient, NewRecipe,
    NewUtensil, Preferences, Profile, Recipe, RecipeId, UserId, Utensil, UtensilId,
};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    accounts: Vec<Account>,
    profiles: Vec<Profile>,
    ingredients: Vec<Ingredient>,
    utensils: Vec<Utensil>,
    preferences: Vec<(UserId, Preferences)>,
    recipes: Vec<Recipe>,
    /// Cook calls that fail before touching anything.
    failing_cooks: u32,
    /// Cook calls that apply but report a lost reply.
    lost_cook_replies: u32,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owned_ingredient(&mut self, user: UserId, id: IngredientId) -> Option<&mut Ingredient> {
        self.ingredients
            .iter_mut()
            .find(|i| i.id == id && i.user_id == user)
    }

    fn ingredient_name_taken(&self, user: UserId, name: &str, except: Option<IngredientId>) -> bool {
        self.ingredients
            .iter()
            .any(|i| i.user_id == user && i.name == name && Some(i.id) != except)
    }

    fn insert_ingredient(&mut self, user: UserId, ingredient: &NewIngredient) -> Ingredient {
        let now = Utc::now();
        let created = Ingredient {
            id: IngredientId::new(self.next_id()),
            user_id: user,
            name: ingredient.name.clone(),
            quantity: ingredient.quantity,
            unit: ingredient.unit.clone(),
            created_at: now,
            updated_at: now,
        };
        self.ingredients.push(created.clone());
        created
    }

    fn insert_utensil(&mut self, user: UserId, utensil: &NewUtensil) -> Utensil {
        let created = Utensil {
            id: UtensilId::new(self.next_id()),
            user_id: user,
            name: utensil.name.clone(),
            created_at: Utc::now(),
        };
        self.utensils.push(created.clone());
        created
    }

    fn utensil_name_taken(&self, user: UserId, name: &str, except: Option<UtensilId>) -> bool {
        self.utensils
            .iter()
            .any(|u| u.user_id == user && u.name == name && Some(u.id) != except)
    }

    fn cook(&mut self, user: UserId, id: RecipeId) -> CookReply {
        let Some(recipe) = self
            .recipes
            .iter()
            .find(|r| r.id == id && r.user_id == user)
        else {
            return CookReply::NotFound;
        };
        if recipe.is_used {
            return CookReply::AlreadyUsed;
        }

        let stock = |name: &str| {
            self.ingredients
                .iter()
                .find(|i| i.user_id == user && i.name == name)
                .map(|i| i.quantity)
        };
        let plan = match cooking::plan(&recipe.ingredients, stock) {
            Ok(plan) => plan,
            Err(shortfalls) => return CookReply::Insufficient(shortfalls),
        };

        let now = Utc::now();
        for deduction in plan.deductions {
            if let Some(row) = self
                .ingredients
                .iter_mut()
                .find(|i| i.user_id == user && i.name == deduction.name)
            {
                row.quantity = deduction.remaining;
                row.updated_at = now;
            }
        }
        if let Some(recipe) = self.recipes.iter_mut().find(|r| r.id == id) {
            recipe.is_used = true;
            recipe.used_at = Some(now);
        }
        CookReply::Cooked
    }
}

/// Thread-safe in-memory implementation of every storage port.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` cook calls fail as unavailable without applying.
    pub fn fail_next_cooks(&self, count: u32) {
        self.lock().failing_cooks = count;
    }

    /// Make the next `count` cook calls apply, then fail as unavailable.
    pub fn lose_next_cook_replies(&self, count: u32) {
        self.lock().lost_cook_replies = count;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn newest_first<T: Clone>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> i64) -> Vec<T> {
    // Ids grow with insertion time, so id order is creation order.
    let mut items: Vec<T> = items.collect();
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    items
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let mut state = self.lock();
        if state.accounts.iter().any(|a| a.email == account.email) {
            return Err(StoreError::Duplicate(format!("account {}", account.email)));
        }
        let now = Utc::now();
        let id = UserId::new(state.next_id());
        let created = Account {
            id,
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            created_at: now,
        };
        state.accounts.push(created.clone());
        state.profiles.push(Profile {
            user_id: id,
            display_name: account.display_name.clone(),
            onboarding_complete: false,
            created_at: now,
        });
        Ok(created)
    }

    async fn find_account_by_email(&self, email: &Email) -> Result<Option<Account>, StoreError> {
        Ok(self.lock().accounts.iter().find(|a| &a.email == email).cloned())
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, user: UserId) -> Result<Profile, StoreError> {
        self.lock()
            .profiles
            .iter()
            .find(|p| p.user_id == user)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn mark_onboarding_complete(&self, user: UserId) -> Result<bool, StoreError> {
        let mut state = self.lock();
        let profile = state
            .profiles
            .iter_mut()
            .find(|p| p.user_id == user)
            .ok_or(StoreError::NotFound)?;
        let changed = !profile.onboarding_complete;
        profile.onboarding_complete = true;
        Ok(changed)
    }

    async fn onboarding_snapshot(&self, user: UserId) -> Result<OnboardingSnapshot, StoreError> {
        let state = self.lock();
        let profile = state
            .profiles
            .iter()
            .find(|p| p.user_id == user)
            .ok_or(StoreError::NotFound)?;
        let count = |n: usize| u64::try_from(n).unwrap_or(u64::MAX);
        Ok(OnboardingSnapshot {
            flag_complete: profile.onboarding_complete,
            ingredient_count: count(state.ingredients.iter().filter(|i| i.user_id == user).count()),
            utensil_count: count(state.utensils.iter().filter(|u| u.user_id == user).count()),
            preferences_complete: state
                .preferences
                .iter()
                .find(|(owner, _)| *owner == user)
                .map(|(_, prefs)| prefs.is_complete()),
            recipe_count: count(state.recipes.iter().filter(|r| r.user_id == user).count()),
        })
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn list_ingredients(&self, user: UserId) -> Result<Vec<Ingredient>, StoreError> {
        let state = self.lock();
        Ok(newest_first(
            state.ingredients.iter().filter(|i| i.user_id == user).cloned(),
            |i| i.id.as_i64(),
        ))
    }

    async fn create_ingredient(
        &self,
        user: UserId,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, StoreError> {
        let mut state = self.lock();
        if state.ingredient_name_taken(user, &ingredient.name, None) {
            return Err(StoreError::Duplicate(format!("ingredient {}", ingredient.name)));
        }
        Ok(state.insert_ingredient(user, ingredient))
    }

    async fn upsert_ingredient(
        &self,
        user: UserId,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, StoreError> {
        let mut state = self.lock();
        if let Some(existing) = state
            .ingredients
            .iter_mut()
            .find(|i| i.user_id == user && i.name == ingredient.name)
        {
            existing.quantity = ingredient.quantity;
            existing.unit.clone_from(&ingredient.unit);
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        Ok(state.insert_ingredient(user, ingredient))
    }

    async fn update_ingredient(
        &self,
        user: UserId,
        id: IngredientId,
        changes: &IngredientChanges,
    ) -> Result<Ingredient, StoreError> {
        let mut state = self.lock();
        if let Some(name) = &changes.name
            && state.ingredient_name_taken(user, name, Some(id))
        {
            return Err(StoreError::Duplicate(format!("ingredient {name}")));
        }
        let row = state.owned_ingredient(user, id).ok_or(StoreError::NotFound)?;
        changes.apply_to(row);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_ingredient(&self, user: UserId, id: IngredientId) -> Result<(), StoreError> {
        let mut state = self.lock();
        let before = state.ingredients.len();
        state.ingredients.retain(|i| !(i.id == id && i.user_id == user));
        if state.ingredients.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_utensils(&self, user: UserId) -> Result<Vec<Utensil>, StoreError> {
        let state = self.lock();
        Ok(newest_first(
            state.utensils.iter().filter(|u| u.user_id == user).cloned(),
            |u| u.id.as_i64(),
        ))
    }

    async fn create_utensil(&self, user: UserId, utensil: &NewUtensil) -> Result<Utensil, StoreError> {
        let mut state = self.lock();
        if state.utensil_name_taken(user, &utensil.name, None) {
            return Err(StoreError::Duplicate(format!("utensil {}", utensil.name)));
        }
        Ok(state.insert_utensil(user, utensil))
    }

    async fn upsert_utensil(&self, user: UserId, utensil: &NewUtensil) -> Result<Utensil, StoreError> {
        let mut state = self.lock();
        if let Some(existing) = state
            .utensils
            .iter()
            .find(|u| u.user_id == user && u.name == utensil.name)
        {
            return Ok(existing.clone());
        }
        Ok(state.insert_utensil(user, utensil))
    }

    async fn rename_utensil(
        &self,
        user: UserId,
        id: UtensilId,
        utensil: &NewUtensil,
    ) -> Result<Utensil, StoreError> {
        let mut state = self.lock();
        if state.utensil_name_taken(user, &utensil.name, Some(id)) {
            return Err(StoreError::Duplicate(format!("utensil {}", utensil.name)));
        }
        let row = state
            .utensils
            .iter_mut()
            .find(|u| u.id == id && u.user_id == user)
            .ok_or(StoreError::NotFound)?;
        row.name.clone_from(&utensil.name);
        Ok(row.clone())
    }

    async fn delete_utensil(&self, user: UserId, id: UtensilId) -> Result<(), StoreError> {
        let mut state = self.lock();
        let before = state.utensils.len();
        state.utensils.retain(|u| !(u.id == id && u.user_id == user));
        if state.utensils.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get_preferences(&self, user: UserId) -> Result<Option<Preferences>, StoreError> {
        Ok(self
            .lock()
            .preferences
            .iter()
            .find(|(owner, _)| *owner == user)
            .map(|(_, prefs)| prefs.clone()))
    }

    async fn save_preferences(
        &self,
        user: UserId,
        preferences: &Preferences,
    ) -> Result<Preferences, StoreError> {
        let mut state = self.lock();
        state.preferences.retain(|(owner, _)| *owner != user);
        state.preferences.push((user, preferences.clone()));
        Ok(preferences.clone())
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_recipes(&self, user: UserId) -> Result<Vec<Recipe>, StoreError> {
        let state = self.lock();
        Ok(newest_first(
            state.recipes.iter().filter(|r| r.user_id == user).cloned(),
            |r| r.id.as_i64(),
        ))
    }

    async fn get_recipe(&self, user: UserId, id: RecipeId) -> Result<Recipe, StoreError> {
        self.lock()
            .recipes
            .iter()
            .find(|r| r.id == id && r.user_id == user)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_recipe(&self, user: UserId, recipe: &NewRecipe) -> Result<Recipe, StoreError> {
        let mut state = self.lock();
        let created = Recipe {
            id: RecipeId::new(state.next_id()),
            user_id: user,
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            cuisine_type: recipe.cuisine_type.clone(),
            difficulty: recipe.difficulty,
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            time_minutes: recipe.time_minutes,
            servings: recipe.servings,
            is_used: false,
            created_at: Utc::now(),
            used_at: None,
        };
        state.recipes.push(created.clone());
        Ok(created)
    }

    async fn delete_recipe(&self, user: UserId, id: RecipeId) -> Result<(), StoreError> {
        let mut state = self.lock();
        let before = state.recipes.len();
        state.recipes.retain(|r| !(r.id == id && r.user_id == user));
        if state.recipes.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CookingStore for MemoryStore {
    async fn cook_recipe(&self, user: UserId, recipe: RecipeId) -> Result<CookReply, StoreError> {
        let mut state = self.lock();
        if state.failing_cooks > 0 {
            state.failing_cooks -= 1;
            return Err(StoreError::Unavailable("connection reset".to_owned()));
        }
        let reply = state.cook(user, recipe);
        if state.lost_cook_replies > 0 {
            state.lost_cook_replies -= 1;
            return Err(StoreError::Unavailable("reply lost".to_owned()));
        }
        Ok(reply)
    }
}

#[async_trait]
impl PantryStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
