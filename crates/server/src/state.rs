//! Application state shared across handlers.

use std::sync::Arc;

use pantry_core::{PantryStore, RecipeGenerator};

use crate::services::InFlight;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The store and generator are trait objects so
/// the same router runs against Postgres in production and the in-memory
/// store in tests.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn PantryStore>,
    generator: Arc<dyn RecipeGenerator>,
    in_flight: InFlight,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn PantryStore>, generator: Arc<dyn RecipeGenerator>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                generator,
                in_flight: InFlight::new(),
            }),
        }
    }

    /// The storage backend.
    #[must_use]
    pub fn store(&self) -> &dyn PantryStore {
        self.inner.store.as_ref()
    }

    /// The recipe generator.
    #[must_use]
    pub fn generator(&self) -> &dyn RecipeGenerator {
        self.inner.generator.as_ref()
    }

    /// Registry of running cook, save and delete requests.
    #[must_use]
    pub fn in_flight(&self) -> &InFlight {
        &self.inner.in_flight
    }
}
