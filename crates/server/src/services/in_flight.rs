//! Per-user duplicate-submission guard.
//!
//! A mutating action on a resource registers itself here for the duration
//! of the request. A second identical request arriving meanwhile is
//! rejected instead of running twice.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use pantry_core::UserId;

type Key = (UserId, &'static str, String);

/// Registry of actions currently running.
#[derive(Debug, Default)]
pub struct InFlight {
    active: Mutex<HashSet<Key>>,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `action` on `resource` for `user`.
    ///
    /// Returns `None` while an identical action is still running. The slot is
    /// released when the returned guard is dropped.
    pub fn try_begin(
        &self,
        user: UserId,
        action: &'static str,
        resource: impl Into<String>,
    ) -> Option<InFlightGuard<'_>> {
        let key = (user, action, resource.into());
        let inserted = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());
        if !inserted {
            tracing::debug!(user_id = %user, action, resource = %key.2, "Duplicate request rejected");
            return None;
        }
        Some(InFlightGuard {
            registry: self,
            key,
        })
    }
}

/// Releases its slot on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    registry: &'a InFlight,
    key: Key,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.registry
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
