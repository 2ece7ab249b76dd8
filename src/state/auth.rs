//! Auth slice: the currently signed-in user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by user-aware components; refreshed by dispatching
//! `auth/updateUser`, which asks the configured [`UserSource`] for the
//! session's user and commits it with `auth/setUser`.
//!
//! ERROR HANDLING
//! ==============
//! A failed fetch is logged and returned, never committed: the previous
//! user (possibly none) stays in place. Overlapping fetches are not
//! sequenced; whichever response lands last is what the store holds.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::{debug, error};

use crate::events::{Notifier, StoreEvent};
use crate::net::api::UserSource;
use crate::net::types::{ErrorCode, FetchError, User};

/// Plain copy of the auth slice.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AuthState {
    pub user: Option<User>,
}

pub struct AuthModule {
    state: RwLock<AuthState>,
    source: Arc<dyn UserSource>,
    notifier: Arc<Notifier>,
}

impl AuthModule {
    pub(crate) fn new(source: Arc<dyn UserSource>, notifier: Arc<Notifier>) -> Self {
        Self { state: RwLock::new(AuthState::default()), source, notifier }
    }

    /// Current user, if one has been committed.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.read().clone()
    }

    /// `auth/setUser`: replace the stored user wholesale. A `null` body
    /// clears it back to absent.
    pub fn set_user(&self, user: User) {
        let user = user.into_present();
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.user.clone_from(&user);
        self.notifier
            .publish(&StoreEvent::UserChanged(user));
    }

    /// `auth/updateUser`: fetch the session's user and commit it.
    ///
    /// The returned error has already been logged; callers may ignore it.
    pub async fn update_user(&self) -> Result<User, FetchError> {
        match self.source.fetch_user().await {
            Ok(user) => {
                debug!(user_id = ?user.id(), "fetched current user");
                self.set_user(user.clone());
                Ok(user)
            }
            Err(e) => {
                error!(error = %e, code = e.error_code(), retryable = e.retryable(), "error updating user");
                Err(e)
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AuthState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
