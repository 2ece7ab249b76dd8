//! The state container.
//!
//! ARCHITECTURE
//! ============
//! `Store` bundles the `auth` and `chat` modules with the notifier they
//! publish through. It is cheap to clone (everything is `Arc`-wrapped) and
//! is meant to be created once by the application and handed to whatever
//! needs it.
//!
//! Callers can use the typed module methods directly, or go through the
//! namespaced surface: `commit` for mutations (`auth/setUser`,
//! `chat/TOGGLE_CHAT`) and `dispatch` for actions (`auth/updateUser`,
//! `chat/toggleChat`).

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::config::{StoreConfig, validate_user_url};
use crate::events::{Notifier, Subscription};
use crate::net::api::{HttpUserClient, UserSource};
use crate::net::types::{ErrorCode, FetchError, User};
use crate::state::auth::{AuthModule, AuthState};
use crate::state::chat::{ChatModule, ChatState};

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("unknown mutation: {0}")]
    UnknownMutation(String),
    #[error("mutation {0} requires a payload")]
    MissingPayload(String),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAction(_) => "E_UNKNOWN_ACTION",
            Self::UnknownMutation(_) => "E_UNKNOWN_MUTATION",
            Self::MissingPayload(_) => "E_MISSING_PAYLOAD",
            Self::Config(_) => "E_CONFIG",
            Self::Fetch(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.retryable(),
            _ => false,
        }
    }
}

// =============================================================================
// MUTATIONS & ACTIONS
// =============================================================================

pub const SET_USER: &str = "auth/setUser";
pub const TOGGLE_CHAT: &str = "chat/TOGGLE_CHAT";
pub const UPDATE_USER: &str = "auth/updateUser";
pub const TOGGLE_CHAT_ACTION: &str = "chat/toggleChat";

/// Synchronous state change.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetUser(User),
    ToggleChat,
}

impl Mutation {
    /// Build a mutation from its namespaced name and optional JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownMutation`] for unrecognized names and
    /// [`StoreError::MissingPayload`] when `auth/setUser` has no payload.
    pub fn parse(name: &str, payload: Option<serde_json::Value>) -> Result<Self, StoreError> {
        match name {
            SET_USER => payload
                .map(|v| Self::SetUser(User::new(v)))
                .ok_or_else(|| StoreError::MissingPayload(name.to_owned())),
            TOGGLE_CHAT => Ok(Self::ToggleChat),
            other => Err(StoreError::UnknownMutation(other.to_owned())),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetUser(_) => SET_USER,
            Self::ToggleChat => TOGGLE_CHAT,
        }
    }
}

/// Operation that may await I/O before committing a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateUser,
    ToggleChat,
}

impl Action {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::UpdateUser => UPDATE_USER,
            Self::ToggleChat => TOGGLE_CHAT_ACTION,
        }
    }
}

impl FromStr for Action {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UPDATE_USER => Ok(Self::UpdateUser),
            TOGGLE_CHAT_ACTION => Ok(Self::ToggleChat),
            other => Err(StoreError::UnknownAction(other.to_owned())),
        }
    }
}

/// What a dispatched action produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// `auth/updateUser`. On `Err` the stored user is unchanged.
    User(Result<User, FetchError>),
    /// `chat/toggleChat`: the new flag value.
    ChatOpen(bool),
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Point-in-time copy of the whole store, namespaced like the modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreSnapshot {
    pub auth: AuthState,
    pub chat: ChatState,
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Clone)]
pub struct Store {
    auth: Arc<AuthModule>,
    chat: Arc<ChatModule>,
    notifier: Arc<Notifier>,
}

impl Store {
    /// Build a store that fetches users over HTTP as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the user URL is invalid or the HTTP client fails.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        validate_user_url(&config.user_url)?;
        let source = HttpUserClient::new(&config.user_url, config.timeouts)?;
        Ok(Self::with_source(Arc::new(source), config.event_buffer))
    }

    /// Build a store from environment variables (see [`StoreConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the config or HTTP client is invalid.
    pub fn from_env() -> Result<Self, StoreError> {
        Self::new(&StoreConfig::from_env()?)
    }

    /// Build a store around any user source.
    #[must_use]
    pub fn with_source(source: Arc<dyn UserSource>, event_buffer: usize) -> Self {
        let notifier = Arc::new(Notifier::new(event_buffer));
        Self {
            auth: Arc::new(AuthModule::new(source, Arc::clone(&notifier))),
            chat: Arc::new(ChatModule::new(Arc::clone(&notifier))),
            notifier,
        }
    }

    #[must_use]
    pub fn auth(&self) -> &AuthModule {
        &self.auth
    }

    #[must_use]
    pub fn chat(&self) -> &ChatModule {
        &self.chat
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot { auth: self.auth.state(), chat: self.chat.state() }
    }

    pub fn subscribe(&self) -> Subscription {
        self.notifier.subscribe()
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: Uuid) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn commit(&self, mutation: Mutation) {
        match mutation {
            Mutation::SetUser(user) => self.auth.set_user(user),
            Mutation::ToggleChat => {
                self.chat.toggle();
            }
        }
    }

    pub async fn dispatch(&self, action: Action) -> ActionOutcome {
        match action {
            Action::UpdateUser => ActionOutcome::User(self.auth.update_user().await),
            Action::ToggleChat => ActionOutcome::ChatOpen(self.chat.toggle_chat()),
        }
    }

    /// Dispatch by namespaced name, e.g. `"chat/toggleChat"`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownAction`] for unrecognized names. Fetch
    /// failures are reported inside the outcome, not here.
    pub async fn dispatch_named(&self, name: &str) -> Result<ActionOutcome, StoreError> {
        let action = name.parse::<Action>()?;
        Ok(self.dispatch(action).await)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::json;

    use crate::net::api::UserSource;
    use crate::net::types::{FetchError, User};

    /// Scripted user source: each call pops the next `(delay, result)`.
    pub struct MockSource {
        script: Mutex<VecDeque<(Duration, Result<User, FetchError>)>>,
        calls: AtomicUsize,
    }

    impl MockSource {
        pub fn new(script: Vec<(Duration, Result<User, FetchError>)>) -> Self {
            Self { script: Mutex::new(script.into()), calls: AtomicUsize::new(0) }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl UserSource for MockSource {
        async fn fetch_user(&self) -> Result<User, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            let Some((delay, result)) = next else {
                return Err(FetchError::Request("mock script exhausted".into()));
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            result
        }
    }

    pub fn ann() -> User {
        User::new(json!({ "id": 1, "name": "Ann" }))
    }

    pub fn bob() -> User {
        User::new(json!({ "id": 2, "name": "Bob" }))
    }
}
