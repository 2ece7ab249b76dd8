#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::debug;

use crate::events::{Notifier, StoreEvent};

/// Plain copy of the chat slice. Serializes as `{ "chatOpen": bool }`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub chat_open: bool,
}

/// Visibility of the chat panel.
pub struct ChatModule {
    state: RwLock<ChatState>,
    notifier: Arc<Notifier>,
}

impl ChatModule {
    pub(crate) fn new(notifier: Arc<Notifier>) -> Self {
        Self { state: RwLock::new(ChatState::default()), notifier }
    }

    #[must_use]
    pub fn chat_open(&self) -> bool {
        self.state().chat_open
    }

    #[must_use]
    pub fn state(&self) -> ChatState {
        *self
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// `chat/TOGGLE_CHAT`: flip the panel flag and return the new value.
    pub fn toggle(&self) -> bool {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.chat_open = !state.chat_open;
        self.notifier
            .publish(&StoreEvent::ChatToggled(state.chat_open));
        state.chat_open
    }

    /// `chat/toggleChat`: the action wrapper around `TOGGLE_CHAT`.
    pub fn toggle_chat(&self) -> bool {
        let chat_open = self.toggle();
        debug!(chat_open, "chat panel toggled");
        chat_open
    }
}
