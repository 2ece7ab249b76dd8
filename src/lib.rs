//! # client-store
//!
//! Client-side state container for the web application. Holds two
//! independent slices of state: the authenticated user (`auth`) and the
//! chat panel toggle (`chat`).
//!
//! DESIGN
//! ======
//! A [`Store`] is an explicit value owned by the application's top-level
//! context and shared by clone. Mutations are synchronous single-field
//! writes; actions may await I/O before committing a mutation. Every
//! mutation publishes a [`StoreEvent`] to subscribers so UI bindings can
//! re-render.

pub mod config;
pub mod events;
pub mod net;
pub mod state;
pub mod store;

pub use config::{FetchTimeouts, StoreConfig};
pub use events::{StoreEvent, Subscription};
pub use net::api::{HttpUserClient, UserSource};
pub use net::types::{ErrorCode, FetchError, User};
pub use store::{Action, ActionOutcome, Mutation, Store, StoreError, StoreSnapshot};
