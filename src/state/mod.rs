//! Store modules, one per slice of state.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `chat`) so each slice is owned by a
//! single module with its own lock. Modules never reach into each other;
//! the only thing they share is the notifier that fans changes out to
//! subscribers.

pub mod auth;
pub mod chat;
