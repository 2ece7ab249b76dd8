//! Network layer: the user record type and the transport that fetches it.

pub mod api;
pub mod types;
