//! Networking: backend command client, wire types, and push messages.

pub mod api;
pub mod message;
pub mod types;
