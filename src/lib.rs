//! Conversation-list synchronization for a customer-service console.
//!
//! Three tabs ("mine", "unassigned", "all") are each backed by a paginated
//! REST source and overlaid with a shared realtime cache fed by push events.

pub mod actor;
pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod view;

#[cfg(test)]
mod test_utils;
