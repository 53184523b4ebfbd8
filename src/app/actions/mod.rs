//! Operations invoked by the host
//!
//! This module is split into focused submodules:
//! - `pagination`: tab activation, load-more, refresh and the waiting count
//! - `navigation`: tab switching, search and selection
//! - `mutation`: optimistic local edits (unread, external deletion)

mod mutation;
mod navigation;
mod pagination;
