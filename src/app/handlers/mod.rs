//! Event handlers for the console
//!
//! - `fetch`: page and waiting-count completions from the fetch actor
//! - `realtime`: pushes from the realtime channel and deletion notices

mod fetch;
mod realtime;

pub use realtime::RealtimeEvent;
