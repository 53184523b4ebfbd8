//! Pure projections from tab snapshots and the realtime cache to what a tab shows.

pub mod format;
pub mod merge;
pub mod search;

pub use format::format_row;
pub use merge::merge_view;
pub use search::SearchFilter;
