//! Request extractors.

mod search;
pub use search::SearchParams;
