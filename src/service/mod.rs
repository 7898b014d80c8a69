//! Statement execution and request validation shared by the models.

mod query;
mod validation;
pub use query::{execute, fetch_all, fetch_optional, row_to_json};
pub use validation::{Format, RequestValidator, Rule, Rules, ValueKind};
