//! Safe SQL fragments: identifiers from descriptor tables only, values as parameters.

mod builder;
pub mod filter;
pub mod params;
pub mod update;
pub use builder::*;
pub use filter::{build_filter_clause, Criterion, CriterionKind, FilterSpec};
pub use params::*;
pub use update::{build_set_clause, ColumnResolver, Field, Fields, RenameTable};
