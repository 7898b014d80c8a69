//! Per-entity persistence: descriptor tables (permitted fields, search criteria, body rules)
//! and the parameterized statements built from them.

pub mod company;
pub mod job;
pub mod user;
pub use company::Company;
pub use job::Job;
pub use user::User;
