//! jobly: companies, jobs and users over PostgreSQL.
//!
//! The reusable core is [`sql`]: a partial-update SET builder and a descriptor-driven
//! WHERE builder. Everything else wires those into models, handlers and routes.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, BuildError, ConfigError};
pub use models::{Company, Job, User};
pub use routes::{api_routes, app, common_routes};
pub use settings::Settings;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};
