//! Company, job and user routes.

use crate::handlers::{company, job, user};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/companies", get(company::list).post(company::create))
        .route(
            "/companies/:handle",
            get(company::read).patch(company::update).delete(company::delete),
        )
        .route("/jobs", get(job::list).post(job::create))
        .route("/jobs/:id", get(job::read).patch(job::update).delete(job::delete))
        .route("/users", get(user::list))
        .route(
            "/users/:username",
            get(user::read).patch(user::update).delete(user::delete),
        )
        .route("/users/:username/jobs/:id", post(user::apply))
        .with_state(state)
}
