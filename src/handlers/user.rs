//! User handlers: list, read, update, delete, apply to a job.

use super::{body_to_map, parse_id};
use crate::error::AppError;
use crate::models::user::{self, User};
use crate::response::{success_many, success_one, success_one_ok};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let rows = User::find_all(&state.pool).await?;
    Ok(success_many(rows))
}

pub async fn read(State(state): State<AppState>, Path(username): Path<String>) -> Result<impl IntoResponse, AppError> {
    let row = User::get(&state.pool, &username).await?;
    Ok(success_one_ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, user::UPDATE_RULES)?;
    let row = User::update(&state.pool, &username, &body).await?;
    Ok(success_one_ok(row))
}

pub async fn delete(State(state): State<AppState>, Path(username): Path<String>) -> Result<impl IntoResponse, AppError> {
    User::remove(&state.pool, &username).await?;
    Ok(success_one_ok(json!({ "deleted": username })))
}

pub async fn apply(
    State(state): State<AppState>,
    Path((username, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = User::apply_to_job(&state.pool, &username, id).await?;
    Ok(success_one(row))
}
