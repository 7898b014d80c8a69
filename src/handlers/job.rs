//! Job handlers: create, list, read, update, delete.

use super::{body_to_map, parse_id};
use crate::error::AppError;
use crate::extractors::SearchParams;
use crate::models::job::{self, Job};
use crate::response::{success_many, success_one, success_one_ok};
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

pub async fn create(State(state): State<AppState>, Json(body): Json<Value>) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, job::CREATE_RULES)?;
    let row = Job::create(&state.pool, &body).await?;
    Ok(success_one(row))
}

pub async fn list(State(state): State<AppState>, SearchParams(params): SearchParams) -> Result<impl IntoResponse, AppError> {
    let criteria = job::FILTER.parse_query(&params)?;
    let rows = Job::find_all(&state.pool, &criteria).await?;
    Ok(success_many(rows))
}

pub async fn read(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = Job::get(&state.pool, id).await?;
    Ok(success_one_ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, job::UPDATE_RULES)?;
    let row = Job::update(&state.pool, id, &body).await?;
    Ok(success_one_ok(row))
}

pub async fn delete(State(state): State<AppState>, Path(id_str): Path<String>) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Job::remove(&state.pool, id).await?;
    Ok(success_one_ok(json!({ "deleted": id })))
}
