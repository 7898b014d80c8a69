//! Company handlers: create, list, read, update, delete.

use super::body_to_map;
use crate::error::AppError;
use crate::extractors::SearchParams;
use crate::models::company::{self, Company};
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
    RequestValidator::validate(&body, company::CREATE_RULES)?;
    let row = Company::create(&state.pool, &body).await?;
    Ok(success_one(row))
}

pub async fn list(State(state): State<AppState>, SearchParams(params): SearchParams) -> Result<impl IntoResponse, AppError> {
    let criteria = company::FILTER.parse_query(&params)?;
    let rows = Company::find_all(&state.pool, &criteria).await?;
    Ok(success_many(rows))
}

pub async fn read(State(state): State<AppState>, Path(handle): Path<String>) -> Result<impl IntoResponse, AppError> {
    let row = Company::get(&state.pool, &handle).await?;
    Ok(success_one_ok(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    RequestValidator::validate_partial(&body, company::UPDATE_RULES)?;
    let row = Company::update(&state.pool, &handle, &body).await?;
    Ok(success_one_ok(row))
}

pub async fn delete(State(state): State<AppState>, Path(handle): Path<String>) -> Result<impl IntoResponse, AppError> {
    Company::remove(&state.pool, &handle).await?;
    Ok(success_one_ok(json!({ "deleted": handle })))
}
