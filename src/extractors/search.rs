//! Extract search criteria from the query string.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use std::collections::HashMap;

/// Raw query-string pairs. Blank values are dropped so `?name=` means "no name filter".
/// A malformed query string is rejected with the API's own error body.
#[derive(Clone, Debug, Default)]
pub struct SearchParams(pub HashMap<String, String>);

#[async_trait]
impl<S> FromRequestParts<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(mut params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        params.retain(|_, v| !v.trim().is_empty());
        Ok(SearchParams(params))
    }
}
