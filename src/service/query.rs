//! Execute parameterized statements against PostgreSQL and return rows as JSON.

use crate::error::AppError;
use crate::sql::PgBindValue;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

fn bind_all<'q>(sql: &'q str, params: &[Value]) -> Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(sql);
    for p in params {
        query = query.bind(PgBindValue::from(p));
    }
    query
}

/// Run a statement and return every row.
pub async fn fetch_all(pool: &PgPool, sql: &str, params: &[Value]) -> Result<Vec<Value>, AppError> {
    tracing::debug!(sql = %sql, params = ?params, "query");
    let rows = bind_all(sql, params).fetch_all(pool).await?;
    Ok(rows.iter().map(row_to_json).collect())
}

/// Run a statement expected to return at most one row.
pub async fn fetch_optional(pool: &PgPool, sql: &str, params: &[Value]) -> Result<Option<Value>, AppError> {
    tracing::debug!(sql = %sql, params = ?params, "query");
    let row = bind_all(sql, params).fetch_optional(pool).await?;
    Ok(row.map(|r| row_to_json(&r)))
}

/// Run a statement for its side effect; returns rows affected.
pub async fn execute(pool: &PgPool, sql: &str, params: &[Value]) -> Result<u64, AppError> {
    tracing::debug!(sql = %sql, params = ?params, "execute");
    let done = bind_all(sql, params).execute(pool).await?;
    Ok(done.rows_affected())
}

/// Convert a row to a JSON object keyed by column name (or alias).
pub fn row_to_json(row: &PgRow) -> Value {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    Value::Object(map)
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}
