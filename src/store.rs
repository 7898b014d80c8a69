//! Database bootstrap: create the target database if missing, then the application tables.

use crate::error::{AppError, ConfigError};
use crate::sql::quoted;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const MAINTENANCE_DB: &str = "postgres";

/// Table DDL in dependency order. Every statement is idempotent.
const TABLES: &[(&str, &str)] = &[
    (
        "companies",
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            handle VARCHAR(25) PRIMARY KEY CHECK (handle = lower(handle)),
            name TEXT UNIQUE NOT NULL,
            num_employees INTEGER CHECK (num_employees >= 0),
            description TEXT NOT NULL,
            logo_url TEXT
        )
        "#,
    ),
    (
        "jobs",
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id SERIAL PRIMARY KEY,
            title TEXT NOT NULL,
            salary INTEGER CHECK (salary >= 0),
            equity NUMERIC CHECK (equity <= 1.0),
            company_handle VARCHAR(25) NOT NULL
                REFERENCES companies ON DELETE CASCADE
        )
        "#,
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username VARCHAR(25) PRIMARY KEY,
            password TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL CHECK (position('@' IN email) > 1),
            is_admin BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    ),
    (
        "applications",
        r#"
        CREATE TABLE IF NOT EXISTS applications (
            username VARCHAR(25)
                REFERENCES users ON DELETE CASCADE,
            job_id INTEGER
                REFERENCES jobs ON DELETE CASCADE,
            PRIMARY KEY (username, job_id)
        )
        "#,
    ),
];

/// Create companies, jobs, users and applications if they do not exist.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for (name, ddl) in TABLES {
        sqlx::query(ddl).execute(pool).await?;
        tracing::debug!(table = name, "table ensured");
    }
    tracing::info!(tables = TABLES.len(), "schema ready");
    Ok(())
}

/// Create the database named in `database_url` when the server does not have it yet.
/// A URL naming `postgres` itself, or no database, is left alone.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (maintenance, target) = split_target(database_url)?;
    let Some(target) = target else {
        return Ok(());
    };
    let mut conn = maintenance.connect().await?;
    let (present,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&target)
        .fetch_one(&mut conn)
        .await?;
    if present {
        tracing::debug!(database = %target, "database present");
        return Ok(());
    }
    tracing::info!(database = %target, "creating database");
    sqlx::query(&format!("CREATE DATABASE {}", quoted(&target)))
        .execute(&mut conn)
        .await?;
    Ok(())
}

/// Options for the `postgres` maintenance database, plus the database to create.
fn split_target(database_url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|e| ConfigError::Invalid {
        name: "DATABASE_URL",
        reason: e.to_string(),
    })?;
    let target = opts
        .get_database()
        .map(str::to_string)
        .filter(|db| !db.is_empty() && db != MAINTENANCE_DB);
    Ok((opts.database(MAINTENANCE_DB), target))
}
