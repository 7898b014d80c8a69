//! Users and their job applications. Registration and passwords live outside this crate;
//! the password column is never selected.

use crate::error::{AppError, BuildError};
use crate::service::{fetch_all, fetch_optional, execute, Format, Rule, Rules};
use crate::sql::{build_set_clause, Clause, Field, Fields};
use serde_json::{json, Map, Value};
use sqlx::PgPool;

const COLUMNS: &str = r#"username, first_name AS "firstName", last_name AS "lastName", email, is_admin AS "isAdmin""#;

pub const FIELDS: Fields = Fields(&[
    Field::renamed("firstName", "first_name"),
    Field::renamed("lastName", "last_name"),
    Field::plain("email"),
    Field::renamed("isAdmin", "is_admin"),
]);

pub const UPDATE_RULES: Rules = &[
    ("firstName", Rule::string().length(1, 30)),
    ("lastName", Rule::string().length(1, 30)),
    ("email", Rule::string().length(6, 60).format(Format::Email)),
    ("isAdmin", Rule::boolean()),
];

pub struct User;

impl User {
    pub fn update_query(username: &str, data: &Map<String, Value>) -> Result<Clause, BuildError> {
        let set = build_set_clause(data, &FIELDS)?;
        let text = format!(
            "UPDATE users SET {} WHERE username = ${} RETURNING {}",
            set.text,
            set.next_placeholder(),
            COLUMNS
        );
        Ok(Clause {
            text,
            params: set.with_trailing_param(Value::String(username.to_string())),
        })
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Value>, AppError> {
        fetch_all(pool, &format!("SELECT {} FROM users ORDER BY username", COLUMNS), &[]).await
    }

    /// One user with the ids of the jobs they applied to.
    pub async fn get(pool: &PgPool, username: &str) -> Result<Value, AppError> {
        let sql = format!(
            r#"SELECT {},
                (SELECT COALESCE(json_agg(a.job_id ORDER BY a.job_id), '[]'::json)
                   FROM applications AS a
                  WHERE a.username = users.username) AS jobs
           FROM users
          WHERE username = $1"#,
            COLUMNS
        );
        fetch_optional(pool, &sql, &[Value::String(username.to_string())])
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no user: {}", username)))
    }

    pub async fn update(pool: &PgPool, username: &str, data: &Map<String, Value>) -> Result<Value, AppError> {
        let q = Self::update_query(username, data)?;
        fetch_optional(pool, &q.text, &q.params)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no user: {}", username)))
    }

    pub async fn remove(pool: &PgPool, username: &str) -> Result<(), AppError> {
        let n = execute(pool, "DELETE FROM users WHERE username = $1", &[Value::String(username.to_string())]).await?;
        if n == 0 {
            return Err(AppError::NotFound(format!("no user: {}", username)));
        }
        Ok(())
    }

    /// Record that `username` applied to job `job_id`. Applying twice is a Conflict.
    pub async fn apply_to_job(pool: &PgPool, username: &str, job_id: i64) -> Result<Value, AppError> {
        let job = fetch_optional(pool, "SELECT id FROM jobs WHERE id = $1", &[json!(job_id)]).await?;
        if job.is_none() {
            return Err(AppError::NotFound(format!("no job: {}", job_id)));
        }
        let user = fetch_optional(pool, "SELECT username FROM users WHERE username = $1", &[json!(username)]).await?;
        if user.is_none() {
            return Err(AppError::NotFound(format!("no user: {}", username)));
        }
        let inserted = execute(
            pool,
            "INSERT INTO applications (job_id, username) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            &[json!(job_id), json!(username)],
        )
        .await?;
        if inserted == 0 {
            return Err(AppError::Conflict(format!("{} already applied to job {}", username, job_id)));
        }
        Ok(json!({ "applied": job_id }))
    }
}
