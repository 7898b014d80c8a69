//! Jobs, keyed by serial id and owned by a company.

use crate::error::{AppError, BuildError};
use crate::service::{execute, fetch_all, fetch_optional, Rule, Rules};
use crate::sql::{build_filter_clause, build_set_clause, insert, Clause, Criterion, Field, Fields, FilterSpec};
use serde_json::{Map, Value};
use sqlx::PgPool;

const RETURNING: &str = r#"id, title, salary, equity::text AS equity, company_handle AS "companyHandle""#;

const LIST_COLUMNS: &str = r#"j.id,
       j.title,
       j.salary,
       j.equity::text AS equity,
       j.company_handle AS "companyHandle",
       c.name AS "companyName"
  FROM jobs AS j
  LEFT JOIN companies AS c ON j.company_handle = c.handle"#;

/// Writable on update. A job cannot move to another company.
pub const FIELDS: Fields = Fields(&[Field::plain("title"), Field::plain("salary"), Field::plain("equity")]);

const INSERT_FIELDS: Fields = Fields(&[
    Field::plain("title"),
    Field::plain("salary"),
    Field::plain("equity"),
    Field::renamed("companyHandle", "company_handle"),
]);

/// `minSalary`, `title`, `hasEquity`, evaluated in that order; sorted by title.
pub const FILTER: FilterSpec = FilterSpec {
    criteria: &[
        Criterion::lower_bound("minSalary", "salary"),
        Criterion::substring("title", "title"),
        Criterion::flag("hasEquity", "equity"),
    ],
    order_by: "title",
};

pub const CREATE_RULES: Rules = &[
    ("title", Rule::string().required().length(1, 200)),
    ("salary", Rule::int4().min(0.0).nullable()),
    ("equity", Rule::number().min(0.0).max(1.0).nullable()),
    ("companyHandle", Rule::string().required().length(1, 25)),
];

pub const UPDATE_RULES: Rules = &[
    ("title", Rule::string().length(1, 200)),
    ("salary", Rule::int4().min(0.0).nullable()),
    ("equity", Rule::number().min(0.0).max(1.0).nullable()),
];

pub struct Job;

impl Job {
    pub fn find_all_query(criteria: &Map<String, Value>) -> Result<Clause, BuildError> {
        let filter = build_filter_clause(&FILTER, criteria)?;
        Ok(Clause {
            text: format!("SELECT {}{}", LIST_COLUMNS, FILTER.where_order_suffix(&filter)),
            params: filter.params,
        })
    }

    pub fn update_query(id: i64, data: &Map<String, Value>) -> Result<Clause, BuildError> {
        let set = build_set_clause(data, &FIELDS)?;
        let text = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {}",
            set.text,
            set.next_placeholder(),
            RETURNING
        );
        Ok(Clause {
            text,
            params: set.with_trailing_param(Value::Number(id.into())),
        })
    }

    /// Insert a job. An unknown `companyHandle` is NotFound.
    pub async fn create(pool: &PgPool, data: &Map<String, Value>) -> Result<Value, AppError> {
        let q = insert("jobs", &INSERT_FIELDS, data, RETURNING);
        let row = fetch_optional(pool, &q.text, &q.params)
            .await
            .map_err(|e| unknown_company(e, data))?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        let id = row.get("id").cloned().unwrap_or(Value::Null);
        tracing::info!(id = %id, "job created");
        Ok(row)
    }

    pub async fn find_all(pool: &PgPool, criteria: &Map<String, Value>) -> Result<Vec<Value>, AppError> {
        let q = Self::find_all_query(criteria)?;
        fetch_all(pool, &q.text, &q.params).await
    }

    /// One job with its company nested under `company`.
    pub async fn get(pool: &PgPool, id: i64) -> Result<Value, AppError> {
        let sql = r#"SELECT j.id,
                j.title,
                j.salary,
                j.equity::text AS equity,
                json_build_object(
                    'handle', c.handle,
                    'name', c.name,
                    'description', c.description,
                    'numEmployees', c.num_employees,
                    'logoUrl', c.logo_url) AS company
           FROM jobs AS j
           JOIN companies AS c ON j.company_handle = c.handle
          WHERE j.id = $1"#;
        fetch_optional(pool, sql, &[Value::Number(id.into())])
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no job: {}", id)))
    }

    pub async fn update(pool: &PgPool, id: i64, data: &Map<String, Value>) -> Result<Value, AppError> {
        let q = Self::update_query(id, data)?;
        fetch_optional(pool, &q.text, &q.params)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no job: {}", id)))
    }

    pub async fn remove(pool: &PgPool, id: i64) -> Result<(), AppError> {
        let n = execute(pool, "DELETE FROM jobs WHERE id = $1", &[Value::Number(id.into())]).await?;
        if n == 0 {
            return Err(AppError::NotFound(format!("no job: {}", id)));
        }
        Ok(())
    }
}

fn unknown_company(err: AppError, data: &Map<String, Value>) -> AppError {
    match err {
        AppError::Db(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
            let handle = data.get("companyHandle").and_then(Value::as_str).unwrap_or_default();
            AppError::NotFound(format!("no company: {}", handle))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn salary_then_title() {
        let q = Job::find_all_query(&map(json!({"title": "Den", "minSalary": 100000}))).unwrap();
        assert!(q.text.ends_with(" WHERE salary >= $1 AND title ILIKE $2 ORDER BY title"));
        assert_eq!(q.params, vec![json!(100000), json!("%Den%")]);
    }

    #[test]
    fn equity_flag_binds_nothing() {
        let q = Job::find_all_query(&map(json!({"hasEquity": true}))).unwrap();
        assert!(q.text.ends_with(" WHERE equity > 0 ORDER BY title"));
        assert!(q.params.is_empty());

        let q = Job::find_all_query(&map(json!({"hasEquity": false}))).unwrap();
        assert!(q.text.ends_with("ON j.company_handle = c.handle"));
    }

    #[test]
    fn update_binds_id_last() {
        let q = Job::update_query(7, &map(json!({"salary": 90000, "title": "banker"}))).unwrap();
        assert!(q.text.starts_with(r#"UPDATE jobs SET "salary"=$1, "title"=$2 WHERE id = $3 RETURNING"#));
        assert_eq!(q.params, vec![json!(90000), json!("banker"), json!(7)]);
    }

    #[test]
    fn update_cannot_move_company() {
        let err = Job::update_query(7, &map(json!({"companyHandle": "c2"}))).unwrap_err();
        assert_eq!(err, BuildError::UnknownField("companyHandle".into()));
    }
}
