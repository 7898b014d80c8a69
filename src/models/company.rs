//! Companies, keyed by handle.

use crate::error::{AppError, BuildError};
use crate::service::{execute, fetch_all, fetch_optional, Format, Rule, Rules};
use crate::sql::{build_filter_clause, build_set_clause, insert, Clause, Criterion, Field, Fields, FilterSpec};
use serde_json::{Map, Value};
use sqlx::PgPool;

const COLUMNS: &str = r#"handle, name, description, num_employees AS "numEmployees", logo_url AS "logoUrl""#;

/// Writable on update. The handle is fixed at creation.
pub const FIELDS: Fields = Fields(&[
    Field::plain("name"),
    Field::plain("description"),
    Field::renamed("numEmployees", "num_employees"),
    Field::renamed("logoUrl", "logo_url"),
]);

const INSERT_FIELDS: Fields = Fields(&[
    Field::plain("handle"),
    Field::plain("name"),
    Field::plain("description"),
    Field::renamed("numEmployees", "num_employees"),
    Field::renamed("logoUrl", "logo_url"),
]);

/// `minEmployees`, `maxEmployees`, `name`, evaluated in that order; sorted by name.
pub const FILTER: FilterSpec = FilterSpec {
    criteria: &[
        Criterion::lower_bound("minEmployees", "num_employees"),
        Criterion::upper_bound("maxEmployees", "num_employees"),
        Criterion::substring("name", "name"),
    ],
    order_by: "name",
};

pub const CREATE_RULES: Rules = &[
    ("handle", Rule::string().required().length(1, 25).pattern("^[a-z0-9-]+$")),
    ("name", Rule::string().required().length(1, 200)),
    ("description", Rule::string().required()),
    ("numEmployees", Rule::int4().min(0.0).nullable()),
    ("logoUrl", Rule::string().format(Format::Url).nullable()),
];

pub const UPDATE_RULES: Rules = &[
    ("name", Rule::string().length(1, 200)),
    ("description", Rule::string()),
    ("numEmployees", Rule::int4().min(0.0).nullable()),
    ("logoUrl", Rule::string().format(Format::Url).nullable()),
];

pub struct Company;

impl Company {
    /// SELECT for the list endpoint; no criteria means no WHERE and no ORDER BY.
    pub fn find_all_query(criteria: &Map<String, Value>) -> Result<Clause, BuildError> {
        let filter = build_filter_clause(&FILTER, criteria)?;
        Ok(Clause {
            text: format!("SELECT {} FROM companies{}", COLUMNS, FILTER.where_order_suffix(&filter)),
            params: filter.params,
        })
    }

    /// UPDATE ... SET for the supplied fields; the handle binds after the SET values.
    pub fn update_query(handle: &str, data: &Map<String, Value>) -> Result<Clause, BuildError> {
        let set = build_set_clause(data, &FIELDS)?;
        let text = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {}",
            set.text,
            set.next_placeholder(),
            COLUMNS
        );
        Ok(Clause {
            text,
            params: set.with_trailing_param(Value::String(handle.to_string())),
        })
    }

    /// Insert a company. Fails with Conflict when the handle is taken.
    pub async fn create(pool: &PgPool, data: &Map<String, Value>) -> Result<Value, AppError> {
        let handle = data.get("handle").cloned().unwrap_or(Value::Null);
        let existing = fetch_optional(pool, "SELECT handle FROM companies WHERE handle = $1", &[handle.clone()]).await?;
        if existing.is_some() {
            return Err(AppError::Conflict(format!("duplicate company: {}", handle.as_str().unwrap_or_default())));
        }
        let q = insert("companies", &INSERT_FIELDS, data, COLUMNS);
        let row = fetch_optional(pool, &q.text, &q.params)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        tracing::info!(handle = %handle, "company created");
        Ok(row)
    }

    pub async fn find_all(pool: &PgPool, criteria: &Map<String, Value>) -> Result<Vec<Value>, AppError> {
        let q = Self::find_all_query(criteria)?;
        fetch_all(pool, &q.text, &q.params).await
    }

    /// One company with its jobs (`jobs` is `[]` when it has none).
    pub async fn get(pool: &PgPool, handle: &str) -> Result<Value, AppError> {
        let sql = r#"SELECT c.handle,
                c.name,
                c.description,
                c.num_employees AS "numEmployees",
                c.logo_url AS "logoUrl",
                (SELECT COALESCE(json_agg(json_build_object(
                            'id', j.id,
                            'title', j.title,
                            'salary', j.salary,
                            'equity', j.equity::text,
                            'companyHandle', j.company_handle) ORDER BY j.id), '[]'::json)
                   FROM jobs AS j
                  WHERE j.company_handle = c.handle) AS jobs
           FROM companies AS c
          WHERE c.handle = $1"#;
        fetch_optional(pool, sql, &[Value::String(handle.to_string())])
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no company: {}", handle)))
    }

    pub async fn update(pool: &PgPool, handle: &str, data: &Map<String, Value>) -> Result<Value, AppError> {
        let q = Self::update_query(handle, data)?;
        fetch_optional(pool, &q.text, &q.params)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no company: {}", handle)))
    }

    pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), AppError> {
        let n = execute(pool, "DELETE FROM companies WHERE handle = $1", &[Value::String(handle.to_string())]).await?;
        if n == 0 {
            return Err(AppError::NotFound(format!("no company: {}", handle)));
        }
        Ok(())
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
    fn list_without_criteria_has_no_where() {
        let q = Company::find_all_query(&Map::new()).unwrap();
        assert_eq!(q.text, format!("SELECT {} FROM companies", COLUMNS));
        assert!(q.params.is_empty());
    }

    #[test]
    fn list_with_criteria_orders_by_name() {
        let q = Company::find_all_query(&map(json!({"name": "ob", "minEmployees": 2}))).unwrap();
        assert_eq!(
            q.text,
            format!("SELECT {} FROM companies WHERE num_employees >= $1 AND name ILIKE $2 ORDER BY name", COLUMNS)
        );
        assert_eq!(q.params, vec![json!(2), json!("%ob%")]);
    }

    #[test]
    fn list_rejects_inverted_employee_range() {
        let err = Company::find_all_query(&map(json!({"minEmployees": 5, "maxEmployees": 2}))).unwrap_err();
        assert_eq!(err, BuildError::InvertedBounds { column: "num_employees" });
    }

    #[test]
    fn update_binds_handle_last() {
        let q = Company::update_query("c1", &map(json!({"numEmployees": 10, "logoUrl": null}))).unwrap();
        assert!(q.text.starts_with(r#"UPDATE companies SET "num_employees"=$1, "logo_url"=$2 WHERE handle = $3 RETURNING"#));
        assert_eq!(q.params, vec![json!(10), Value::Null, json!("c1")]);
    }

    #[test]
    fn update_rejects_handle_change_and_empty_body() {
        assert_eq!(
            Company::update_query("c1", &map(json!({"handle": "c2"}))).unwrap_err(),
            BuildError::UnknownField("handle".into())
        );
        assert_eq!(Company::update_query("c1", &Map::new()).unwrap_err(), BuildError::NoData);
    }
}
