//! Dynamic WHERE clause from optional search criteria.
//!
//! Each entity declares a [`FilterSpec`]: an ordered list of criteria plus the column to sort
//! by. Criteria are evaluated in list order, which fixes placeholder numbering. Absent criteria
//! (missing key or JSON null) contribute nothing.

use super::builder::Clause;
use crate::error::BuildError;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CriterionKind {
    /// `column >= $n`
    LowerBound,
    /// `column <= $n`
    UpperBound,
    /// `column ILIKE $n`, bound as `%value%`
    Substring,
    /// `column > 0` when truthy; binds nothing
    Flag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Criterion {
    /// Name of the search parameter as the client sends it.
    pub name: &'static str,
    pub column: &'static str,
    pub kind: CriterionKind,
}

impl Criterion {
    pub const fn lower_bound(name: &'static str, column: &'static str) -> Self {
        Criterion { name, column, kind: CriterionKind::LowerBound }
    }

    pub const fn upper_bound(name: &'static str, column: &'static str) -> Self {
        Criterion { name, column, kind: CriterionKind::UpperBound }
    }

    pub const fn substring(name: &'static str, column: &'static str) -> Self {
        Criterion { name, column, kind: CriterionKind::Substring }
    }

    pub const fn flag(name: &'static str, column: &'static str) -> Self {
        Criterion { name, column, kind: CriterionKind::Flag }
    }
}

/// Recognized criteria for one entity, in evaluation order, plus its sort column.
#[derive(Clone, Copy, Debug)]
pub struct FilterSpec {
    pub criteria: &'static [Criterion],
    pub order_by: &'static str,
}

impl FilterSpec {
    /// Convert raw query-string pairs into typed criteria.
    /// Bounds must be integers, flags `true`/`false`; unknown names are rejected.
    pub fn parse_query(&self, query: &HashMap<String, String>) -> Result<Map<String, Value>, BuildError> {
        let mut unknown: Vec<&String> = query
            .keys()
            .filter(|k| !self.criteria.iter().any(|c| c.name == k.as_str()))
            .collect();
        unknown.sort();
        if let Some(name) = unknown.first() {
            return Err(BuildError::InvalidCriterion {
                name: name.to_string(),
                reason: "not a recognized search parameter".into(),
            });
        }

        let mut out = Map::new();
        for c in self.criteria {
            let Some(raw) = query.get(c.name) else { continue };
            let value = match c.kind {
                CriterionKind::LowerBound | CriterionKind::UpperBound => {
                    let n: i64 = raw.trim().parse().map_err(|_| BuildError::InvalidCriterion {
                        name: c.name.to_string(),
                        reason: "expected an integer".into(),
                    })?;
                    Value::Number(n.into())
                }
                CriterionKind::Flag => {
                    let raw = raw.trim();
                    if raw.eq_ignore_ascii_case("true") {
                        Value::Bool(true)
                    } else if raw.eq_ignore_ascii_case("false") {
                        Value::Bool(false)
                    } else {
                        return Err(BuildError::InvalidCriterion {
                            name: c.name.to_string(),
                            reason: "expected true or false".into(),
                        });
                    }
                }
                CriterionKind::Substring => Value::String(raw.clone()),
            };
            out.insert(c.name.to_string(), value);
        }
        Ok(out)
    }

    /// ` WHERE <predicates> ORDER BY <sort>` for a non-empty clause, nothing otherwise.
    pub fn where_order_suffix(&self, clause: &Clause) -> String {
        if clause.is_empty() {
            String::new()
        } else {
            format!(" WHERE {} ORDER BY {}", clause.text, self.order_by)
        }
    }
}

/// Build the predicate conjunction for `criteria` under `spec`.
///
/// Contradictory bounds on the same column fail before anything is built.
pub fn build_filter_clause(spec: &FilterSpec, criteria: &Map<String, Value>) -> Result<Clause, BuildError> {
    check_bounds(spec, criteria)?;

    let mut q = Clause::new();
    let mut preds = Vec::new();
    for c in spec.criteria {
        let Some(value) = present(criteria, c.name) else { continue };
        match c.kind {
            CriterionKind::LowerBound => {
                let n = q.push_param(value.clone());
                preds.push(format!("{} >= ${}", c.column, n));
            }
            CriterionKind::UpperBound => {
                let n = q.push_param(value.clone());
                preds.push(format!("{} <= ${}", c.column, n));
            }
            CriterionKind::Substring => {
                let needle = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let n = q.push_param(Value::String(format!("%{}%", needle)));
                preds.push(format!("{} ILIKE ${}", c.column, n));
            }
            CriterionKind::Flag => {
                if truthy(value) {
                    preds.push(format!("{} > 0", c.column));
                }
            }
        }
    }
    q.text = preds.join(" AND ");
    Ok(q)
}

fn present<'a>(criteria: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    criteria.get(name).filter(|v| !v.is_null())
}

fn check_bounds(spec: &FilterSpec, criteria: &Map<String, Value>) -> Result<(), BuildError> {
    for lower in spec.criteria.iter().filter(|c| c.kind == CriterionKind::LowerBound) {
        let Some(lo) = present(criteria, lower.name) else { continue };
        let uppers = spec
            .criteria
            .iter()
            .filter(|c| c.kind == CriterionKind::UpperBound && c.column == lower.column);
        for upper in uppers {
            let Some(hi) = present(criteria, upper.name) else { continue };
            if compare(lo, hi) == Some(Ordering::Greater) {
                return Err(BuildError::InvertedBounds { column: lower.column });
            }
        }
    }
    Ok(())
}

/// Numbers compare numerically, strings lexically; anything else is incomparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty() && !s.eq_ignore_ascii_case("false"),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COMPANIES: FilterSpec = FilterSpec {
        criteria: &[
            Criterion::lower_bound("minEmployees", "num_employees"),
            Criterion::upper_bound("maxEmployees", "num_employees"),
            Criterion::substring("name", "name"),
        ],
        order_by: "name",
    };

    const JOBS: FilterSpec = FilterSpec {
        criteria: &[
            Criterion::lower_bound("minSalary", "salary"),
            Criterion::substring("title", "title"),
            Criterion::flag("hasEquity", "equity"),
        ],
        order_by: "title",
    };

    fn criteria(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => panic!("criteria must be an object"),
        }
    }

    #[test]
    fn no_criteria_yields_empty_clause() {
        let q = build_filter_clause(&COMPANIES, &Map::new()).unwrap();
        assert!(q.is_empty());
        assert!(q.params.is_empty());
        assert_eq!(COMPANIES.where_order_suffix(&q), "");
    }

    #[test]
    fn substring_is_wrapped_in_wildcards() {
        let q = build_filter_clause(&COMPANIES, &criteria(json!({"name": "ob"}))).unwrap();
        assert_eq!(q.text, "name ILIKE $1");
        assert_eq!(q.params, vec![json!("%ob%")]);
        assert_eq!(COMPANIES.where_order_suffix(&q), " WHERE name ILIKE $1 ORDER BY name");
    }

    #[test]
    fn predicates_follow_descriptor_order() {
        let q = build_filter_clause(&JOBS, &criteria(json!({"title": "Den", "minSalary": 100000}))).unwrap();
        assert_eq!(q.text, "salary >= $1 AND title ILIKE $2");
        assert_eq!(q.params, vec![json!(100000), json!("%Den%")]);
    }

    #[test]
    fn both_bounds_on_one_column() {
        let q = build_filter_clause(
            &COMPANIES,
            &criteria(json!({"maxEmployees": 300, "minEmployees": 10, "name": "net"})),
        )
        .unwrap();
        assert_eq!(q.text, "num_employees >= $1 AND num_employees <= $2 AND name ILIKE $3");
        assert_eq!(q.params, vec![json!(10), json!(300), json!("%net%")]);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let err = build_filter_clause(&COMPANIES, &criteria(json!({"minEmployees": 5, "maxEmployees": 2}))).unwrap_err();
        assert_eq!(err, BuildError::InvertedBounds { column: "num_employees" });

        let err = build_filter_clause(&COMPANIES, &criteria(json!({"minEmployees": "b", "maxEmployees": "a"}))).unwrap_err();
        assert_eq!(err, BuildError::InvertedBounds { column: "num_employees" });
    }

    #[test]
    fn equal_bounds_are_accepted() {
        let q = build_filter_clause(&COMPANIES, &criteria(json!({"minEmployees": 7, "maxEmployees": 7}))).unwrap();
        assert_eq!(q.params, vec![json!(7), json!(7)]);
    }

    #[test]
    fn flag_consumes_no_placeholder() {
        let q = build_filter_clause(&JOBS, &criteria(json!({"hasEquity": true, "title": "eng"}))).unwrap();
        assert_eq!(q.text, "title ILIKE $1 AND equity > 0");
        assert_eq!(q.params, vec![json!("%eng%")]);
    }

    #[test]
    fn falsy_flag_and_null_contribute_nothing() {
        let q = build_filter_clause(&JOBS, &criteria(json!({"hasEquity": false, "minSalary": null}))).unwrap();
        assert!(q.is_empty());
        assert!(q.params.is_empty());
    }

    #[test]
    fn repeated_calls_are_identical() {
        let c = criteria(json!({"minSalary": 1, "hasEquity": "yes"}));
        assert_eq!(build_filter_clause(&JOBS, &c), build_filter_clause(&JOBS, &c));
    }

    #[test]
    fn parse_query_types_values() {
        let query: HashMap<String, String> = [
            ("minSalary".to_string(), "5000".to_string()),
            ("hasEquity".to_string(), "TRUE".to_string()),
            ("title".to_string(), "dev".to_string()),
        ]
        .into_iter()
        .collect();
        let parsed = JOBS.parse_query(&query).unwrap();
        assert_eq!(parsed.get("minSalary"), Some(&json!(5000)));
        assert_eq!(parsed.get("hasEquity"), Some(&json!(true)));
        assert_eq!(parsed.get("title"), Some(&json!("dev")));
    }

    #[test]
    fn parse_query_rejects_unknown_and_malformed() {
        let unknown: HashMap<String, String> = [("color".to_string(), "red".to_string())].into_iter().collect();
        assert!(matches!(
            JOBS.parse_query(&unknown),
            Err(BuildError::InvalidCriterion { name, .. }) if name == "color"
        ));

        let bad: HashMap<String, String> = [("minSalary".to_string(), "lots".to_string())].into_iter().collect();
        assert!(matches!(JOBS.parse_query(&bad), Err(BuildError::InvalidCriterion { .. })));

        let bad_flag: HashMap<String, String> = [("hasEquity".to_string(), "maybe".to_string())].into_iter().collect();
        assert!(matches!(JOBS.parse_query(&bad_flag), Err(BuildError::InvalidCriterion { .. })));
    }
}
