//! Generated clause text paired with its ordered bind parameters.

use super::update::Fields;
use serde_json::{Map, Value};

/// Quote identifier for PostgreSQL (safe: only from descriptor tables).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Clause text plus parameters; placeholder `$n` binds `params[n - 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Clause {
    pub text: String,
    pub params: Vec<Value>,
}

impl Clause {
    pub fn new() -> Self {
        Clause::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Pushes a parameter and returns its placeholder number.
    pub fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// Placeholder number the caller should use for the next value it appends.
    pub fn next_placeholder(&self) -> usize {
        self.params.len() + 1
    }

    /// Consumes the clause and appends `extra` as the next parameter.
    pub fn with_trailing_param(mut self, extra: Value) -> Vec<Value> {
        self.params.push(extra);
        self.params
    }
}

/// INSERT one row from the permitted fields present in `body`, in declaration order.
/// Omitted fields are left to the column default.
pub fn insert(table: &str, fields: &Fields, body: &Map<String, Value>, returning: &str) -> Clause {
    let mut q = Clause::new();
    let mut cols = Vec::with_capacity(fields.0.len());
    let mut placeholders = Vec::with_capacity(fields.0.len());
    for f in fields.0 {
        let Some(val) = body.get(f.name) else { continue };
        let n = q.push_param(val.clone());
        cols.push(f.column);
        placeholders.push(format!("${}", n));
    }
    q.text = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table,
        cols.join(", "),
        placeholders.join(", "),
        returning
    );
    q
}
