//! Request validation from static per-entity rules.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Number,
    Boolean,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
    Url,
}

/// Constraints on one body field. Built with the const helpers below.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub kind: ValueKind,
    pub required: bool,
    pub nullable: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub pattern: Option<&'static str>,
    pub format: Option<Format>,
}

impl Rule {
    const fn of(kind: ValueKind) -> Self {
        Rule {
            kind,
            required: false,
            nullable: false,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            pattern: None,
            format: None,
        }
    }

    pub const fn string() -> Self {
        Rule::of(ValueKind::String)
    }

    pub const fn integer() -> Self {
        Rule::of(ValueKind::Integer)
    }

    /// Integer within PostgreSQL `INTEGER` range.
    pub const fn int4() -> Self {
        Rule::integer().min(-2_147_483_648.0).max(2_147_483_647.0)
    }

    pub const fn number() -> Self {
        Rule::of(ValueKind::Number)
    }

    pub const fn boolean() -> Self {
        Rule::of(ValueKind::Boolean)
    }

    pub const fn required(self) -> Self {
        Rule { required: true, ..self }
    }

    pub const fn nullable(self) -> Self {
        Rule { nullable: true, ..self }
    }

    pub const fn length(self, min: usize, max: usize) -> Self {
        Rule {
            min_length: Some(min),
            max_length: Some(max),
            ..self
        }
    }

    pub const fn min(self, minimum: f64) -> Self {
        Rule {
            minimum: Some(minimum),
            ..self
        }
    }

    pub const fn max(self, maximum: f64) -> Self {
        Rule {
            maximum: Some(maximum),
            ..self
        }
    }

    pub const fn pattern(self, pattern: &'static str) -> Self {
        Rule {
            pattern: Some(pattern),
            ..self
        }
    }

    pub const fn format(self, format: Format) -> Self {
        Rule {
            format: Some(format),
            ..self
        }
    }
}

/// Field name → rule, for one request shape.
pub type Rules = &'static [(&'static str, Rule)];

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a full body (create): unknown fields are rejected, required fields must be present.
    pub fn validate(body: &Map<String, Value>, rules: Rules) -> Result<(), AppError> {
        for key in body.keys() {
            if !rules.iter().any(|(name, _)| *name == key.as_str()) {
                return Err(AppError::Validation(format!("{} is not an allowed field", key)));
            }
        }
        for (name, rule) in rules {
            let val = body.get(*name);
            if rule.required && val.is_none() {
                return Err(AppError::Validation(format!("{} is required", name)));
            }
            if let Some(v) = val {
                validate_field(name, v, rule)?;
            }
        }
        Ok(())
    }

    /// Validate only the fields present in body (for PATCH). Required is not enforced and
    /// unknown fields are left to the update builder.
    pub fn validate_partial(body: &Map<String, Value>, rules: Rules) -> Result<(), AppError> {
        for (col, v) in body {
            if let Some((_, rule)) = rules.iter().find(|(name, _)| *name == col.as_str()) {
                validate_field(col, v, rule)?;
            }
        }
        Ok(())
    }
}

fn validate_field(col: &str, v: &Value, rule: &Rule) -> Result<(), AppError> {
    if v.is_null() {
        if rule.nullable && !rule.required {
            return Ok(());
        }
        return Err(AppError::Validation(format!("{} must not be null", col)));
    }
    let type_ok = match rule.kind {
        ValueKind::String => v.is_string(),
        ValueKind::Integer => v.is_i64() || v.is_u64(),
        ValueKind::Number => v.is_number(),
        ValueKind::Boolean => v.is_boolean(),
    };
    if !type_ok {
        return Err(AppError::Validation(format!(
            "{} must be of type {}",
            col,
            kind_name(rule.kind)
        )));
    }
    if let Some(s) = v.as_str() {
        let len = s.chars().count();
        if let Some(max) = rule.max_length {
            if len > max {
                return Err(AppError::Validation(format!("{} must be at most {} characters", col, max)));
            }
        }
        if let Some(min) = rule.min_length {
            if len < min {
                return Err(AppError::Validation(format!("{} must be at least {} characters", col, min)));
            }
        }
        if let Some(pattern) = rule.pattern {
            let re = Regex::new(pattern).map_err(|_| AppError::Validation(format!("invalid pattern for {}", col)))?;
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} does not match required pattern", col)));
            }
        }
        if let Some(format) = rule.format {
            validate_format(col, s, format)?;
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", col, min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", col, max)));
            }
        }
    }
    Ok(())
}

fn kind_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::String => "string",
        ValueKind::Integer => "integer",
        ValueKind::Number => "number",
        ValueKind::Boolean => "boolean",
    }
}

fn validate_format(col: &str, s: &str, format: Format) -> Result<(), AppError> {
    match format {
        Format::Email => {
            let at = s.find('@');
            if !matches!(at, Some(i) if i > 0 && i + 1 < s.len()) {
                return Err(AppError::Validation(format!("{} must be a valid email", col)));
            }
        }
        Format::Url => {
            let re = Regex::new(r"^https?://[^\s/$.?#][^\s]*$").map_err(|_| AppError::Validation("invalid url pattern".into()))?;
            if !re.is_match(s) {
                return Err(AppError::Validation(format!("{} must be a valid URL", col)));
            }
        }
    }
    Ok(())
}
