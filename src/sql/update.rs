//! Partial-update SET clause: one `"column"=$n` assignment per supplied field.

use super::builder::{quoted, Clause};
use crate::error::BuildError;
use serde_json::{Map, Value};

/// Maps a logical (API) field name to the physical column it writes.
pub trait ColumnResolver {
    fn resolve<'a>(&'a self, field: &'a str) -> Result<&'a str, BuildError>;
}

/// Permissive rename table: listed fields are renamed, anything else keeps its own name.
#[derive(Clone, Copy, Debug, Default)]
pub struct RenameTable<'t>(pub &'t [(&'t str, &'t str)]);

impl ColumnResolver for RenameTable<'_> {
    fn resolve<'a>(&'a self, field: &'a str) -> Result<&'a str, BuildError> {
        Ok(self
            .0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .unwrap_or(field))
    }
}

/// One permitted field of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub column: &'static str,
}

impl Field {
    /// Field stored under its own name.
    pub const fn plain(name: &'static str) -> Self {
        Field { name, column: name }
    }

    /// Field stored under a different column name.
    pub const fn renamed(name: &'static str, column: &'static str) -> Self {
        Field { name, column }
    }
}

/// Closed set of writable fields for one entity. Unlisted fields are rejected.
#[derive(Clone, Copy, Debug)]
pub struct Fields(pub &'static [Field]);

impl Fields {
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl ColumnResolver for Fields {
    fn resolve<'a>(&'a self, field: &'a str) -> Result<&'a str, BuildError> {
        self.get(field)
            .map(|f| f.column)
            .ok_or_else(|| BuildError::UnknownField(field.to_string()))
    }
}

/// Build the SET clause for a partial update.
///
/// Keys are taken in payload order; the key at position `i` becomes `"column"=$i` and its
/// value lands at `params[i - 1]`. Columns are not deduplicated: two fields resolving to
/// the same column both appear. An empty payload is rejected with [`BuildError::NoData`].
pub fn build_set_clause<R>(payload: &Map<String, Value>, resolver: &R) -> Result<Clause, BuildError>
where
    R: ColumnResolver + ?Sized,
{
    if payload.is_empty() {
        return Err(BuildError::NoData);
    }
    let mut q = Clause::new();
    let mut sets = Vec::with_capacity(payload.len());
    for (key, value) in payload {
        let column = resolver.resolve(key)?;
        let n = q.push_param(value.clone());
        sets.push(format!("{}=${}", quoted(column), n));
    }
    q.text = sets.join(", ");
    Ok(q)
}
