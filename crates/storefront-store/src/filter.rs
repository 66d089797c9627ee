use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Number of documents a query returns when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 50;

/// Exact-match filter: every listed field must equal the given value.
/// The empty filter matches every document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    clauses: BTreeMap<String, Value>,
}

impl Filter {
    /// The filter that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality clause.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.insert(field.into(), value.into());
        self
    }

    /// Add an equality clause only when `value` is present.
    pub fn eq_opt(self, field: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn matches(&self, fields: &Map<String, Value>) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| fields.get(field) == Some(expected))
    }
}
