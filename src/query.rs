#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::HashMap, fmt};

use url::form_urlencoded;

use crate::select::Select;

/// Path prefix of the relational (PostgREST) API.
pub const REST_PATH: &str = "/rest/v1";

/// Query key carrying the projection.
const SELECT_KEY: &str = "select";

/// An exact-match filter on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `column=eq.<value>`
    Eq(String),
    /// `column=neq.<value>`
    Neq(String),
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Eq(value) => write!(f, "eq.{value}"),
            Predicate::Neq(value) => write!(f, "neq.{value}"),
        }
    }
}

/// Failures while constructing a query.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The builder was bound to an empty table name.
    #[error("No table was selected to query.")]
    EmptyTable,
    /// A select expression is structurally invalid.
    #[error("Invalid select expression: {0}")]
    InvalidSelect(String),
}

/// Builds a relational query string for one table.
///
/// Filters live in a column → predicate map, so setting the same column
/// twice keeps only the last predicate. Select fragments accumulate and are
/// joined with `,`. `select` is one key: a filter on a column named `select`
/// replaces the fragments, and a later fragment replaces that filter.
#[derive(Debug, Clone)]
pub struct FilterQueryBuilder {
    /// Table the query is bound to.
    table:      String,
    /// Accumulated select fragments.
    select:     Vec<String>,
    /// Column filters.
    predicates: HashMap<String, Predicate>,
}

impl FilterQueryBuilder {
    /// Starts a query against `table`.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table:      table.into(),
            select:     Vec::new(),
            predicates: HashMap::new(),
        }
    }

    /// Appends a typed projection to the select expression.
    pub fn select(mut self, select: &Select) -> Result<Self, QueryError> {
        select.validate()?;
        Ok(self.select_raw(select.to_string()))
    }

    /// Appends a raw projection fragment, e.g. `"id,email"`.
    pub fn select_raw(mut self, fragment: impl Into<String>) -> Self {
        self.predicates.remove(SELECT_KEY);
        self.select.push(fragment.into());
        self
    }

    /// Filters on `column = value`.
    pub fn equals(self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filter(column.into(), Predicate::Eq(value.to_string()))
    }

    /// Filters on `column != value`.
    pub fn not_equals(self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filter(column.into(), Predicate::Neq(value.to_string()))
    }

    /// Stores a predicate, overwriting whatever `column` held before.
    fn filter(mut self, column: String, predicate: Predicate) -> Self {
        if column == SELECT_KEY {
            self.select.clear();
        }
        self.predicates.insert(column, predicate);
        self
    }

    /// Table this builder is bound to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The current column filters.
    pub fn predicates(&self) -> &HashMap<String, Predicate> {
        &self.predicates
    }

    /// The merged select expression, if any fragment was added.
    pub fn select_expr(&self) -> Option<String> {
        if self.select.is_empty() {
            None
        } else {
            Some(self.select.join(","))
        }
    }

    /// Renders `/rest/v1/<table>?k=v&...` with form-urlencoded keys and
    /// values. Parameter order is not stable.
    pub fn generate_query(&self) -> Result<String, QueryError> {
        let table = self.table.trim();
        if table.is_empty() {
            return Err(QueryError::EmptyTable);
        }

        let mut params: Vec<String> = Vec::with_capacity(self.predicates.len() + 1);
        if let Some(select) = self.select_expr() {
            params.push(encode_pair(SELECT_KEY, &select));
        }
        for (column, predicate) in &self.predicates {
            params.push(encode_pair(column, &predicate.to_string()));
        }

        Ok(format!("{REST_PATH}/{table}?{}", params.join("&")))
    }
}

/// Percent-encodes one `key=value` pair.
fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", encode(key), encode(value))
}

/// Form-urlencodes a string (space becomes `+`).
fn encode(raw: &str) -> String {
    form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}
