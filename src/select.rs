#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use crate::query::QueryError;

/// One entry of a projection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    /// Every column of the current table (`*`).
    All,
    /// A single named column.
    Column(String),
    /// An embedded relation with its own projection, e.g. `class(*)`.
    Embed {
        /// Name of the related table.
        relation: String,
        /// Projection applied to the related rows.
        select:   Select,
    },
}

/// A typed relation-expansion expression.
///
/// Renders to the PostgREST `select` parameter, for example
/// `*,class(*,assignment(*))`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    /// Items in the order they were added.
    items: Vec<SelectItem>,
}

impl Select {
    /// `*`
    pub fn all() -> Self {
        Self {
            items: vec![SelectItem::All],
        }
    }

    /// A projection of the given columns only.
    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: columns
                .into_iter()
                .map(|c| SelectItem::Column(c.into()))
                .collect(),
        }
    }

    /// Adds one more column.
    pub fn with_column(mut self, name: impl Into<String>) -> Self {
        self.items.push(SelectItem::Column(name.into()));
        self
    }

    /// Embeds a related table with its own projection.
    pub fn embed(mut self, relation: impl Into<String>, select: Select) -> Self {
        self.items.push(SelectItem::Embed {
            relation: relation.into(),
            select,
        });
        self
    }

    /// Checks that every level has at least one item and every name is a
    /// plain identifier that cannot break the surrounding expression.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.items.is_empty() {
            return Err(QueryError::InvalidSelect("empty projection".into()));
        }

        for item in &self.items {
            match item {
                SelectItem::All => {}
                SelectItem::Column(name) => check_name(name)?,
                SelectItem::Embed { relation, select } => {
                    check_name(relation)?;
                    select.validate()?;
                }
            }
        }

        Ok(())
    }

    /// Enrollment rows with both sides of the membership expanded:
    /// `*,profile(*),class(*,assignment(*))`.
    pub fn enrollment_graph() -> Self {
        Self::all()
            .embed("profile", Self::all())
            .embed("class", Self::class_with_assignments())
    }

    /// A class with its assignments: `*,assignment(*)`.
    pub fn class_with_assignments() -> Self {
        Self::all().embed("assignment", Self::all())
    }
}

/// Accepts ASCII letters, digits and `_` only. Use [`SelectItem::All`] for
/// `*`.
fn check_name(name: &str) -> Result<(), QueryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(QueryError::InvalidSelect("empty column or relation name".into()));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(QueryError::InvalidSelect(format!("`{name}` is not a plain identifier")));
    }
    Ok(())
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match item {
                SelectItem::All => f.write_str("*")?,
                SelectItem::Column(name) => f.write_str(name.trim())?,
                SelectItem::Embed { relation, select } => {
                    write!(f, "{}({select})", relation.trim())?
                }
            }
        }
        Ok(())
    }
}
