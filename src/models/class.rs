use std::fmt;

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// An assignment belonging to exactly one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Stable identifier.
    pub id:             String,
    /// Display name.
    #[serde(default)]
    pub name:           String,
    /// Free-form description shown to students.
    #[serde(default)]
    pub description:    Option<String>,
    /// File names that must all be submitted for a submission to be complete.
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_files: Vec<String>,
    /// Due date as sent by the server.
    #[serde(default)]
    pub due_date:       Option<String>,
    /// Owning class.
    #[serde(default)]
    pub class_id:       String,
}

/// A class (course section) and its assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutograderClass {
    /// Stable identifier.
    pub id:          String,
    /// Display name.
    #[serde(default)]
    pub name:        String,
    /// Term label, e.g. `"Fall 2024"`.
    #[serde(default)]
    pub quarter:     Option<String>,
    /// Assignments of this class; empty when the relation was not expanded.
    #[serde(rename = "assignment", default, deserialize_with = "null_as_default")]
    pub assignments: Vec<Assignment>,
}

impl AutograderClass {
    /// Looks up one of this class's assignments by id.
    pub fn assignment(&self, assignment_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == assignment_id)
    }
}

impl fmt::Display for AutograderClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}), {} assignment(s)",
            self.name,
            self.quarter.as_deref().unwrap_or("no term"),
            self.assignments.len()
        )
    }
}
