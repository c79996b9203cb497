use std::fmt;

use serde::{Deserialize, Serialize};

use super::AutograderClass;

/// A user's autograder profile.
///
/// `classes` is never read from the wire. It is filled only by
/// [`crate::aggregate::enrollments_to_profiles`] and stays `None` for a
/// profile fetched on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Stable identifier.
    pub id:         String,
    /// Contact email.
    #[serde(default)]
    pub email:      String,
    /// Identifier of the matching user in the authentication subsystem.
    #[serde(default)]
    pub auth_id:    String,
    /// Whether the profile belongs to a teacher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_teacher: Option<bool>,
    /// Classes this profile is enrolled in.
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub classes:    Option<Vec<AutograderClass>>,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let classes = match &self.classes {
            Some(classes) => classes
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            None => "<none>".to_string(),
        };
        write!(f, "email:{}, ID:{}, Classes:{}", self.email, self.id, classes)
    }
}

/// Role of a profile within a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentType {
    /// Enrolled as a student.
    Student,
    /// Enrolled as a teacher.
    Teacher,
    /// Any role this client does not know about.
    #[serde(untagged)]
    Other(String),
}

/// One (profile, class) membership edge as returned by the relational API.
///
/// Enrollments are flattened into profiles before reaching callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Role of the profile in the class.
    #[serde(rename = "type")]
    pub kind:    EnrollmentType,
    /// The class side of the edge.
    pub class:   AutograderClass,
    /// The profile side of the edge.
    pub profile: Profile,
}
