#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Wire records exchanged with the backend.
//!
//! Every record is a read-only snapshot built from one response. Field names
//! follow the snake_case JSON used by the relational API unless noted.

/// Authentication and invitation payloads.
pub mod auth;
/// Classes and assignments.
pub mod class;
/// Profiles and enrollment join rows.
pub mod profile;
/// Storage bucket listing records.
pub mod storage;
/// Relational submission rows and version labels.
pub mod submission;

pub use auth::{AuthenticationRequest, AuthenticationResponse, InviteTeacherRequest, User};
pub use class::{Assignment, AutograderClass};
pub use profile::{Enrollment, EnrollmentType, Profile};
pub use storage::{ListObjectsRequest, ObjectMetadata, SortBy, SortOrder, StoredObject};
pub use submission::{Submission, SubmissionVersion};

/// Deserializes a JSON `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
