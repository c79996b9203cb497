use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// One uploaded file of one submission attempt.
///
/// `version` is assigned by the backend and strictly increases per
/// (profile, assignment, file name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Server-assigned identifier; also the object name in storage.
    pub id:            String,
    /// Submitting profile.
    pub profile_id:    String,
    /// Assignment submitted for.
    pub assignment_id: String,
    /// Uploaded file name, verbatim.
    pub file_name:     String,
    /// Submission version.
    pub version:       u32,
    /// Upload timestamp.
    #[serde(default)]
    pub created_at:    Option<String>,
}

/// A submission version label, rendered as `v<N>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionVersion(pub u32);

impl SubmissionVersion {
    /// The numeric version.
    pub fn number(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SubmissionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl FromStr for SubmissionVersion {
    type Err = ClientError;

    /// Accepts `v3`, `V3` or `3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix(['v', 'V'])
            .unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(SubmissionVersion)
            .map_err(|_| ClientError::InvalidVersion(s.to_string()))
    }
}

impl From<u32> for SubmissionVersion {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
