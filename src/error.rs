#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::query::QueryError;

/// Errors surfaced by the autograder client.
///
/// A non-success HTTP status on a read is *not* an error: read operations
/// return an empty or absent result instead. Everything listed here is either
/// a transport failure or a contract violation the caller must handle.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The request never produced a response (connection refused, timeout,
    /// TLS failure, ...).
    #[error("Transport failure: {0}")]
    Transport(String),
    /// A response body could not be decoded into the expected shape.
    #[error("Could not decode {context}: {message}")]
    Decode {
        /// What was being decoded.
        context: String,
        /// Underlying decoder message.
        message: String,
    },
    /// A request body or record could not be serialized.
    #[error("Could not encode {context}: {message}")]
    Encode {
        /// What was being encoded.
        context: String,
        /// Underlying encoder message.
        message: String,
    },
    /// No credential is available, not even the anonymous key.
    #[error("Not authenticated: no credential is available for this request.")]
    NotAuthenticated,
    /// The class requested does not exist (or is not visible).
    #[error("Class '{0}' does not exist.")]
    ClassNotFound(String),
    /// The assignment requested is not part of the class.
    #[error("Assignment '{assignment_id}' not in Class '{class_id}'.")]
    AssignmentNotInClass {
        /// Assignment that was looked up.
        assignment_id: String,
        /// Class it was expected in.
        class_id:      String,
    },
    /// The profile requested does not exist (or is not visible).
    #[error("Profile '{0}' does not exist.")]
    ProfileNotFound(String),
    /// No submission row matches the requested file and version.
    #[error("Submitted file '{file_name}' (version {version}) does not exist.")]
    SubmissionNotFound {
        /// Requested file name.
        file_name: String,
        /// Requested version.
        version:   u32,
    },
    /// A version label that is neither `vN` nor `N`.
    #[error("Invalid submission version `{0}`; expected `v<N>` or `<N>`.")]
    InvalidVersion(String),
    /// A query could not be constructed.
    #[error(transparent)]
    Query(#[from] QueryError),
    /// Configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Builds a [`ClientError::Decode`] from any displayable decoder error.
    pub fn decode(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// Builds a [`ClientError::Encode`] from any displayable encoder error.
    pub fn encode(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Encode {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// True for failures that happened below HTTP (no response at all).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;
