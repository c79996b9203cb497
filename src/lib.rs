//! # autograder-client
//!
//! A client for the autograder backend: profiles, classes, assignments,
//! enrollments and submissions over a PostgREST API, and submitted files
//! from an object-storage bucket.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Reconstruction of nested records from flat rows
pub mod aggregate;
/// The public client facade
pub mod client;
/// Environment-driven configuration
pub mod config;
/// Error taxonomy
pub mod error;
/// Wire records
pub mod models;
/// Relational filter query builder
pub mod query;
/// Relational API access
pub mod rest;
/// Typed relation-expansion expressions
pub mod select;
/// Credential and identity state
pub mod session;
/// Object storage access
pub mod storage;
/// HTTP transport seam
pub mod transport;

pub use client::AutograderClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use query::FilterQueryBuilder;
pub use select::Select;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
