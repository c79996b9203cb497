#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use crate::{
    aggregate::filter_placeholders,
    error::Result,
    models::{ListObjectsRequest, StoredObject, SubmissionVersion},
    rest::RelationalClient,
    session::SessionState,
    transport::Transport,
};

/// Path prefix of the object-storage API.
pub const STORAGE_PATH: &str = "/storage/v1/object";
/// Bucket holding submitted files.
pub const SUBMISSIONS_BUCKET: &str = "submissions";

/// Object path of a submitted file: `<bucket>/<authId>/<submissionId>`.
pub fn submission_object_path(auth_id: &str, submission_id: &str) -> String {
    format!("{SUBMISSIONS_BUCKET}/{auth_id}/{submission_id}")
}

/// Folder prefix used by the older listing layout:
/// `<root>/<assignment>[/<version>]`.
pub fn listing_prefix(root: &str, assignment_id: &str, version: Option<SubmissionVersion>) -> String {
    match version {
        Some(version) => format!("{root}/{assignment_id}/{version}"),
        None => format!("{root}/{assignment_id}"),
    }
}

/// Full path of one file in the older listing layout:
/// `<root>/<assignment>/<version>/<fileName>`.
pub fn listing_path(root: &str, assignment_id: &str, version: SubmissionVersion, file_name: &str) -> String {
    format!("{}/{file_name}", listing_prefix(root, assignment_id, Some(version)))
}

/// Reads submitted files from the storage bucket.
///
/// Listing uses the folder layout of older uploads and is kept for browsing
/// only; versions and completeness are resolved from relational rows.
#[derive(Debug)]
pub struct StorageClient<T> {
    /// Authenticated HTTP helpers shared with the relational client.
    http:   RelationalClient<T>,
    /// Bucket name.
    bucket: String,
}

impl<T: Transport> StorageClient<T> {
    /// Reads from the submissions bucket.
    pub fn new(transport: Arc<T>, base_url: impl Into<String>) -> Self {
        Self::with_bucket(transport, base_url, SUBMISSIONS_BUCKET)
    }

    /// Reads from an arbitrary bucket.
    pub fn with_bucket(transport: Arc<T>, base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            http:   RelationalClient::new(transport, base_url),
            bucket: bucket.into(),
        }
    }

    /// Absolute URL of an object path.
    pub fn object_url(&self, object_path: &str) -> String {
        self.http
            .endpoint(&format!("{STORAGE_PATH}/{}", object_path.trim_start_matches('/')))
    }

    /// Version folders (`v1`, `v2`, ...) under `<root>/<assignment>`.
    pub async fn list_versions(
        &self,
        session: &SessionState,
        root: &str,
        assignment_id: &str,
    ) -> Result<Vec<StoredObject>> {
        self.list(session, listing_prefix(root, assignment_id, None))
            .await
    }

    /// Files under `<root>/<assignment>/<version>`.
    pub async fn list_files(
        &self,
        session: &SessionState,
        root: &str,
        assignment_id: &str,
        version: SubmissionVersion,
    ) -> Result<Vec<StoredObject>> {
        self.list(session, listing_prefix(root, assignment_id, Some(version)))
            .await
    }

    /// Lists `prefix`, dropping empty-folder markers. Empty on a non-success
    /// status.
    pub async fn list(&self, session: &SessionState, prefix: String) -> Result<Vec<StoredObject>> {
        let url = self
            .http
            .endpoint(&format!("{STORAGE_PATH}/list/{}", self.bucket));
        let body = ListObjectsRequest::for_prefix(prefix);

        let objects: Option<Vec<StoredObject>> = self.http.insert(session, &url, &body).await?;
        Ok(filter_placeholders(objects.unwrap_or_default()))
    }

    /// Raw bytes of an object; `None` on a non-success status.
    pub async fn download_bytes(&self, session: &SessionState, object_path: &str) -> Result<Option<Vec<u8>>> {
        let response = self.http.get(session, &self.object_url(object_path)).await?;
        if !response.is_success() {
            return Ok(None);
        }
        Ok(Some(response.body))
    }

    /// Object contents as UTF-8 text; `None` on a non-success status.
    pub async fn download_text(&self, session: &SessionState, object_path: &str) -> Result<Option<String>> {
        let response = self.http.get(session, &self.object_url(object_path)).await?;
        if !response.is_success() {
            return Ok(None);
        }
        response.text(object_path).map(Some)
    }
}
