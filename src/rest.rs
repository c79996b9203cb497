#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::Result,
    query::FilterQueryBuilder,
    session::SessionState,
    transport::{HttpRequest, HttpResponse, Transport},
};

/// Issues authenticated calls against the relational API.
///
/// Reads follow a "not found is not exceptional" policy: a non-success
/// status yields an empty or absent result. Transport failures and
/// undecodable bodies are errors.
#[derive(Debug)]
pub struct RelationalClient<T> {
    /// Shared transport.
    transport: Arc<T>,
    /// Backend base URL without a trailing slash.
    base_url:  String,
}

impl<T> Clone for RelationalClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            base_url:  self.base_url.clone(),
        }
    }
}

impl<T: Transport> RelationalClient<T> {
    /// Creates a client sending through `transport` to `base_url`.
    pub fn new(transport: Arc<T>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a backend path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Runs `query` and decodes every returned row.
    pub async fn query<R: DeserializeOwned>(
        &self,
        session: &SessionState,
        query: &FilterQueryBuilder,
    ) -> Result<Vec<R>> {
        let url = self.endpoint(&query.generate_query()?);
        let response = self.get(session, &url).await?;
        if !response.is_success() {
            return Ok(Vec::new());
        }
        response.json(&format!("`{}` rows", query.table()))
    }

    /// Runs `query` and returns the first row, if any.
    pub async fn query_one<R: DeserializeOwned>(
        &self,
        session: &SessionState,
        query: &FilterQueryBuilder,
    ) -> Result<Option<R>> {
        Ok(self.query(session, query).await?.into_iter().next())
    }

    /// Authenticated `GET` of an absolute URL. The response is returned
    /// whatever its status.
    pub async fn get(&self, session: &SessionState, url: &str) -> Result<HttpResponse> {
        let request = HttpRequest::get(url).with_headers(session.auth_headers()?);
        self.send(request).await
    }

    /// Authenticated JSON `POST` to an absolute URL; `None` on a non-success
    /// status.
    pub async fn insert<B, R>(&self, session: &SessionState, url: &str, body: &B) -> Result<Option<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.post(session, url, body).await?;
        if !response.is_success() {
            return Ok(None);
        }
        response.json(url).map(Some)
    }

    /// Authenticated JSON `POST` returning the raw response.
    pub async fn post<B>(&self, session: &SessionState, url: &str, body: &B) -> Result<HttpResponse>
    where
        B: Serialize + ?Sized,
    {
        let request = HttpRequest::post_json(url, body)?.with_headers(session.auth_headers()?);
        self.send(request).await
    }

    /// Sends through the transport, logging the exchange.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method.clone();
        let url = request.url.clone();
        tracing::debug!("{method} {url}");

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            tracing::warn!(
                "{method} {url} returned {}: {}",
                response.status,
                String::from_utf8_lossy(&response.body)
            );
        }
        Ok(response)
    }
}
