#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{future::Future, time::Duration};

use reqwest::{Client, Method, StatusCode, header::CONTENT_TYPE};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{ClientError, Result};

/// An outgoing HTTP request, independent of any HTTP library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method:  Method,
    /// Absolute URL.
    pub url:     String,
    /// Header name/value pairs, in insertion order.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body:    Option<Vec<u8>>,
}

impl HttpRequest {
    /// A `GET` with no headers.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method:  Method::GET,
            url:     url.into(),
            headers: Vec::new(),
            body:    None,
        }
    }

    /// A `POST` carrying `body` serialized as JSON.
    pub fn post_json<B: Serialize + ?Sized>(url: impl Into<String>, body: &B) -> Result<Self> {
        let body = serde_json::to_vec(body).map_err(|e| ClientError::encode("request body", e))?;
        Ok(Self {
            method:  Method::POST,
            url:     url.into(),
            headers: Vec::new(),
            body:    Some(body),
        })
    }

    /// Appends headers.
    pub fn with_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.headers.extend(headers);
        self
    }

    /// First value of header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: StatusCode,
    /// Raw body bytes.
    pub body:   Vec<u8>,
}

impl HttpResponse {
    /// Builds a response from a status code and body.
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::decode(context, e))
    }

    /// Decodes the body as UTF-8 text.
    pub fn text(&self, context: &str) -> Result<String> {
        String::from_utf8(self.body.clone()).map_err(|e| ClientError::decode(context, e))
    }
}

/// Sends requests and returns responses.
///
/// Implementations only report failures that prevented a response from
/// arriving; any status code is a successful exchange at this level.
pub trait Transport: Send + Sync {
    /// Sends one request.
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse>> + Send;
}

/// [`Transport`] backed by one shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Pooled HTTP client.
    client: Client,
}

impl ReqwestTransport {
    /// Builds the shared client with a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            // Avoid macOS dynamic store lookups that fail in sandboxed environments.
            .no_proxy()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
