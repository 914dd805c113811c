//! The seam between the executor and the HTTP library.
//!
//! [`ReqwestTransport`] is the production implementation. Tests plug in-memory
//! transports to script status codes, bodies, delays and failures.

use std::future::Future;

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http::{HeaderMap, Method};
use tracing::debug;
use url::Url;

use super::config::ExecutorConfig;
use super::error::FetchError;

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target address.
    pub url: Url,
    /// Request headers, merged over the session defaults.
    pub headers: HeaderMap,
    /// Encoded body, if any.
    pub body: Option<Bytes>,
}

impl TransportRequest {
    /// A `GET` request without body.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// A `POST` request carrying an already encoded JSON body.
    pub fn post_json(url: Url, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            method: Method::POST,
            url,
            headers,
            body: Some(body.into()),
        }
    }
}

/// The raw outcome of a request: status code and body bytes.
///
/// Response headers are not kept, the pipeline only looks at the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body, possibly empty.
    pub body: Bytes,
}

impl TransportResponse {
    /// A response with the given status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Broad category of a transport failure, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum FailureKind {
    /// The connection could not be established.
    Connect,
    /// A timeout elapsed.
    Timeout,
    /// Reading the body failed.
    Body,
    /// Anything else.
    Other,
}

/// A request that did not produce an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display("{kind} failure: {message}")]
pub struct TransportFailure {
    /// What went wrong.
    pub kind: FailureKind,
    /// Message of the underlying error.
    pub message: String,
}

impl TransportFailure {
    /// A failure of the given kind.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            FailureKind::Timeout
        } else if error.is_connect() {
            FailureKind::Connect
        } else if error.is_body() || error.is_decode() {
            FailureKind::Body
        } else {
            FailureKind::Other
        };
        Self::new(kind, error.to_string())
    }
}

/// An asynchronous HTTP client able to perform one request.
///
/// Implementations must be cheap to clone and safe to share between tasks:
/// every clone uses the same underlying session.
pub trait Transport: Clone + Send + Sync + 'static {
    /// Performs the request and returns the status code and body.
    ///
    /// Any non-2xx status is still a successful transport outcome.
    fn send(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportFailure>> + Send;
}

/// [`Transport`] backed by a shared `reqwest` client and its connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds the session from the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ConfigurationError`] if the configuration is invalid or
    /// the HTTP client cannot be initialised.
    pub fn new(config: &ExecutorConfig) -> Result<Self, FetchError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .connect_timeout(config.request_timeout)
            .read_timeout(config.request_timeout)
            .timeout(config.resource_timeout)
            .build()
            .map_err(|err| {
                debug!(%err, "fail to build the HTTP client");
                FetchError::ConfigurationError
            })?;
        Ok(Self { client })
    }

    /// Wraps an already configured `reqwest` client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        let TransportRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(TransportResponse { status, body })
    }
}
