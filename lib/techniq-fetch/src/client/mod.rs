use std::ops::RangeInclusive;

use http::header::{ACCEPT, USER_AGENT};
use http::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

mod address;
pub use self::address::{EndpointRequest, QueryParams, build_address};

mod auth;
pub use self::auth::{Authentication, SecureString};

mod builder;
pub use self::builder::RequestExecutorBuilder;

mod config;
pub use self::config::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESOURCE_TIMEOUT, ExecutorConfig};

mod decode;
pub use self::decode::{Decoder, KeyStrategy};

mod error;
pub use self::error::{ExecutionOutcome, FetchError};

mod retry;
pub use self::retry::RetryPolicy;

mod transport;
pub use self::transport::{
    FailureKind, ReqwestTransport, Transport, TransportFailure, TransportRequest,
    TransportResponse,
};

#[cfg(test)]
mod tests;

const SUCCESS_STATUS: RangeInclusive<u16> = 200..=299;

/// Performs one request/response cycle and returns a typed value or a [`FetchError`].
///
/// The executor owns a transport session (connection pool and timeouts), the
/// default headers and the decoder. It is cheap to clone, and clones share the
/// same session, so concurrent calls need no locking.
///
/// Every call performs exactly one round-trip: no retry, no cache. See
/// [`RetryPolicy`] for caller-side retries.
///
/// # Example
///
/// ```rust,no_run
/// use serde::Deserialize;
/// use techniq_fetch::{QueryParams, RequestExecutor};
///
/// #[derive(Debug, Deserialize)]
/// struct Exercise {
///     name: String,
///     target_skills: Vec<String>,
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), techniq_fetch::FetchError> {
/// let executor = RequestExecutor::builder()
///     .with_base_address("https://api.example.com")
///     .build()?;
///
/// let query = QueryParams::new().add_param("category", "technical");
/// let address = executor.address("/exercises", &query)?;
/// let exercises: Vec<Exercise> = executor.execute(address).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestExecutor<T = ReqwestTransport> {
    transport: T,
    base_address: Option<String>,
    headers: HeaderMap,
    decoder: Decoder,
}

// Create
impl RequestExecutor {
    pub fn builder() -> RequestExecutorBuilder {
        RequestExecutorBuilder::default()
    }
}

impl<T> RequestExecutor<T>
where
    T: Transport,
{
    pub(crate) fn new(
        transport: T,
        base_address: Option<String>,
        config: &ExecutorConfig,
    ) -> Result<Self, FetchError> {
        let user_agent = HeaderValue::from_str(&config.user_agent).map_err(|err| {
            debug!(%err, user_agent = %config.user_agent, "invalid user agent");
            FetchError::ConfigurationError
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, user_agent);

        Ok(Self {
            transport,
            base_address,
            headers,
            decoder: Decoder::new(config.key_strategy),
        })
    }

    /// Returns a copy of this executor adding the credentials to every request.
    ///
    /// The copy shares the transport session.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ConfigurationError`] if the credentials are not a
    /// valid header.
    pub fn authenticated(&self, authentication: &Authentication) -> Result<Self, FetchError> {
        let (name, value) = authentication.to_header()?;
        let mut result = self.clone();
        result.headers.insert(name, value);
        Ok(result)
    }

    pub fn base_address(&self) -> Option<&str> {
        self.base_address.as_deref()
    }

    pub fn key_strategy(&self) -> KeyStrategy {
        self.decoder.key_strategy()
    }

    /// Composes an address from the configured base address.
    ///
    /// Without base address, `path` must be an absolute address.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when [`build_address`] cannot compose
    /// the address.
    pub fn address(&self, path: &str, query: &QueryParams) -> Result<Url, FetchError> {
        let base_address = self.base_address.as_deref().unwrap_or_default();
        build_address(base_address, path, query).ok_or_else(|| {
            debug!(%base_address, %path, "cannot compose address");
            FetchError::InvalidUrl
        })
    }

    /// Issues a `GET` and decodes the response body into `R`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidResponse`] if the transport fails or times out
    /// - [`FetchError::HttpError`] if the status is outside `200..=299`
    /// - [`FetchError::NoData`] if the body is empty and `R` requires content
    /// - [`FetchError::DecodingError`] if the body does not match `R`
    pub async fn execute<R>(&self, address: Url) -> ExecutionOutcome<R>
    where
        R: DeserializeOwned,
    {
        self.send(TransportRequest::get(address)).await
    }

    /// Issues a `POST` with `body` encoded as JSON and decodes the response into `R`.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute). If `body` cannot be encoded, returns
    /// [`FetchError::DecodingError`] without any I/O.
    pub async fn execute_with_body<B, R>(&self, address: Url, body: &B) -> ExecutionOutcome<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(body).map_err(|err| {
            debug!(%err, "cannot encode request body");
            FetchError::decoding(format!("request body: {err}"))
        })?;
        self.send(TransportRequest::post_json(address, body)).await
    }

    /// Runs the full pipeline for an arbitrary request.
    ///
    /// Default headers (`accept`, `user-agent`, credentials) are added unless the
    /// request already sets them.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn send<R>(&self, mut request: TransportRequest) -> ExecutionOutcome<R>
    where
        R: DeserializeOwned,
    {
        for (name, value) in &self.headers {
            request
                .headers
                .entry(name)
                .or_insert_with(|| value.clone());
        }

        let method = request.method.clone();
        let url = request.url.clone();
        debug!(%method, %url, "sending...");
        let response = self.transport.send(request).await.map_err(|failure| {
            debug!(%method, %url, %failure, "transport failure");
            FetchError::InvalidResponse
        })?;
        debug!(%method, %url, status = response.status, size = response.body.len(), "...receiving");

        if !SUCCESS_STATUS.contains(&response.status) {
            return Err(FetchError::HttpError {
                status_code: response.status,
            });
        }

        self.decoder.decode(&response.body)
    }
}
