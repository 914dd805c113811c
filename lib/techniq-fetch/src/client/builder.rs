use std::time::Duration;

use super::address::{QueryParams, build_address};
use super::config::ExecutorConfig;
use super::decode::KeyStrategy;
use super::transport::{ReqwestTransport, Transport};
use super::{Authentication, FetchError, RequestExecutor};

/// Builder for creating [`RequestExecutor`] instances.
///
/// # Default Configuration
///
/// - **Base address**: None (only absolute addresses can be executed)
/// - **Request timeout**: 30 seconds
/// - **Resource timeout**: 60 seconds
/// - **Key strategy**: `snake_case`
/// - **Authentication**: None
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use techniq_fetch::{Authentication, RequestExecutor};
///
/// # fn example() -> Result<(), techniq_fetch::FetchError> {
/// let executor = RequestExecutor::builder()
///     .with_base_address("https://us-central1-techniq.cloudfunctions.net")
///     .with_request_timeout(Duration::from_secs(10))
///     .with_resource_timeout(Duration::from_secs(90))
///     .with_authentication(Authentication::Bearer("id-token".into()))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestExecutorBuilder {
    base_address: Option<String>,
    config: ExecutorConfig,
    authentication: Option<Authentication>,
}

impl RequestExecutorBuilder {
    /// Builds an executor backed by a fresh `reqwest` session.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ConfigurationError`] for invalid timeouts, credentials,
    /// user agent or base address.
    pub fn build(self) -> Result<RequestExecutor, FetchError> {
        let transport = ReqwestTransport::new(&self.config)?;
        self.build_with_transport(transport)
    }

    /// Builds an executor over a custom [`Transport`].
    ///
    /// The timeouts of the configuration are still validated, but applying them
    /// is the responsibility of the transport.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ConfigurationError`] for invalid timeouts, credentials,
    /// user agent or base address.
    pub fn build_with_transport<T>(self, transport: T) -> Result<RequestExecutor<T>, FetchError>
    where
        T: Transport,
    {
        let Self {
            base_address,
            config,
            authentication,
        } = self;

        config.validate()?;

        if let Some(base) = &base_address
            && build_address(base, "", &QueryParams::new()).is_none()
        {
            tracing::debug!(%base, "invalid base address");
            return Err(FetchError::ConfigurationError);
        }

        let executor = RequestExecutor::new(transport, base_address, &config)?;
        match &authentication {
            Some(auth) => executor.authenticated(auth),
            None => Ok(executor),
        }
    }

    /// Sets the prefix of every path given to [`RequestExecutor::address`].
    ///
    /// The base address and the path are concatenated as-is, a trailing `/` is
    /// kept.
    pub fn with_base_address(mut self, base_address: impl Into<String>) -> Self {
        self.base_address = Some(base_address.into());
        self
    }

    /// Sets the connect timeout, also applied between two reads.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Sets the timeout of the whole request.
    pub fn with_resource_timeout(mut self, timeout: Duration) -> Self {
        self.config.resource_timeout = timeout;
        self
    }

    /// Sets how response object keys are mapped before decoding.
    pub fn with_key_strategy(mut self, key_strategy: KeyStrategy) -> Self {
        self.config.key_strategy = key_strategy;
        self
    }

    /// Sets the `User-Agent` header of the session.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Adds credentials to every request.
    pub fn with_authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Replaces the whole configuration, for instance one loaded from a file.
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }
}
