use std::future::Future;
use std::net::TcpListener;
use std::time::Duration;

use crate::{RequestExecutor, RequestExecutorBuilder};

/// Readiness reported by [`TestServer::is_healthy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Ready to accept requests.
    Healthy,
    /// Not ready yet, the check is retried.
    Unhealthy,
    /// No health check available, a TCP connection is attempted instead.
    Uncheckable,
}

/// A server launched in the background for integration tests.
///
/// # Example
///
/// ```rust,no_run
/// use std::net::TcpListener;
/// use techniq_fetch::test_server::TestServer;
///
/// #[derive(Debug)]
/// struct DrillServer;
///
/// impl TestServer for DrillServer {
///     type Error = std::io::Error;
///
///     async fn launch(&self, listener: TcpListener) -> Result<(), Self::Error> {
///         listener.set_nonblocking(true)?;
///         let _listener = tokio::net::TcpListener::from_std(listener)?;
///         // serve the router here, for instance with `axum::serve`
///         Ok(())
///     }
/// }
/// ```
pub trait TestServer {
    /// The error of a failed launch, logged by the test client.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serves requests on the given listener until the task is aborted.
    fn launch(&self, listener: TcpListener) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Tells whether the server is ready, using the test executor.
    fn is_healthy(
        &self,
        _executor: &RequestExecutor,
    ) -> impl Future<Output = Result<HealthStatus, Self::Error>> + Send {
        std::future::ready(Ok(HealthStatus::Uncheckable))
    }

    /// Settings of the test client, the defaults unless overridden.
    fn config(&self) -> TestServerConfig {
        TestServerConfig::default()
    }
}

/// Default upper bound of the readiness wait.
pub const DEFAULT_HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings of the test executor and of the readiness wait.
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    /// Builder of the executor, the base address is set to the server address.
    pub executor: Option<RequestExecutorBuilder>,

    /// First delay between health checks.
    pub min_backoff_delay: Duration,
    /// Largest delay between health checks.
    pub max_backoff_delay: Duration,
    /// Adds random jitter to the delays.
    pub backoff_jitter: bool,
    /// Health checks before giving up.
    pub max_retry_attempts: usize,

    /// Upper bound of the whole readiness wait.
    pub health_check_timeout: Duration,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            executor: None,
            min_backoff_delay: Duration::from_millis(10),
            max_backoff_delay: Duration::from_secs(1),
            backoff_jitter: true,
            max_retry_attempts: 10,
            health_check_timeout: DEFAULT_HEALTH_CHECK_TIMEOUT,
        }
    }
}
