//! Harness running a server in the background for integration tests.
//!
//! [`TestClient`] binds a random local port, launches a [`TestServer`] on it,
//! waits until it is ready, and dereferences to a [`RequestExecutor`] whose base
//! address is the server address. The server task is aborted on drop.
//!
//! ```rust,no_run
//! # use std::net::TcpListener;
//! # use techniq_fetch::test_server::{TestClient, TestServer};
//! # use techniq_fetch::QueryParams;
//! # #[derive(Debug)] struct DrillServer;
//! # impl TestServer for DrillServer {
//! #   type Error = std::io::Error;
//! #   async fn launch(&self, listener: TcpListener) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TestClient::start(DrillServer).await?;
//!
//! let address = client.address("/drills", &QueryParams::new())?;
//! let drills: Vec<String> = client.execute(address).await?;
//! # Ok(())
//! # }
//! ```

use std::net::{Ipv4Addr, SocketAddr, TcpListener};
use std::sync::Arc;

use backon::{ExponentialBuilder, Retryable};
use tracing::{debug, error};

use crate::{RequestExecutor, RequestExecutorBuilder};

mod error;
pub use self::error::TestAppError;

mod server;
pub use self::server::{DEFAULT_HEALTH_CHECK_TIMEOUT, HealthStatus, TestServer, TestServerConfig};

/// A running [`TestServer`] with an executor pointing to it.
#[derive(Debug, derive_more::Deref)]
pub struct TestClient<T> {
    local_addr: SocketAddr,
    #[deref]
    executor: RequestExecutor,
    handle: Option<tokio::task::JoinHandle<()>>,
    test_server: Arc<T>,
}

impl<T> TestClient<T>
where
    T: TestServer + Send + Sync + 'static,
{
    /// Starts the server on a random local port and waits until it is ready.
    ///
    /// # Errors
    ///
    /// Fails if the port cannot be bound, the executor cannot be built, or the
    /// server does not become ready.
    pub async fn start(test_server: T) -> Result<Self, TestAppError> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        let listener = TcpListener::bind(addr)?;
        let local_addr = listener.local_addr()?;

        let test_server = Arc::new(test_server);
        let handle = tokio::spawn({
            let server = Arc::clone(&test_server);
            async move {
                if let Err(error) = server.launch(listener).await {
                    error!(%error, "server launch failed");
                }
            }
        });

        let TestServerConfig {
            executor,
            min_backoff_delay,
            max_backoff_delay,
            backoff_jitter,
            max_retry_attempts,
            health_check_timeout,
        } = test_server.config();

        let executor = executor
            .unwrap_or_else(RequestExecutor::builder)
            .with_base_address(format!("http://{local_addr}"))
            .build()?;

        let result = Self {
            local_addr,
            executor,
            handle: Some(handle),
            test_server,
        };

        let mut backoff = ExponentialBuilder::default()
            .with_min_delay(min_backoff_delay)
            .with_max_delay(max_backoff_delay)
            .with_max_times(max_retry_attempts);
        if backoff_jitter {
            backoff = backoff.with_jitter();
        }

        let healthy = tokio::time::timeout(health_check_timeout, result.wait_for_health(&backoff))
            .await
            .map_err(|_| TestAppError::HealthCheckTimeout {
                timeout: health_check_timeout,
            })?;
        if !healthy {
            // dropping `result` aborts the server task
            return Err(TestAppError::UnhealthyServer {
                attempts: max_retry_attempts,
            });
        }

        Ok(result)
    }

    async fn wait_for_health(&self, backoff: &ExponentialBuilder) -> bool {
        let health_check = || async {
            match self.test_server.is_healthy(&self.executor).await {
                Ok(HealthStatus::Healthy) => {
                    debug!("server healthy");
                    Ok(true)
                }
                Ok(HealthStatus::Unhealthy) => {
                    debug!("server not yet healthy");
                    Err(std::io::Error::other("server not healthy yet"))
                }
                Ok(HealthStatus::Uncheckable) => {
                    let local_addr = self.local_addr;
                    tokio::net::TcpStream::connect(local_addr)
                        .await
                        .map(|_| true)
                        .inspect_err(|err| debug!(%err, %local_addr, "server not reachable yet"))
                }
                Err(error) => {
                    error!(%error, "health check error");
                    Ok(false)
                }
            }
        };

        health_check.retry(backoff).await.unwrap_or(false)
    }

    /// Address the server listens on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The executor pointing to the server, same as dereferencing.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// A new executor builder for the server, to test other settings.
    pub fn executor_builder(&self) -> RequestExecutorBuilder {
        RequestExecutor::builder().with_base_address(format!("http://{}", self.local_addr))
    }
}

impl<T> Drop for TestClient<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
