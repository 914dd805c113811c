use std::time::Duration;

use crate::FetchError;

/// Errors raised while starting a [`TestClient`](super::TestClient).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TestAppError {
    /// Binding the listener failed.
    #[display("I/O error: {_0}")]
    IoError(std::io::Error),

    /// The executor could not be built.
    #[display("executor error: {_0}")]
    ExecutorError(FetchError),

    /// Every health check failed.
    #[from(ignore)]
    #[display("Server failed to become healthy after {attempts} attempts")]
    UnhealthyServer {
        /// Health checks performed.
        attempts: usize,
    },

    /// The server was not healthy in time.
    #[from(ignore)]
    #[display("Server failed to become healthy within {timeout:?}")]
    HealthCheckTimeout {
        /// The configured bound.
        timeout: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_app_error_display() {
        insta::assert_snapshot!(
            TestAppError::UnhealthyServer { attempts: 5 },
            @"Server failed to become healthy after 5 attempts"
        );
        insta::assert_snapshot!(
            TestAppError::HealthCheckTimeout { timeout: Duration::from_secs(5) },
            @"Server failed to become healthy within 5s"
        );
        insta::assert_snapshot!(
            TestAppError::from(FetchError::ConfigurationError),
            @"executor error: Configuration error: the transport session is misconfigured"
        );
    }

    #[test]
    fn test_test_app_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");

        let error = TestAppError::from(io_error);

        let TestAppError::IoError(inner) = error else {
            panic!("expected an I/O error, got {error:?}");
        };
        assert_eq!(inner.kind(), std::io::ErrorKind::AddrInUse);
    }

    #[test]
    fn test_error_trait_bounds() {
        fn assert_error_traits<T>()
        where
            T: std::error::Error + Send + Sync + 'static,
        {
        }

        assert_error_traits::<TestAppError>();
    }
}
