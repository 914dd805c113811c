use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::decode::KeyStrategy;
use super::error::FetchError;

/// Default connect and per-read idle timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for the whole request, body included.
pub const DEFAULT_RESOURCE_TIMEOUT: Duration = Duration::from_secs(60);

/// Transport and decoder settings of a [`RequestExecutor`](super::RequestExecutor).
///
/// Timeouts are fixed for the lifetime of the executor. The struct can be embedded
/// in a host configuration file, timeouts are expressed in seconds there:
///
/// ```rust
/// use std::time::Duration;
/// use techniq_fetch::ExecutorConfig;
///
/// let config: ExecutorConfig = serde_json::from_str(
///     r#"{ "requestTimeoutSeconds": 10, "resourceTimeoutSeconds": 20 }"#,
/// )?;
/// assert_eq!(config.request_timeout, Duration::from_secs(10));
/// assert_eq!(config.resource_timeout, Duration::from_secs(20));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutorConfig {
    /// Connect timeout, also applied between two reads of the response.
    #[serde(rename = "requestTimeoutSeconds", with = "seconds")]
    pub request_timeout: Duration,

    /// Timeout of the whole request, from connection to the last body byte.
    #[serde(rename = "resourceTimeoutSeconds", with = "seconds")]
    pub resource_timeout: Duration,

    /// How wire object keys are rewritten before decoding.
    pub key_strategy: KeyStrategy,

    /// Value of the `user-agent` header.
    pub user_agent: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            resource_timeout: DEFAULT_RESOURCE_TIMEOUT,
            key_strategy: KeyStrategy::default(),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ExecutorConfig {
    /// Checks the timeouts are usable.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ConfigurationError`] if a timeout is zero or if the
    /// resource timeout is shorter than the request timeout.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.request_timeout.is_zero() || self.resource_timeout.is_zero() {
            debug!(?self, "timeouts must be strictly positive");
            return Err(FetchError::ConfigurationError);
        }
        if self.resource_timeout < self.request_timeout {
            debug!(?self, "resource timeout is shorter than the request timeout");
            return Err(FetchError::ConfigurationError);
        }
        Ok(())
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_secs())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
