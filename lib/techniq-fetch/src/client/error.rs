/// Result of a single request/response cycle.
///
/// Either the decoded value or one member of the closed [`FetchError`] taxonomy.
pub type ExecutionOutcome<T> = Result<T, FetchError>;

/// Errors that can occur when executing a request with the [`RequestExecutor`](super::RequestExecutor).
///
/// The set is closed: every failure of the pipeline, from address composition to
/// payload decoding, is reported as one of these variants and never as a panic or
/// a raw transport error.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
pub enum FetchError {
    /// The address could not be composed into a valid absolute URL.
    ///
    /// Occurs before any I/O, when the base address and path do not parse.
    #[display("Invalid URL: the address could not be composed")]
    InvalidUrl,

    /// The transport failed or did not produce an HTTP response.
    ///
    /// Covers DNS failures, refused connections, TLS failures, timeouts and
    /// interrupted body reads. The underlying cause is logged, not returned.
    #[display("Invalid response: the transport did not produce an HTTP response")]
    InvalidResponse,

    /// The server answered with a status code outside `200..=299`.
    ///
    /// The body is not read in that case.
    #[display("HTTP error: unexpected status code {status_code}")]
    HttpError {
        /// The HTTP status code received.
        status_code: u16,
    },

    /// The payload did not match the requested result shape.
    ///
    /// Also used when a request body cannot be encoded as JSON.
    #[display("Decoding error: {description}")]
    DecodingError {
        /// Description of the underlying decode failure, including the JSON path.
        description: String,
    },

    /// The response had no body but the result shape requires one.
    #[display("No data: the response body is empty")]
    NoData,

    /// The transport session is misconfigured.
    ///
    /// Occurs when building the executor with invalid timeouts, headers,
    /// credentials or base address.
    #[display("Configuration error: the transport session is misconfigured")]
    ConfigurationError,
}

impl FetchError {
    /// Returns the HTTP status code carried by [`FetchError::HttpError`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpError { status_code } => Some(*status_code),
            _ => None,
        }
    }

    /// Tells whether running the same request again may succeed.
    ///
    /// True for transport failures, `408 Request Timeout`, `429 Too Many Requests`
    /// and server errors (`5xx`). The executor itself never retries, see
    /// [`RetryPolicy`](super::RetryPolicy).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::InvalidResponse => true,
            Self::HttpError { status_code } => {
                matches!(status_code, 408 | 429) || (500..=599).contains(status_code)
            }
            Self::InvalidUrl | Self::DecodingError { .. } | Self::NoData | Self::ConfigurationError => {
                false
            }
        }
    }

    pub(crate) fn decoding(description: impl Into<String>) -> Self {
        Self::DecodingError {
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_fetch_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<FetchError>();
        assert_sync::<FetchError>();
    }

    #[test]
    fn test_fetch_error_display() {
        insta::assert_snapshot!(
            FetchError::HttpError { status_code: 404 },
            @"HTTP error: unexpected status code 404"
        );
        insta::assert_snapshot!(
            FetchError::decoding("at 'drill.name': missing field `name`"),
            @"Decoding error: at 'drill.name': missing field `name`"
        );
        insta::assert_snapshot!(
            FetchError::InvalidUrl,
            @"Invalid URL: the address could not be composed"
        );
    }

    #[test]
    fn test_status_code_only_for_http_error() {
        assert_eq!(FetchError::HttpError { status_code: 503 }.status_code(), Some(503));
        assert_eq!(FetchError::NoData.status_code(), None);
        assert_eq!(FetchError::InvalidResponse.status_code(), None);
    }

    #[rstest]
    #[case::transport(FetchError::InvalidResponse, true)]
    #[case::request_timeout(FetchError::HttpError { status_code: 408 }, true)]
    #[case::too_many_requests(FetchError::HttpError { status_code: 429 }, true)]
    #[case::server_error(FetchError::HttpError { status_code: 503 }, true)]
    #[case::not_found(FetchError::HttpError { status_code: 404 }, false)]
    #[case::unauthorized(FetchError::HttpError { status_code: 401 }, false)]
    #[case::decoding(FetchError::decoding("boom"), false)]
    #[case::no_data(FetchError::NoData, false)]
    #[case::invalid_url(FetchError::InvalidUrl, false)]
    #[case::configuration(FetchError::ConfigurationError, false)]
    fn test_is_retryable(#[case] error: FetchError, #[case] expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }
}
