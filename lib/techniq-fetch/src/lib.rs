//! # TechnIQ fetch
//!
//! Typed HTTP request pipeline used by the TechnIQ soccer training features.
//!
//! A [`RequestExecutor`] performs one request/response cycle: it composes the
//! address, performs the request through a shared transport session, checks the
//! status code and decodes the JSON body into the caller's type. Every failure is
//! reported as one member of the closed [`FetchError`] taxonomy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use techniq_fetch::{QueryParams, RequestExecutor};
//!
//! #[derive(Debug, Deserialize)]
//! struct Video {
//!     video_id: String,
//!     title: String,
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), techniq_fetch::FetchError> {
//! let executor = RequestExecutor::builder()
//!     .with_base_address("https://api.example.com")
//!     .build()?;
//!
//! let query = QueryParams::new()
//!     .add_param("position", "midfielder")
//!     .add_param("limit", 5);
//! let address = executor.address("/videos", &query)?;
//!
//! // `videoId` and `video_id` both decode into `video_id`
//! let videos: Vec<Video> = executor.execute(address).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! | Error | When |
//! |---|---|
//! | [`FetchError::InvalidUrl`] | the address cannot be composed, before any I/O |
//! | [`FetchError::InvalidResponse`] | the transport failed or timed out |
//! | [`FetchError::HttpError`] | the status code is outside `200..=299` |
//! | [`FetchError::DecodingError`] | the body does not match the result type |
//! | [`FetchError::NoData`] | the body is empty but the result type needs content |
//! | [`FetchError::ConfigurationError`] | the executor configuration is invalid |
//!
//! The executor never retries, wrap calls in a [`RetryPolicy`] to do so.
//!
//! ## Backend functions
//!
//! [`api::TechniqApi`] exposes the backend functions (custom drills,
//! recommendations, training plans) with typed requests and responses.

mod client;

pub mod api;

pub mod test_server;

pub use self::client::{
    Authentication, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESOURCE_TIMEOUT, Decoder, EndpointRequest,
    ExecutionOutcome, ExecutorConfig, FailureKind, FetchError, KeyStrategy, QueryParams,
    RequestExecutor, RequestExecutorBuilder, ReqwestTransport, RetryPolicy, SecureString,
    Transport, TransportFailure, TransportRequest, TransportResponse, build_address,
};
