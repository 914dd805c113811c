use std::sync::{Arc, Mutex};

use http::Method;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use super::*;

#[derive(Debug, Deserialize, PartialEq)]
struct Exercise {
    name: String,
    target_skills: Vec<String>,
}

/// Answers every request with the same outcome and records what it received.
#[derive(Debug, Clone)]
struct StubTransport {
    outcome: Result<TransportResponse, TransportFailure>,
    received: Arc<Mutex<Vec<TransportRequest>>>,
}

impl StubTransport {
    fn respond(status: u16, body: &'static str) -> Self {
        Self {
            outcome: Ok(TransportResponse::new(status, body)),
            received: Arc::default(),
        }
    }

    fn fail(kind: FailureKind) -> Self {
        Self {
            outcome: Err(TransportFailure::new(kind, "stubbed failure")),
            received: Arc::default(),
        }
    }

    fn received(&self) -> Vec<TransportRequest> {
        self.received.lock().expect("not poisoned").clone()
    }
}

impl Transport for StubTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        self.received.lock().expect("not poisoned").push(request);
        self.outcome.clone()
    }
}

fn executor(transport: &StubTransport) -> RequestExecutor<StubTransport> {
    RequestExecutor::builder()
        .with_base_address("http://localhost:8080")
        .build_with_transport(transport.clone())
        .expect("should build")
}

fn address(executor: &RequestExecutor<StubTransport>) -> Url {
    executor
        .address("/exercises", &QueryParams::new())
        .expect("valid address")
}

#[tokio::test]
async fn test_execute_decodes_success_payload() {
    let transport = StubTransport::respond(
        200,
        r#"[{"name":"Wall Passing","targetSkills":["passing","first touch"]}]"#,
    );
    let executor = executor(&transport);

    let result = executor.execute::<Vec<Exercise>>(address(&executor)).await;

    assert_eq!(
        result,
        Ok(vec![Exercise {
            name: "Wall Passing".to_string(),
            target_skills: vec!["passing".to_string(), "first touch".to_string()],
        }])
    );
    let [request]: [TransportRequest; 1] = transport.received().try_into().expect("one request");
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url.as_str(), "http://localhost:8080/exercises");
}

#[tokio::test]
async fn test_execute_adds_default_headers() {
    let transport = StubTransport::respond(200, "null");
    let executor = executor(&transport);

    executor
        .execute::<()>(address(&executor))
        .await
        .expect("should succeed");

    let [request]: [TransportRequest; 1] = transport.received().try_into().expect("one request");
    assert_eq!(
        request.headers.get(ACCEPT).map(HeaderValue::as_bytes),
        Some(b"application/json".as_slice())
    );
    let user_agent = request
        .headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(user_agent.starts_with("techniq-fetch/"), "{user_agent}");
    assert!(request.headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_request_headers_take_precedence_over_defaults() {
    let transport = StubTransport::respond(200, "null");
    let executor = executor(&transport);
    let mut request = TransportRequest::get(address(&executor));
    request
        .headers
        .insert(ACCEPT, HeaderValue::from_static("application/x-ndjson"));

    executor.send::<()>(request).await.expect("should succeed");

    let [request]: [TransportRequest; 1] = transport.received().try_into().expect("one request");
    assert_eq!(
        request.headers.get(ACCEPT).map(HeaderValue::as_bytes),
        Some(b"application/x-ndjson".as_slice())
    );
}

#[rstest::rstest]
#[case::not_found(404)]
#[case::unauthorized(401)]
#[case::server_error(500)]
#[case::redirect(302)]
#[case::informational(199)]
#[tokio::test]
async fn test_execute_rejects_status_outside_success_range(#[case] status_code: u16) {
    // The body matches the shape: it must not be decoded anyway
    let transport = StubTransport::respond(status_code, r#"{"name":"x","target_skills":[]}"#);
    let executor = executor(&transport);

    let result = executor.execute::<Exercise>(address(&executor)).await;

    assert_eq!(result, Err(FetchError::HttpError { status_code }));
}

#[rstest::rstest]
#[case::ok(200)]
#[case::created(201)]
#[case::last_success(299)]
#[tokio::test]
async fn test_execute_accepts_success_range(#[case] status_code: u16) {
    let transport = StubTransport::respond(status_code, r#"{"name":"x","target_skills":[]}"#);
    let executor = executor(&transport);

    let result = executor.execute::<Exercise>(address(&executor)).await;

    assert!(result.is_ok(), "{result:?}");
}

#[rstest::rstest]
#[case::connect(FailureKind::Connect)]
#[case::timeout(FailureKind::Timeout)]
#[case::body(FailureKind::Body)]
#[case::other(FailureKind::Other)]
#[tokio::test]
async fn test_transport_failure_is_invalid_response(#[case] kind: FailureKind) {
    let transport = StubTransport::fail(kind);
    let executor = executor(&transport);

    let result = executor.execute::<Exercise>(address(&executor)).await;

    assert_eq!(result, Err(FetchError::InvalidResponse));
}

#[tokio::test]
async fn test_execute_reports_decoding_error() {
    let transport = StubTransport::respond(200, r#"{"name":"Wall Passing"}"#);
    let executor = executor(&transport);

    let result = executor.execute::<Exercise>(address(&executor)).await;

    insta::assert_debug_snapshot!(result, @r#"
    Err(
        DecodingError {
            description: "at '.': missing field `target_skills`",
        },
    )
    "#);
}

#[tokio::test]
async fn test_empty_body_is_no_data() {
    let transport = StubTransport::respond(200, "");
    let executor = executor(&transport);

    let result = executor.execute::<Exercise>(address(&executor)).await;
    assert_eq!(result, Err(FetchError::NoData));

    let result = executor.execute::<Option<Exercise>>(address(&executor)).await;
    assert_eq!(result, Ok(None));
}

#[tokio::test]
async fn test_execute_with_body_posts_json() {
    #[derive(Debug, Serialize)]
    struct Filter<'a> {
        category: &'a str,
        limit: u8,
    }

    let transport = StubTransport::respond(200, "[]");
    let executor = executor(&transport);

    let result = executor
        .execute_with_body::<_, Vec<Exercise>>(
            address(&executor),
            &Filter {
                category: "technical",
                limit: 5,
            },
        )
        .await;

    assert_eq!(result, Ok(vec![]));
    let [request]: [TransportRequest; 1] = transport.received().try_into().expect("one request");
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.headers.get(CONTENT_TYPE).map(HeaderValue::as_bytes),
        Some(b"application/json".as_slice())
    );
    assert_eq!(
        request.body.as_deref(),
        Some(br#"{"category":"technical","limit":5}"#.as_slice())
    );
}

#[tokio::test]
async fn test_unencodable_body_fails_without_io() {
    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("unsupported value"))
        }
    }

    let transport = StubTransport::respond(200, "[]");
    let executor = executor(&transport);

    let result = executor
        .execute_with_body::<_, Vec<Exercise>>(address(&executor), &Unencodable)
        .await;

    insta::assert_debug_snapshot!(result, @r#"
    Err(
        DecodingError {
            description: "request body: unsupported value",
        },
    )
    "#);
    assert!(transport.received().is_empty());
}

#[tokio::test]
async fn test_authenticated_executor_sends_sensitive_credentials() {
    let transport = StubTransport::respond(200, "null");
    let executor = executor(&transport)
        .authenticated(&Authentication::Bearer("id-token".into()))
        .expect("valid credentials");

    executor
        .execute::<()>(address(&executor))
        .await
        .expect("should succeed");

    let [request]: [TransportRequest; 1] = transport.received().try_into().expect("one request");
    let authorization = request.headers.get(AUTHORIZATION).expect("credentials");
    assert_eq!(authorization.as_bytes(), b"Bearer id-token");
    assert!(authorization.is_sensitive());
}

#[test]
fn test_address_without_base_address_requires_absolute_path() {
    let transport = StubTransport::respond(200, "null");
    let executor = RequestExecutor::builder()
        .build_with_transport(transport)
        .expect("should build");

    let result = executor.address("/exercises", &QueryParams::new());
    assert_eq!(result, Err(FetchError::InvalidUrl));

    let result = executor.address("https://api.example.com/exercises", &QueryParams::new());
    assert!(result.is_ok());
}

#[test]
fn test_executor_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<RequestExecutor>();
}
