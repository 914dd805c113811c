#![allow(
    clippy::missing_errors_doc,
    dead_code,
    missing_docs,
    clippy::expect_used
)]
use std::net::TcpListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use techniq_fetch::test_server::{HealthStatus, TestClient, TestServer};
use techniq_fetch::{QueryParams, RequestExecutor};

pub const TEST_TOKEN: &str = "test-id-token";

/// Delay of the `/slow` endpoint.
pub const SLOW_DELAY: Duration = Duration::from_secs(2);

pub type TestApp = TestClient<BackendStub>;

/// An axum server mimicking the backend functions and a few failure modes.
#[derive(Debug, Clone, Default)]
pub struct BackendStub {
    flaky_calls: Arc<AtomicUsize>,
}

impl BackendStub {
    pub fn flaky_calls(&self) -> usize {
        self.flaky_calls.load(Ordering::SeqCst)
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/health", get(|| async { Json("ok") }))
            .route("/exercises", get(exercises))
            .route("/broken", get(broken))
            .route("/empty", get(|| async { StatusCode::OK }))
            .route("/slow", get(slow))
            .route("/flaky", get(flaky))
            .route("/headers", get(echo_headers))
            .route("/echo", post(echo))
            .route("/generate_custom_drill", post(generate_custom_drill))
            .route("/get_advanced_recommendations", post(advanced_recommendations))
            .route("/generate_training_plan", post(training_plan))
            .with_state(self.clone())
    }
}

impl TestServer for BackendStub {
    type Error = std::io::Error;

    async fn launch(&self, listener: TcpListener) -> Result<(), Self::Error> {
        listener.set_nonblocking(true)?;
        let listener = tokio::net::TcpListener::from_std(listener)?;
        info!(?listener, "launching backend stub");
        axum::serve(listener, self.router()).await
    }

    async fn is_healthy(&self, executor: &RequestExecutor) -> Result<HealthStatus, Self::Error> {
        let Ok(address) = executor.address("/health", &QueryParams::new()) else {
            return Ok(HealthStatus::Unhealthy);
        };
        let status = match executor.execute::<String>(address).await {
            Ok(_) => HealthStatus::Healthy,
            Err(_) => HealthStatus::Unhealthy,
        };
        Ok(status)
    }
}

#[derive(Debug, Deserialize)]
struct ExerciseFilter {
    category: Option<String>,
    limit: Option<usize>,
}

async fn exercises(Query(filter): Query<ExerciseFilter>) -> Json<Value> {
    let catalog = [
        ("Wall Passing", "technical", 15),
        ("Cone Weaving", "technical", 10),
        ("Interval Run", "physical", 20),
        ("Speed Ladder", "physical", 10),
    ];
    let items = catalog
        .into_iter()
        .filter(|(_, category, _)| filter.category.as_deref().is_none_or(|it| it == *category))
        .take(filter.limit.unwrap_or(usize::MAX))
        .map(|(name, category, duration)| {
            json!({
                "exerciseName": name,
                "category": category,
                "estimatedDuration": duration,
                "targetSkills": [],
            })
        })
        .collect();
    Json(Value::Array(items))
}

async fn broken() -> Json<Value> {
    Json(json!({ "exerciseName": "Wall Passing", "estimatedDuration": "fifteen" }))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(json!([]))
}

async fn flaky(State(stub): State<BackendStub>) -> Response {
    let call = stub.flaky_calls.fetch_add(1, Ordering::SeqCst);
    if call < 2 {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    } else {
        Json(json!({ "attempt": call + 1 })).into_response()
    }
}

fn header(headers: &HeaderMap, name: impl axum::http::header::AsHeaderName) -> Value {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map_or(Value::Null, Value::from)
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    Json(json!({
        "accept": header(&headers, "accept"),
        "userAgent": header(&headers, USER_AGENT),
        "authorization": header(&headers, AUTHORIZATION),
    }))
}

async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "contentType": header(&headers, CONTENT_TYPE),
        "body": body,
    }))
}

fn is_authenticated(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .is_some_and(|value| value.as_bytes() == format!("Bearer {TEST_TOKEN}").as_bytes())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Authentication required" })),
    )
        .into_response()
}

async fn generate_custom_drill(headers: HeaderMap, Json(request): Json<Value>) -> Response {
    if !is_authenticated(&headers) {
        return unauthorized();
    }
    let Some(user_id) = request.get("user_id").and_then(Value::as_str) else {
        return (StatusCode::BAD_REQUEST, "Missing user_id").into_response();
    };

    let (width, length) = match request.get("field_size").and_then(Value::as_str) {
        Some("small") => (20, 15),
        Some("large") => (50, 30),
        _ => (30, 20),
    };
    let requirements = request.get("requirements").cloned().unwrap_or(Value::Null);
    let equipment = requirements.get("equipment").cloned().unwrap_or(json!([]));
    let difficulty = requirements
        .get("difficulty")
        .cloned()
        .unwrap_or(json!("intermediate"));

    let drill = json!({
        "name": "Pressure Receiving Box",
        "description": "Receive and turn away from a closing defender.",
        "setup": "Mark a box with four cones. Player starts at A.",
        "instructions": [
            "Pass against the wall from cone A",
            "Receive on the back foot",
            "Turn through the gate at B",
        ],
        "diagram": {
            "field": { "width": width, "length": length },
            "elements": [
                { "type": "cone", "x": 2, "y": 2, "label": "A" },
                { "type": "cone", "x": 10, "y": 8, "label": "B" },
                { "type": "player", "x": 5, "y": 5, "label": "P" },
            ],
            "paths": [
                { "from": "A", "to": "B", "style": "dribble" },
            ],
        },
        "progressions": ["Easier: no defender", "Harder: two touches max"],
        "coachingPoints": ["Open body shape", "Check shoulder"],
        "estimatedDuration": 15,
        "difficulty": difficulty,
        "category": "Technical",
        "targetSkills": ["first touch", "turning"],
        "equipment": equipment,
        "safetyNotes": "Keep the area clear of obstacles.",
    });

    Json(json!({
        "user_id": user_id,
        "drill": drill,
        "algorithm": "openai_custom_drill_generation",
        "generated_at": "2025-03-01T09:30:00",
        "model_version": "1.0.0",
        "requirements": requirements,
    }))
    .into_response()
}

async fn advanced_recommendations(headers: HeaderMap, Json(request): Json<Value>) -> Response {
    if !is_authenticated(&headers) {
        return unauthorized();
    }
    let limit = request
        .get("limit")
        .and_then(Value::as_u64)
        .unwrap_or(5)
        .min(10);
    let candidates = request
        .get("candidate_exercises")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let recommendations = candidates
        .iter()
        .filter_map(Value::as_str)
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .zip(0_u32..)
        .map(|(name, index)| {
            json!({
                "exerciseName": name,
                "matchPercentage": 85 - index * 5,
                "reason": "Foundational skill for all players",
                "confidenceScore": 0.8 - f64::from(index) * 0.1,
            })
        })
        .collect::<Vec<_>>();

    Json(json!({
        "user_id": request.get("user_id"),
        "recommendations": recommendations,
        "algorithm": "lightweight_collaborative_filtering",
        "generated_at": "2025-03-01T09:30:00",
        "model_version": "2.0.0",
        "player_profile": request.get("player_profile"),
        "data_stats": { "training_sessions": 42, "user_profiles": 3, "exercise_catalog": 12 },
    }))
    .into_response()
}

async fn training_plan(headers: HeaderMap, Json(request): Json<Value>) -> Response {
    if !is_authenticated(&headers) {
        return unauthorized();
    }
    let weeks = request
        .get("duration_weeks")
        .and_then(Value::as_u64)
        .unwrap_or(6);

    let weeks = (1..=weeks)
        .map(|week| {
            json!({
                "weekNumber": week,
                "focusArea": format!("Block {week}"),
                "days": [
                    {
                        "dayNumber": 1,
                        "dayOfWeek": "Monday",
                        "isRestDay": false,
                        "sessions": [{
                            "sessionType": "Technical",
                            "duration": 45,
                            "intensity": 3,
                            "suggestedExerciseNames": ["Wall Passing"],
                        }],
                    },
                    { "dayNumber": 2, "dayOfWeek": "Tuesday", "isRestDay": true, "sessions": [] },
                ],
            })
        })
        .collect::<Vec<_>>();

    Json(json!({
        "name": "Stub Plan",
        "description": "Generated by the backend stub",
        "difficulty": request.get("difficulty"),
        "category": request.get("category"),
        "targetRole": request.get("target_role"),
        "weeks": weeks,
    }))
    .into_response()
}
