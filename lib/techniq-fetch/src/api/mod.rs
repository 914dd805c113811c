//! Typed access to the TechnIQ backend functions.
//!
//! Every function is a `POST` with a JSON body, authenticated with the Firebase
//! identity token of the signed-in user.
//!
//! ```rust,no_run
//! use techniq_fetch::api::{
//!     CustomDrillRequest, DrillRequirements, Equipment, PlayerProfile, TechniqApi,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), techniq_fetch::FetchError> {
//! let api = TechniqApi::connect("https://us-central1-techniq.cloudfunctions.net", "id-token")?;
//!
//! let request = CustomDrillRequest::new(
//!     "user-42",
//!     PlayerProfile::new("midfielder", "intermediate"),
//!     DrillRequirements::new("first touch under pressure").add_equipment(Equipment::Ball),
//! );
//! let response = api.generate_custom_drill(&request).await?;
//! println!("{}", response.drill.name);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    Authentication, ExecutionOutcome, FetchError, QueryParams, RequestExecutor, ReqwestTransport,
    Transport,
};

mod drill;
pub use self::drill::{
    CustomDrillRequest, CustomDrillResponse, DiagramElement, DiagramPath, DrillCategory,
    DrillDiagram, DrillDifficulty, DrillFeedback, DrillRequirements, ElementKind, Equipment,
    FieldDimensions, FieldSize, GeneratedDrill, PathStyle, RecentExercise, SessionContext,
    UnknownValue,
};

mod profile;
pub use self::profile::PlayerProfile;

mod recommendations;
pub use self::recommendations::{
    AdvancedRecommendationsResponse, DEFAULT_RECOMMENDATION_LIMIT, DataStats,
    ExerciseRecommendation, RecommendationRequest, VideoRecommendation,
    YoutubeRecommendationsResponse,
};

mod training_plan;
pub use self::training_plan::{
    TrainingDay, TrainingPlan, TrainingPlanRequest, TrainingSession, TrainingWeek,
};

/// Path of the custom drill generator.
pub const GENERATE_CUSTOM_DRILL: &str = "/generate_custom_drill";
/// Path of the video recommendations.
pub const YOUTUBE_RECOMMENDATIONS: &str = "/get_youtube_recommendations";
/// Path of the collaborative filtering recommendations.
pub const ADVANCED_RECOMMENDATIONS: &str = "/get_advanced_recommendations";
/// Path of the training plan generator.
pub const GENERATE_TRAINING_PLAN: &str = "/generate_training_plan";

/// Client of the backend functions.
///
/// The wrapped executor must have the functions root as base address.
#[derive(Debug, Clone)]
pub struct TechniqApi<T = ReqwestTransport> {
    executor: RequestExecutor<T>,
}

impl TechniqApi {
    /// Connects to the functions root with a bearer token and the default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ConfigurationError`] if the base address or the token
    /// is invalid.
    pub fn connect(base_address: &str, id_token: &str) -> Result<Self, FetchError> {
        let executor = RequestExecutor::builder()
            .with_base_address(base_address)
            .with_authentication(Authentication::Bearer(id_token.into()))
            .build()?;
        Ok(Self::new(executor))
    }
}

impl<T> TechniqApi<T>
where
    T: Transport,
{
    /// Wraps an executor whose base address is the functions root.
    pub fn new(executor: RequestExecutor<T>) -> Self {
        Self { executor }
    }

    /// The underlying executor, for calls without a typed wrapper.
    pub fn executor(&self) -> &RequestExecutor<T> {
        &self.executor
    }

    /// Returns a copy using another identity token, for instance after a refresh.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ConfigurationError`] if the token is not a valid header.
    pub fn with_token(&self, id_token: &str) -> Result<Self, FetchError> {
        let executor = self
            .executor
            .authenticated(&Authentication::Bearer(id_token.into()))?;
        Ok(Self { executor })
    }

    /// Generates a drill tailored to the player and the requirements.
    ///
    /// # Errors
    ///
    /// See [`RequestExecutor::execute`].
    pub async fn generate_custom_drill(
        &self,
        request: &CustomDrillRequest,
    ) -> ExecutionOutcome<CustomDrillResponse> {
        debug!(user_id = %request.user_id, field_size = ?request.field_size, "generate custom drill");
        self.call(GENERATE_CUSTOM_DRILL, request).await
    }

    /// Training videos matching the player profile.
    ///
    /// # Errors
    ///
    /// See [`RequestExecutor::execute`].
    pub async fn youtube_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> ExecutionOutcome<YoutubeRecommendationsResponse> {
        debug!(user_id = %request.user_id, limit = request.limit, "youtube recommendations");
        self.call(YOUTUBE_RECOMMENDATIONS, request).await
    }

    /// Exercises ranked by collaborative filtering over training history.
    ///
    /// # Errors
    ///
    /// See [`RequestExecutor::execute`].
    pub async fn advanced_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> ExecutionOutcome<AdvancedRecommendationsResponse> {
        debug!(user_id = %request.user_id, limit = request.limit, "advanced recommendations");
        self.call(ADVANCED_RECOMMENDATIONS, request).await
    }

    /// A multi-week training plan.
    ///
    /// # Errors
    ///
    /// See [`RequestExecutor::execute`].
    pub async fn training_plan(&self, request: &TrainingPlanRequest) -> ExecutionOutcome<TrainingPlan> {
        debug!(user_id = %request.user_id, weeks = request.duration_weeks, "generate training plan");
        self.call(GENERATE_TRAINING_PLAN, request).await
    }

    async fn call<B, R>(&self, path: &str, body: &B) -> ExecutionOutcome<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let address = self.executor.address(path, &QueryParams::new())?;
        self.executor.execute_with_body(address, body).await
    }
}
