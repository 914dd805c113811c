use serde::{Deserialize, Serialize};

use super::profile::PlayerProfile;

/// Default number of recommendations requested.
pub const DEFAULT_RECOMMENDATION_LIMIT: u32 = 5;

/// Body of the recommendation functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Identifier of the signed-in user.
    pub user_id: String,
    /// Profile the recommendations are tailored to.
    pub player_profile: PlayerProfile,

    /// Exercises to rank, only read by the advanced recommendations.
    /// The backend falls back to its own catalog when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidate_exercises: Vec<String>,

    /// The advanced recommendations cap it to 10.
    pub limit: u32,
}

impl RecommendationRequest {
    /// A request for the default number of recommendations.
    pub fn new(user_id: impl Into<String>, player_profile: PlayerProfile) -> Self {
        Self {
            user_id: user_id.into(),
            player_profile,
            candidate_exercises: vec![],
            limit: DEFAULT_RECOMMENDATION_LIMIT,
        }
    }

    /// Sets the maximum number of recommendations.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Adds an exercise to rank.
    #[must_use]
    pub fn add_candidate(mut self, exercise: impl Into<String>) -> Self {
        self.candidate_exercises.push(exercise.into());
        self
    }
}

/// Response of `POST /get_youtube_recommendations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoutubeRecommendationsResponse {
    /// Echo of the request user.
    pub user_id: String,
    /// Best match first.
    pub recommendations: Vec<VideoRecommendation>,
    /// Name of the ranking algorithm.
    pub algorithm: String,
    /// Generation time, ISO 8601 without offset.
    pub generated_at: String,
    /// Version of the ranking model.
    pub model_version: String,
}

/// A training video picked for the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecommendation {
    /// YouTube video identifier.
    pub video_id: String,
    /// Video title.
    pub title: String,
    /// Video description, possibly truncated.
    #[serde(default)]
    pub description: String,
    /// Address of the thumbnail image.
    #[serde(default)]
    pub thumbnail_url: String,
    /// Name of the publishing channel.
    #[serde(default)]
    pub channel_title: String,
    /// Publication time, ISO 8601.
    #[serde(default)]
    pub published_at: String,
    /// Human readable, for instance `12:04`.
    #[serde(default)]
    pub duration: String,
    /// Duration in seconds.
    #[serde(default)]
    pub duration_seconds: u64,
    /// Whether the video is a YouTube Short.
    #[serde(default)]
    pub is_short: bool,
    /// Views at search time.
    #[serde(default)]
    pub view_count: u64,
    /// Match between the video and the search query.
    #[serde(default)]
    pub relevance_score: f64,
    /// Score the ranking is based on.
    #[serde(default)]
    pub final_score: f64,
    /// Query the video was found with.
    #[serde(default)]
    pub search_query: String,
    /// Why the video was picked.
    #[serde(default)]
    pub reasoning: String,
    /// Short reason shown to the player.
    #[serde(default)]
    pub recommendation_reason: String,
    /// Likes and comments relative to views.
    #[serde(default)]
    pub engagement_score: f64,
}

impl VideoRecommendation {
    /// Address of the video on YouTube.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Response of `POST /get_advanced_recommendations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedRecommendationsResponse {
    /// Echo of the request user.
    pub user_id: String,
    /// In the order sent by the backend, see [`Self::ranked`].
    pub recommendations: Vec<ExerciseRecommendation>,
    /// Name of the ranking algorithm.
    pub algorithm: String,
    /// Generation time, ISO 8601 without offset.
    pub generated_at: String,
    /// Version of the ranking model.
    pub model_version: String,
    /// Absent when the backend used its fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_stats: Option<DataStats>,
}

impl AdvancedRecommendationsResponse {
    /// Recommendations sorted by decreasing confidence.
    pub fn ranked(&self) -> Vec<&ExerciseRecommendation> {
        let mut result = self.recommendations.iter().collect::<Vec<_>>();
        result.sort_by(|left, right| right.confidence_score.total_cmp(&left.confidence_score));
        result
    }
}

/// An exercise scored by collaborative filtering.
///
/// The backend sends `exerciseName`, `matchPercentage`, `confidenceScore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecommendation {
    /// Name of the catalog exercise.
    pub exercise_name: String,
    /// From 0 to 100.
    pub match_percentage: f64,
    /// Why it suits the player.
    pub reason: String,
    /// From 0 to 1.
    pub confidence_score: f64,
}

/// Volume of data the recommendations were computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStats {
    /// Sessions logged by all users.
    pub training_sessions: u64,
    /// Players with a profile.
    pub user_profiles: u64,
    /// Exercises available for ranking.
    pub exercise_catalog: u64,
}
